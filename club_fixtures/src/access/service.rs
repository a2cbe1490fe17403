//! Access token registry.

use super::clock::Clock;
use super::config::TokenConfig;
use super::errors::{AccessTokenError, AccessTokenResult, TokenRejection};
use super::models::{IssuedToken, TokenClaims, TokenStatistics, TokenValidation};
use crate::scheduling::ScheduledContest;
use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Hex characters of the SHA-256 digest carried in a token
pub const DIGEST_LEN: usize = 16;

const PREFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone)]
struct ActiveToken {
    claims: TokenClaims,
    expires_at: DateTime<Utc>,
}

/// Issues and validates single-use, contest-bound access tokens.
///
/// Tokens look like `<prefix>-<digest>`. The prefix is random and keys the
/// registry; the digest is the first 16 hex characters of
/// `SHA-256(json(claims) || prefix || secret)`, so a token cannot be forged or
/// altered without the secret. State lives only in this instance and is lost
/// on drop; callers needing durability persist the contest and expiry and
/// re-issue.
///
/// Not internally synchronised. Wrap in a `Mutex` to share between threads.
pub struct AccessTokenService {
    clock: Arc<dyn Clock>,
    secret: String,
    config: TokenConfig,
    /// Keyed by prefix
    active: HashMap<String, ActiveToken>,
    /// Full tokens that validated successfully, with their original expiry
    used: HashMap<String, DateTime<Utc>>,
}

impl fmt::Debug for AccessTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenService")
            .field("config", &self.config)
            .field("active", &self.active.len())
            .field("used", &self.used.len())
            .finish_non_exhaustive()
    }
}

impl AccessTokenService {
    /// Create a new token service with the default configuration
    ///
    /// # Arguments
    ///
    /// * `clock` - Time source for issuance and expiry
    /// * `secret` - Server-side secret mixed into every digest
    ///
    /// # Errors
    ///
    /// * `AccessTokenError::InvalidInput` - empty secret
    pub fn new(clock: Arc<dyn Clock>, secret: impl Into<String>) -> AccessTokenResult<Self> {
        Self::with_config(clock, secret, TokenConfig::default())
    }

    /// Create a new token service
    ///
    /// # Errors
    ///
    /// * `AccessTokenError::InvalidInput` - empty secret or invalid config
    pub fn with_config(
        clock: Arc<dyn Clock>,
        secret: impl Into<String>,
        config: TokenConfig,
    ) -> AccessTokenResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AccessTokenError::InvalidInput(
                "token secret must not be empty".to_string(),
            ));
        }
        config.validate()?;

        Ok(Self {
            clock,
            secret,
            config,
            active: HashMap::new(),
            used: HashMap::new(),
        })
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue a token for one contest.
    ///
    /// Expired tokens are swept first.
    ///
    /// # Errors
    ///
    /// * `AccessTokenError::InvalidInput` - empty contest ID or no participants
    pub fn issue(
        &mut self,
        contest_id: &str,
        participant_ids: &[&str],
        resource_id: Option<&str>,
    ) -> AccessTokenResult<IssuedToken> {
        if contest_id.is_empty() {
            return Err(AccessTokenError::InvalidInput(
                "contest id must not be empty".to_string(),
            ));
        }
        if participant_ids.is_empty() || participant_ids.iter().any(|id| id.is_empty()) {
            return Err(AccessTokenError::InvalidInput(
                "at least one non-empty participant id is required".to_string(),
            ));
        }

        self.cleanup_expired();

        let issued_at = self.clock.now();
        let expires_at = issued_at + self.config.expiry();

        let mut sorted: Vec<String> = participant_ids.iter().map(|id| id.to_string()).collect();
        sorted.sort();

        let claims = TokenClaims {
            participant_ids: sorted,
            contest_id: contest_id.to_string(),
            resource_id: resource_id.map(str::to_string),
            issued_at: issued_at.timestamp(),
            expires_at: expires_at.timestamp(),
        };

        let prefix = self.fresh_prefix();
        let digest = self.digest(&claims, &prefix)?;
        let token = format!("{prefix}-{digest}");

        self.active.insert(
            prefix,
            ActiveToken {
                claims: claims.clone(),
                expires_at,
            },
        );

        log::info!(
            "Issued access token for contest {} ({} participants, expires {})",
            contest_id,
            claims.participant_ids.len(),
            expires_at
        );

        Ok(IssuedToken {
            token,
            expires_at,
            claims,
        })
    }

    /// Issue a token for a placed contest, bound to its court
    ///
    /// # Errors
    ///
    /// * `AccessTokenError::InvalidInput` - the contest has no real participants
    pub fn issue_for(&mut self, scheduled: &ScheduledContest) -> AccessTokenResult<IssuedToken> {
        let participant_ids = scheduled.contest.participant_ids();
        self.issue(
            &scheduled.contest.id,
            &participant_ids,
            Some(scheduled.resource_id.as_str()),
        )
    }

    /// Check a token and consume it on success.
    ///
    /// Checks run in order: shape, prior use, registry lookup, digest,
    /// expiry. A valid token moves to the used set and never validates again;
    /// an expired one is dropped from the registry.
    pub fn validate(&mut self, token: &str) -> TokenValidation {
        let Some((prefix, digest)) = split_token(token) else {
            return TokenValidation::Invalid(TokenRejection::Malformed);
        };

        if self.used.contains_key(token) {
            return TokenValidation::Invalid(TokenRejection::AlreadyUsed);
        }

        let Some(entry) = self.active.get(prefix) else {
            return TokenValidation::Invalid(TokenRejection::UnknownToken);
        };

        let expected = match self.digest(&entry.claims, prefix) {
            Ok(expected) => expected,
            Err(e) => {
                log::error!("Failed to recompute token digest: {}", e);
                return TokenValidation::Invalid(TokenRejection::IntegrityFailure);
            }
        };
        if !bool::from(expected.as_bytes().ct_eq(digest.as_bytes())) {
            log::warn!(
                "Access token integrity check failed for contest {}",
                entry.claims.contest_id
            );
            return TokenValidation::Invalid(TokenRejection::IntegrityFailure);
        }

        if self.clock.now() > entry.expires_at {
            self.active.remove(prefix);
            return TokenValidation::Invalid(TokenRejection::Expired);
        }

        let Some(entry) = self.active.remove(prefix) else {
            return TokenValidation::Invalid(TokenRejection::UnknownToken);
        };
        self.used.insert(token.to_string(), entry.expires_at);
        log::debug!("Access token consumed for contest {}", entry.claims.contest_id);

        TokenValidation::Valid(entry.claims)
    }

    /// Revoke an unused token. Returns whether anything was removed.
    pub fn invalidate(&mut self, token: &str) -> bool {
        let Some((prefix, digest)) = split_token(token) else {
            return false;
        };
        let matches = self
            .active
            .get(prefix)
            .and_then(|entry| self.digest(&entry.claims, prefix).ok())
            .is_some_and(|expected| bool::from(expected.as_bytes().ct_eq(digest.as_bytes())));

        if matches {
            self.active.remove(prefix);
            log::info!("Access token invalidated");
        }
        matches
    }

    /// Drop every token past its expiry, active or used.
    ///
    /// Returns the number of active tokens removed. A pruned used token no
    /// longer reads as already used; it fails as unknown instead, since its
    /// prefix left the registry when it was consumed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.active.len();
        self.active.retain(|_, entry| now <= entry.expires_at);
        let removed = before - self.active.len();

        let used_before = self.used.len();
        self.used.retain(|_, expires_at| now <= *expires_at);
        let pruned = used_before - self.used.len();

        if removed > 0 || pruned > 0 {
            log::debug!("Swept {} expired access tokens and {} used ones", removed, pruned);
        }
        removed
    }

    pub fn statistics(&self) -> TokenStatistics {
        TokenStatistics {
            active: self.active.len(),
            used: self.used.len(),
            expiry_mins: self.config.expiry_mins,
        }
    }

    fn fresh_prefix(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let prefix: String = (0..self.config.prefix_len)
                .map(|_| PREFIX_CHARSET[rng.random_range(0..PREFIX_CHARSET.len())] as char)
                .collect();
            if !self.active.contains_key(&prefix) {
                return prefix;
            }
        }
    }

    fn digest(&self, claims: &TokenClaims, prefix: &str) -> AccessTokenResult<String> {
        let payload = serde_json::to_vec(claims)
            .map_err(|e| AccessTokenError::InvalidInput(format!("unserialisable claims: {e}")))?;

        let mut hasher = Sha256::new();
        hasher.update(&payload);
        hasher.update(prefix.as_bytes());
        hasher.update(self.secret.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(DIGEST_LEN);
        Ok(digest)
    }
}

/// Split on the last hyphen; both halves must be non-empty ASCII
fn split_token(token: &str) -> Option<(&str, &str)> {
    if !token.is_ascii() {
        return None;
    }
    let (prefix, digest) = token.rsplit_once('-')?;
    if prefix.is_empty() || digest.is_empty() {
        return None;
    }
    Some((prefix, digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ManualClock;
    use chrono::{Duration, TimeZone};

    fn service() -> (Arc<ManualClock>, AccessTokenService) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        ));
        let service = AccessTokenService::new(clock.clone(), "test-secret").unwrap();
        (clock, service)
    }

    #[test]
    fn test_token_shape() {
        let (_, mut service) = service();
        let issued = service.issue("c1", &["b", "a"], Some("court-1")).unwrap();

        let (prefix, digest) = issued.token.rsplit_once('-').unwrap();
        assert_eq!(prefix.len(), 32);
        assert!(prefix.bytes().all(|b| PREFIX_CHARSET.contains(&b)));
        assert_eq!(digest.len(), DIGEST_LEN);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(issued.claims.participant_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_validates_exactly_once() {
        let (_, mut service) = service();
        let issued = service.issue("c1", &["a", "b"], None).unwrap();

        let first = service.validate(&issued.token);
        assert!(first.is_valid());
        assert_eq!(first.contest_id(), Some("c1"));

        assert_eq!(
            service.validate(&issued.token),
            TokenValidation::Invalid(TokenRejection::AlreadyUsed)
        );
        assert_eq!(service.statistics().used, 1);
        assert_eq!(service.statistics().active, 0);
    }

    #[test]
    fn test_expired_after_window() {
        let (clock, mut service) = service();
        let issued = service.issue("c1", &["a", "b"], None).unwrap();

        clock.advance(Duration::minutes(61));
        assert_eq!(
            service.validate(&issued.token),
            TokenValidation::Invalid(TokenRejection::Expired)
        );
        // Dropped from the registry
        assert_eq!(
            service.validate(&issued.token),
            TokenValidation::Invalid(TokenRejection::UnknownToken)
        );
    }

    #[test]
    fn test_valid_at_exact_expiry() {
        let (clock, mut service) = service();
        let issued = service.issue("c1", &["a", "b"], None).unwrap();
        clock.advance(Duration::minutes(60));
        assert!(service.validate(&issued.token).is_valid());
    }

    #[test]
    fn test_any_digest_mutation_fails_integrity() {
        let (_, mut service) = service();
        let issued = service.issue("c1", &["a", "b"], None).unwrap();
        let split = issued.token.rfind('-').unwrap() + 1;

        for i in split..issued.token.len() {
            let mut bytes = issued.token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(bytes).unwrap();
            assert_eq!(
                service.validate(&mutated),
                TokenValidation::Invalid(TokenRejection::IntegrityFailure)
            );
        }

        // The real token is untouched by the failed attempts
        assert!(service.validate(&issued.token).is_valid());
    }

    #[test]
    fn test_malformed_and_unknown() {
        let (_, mut service) = service();
        assert_eq!(
            service.validate("no-hyphen-at-end-"),
            TokenValidation::Invalid(TokenRejection::Malformed)
        );
        assert_eq!(
            service.validate("nohyphen"),
            TokenValidation::Invalid(TokenRejection::Malformed)
        );
        assert_eq!(
            service.validate("ABCDEFGH-0123456789abcdef"),
            TokenValidation::Invalid(TokenRejection::UnknownToken)
        );
    }

    #[test]
    fn test_invalidate() {
        let (_, mut service) = service();
        let issued = service.issue("c1", &["a", "b"], None).unwrap();

        assert!(!service.invalidate("ABCDEFGH-0123456789abcdef"));
        assert!(service.invalidate(&issued.token));
        assert!(!service.invalidate(&issued.token));
        assert_eq!(
            service.validate(&issued.token),
            TokenValidation::Invalid(TokenRejection::UnknownToken)
        );
    }

    #[test]
    fn test_cleanup_prunes_expired_used_tokens() {
        let (clock, mut service) = service();
        let issued = service.issue("c1", &["a", "b"], None).unwrap();
        assert!(service.validate(&issued.token).is_valid());

        clock.advance(Duration::minutes(30));
        assert_eq!(service.cleanup_expired(), 0);
        assert_eq!(service.statistics().used, 1);

        clock.advance(Duration::minutes(31));
        assert_eq!(service.cleanup_expired(), 0);
        assert_eq!(service.statistics().used, 0);
        assert_eq!(
            service.validate(&issued.token),
            TokenValidation::Invalid(TokenRejection::UnknownToken)
        );
    }

    #[test]
    fn test_issue_sweeps_expired() {
        let (clock, mut service) = service();
        service.issue("c1", &["a", "b"], None).unwrap();
        service.issue("c2", &["c", "d"], None).unwrap();

        clock.advance(Duration::minutes(90));
        service.issue("c3", &["e", "f"], None).unwrap();
        assert_eq!(service.statistics().active, 1);
    }

    #[test]
    fn test_rejects_bad_input() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(Utc::now()));
        assert!(AccessTokenService::new(clock.clone(), "").is_err());
        assert!(
            AccessTokenService::with_config(
                clock.clone(),
                "s",
                TokenConfig {
                    prefix_len: 2,
                    ..Default::default()
                }
            )
            .is_err()
        );

        let mut service = AccessTokenService::new(clock, "s").unwrap();
        assert!(service.issue("", &["a"], None).is_err());
        assert!(service.issue("c1", &[], None).is_err());
    }

    #[test]
    fn test_secret_changes_digest() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(Utc::now()));
        let mut a = AccessTokenService::new(clock.clone(), "one").unwrap();
        let b = AccessTokenService::new(clock, "two").unwrap();

        let issued = a.issue("c1", &["x", "y"], None).unwrap();
        let prefix = issued.token.rsplit_once('-').unwrap().0;
        assert_ne!(
            a.digest(&issued.claims, prefix).unwrap(),
            b.digest(&issued.claims, prefix).unwrap()
        );
    }
}
