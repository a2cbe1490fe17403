//! Token service configuration.

use super::errors::{AccessTokenError, AccessTokenResult};
use crate::env::env_or;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Shortest random prefix accepted
pub const MIN_PREFIX_LEN: usize = 8;

/// Token lifetime and shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Minutes from issuance until a token expires
    pub expiry_mins: u32,

    /// Length of the random prefix
    pub prefix_len: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            expiry_mins: 60,
            prefix_len: 32,
        }
    }
}

impl TokenConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiry_mins: env_or("ACCESS_TOKEN_EXPIRY_MINS", defaults.expiry_mins),
            prefix_len: env_or("ACCESS_TOKEN_PREFIX_LEN", defaults.prefix_len),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> AccessTokenResult<()> {
        if self.expiry_mins == 0 {
            return Err(AccessTokenError::InvalidInput(
                "token expiry must be at least one minute".to_string(),
            ));
        }

        if self.prefix_len < MIN_PREFIX_LEN {
            return Err(AccessTokenError::InvalidInput(format!(
                "token prefix must be at least {MIN_PREFIX_LEN} characters"
            )));
        }

        Ok(())
    }

    pub fn expiry(&self) -> Duration {
        Duration::minutes(i64::from(self.expiry_mins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_validate() {
        assert!(TokenConfig::default().validate().is_ok());
        assert!(
            TokenConfig {
                expiry_mins: 0,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            TokenConfig {
                prefix_len: 4,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // SAFETY: serialised with every other env-mutating test
        unsafe {
            std::env::set_var("ACCESS_TOKEN_EXPIRY_MINS", "5");
        }

        let config = TokenConfig::from_env();
        assert_eq!(config.expiry_mins, 5);
        assert_eq!(config.prefix_len, 32);
        assert_eq!(config.expiry(), Duration::minutes(5));

        unsafe {
            std::env::remove_var("ACCESS_TOKEN_EXPIRY_MINS");
        }
    }
}
