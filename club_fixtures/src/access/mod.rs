//! Single-use, time-limited access tokens for scheduled contests.
//!
//! [`AccessTokenService`] owns the registry of active and used tokens. Time
//! comes from an injected [`Clock`], so expiry is deterministic under test
//! with a [`ManualClock`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use club_fixtures::access::{AccessTokenService, SystemClock, TokenRejection, TokenValidation};
//!
//! let mut tokens = AccessTokenService::new(Arc::new(SystemClock), "server-secret").unwrap();
//! let issued = tokens.issue("rr-1-1", &["p1", "p2"], Some("court-1")).unwrap();
//!
//! assert!(tokens.validate(&issued.token).is_valid());
//! assert_eq!(
//!     tokens.validate(&issued.token),
//!     TokenValidation::Invalid(TokenRejection::AlreadyUsed)
//! );
//! ```

pub mod clock;
pub mod config;
pub mod errors;
pub mod models;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MIN_PREFIX_LEN, TokenConfig};
pub use errors::{AccessTokenError, AccessTokenResult, TokenRejection};
pub use models::{IssuedToken, TokenClaims, TokenStatistics, TokenValidation};
pub use service::{AccessTokenService, DIGEST_LEN};
