//! Environment variable helpers shared by the configuration types.

use std::str::FromStr;

/// Parse `key` from the environment, falling back to `default` when it is
/// unset or unparsable
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_or_falls_back() {
        // SAFETY: serialised with every other env-mutating test
        unsafe {
            std::env::set_var("CLUB_FIXTURES_ENV_OR_TEST", "42");
        }
        assert_eq!(env_or("CLUB_FIXTURES_ENV_OR_TEST", 7u32), 42);

        unsafe {
            std::env::set_var("CLUB_FIXTURES_ENV_OR_TEST", "not-a-number");
        }
        assert_eq!(env_or("CLUB_FIXTURES_ENV_OR_TEST", 7u32), 7);

        unsafe {
            std::env::remove_var("CLUB_FIXTURES_ENV_OR_TEST");
        }
        assert_eq!(env_or("CLUB_FIXTURES_ENV_OR_TEST", 7u32), 7);
    }
}
