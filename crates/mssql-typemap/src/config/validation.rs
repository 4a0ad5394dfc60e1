//! Configuration validation.

use super::ProviderConfig;
use crate::error::{Result, TypeMapError};

/// Lowest compatibility level accepted (SQL Server 2000).
const MIN_COMPATIBILITY_LEVEL: u16 = 80;

/// Highest compatibility level accepted (SQL Server 2025).
const MAX_COMPATIBILITY_LEVEL: u16 = 170;

/// Validate the configuration.
pub fn validate(config: &ProviderConfig) -> Result<()> {
    let level = config.compatibility_level;
    if !(MIN_COMPATIBILITY_LEVEL..=MAX_COMPATIBILITY_LEVEL).contains(&level) || level % 10 != 0 {
        return Err(TypeMapError::Config(format!(
            "compatibility_level must be a multiple of 10 between {} and {}, got {}",
            MIN_COMPATIBILITY_LEVEL, MAX_COMPATIBILITY_LEVEL, level
        )));
    }

    if config.retry.max_retry_count == 0 && !config.retry.additional_error_numbers.is_empty() {
        return Err(TypeMapError::Config(
            "retry.additional_error_numbers has no effect when retry.max_retry_count is 0".into(),
        ));
    }

    if config.retry.max_retry_delay_secs == 0 && config.retry.max_retry_count > 0 {
        return Err(TypeMapError::Config(
            "retry.max_retry_delay_secs must be at least 1".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineType, RetryConfig};

    fn valid_config() -> ProviderConfig {
        ProviderConfig {
            engine: EngineType::SqlServer,
            compatibility_level: 160,
            retry: RetryConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_compatibility_level_out_of_range() {
        let mut config = valid_config();
        config.compatibility_level = 70;
        assert!(validate(&config).is_err());

        config.compatibility_level = 180;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_compatibility_level_not_multiple_of_ten() {
        let mut config = valid_config();
        config.compatibility_level = 155;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_additional_errors_without_retries() {
        let mut config = valid_config();
        config.retry.max_retry_count = 0;
        config.retry.additional_error_numbers = vec![50001];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_delay_with_retries() {
        let mut config = valid_config();
        config.retry.max_retry_delay_secs = 0;
        assert!(validate(&config).is_err());
    }
}
