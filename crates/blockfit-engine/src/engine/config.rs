use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Default number of pieces in a batch.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Round configuration.
///
/// # Example
///
/// ```
/// use blockfit_engine::RoundConfig;
///
/// let config: RoundConfig = serde_json::from_str(r#"{ "auto_deal": false }"#).unwrap();
/// assert_eq!(config.batch_size, 3);
/// assert!(!config.auto_deal);
/// assert!(config.content_units.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Number of pieces dealt together.
    pub batch_size: usize,
    /// Deal the next batch as soon as the current one is used up.
    ///
    /// When disabled, the round waits for [`RoundController::unlock`] after
    /// every batch.
    ///
    /// [`RoundController::unlock`]: crate::RoundController::unlock
    pub auto_deal: bool,
    /// Number of batches after which the round is complete. `None` plays
    /// until no piece fits.
    pub content_units: Option<NonZeroUsize>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            auto_deal: true,
            content_units: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("batch size must be at least 1")]
    EmptyBatch,
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::EmptyBatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RoundConfig::default();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.auto_deal);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let config = RoundConfig {
            batch_size: 0,
            ..RoundConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyBatch));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RoundConfig =
            serde_json::from_str(r#"{ "batch_size": 2, "content_units": 5 }"#).unwrap();
        assert_eq!(config.batch_size, 2);
        assert!(config.auto_deal);
        assert_eq!(config.content_units, NonZeroUsize::new(5));
    }

    #[test]
    fn test_deserialize_zero_content_units_fails() {
        assert!(serde_json::from_str::<RoundConfig>(r#"{ "content_units": 0 }"#).is_err());
    }
}
