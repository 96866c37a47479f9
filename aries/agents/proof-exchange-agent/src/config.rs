use std::path::PathBuf;

use proof_exchange::common::proofs::verifier::DEFAULT_CLOCK_SKEW_SECS;
use typed_builder::TypedBuilder;

/// Behaviour of an [crate::ExchangeManager]. The `auto_*` flags are copied onto every record
/// the manager creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Answer incoming requests right away with automatically selected credentials.
    #[builder(default)]
    pub auto_present: bool,
    /// Verify incoming presentations right away.
    #[builder(default)]
    pub auto_verify: bool,
    /// Delete records once they reach a terminal state.
    #[builder(default)]
    pub auto_remove: bool,
    /// Directory holding revocation tails files, named by their hash.
    #[builder(default, setter(strip_option, into))]
    pub tails_dir: Option<PathBuf>,
    #[builder(default = DEFAULT_CLOCK_SKEW_SECS)]
    pub clock_skew_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
pub mod unit_tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::default();
        assert!(!config.auto_present);
        assert!(!config.auto_verify);
        assert!(!config.auto_remove);
        assert!(config.tails_dir.is_none());
        assert_eq!(config.clock_skew_secs, 300);
    }

    #[test]
    fn test_partial_config_deserializes_over_defaults() {
        let config: ExchangeConfig =
            serde_json::from_value(json!({"auto_verify": true, "tails_dir": "/tmp/tails"}))
                .unwrap();
        assert_eq!(
            config,
            ExchangeConfig::builder()
                .auto_verify(true)
                .tails_dir("/tmp/tails")
                .build()
        );
    }
}
