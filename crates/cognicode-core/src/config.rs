//! Engine configuration, loadable from TOML.
//!
//! Every section and field is optional in the file; missing values take the
//! defaults below.
//!
//! ```toml
//! [search]
//! exploration_weight = 1.41
//! candidates_per_expansion = 3
//! seed = 7
//!
//! [sandbox]
//! interpreter = "python3"
//! timeout_ms = 2000
//! syntax_policy = "repair_incomplete_block"
//!
//! [generator]
//! max_attempts = 3
//! backoff_base_ms = 500
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};
use crate::generator::RetryConfig;
use crate::sandbox::SandboxConfig;
use crate::tree::DEFAULT_EXPLORATION_WEIGHT;

/// Search-loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// UCB1 exploration constant.
    pub exploration_weight: f64,
    /// Candidates requested from the generator per expansion.
    pub candidates_per_expansion: usize,
    /// Seed for the expansion RNG. Random when unset.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_weight: DEFAULT_EXPLORATION_WEIGHT,
            candidates_per_expansion: 3,
            seed: None,
        }
    }
}

/// All engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub sandbox: SandboxConfig,
    pub generator: RetryConfig,
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let w = self.search.exploration_weight;
        if !w.is_finite() || w < 0.0 {
            return Err(SynthError::InvalidConfig(format!(
                "exploration_weight must be a finite non-negative number, got {w}"
            )));
        }
        if self.search.candidates_per_expansion == 0 {
            return Err(SynthError::InvalidConfig(
                "candidates_per_expansion must be at least 1".to_string(),
            ));
        }
        if self.sandbox.timeout_ms == 0 {
            return Err(SynthError::InvalidConfig(
                "sandbox.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.sandbox.interpreter.trim().is_empty() {
            return Err(SynthError::InvalidConfig(
                "sandbox.interpreter must not be empty".to_string(),
            ));
        }
        if self.generator.max_attempts == 0 {
            return Err(SynthError::InvalidConfig(
                "generator.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::SyntaxPolicy;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = EngineConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.search.candidates_per_expansion, 3);
        assert!((cfg.search.exploration_weight - 1.4142).abs() < 1e-3);
        assert_eq!(cfg.sandbox.timeout_ms, 2_000);
    }

    #[test]
    fn test_partial_toml() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [search]
            seed = 7

            [sandbox]
            syntax_policy = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.search.seed, Some(7));
        assert_eq!(cfg.search.candidates_per_expansion, 3);
        assert_eq!(cfg.sandbox.syntax_policy, SyntaxPolicy::Strict);
        assert_eq!(cfg.generator.max_attempts, 3);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_zero_candidates() {
        let err = EngineConfig::from_toml_str("[search]\ncandidates_per_expansion = 0\n")
            .unwrap_err();
        assert!(matches!(err, SynthError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_negative_exploration() {
        let mut cfg = EngineConfig::default();
        cfg.search.exploration_weight = -1.0;
        assert!(cfg.validate().is_err());
        cfg.search.exploration_weight = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut cfg = EngineConfig::default();
        cfg.sandbox.timeout_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("[search\n").unwrap_err();
        assert!(matches!(err, SynthError::ConfigParse(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cognicode.toml");
        std::fs::write(&path, "[sandbox]\ntimeout_ms = 750\n").unwrap();
        let cfg = EngineConfig::from_path(&path).unwrap();
        assert_eq!(cfg.sandbox.timeout_ms, 750);
    }
}
