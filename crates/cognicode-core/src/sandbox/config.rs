//! Sandbox configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How candidates that fail to parse are treated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxPolicy {
    /// Any syntax error rejects the candidate.
    Strict,
    /// A candidate that only looks unfinished (a block header with no body)
    /// gets one retry with a `pass` body appended.
    #[default]
    RepairIncompleteBlock,
}

/// Configuration for sandboxed candidate execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    /// Interpreter used both to parse and to run candidates.
    pub interpreter: String,
    /// Hard wall-clock limit for one execution (milliseconds).
    pub timeout_ms: u64,
    pub syntax_policy: SyntaxPolicy,
    /// Directory for per-execution scripts. System temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout_ms: 2_000,
            syntax_policy: SyntaxPolicy::default(),
            scratch_dir: None,
        }
    }
}

impl SandboxConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_syntax_policy(mut self, policy: SyntaxPolicy) -> Self {
        self.syntax_policy = policy;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}
