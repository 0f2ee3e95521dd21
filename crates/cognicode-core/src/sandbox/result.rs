//! Graded execution outcomes.

use serde::{Deserialize, Serialize};

pub const SCORE_SUCCESS: f64 = 1.0;
pub const SCORE_RUNTIME: f64 = 0.0;
pub const SCORE_TIMEOUT: f64 = -0.5;
pub const SCORE_SYNTAX: f64 = -1.0;

/// Why a candidate failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The candidate did not parse; it was never run.
    Syntax,
    /// The candidate ran but the harness exited non-zero.
    Runtime,
    /// The run exceeded the wall-clock limit and was killed.
    Timeout,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Runtime => write!(f, "runtime"),
            ErrorKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Result of running one candidate against the validation script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    pub success: bool,
    pub score: f64,
    /// `None` on success.
    pub error_kind: Option<ErrorKind>,
    /// Captured stdout followed by stderr, or a fixed marker.
    pub output: String,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn passed(output: String) -> Self {
        Self {
            success: true,
            score: SCORE_SUCCESS,
            error_kind: None,
            output,
            duration_ms: 0,
        }
    }

    pub fn runtime_failure(output: String) -> Self {
        Self {
            success: false,
            score: SCORE_RUNTIME,
            error_kind: Some(ErrorKind::Runtime),
            output,
            duration_ms: 0,
        }
    }

    pub fn syntax_error() -> Self {
        Self {
            success: false,
            score: SCORE_SYNTAX,
            error_kind: Some(ErrorKind::Syntax),
            output: "Syntax Error".to_string(),
            duration_ms: 0,
        }
    }

    pub fn timeout() -> Self {
        Self {
            success: false,
            score: SCORE_TIMEOUT,
            error_kind: Some(ErrorKind::Timeout),
            output: "Execution Timeout".to_string(),
            duration_ms: 0,
        }
    }

    pub(crate) fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}
