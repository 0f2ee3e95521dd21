//! Candidate generation: the boundary between the search and a code oracle.
//!
//! The engine only sees [`CandidateGenerator`], which always yields at least
//! one fragment. Raw oracles implement the fallible [`CandidateSource`] and
//! are adapted with [`RetryingGenerator`], which owns the retry, backoff and
//! fallback policy.

use async_trait::async_trait;

pub mod command;
pub mod mock;
pub mod retry;
pub mod scripted;

pub use command::{CommandSource, OracleCommand};
pub use mock::MockGenerator;
pub use retry::{RetryConfig, RetryingGenerator};
pub use scripted::ScriptedGenerator;

/// Failure reported by a raw oracle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    /// Worth retrying after a delay (rate limits, timeouts).
    #[error("transient generator failure: {0}")]
    Transient(String),

    #[error("generator failure: {0}")]
    Fatal(String),
}

impl GeneratorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, GeneratorError::Transient(_))
    }
}

/// Produces continuations of a partial program.
///
/// Implementations must return between 1 and `n` fragments. Leading
/// indentation in a fragment is significant and must be kept.
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    async fn generate_candidates(&self, problem: &str, current_state: &str, n: usize)
        -> Vec<String>;
}

#[async_trait]
impl<G: CandidateGenerator + ?Sized> CandidateGenerator for Box<G> {
    async fn generate_candidates(
        &self,
        problem: &str,
        current_state: &str,
        n: usize,
    ) -> Vec<String> {
        (**self).generate_candidates(problem, current_state, n).await
    }
}

/// A raw oracle that may fail.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn propose(
        &self,
        problem: &str,
        current_state: &str,
        n: usize,
    ) -> Result<Vec<String>, GeneratorError>;
}

/// Trim trailing whitespace, drop blank fragments, keep at most `n`.
pub fn normalize_candidates(raw: Vec<String>, n: usize) -> Vec<String> {
    raw.into_iter()
        .map(|c| c.trim_end().to_string())
        .filter(|c| !c.trim().is_empty())
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_leading_indentation() {
        let out = normalize_candidates(vec!["    return 1   \n".into()], 3);
        assert_eq!(out, vec!["    return 1".to_string()]);
    }

    #[test]
    fn test_normalize_drops_blank_and_truncates() {
        let raw = vec![
            "a = 1".to_string(),
            "   \n".to_string(),
            "b = 2".to_string(),
            "c = 3".to_string(),
        ];
        assert_eq!(normalize_candidates(raw, 2), vec!["a = 1", "b = 2"]);
    }

    #[test]
    fn test_transient_classification() {
        assert!(GeneratorError::Transient("429".into()).is_transient());
        assert!(!GeneratorError::Fatal("bad key".into()).is_transient());
    }
}
