//! Retry with exponential backoff and a neutral fallback.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{normalize_candidates, CandidateGenerator, CandidateSource, GeneratorError};

/// Retry policy for a [`CandidateSource`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub backoff_base_ms: u64,
    /// Returned when the source cannot produce anything usable.
    pub fallback_fragment: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_ms: 500,
            fallback_fragment: "    pass".to_string(),
        }
    }
}

impl RetryConfig {
    /// Delay after failed attempt number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }
}

#[derive(Debug)]
enum RetryState {
    Attempt(u32),
    Backoff { next_attempt: u32, delay: Duration },
    Fallback { reason: String },
    Resolved(Vec<String>),
}

/// Adapts a fallible [`CandidateSource`] into an infallible
/// [`CandidateGenerator`].
pub struct RetryingGenerator<S: CandidateSource> {
    source: S,
    config: RetryConfig,
}

impl<S: CandidateSource> RetryingGenerator<S> {
    pub fn new(source: S, config: RetryConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn step(
        &self,
        attempt: u32,
        outcome: Result<Vec<String>, GeneratorError>,
        n: usize,
    ) -> RetryState {
        match outcome {
            Ok(raw) => {
                let candidates = normalize_candidates(raw, n);
                if candidates.is_empty() {
                    RetryState::Fallback {
                        reason: "source returned no usable candidates".to_string(),
                    }
                } else {
                    RetryState::Resolved(candidates)
                }
            }
            Err(err) if err.is_transient() && attempt < self.config.max_attempts => {
                RetryState::Backoff {
                    next_attempt: attempt + 1,
                    delay: self.config.backoff_for(attempt),
                }
            }
            Err(err) => RetryState::Fallback {
                reason: err.to_string(),
            },
        }
    }
}

#[async_trait]
impl<S: CandidateSource> CandidateGenerator for RetryingGenerator<S> {
    async fn generate_candidates(
        &self,
        problem: &str,
        current_state: &str,
        n: usize,
    ) -> Vec<String> {
        let mut state = RetryState::Attempt(1);
        loop {
            state = match state {
                RetryState::Attempt(attempt) => {
                    let outcome = self.source.propose(problem, current_state, n).await;
                    debug!(
                        event = "generator.attempt",
                        attempt = attempt,
                        ok = outcome.is_ok(),
                    );
                    self.step(attempt, outcome, n)
                }
                RetryState::Backoff {
                    next_attempt,
                    delay,
                } => {
                    tokio::time::sleep(delay).await;
                    RetryState::Attempt(next_attempt)
                }
                RetryState::Fallback { reason } => {
                    warn!(event = "generator.fallback", reason = %reason);
                    return vec![self.config.fallback_fragment.clone()];
                }
                RetryState::Resolved(candidates) => return candidates,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FlakySource {
        failures_before_success: u32,
        error: GeneratorError,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl CandidateSource for FlakySource {
        async fn propose(
            &self,
            _problem: &str,
            _state: &str,
            _n: usize,
        ) -> Result<Vec<String>, GeneratorError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures_before_success {
                Err(self.error.clone())
            } else {
                Ok(vec!["    return 1".to_string()])
            }
        }
    }

    fn flaky(failures: u32, error: GeneratorError) -> (FlakySource, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        (
            FlakySource {
                failures_before_success: failures,
                error,
                calls: calls.clone(),
            },
            calls,
        )
    }

    #[test]
    fn test_retry_config_default() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.backoff_base_ms, 500);
        assert_eq!(cfg.fallback_fragment, "    pass");
    }

    #[test]
    fn test_backoff_doubles() {
        let cfg = RetryConfig {
            backoff_base_ms: 100,
            ..RetryConfig::default()
        };
        assert_eq!(cfg.backoff_for(1), Duration::from_millis(100));
        assert_eq!(cfg.backoff_for(2), Duration::from_millis(200));
        assert_eq!(cfg.backoff_for(3), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried_with_backoff() {
        let (source, calls) = flaky(2, GeneratorError::Transient("rate limited".into()));
        let gen = RetryingGenerator::new(
            source,
            RetryConfig {
                max_attempts: 3,
                backoff_base_ms: 10,
                ..RetryConfig::default()
            },
        );

        let start = tokio::time::Instant::now();
        let out = gen.generate_candidates("p", "", 3).await;

        assert_eq!(out, vec!["    return 1"]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_back() {
        let (source, calls) = flaky(10, GeneratorError::Transient("rate limited".into()));
        let gen = RetryingGenerator::new(
            source,
            RetryConfig {
                max_attempts: 2,
                backoff_base_ms: 10,
                ..RetryConfig::default()
            },
        );

        let out = gen.generate_candidates("p", "", 3).await;
        assert_eq!(out, vec!["    pass"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fatal_failure_falls_back_immediately() {
        let (source, calls) = flaky(1, GeneratorError::Fatal("bad credentials".into()));
        let gen = RetryingGenerator::new(source, RetryConfig::default());

        let out = gen.generate_candidates("p", "", 3).await;
        assert_eq!(out, vec!["    pass"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
