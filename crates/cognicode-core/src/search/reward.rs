//! Reward shaping: execution outcome → scalar reward.

use crate::sandbox::{ErrorKind, ExecutionResult};

pub const REWARD_SUCCESS: f64 = 1.0;
pub const REWARD_SYNTAX: f64 = -1.0;
pub const REWARD_TIMEOUT: f64 = -0.5;
/// Runs but fails the harness. Slightly positive so runnable partial
/// programs are preferred over dead ends.
pub const REWARD_RUNNABLE: f64 = 0.1;

pub fn reward_for(result: &ExecutionResult) -> f64 {
    if result.success {
        return REWARD_SUCCESS;
    }
    match result.error_kind {
        Some(ErrorKind::Syntax) => REWARD_SYNTAX,
        Some(ErrorKind::Timeout) => REWARD_TIMEOUT,
        Some(ErrorKind::Runtime) | None => REWARD_RUNNABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_mapping() {
        assert_eq!(reward_for(&ExecutionResult::passed(String::new())), 1.0);
        assert_eq!(reward_for(&ExecutionResult::syntax_error()), -1.0);
        assert_eq!(reward_for(&ExecutionResult::timeout()), -0.5);
        assert_eq!(
            reward_for(&ExecutionResult::runtime_failure("AssertionError".into())),
            0.1
        );
    }
}
