//! Offline generator for the recursive factorial demo.

use async_trait::async_trait;

use super::CandidateGenerator;

/// Deterministic stand-in for a real oracle.
///
/// Walks a fixed three-step script toward a recursive `factorial`, offering
/// one correct and two flawed continuations at each step. Anything off the
/// script gets `pass`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }

    fn candidates_for(state: &str) -> &'static [&'static str] {
        if !state.contains("def") {
            &["def factorial(n):", "def solve(n):", "def fact(x):"]
        } else if state.contains("factorial(n):") && !state.contains("if") {
            &[
                "    if n == 0: return 1",
                "    if n == 1: return 1",
                "    if n < 0: return None",
            ]
        } else if state.contains("return 1") && !state.contains("return n") {
            &[
                "    return n * factorial(n-1)",
                "    return n * factorial(n)",
                "    return n + factorial(n-1)",
            ]
        } else {
            &["    pass"]
        }
    }
}

#[async_trait]
impl CandidateGenerator for MockGenerator {
    async fn generate_candidates(
        &self,
        _problem: &str,
        current_state: &str,
        n: usize,
    ) -> Vec<String> {
        Self::candidates_for(current_state)
            .iter()
            .take(n.max(1))
            .map(|c| c.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_progression() {
        let gen = MockGenerator::new();
        let step1 = gen.generate_candidates("", "", 3).await;
        assert_eq!(step1[0], "def factorial(n):");

        let step2 = gen.generate_candidates("", "def factorial(n):", 3).await;
        assert_eq!(step2[0], "    if n == 0: return 1");

        let step3 = gen
            .generate_candidates("", "def factorial(n):\n    if n == 0: return 1", 3)
            .await;
        assert_eq!(step3[0], "    return n * factorial(n-1)");
    }

    #[tokio::test]
    async fn test_off_script_yields_pass_and_respects_n() {
        let gen = MockGenerator::new();
        assert_eq!(gen.generate_candidates("", "def solve(n):", 3).await, vec!["    pass"]);
        assert_eq!(gen.generate_candidates("", "", 1).await.len(), 1);
        assert_eq!(gen.generate_candidates("", "", 0).await.len(), 1);
    }
}
