//! Generator replaying a fixed list of responses, one per call.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::CandidateGenerator;

/// A request observed by [`ScriptedGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRequest {
    pub problem: String,
    pub state: String,
    pub n: usize,
}

/// Returns the scripted responses in order, then a `pass` fragment forever.
/// Records every request it receives.
pub struct ScriptedGenerator {
    steps: Mutex<VecDeque<Vec<String>>>,
    seen: Mutex<Vec<ObservedRequest>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        Self {
            steps: Mutex::new(
                steps
                    .into_iter()
                    .map(|step| step.into_iter().map(Into::into).collect())
                    .collect(),
            ),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<ObservedRequest> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl CandidateGenerator for ScriptedGenerator {
    async fn generate_candidates(
        &self,
        problem: &str,
        current_state: &str,
        n: usize,
    ) -> Vec<String> {
        self.seen.lock().await.push(ObservedRequest {
            problem: problem.to_string(),
            state: current_state.to_string(),
            n,
        });
        let step = self.steps.lock().await.pop_front();
        match step {
            Some(mut candidates) if !candidates.is_empty() => {
                candidates.truncate(n.max(1));
                candidates
            }
            _ => vec!["    pass".to_string()],
        }
    }
}
