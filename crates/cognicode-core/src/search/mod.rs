//! Monte Carlo Tree Search over partial programs.
//!
//! Each iteration selects a node by UCB1 descent, expands it once it has
//! been visited, grades one state through an [`Evaluator`](crate::sandbox::Evaluator)
//! and backpropagates the shaped reward to the root.

pub mod engine;
pub mod problem;
pub mod progress;
pub mod reward;

pub use engine::{SearchEngine, SearchOutcome};
pub use problem::SearchProblem;
pub use progress::progress_line;
pub use reward::{reward_for, REWARD_RUNNABLE, REWARD_SUCCESS, REWARD_SYNTAX, REWARD_TIMEOUT};
