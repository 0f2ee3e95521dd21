//! CogniCode Core Library
//!
//! Program synthesis by Monte Carlo Tree Search: candidate continuations come
//! from a [`CandidateGenerator`], each resulting program is graded by running
//! it against a hidden validation script in a [`Sandbox`], and the outcome
//! steers further search.

pub mod config;
pub mod error;
pub mod generator;
pub mod obs;
pub mod sandbox;
pub mod search;
pub mod telemetry;
pub mod tree;

pub use config::{EngineConfig, SearchConfig};
pub use error::{Result, SynthError};
pub use generator::{
    CandidateGenerator, CandidateSource, CommandSource, GeneratorError, MockGenerator,
    OracleCommand, RetryConfig, RetryingGenerator, ScriptedGenerator,
};
pub use sandbox::{ErrorKind, Evaluator, ExecutionResult, Sandbox, SandboxConfig, SyntaxPolicy};
pub use search::{SearchEngine, SearchOutcome, SearchProblem};
pub use telemetry::init_tracing;
pub use tree::{Node, NodeId, SearchTree};

/// CogniCode version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
