//! Sandbox: turns a candidate program plus a hidden validation script into a
//! graded outcome.
//!
//! Each execution parses the candidate first, then writes
//! `<code>\n\n<script>` to a uniquely named temporary file and runs it in a
//! fresh interpreter process under a hard wall-clock deadline. The temporary
//! file is released on every exit path.
//!
//! # Modules
//!
//! - [`config`]   — `SandboxConfig`, `SyntaxPolicy`
//! - [`syntax`]   — parse check and incomplete-block repair
//! - [`executor`] — `Sandbox::execute()`, `Evaluator`
//! - [`result`]   — `ExecutionResult`, `ErrorKind`

pub mod config;
pub mod executor;
pub mod result;
pub mod syntax;

pub use config::{SandboxConfig, SyntaxPolicy};
pub use executor::{Evaluator, Sandbox};
pub use result::{ErrorKind, ExecutionResult};
