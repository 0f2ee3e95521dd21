//! Isolated, time-bounded candidate execution.

use std::io::{self, Write};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::config::SandboxConfig;
use super::result::ExecutionResult;
use super::syntax;

/// Grades candidate programs by running them against a validation script in
/// a fresh interpreter process.
///
/// [`Sandbox::execute`] never fails: every outcome, including host I/O
/// problems, comes back as an [`ExecutionResult`].
#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    config: SandboxConfig,
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Whether `code` parses as a standalone module under the configured
    /// [`SyntaxPolicy`](super::SyntaxPolicy).
    pub async fn validate_syntax(&self, code: &str) -> bool {
        match syntax::check_with_policy(&self.config, code).await {
            Ok(valid) => valid,
            Err(err) => {
                warn!(
                    event = "sandbox.syntax_check_failed",
                    interpreter = %self.config.interpreter,
                    error = %err,
                );
                false
            }
        }
    }

    /// Run `code` followed by `validation_script` and grade the result.
    ///
    /// A parse check that cannot run is graded as a runtime failure, the same
    /// as any other sandbox I/O error.
    pub async fn execute(&self, code: &str, validation_script: &str) -> ExecutionResult {
        let start = Instant::now();

        let result = match syntax::check_with_policy(&self.config, code).await {
            Ok(false) => ExecutionResult::syntax_error(),
            Ok(true) => {
                let body = format!("{code}\n\n{validation_script}");
                match self.run_script(&body).await {
                    Ok(result) => result,
                    Err(err) => self.io_failure(err),
                }
            }
            Err(err) => self.io_failure(err),
        };

        let result = result.with_duration_ms(start.elapsed().as_millis() as u64);
        debug!(
            event = "sandbox.executed",
            success = result.success,
            error_kind = ?result.error_kind,
            duration_ms = result.duration_ms,
        );
        result
    }

    fn io_failure(&self, err: io::Error) -> ExecutionResult {
        warn!(
            event = "sandbox.io_error",
            interpreter = %self.config.interpreter,
            error = %err,
        );
        ExecutionResult::runtime_failure(format!("sandbox error: {err}"))
    }

    async fn run_script(&self, body: &str) -> io::Result<ExecutionResult> {
        // Removed when `script` drops, on every return path.
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("cognicode-").suffix(".py");
            b
        };
        let mut script = match &self.config.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        script.write_all(body.as_bytes())?;
        script.flush()?;

        let mut child = Command::new(&self.config.interpreter)
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stdout not captured"))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stderr not captured"))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let finished = tokio::time::timeout(self.config.timeout(), async {
            let (out, err, status) = tokio::join!(
                stdout_pipe.read_to_end(&mut stdout),
                stderr_pipe.read_to_end(&mut stderr),
                child.wait(),
            );
            out.and(err).and(status)
        })
        .await;

        let status = match finished {
            Ok(status) => status?,
            Err(_elapsed) => {
                if let Err(err) = child.kill().await {
                    warn!(event = "sandbox.kill_failed", error = %err);
                }
                return Ok(ExecutionResult::timeout());
            }
        };

        let mut output = String::from_utf8_lossy(&stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&stderr));

        Ok(if status.success() {
            ExecutionResult::passed(output)
        } else {
            ExecutionResult::runtime_failure(output)
        })
    }
}

/// Grades a candidate against a validation script.
///
/// [`Sandbox`] is the production implementation; the search engine accepts
/// any evaluator so it can be driven without an interpreter.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, code: &str, validation_script: &str) -> ExecutionResult;
}

#[async_trait]
impl Evaluator for Sandbox {
    async fn evaluate(&self, code: &str, validation_script: &str) -> ExecutionResult {
        self.execute(code, validation_script).await
    }
}
