//! Oracle backed by an external command.
//!
//! The command receives `{"problem": ..., "state": ..., "n": ...}` as JSON on
//! stdin and must print a JSON array of code fragments on stdout. Exit code
//! 75 (`EX_TEMPFAIL`) signals a transient failure such as a rate limit.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{CandidateSource, GeneratorError};

/// Exit status meaning "try again later".
pub const EXIT_TEMPFAIL: i32 = 75;

/// How to launch the oracle process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_oracle_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_oracle_timeout_ms() -> u64 {
    60_000
}

impl OracleCommand {
    /// Build from an argv-style list. Returns `None` when `argv` is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout_ms: default_oracle_timeout_ms(),
        })
    }
}

#[derive(Serialize)]
struct CandidateRequest<'a> {
    problem: &'a str,
    state: &'a str,
    n: usize,
}

/// [`CandidateSource`] that shells out to an [`OracleCommand`].
#[derive(Debug, Clone)]
pub struct CommandSource {
    command: OracleCommand,
}

impl CommandSource {
    pub fn new(command: OracleCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl CandidateSource for CommandSource {
    async fn propose(
        &self,
        problem: &str,
        current_state: &str,
        n: usize,
    ) -> Result<Vec<String>, GeneratorError> {
        let request = serde_json::to_vec(&CandidateRequest {
            problem,
            state: current_state,
            n,
        })
        .map_err(|e| GeneratorError::Fatal(format!("encode request: {e}")))?;

        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GeneratorError::Fatal(format!("spawn {}: {e}", self.command.program)))?;

        // The request write counts against the timeout too: an oracle that
        // never reads stdin must not stall the search.
        let stdin = child.stdin.take();
        let exchange = async {
            if let Some(mut stdin) = stdin {
                stdin
                    .write_all(&request)
                    .await
                    .map_err(|e| GeneratorError::Fatal(format!("write request: {e}")))?;
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| GeneratorError::Fatal(format!("wait for oracle: {e}")))
        };

        let output = tokio::time::timeout(Duration::from_millis(self.command.timeout_ms), exchange)
            .await
            .map_err(|_| {
                GeneratorError::Transient(format!(
                    "oracle timed out after {}ms",
                    self.command.timeout_ms
                ))
            })??;

        match output.status.code() {
            Some(0) => serde_json::from_slice::<Vec<String>>(&output.stdout)
                .map_err(|e| GeneratorError::Fatal(format!("decode oracle output: {e}"))),
            Some(EXIT_TEMPFAIL) => Err(GeneratorError::Transient(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            )),
            code => Err(GeneratorError::Fatal(format!(
                "oracle exited with {:?}: {}",
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSource {
        CommandSource::new(OracleCommand {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            timeout_ms: 5_000,
        })
    }

    #[test]
    fn test_from_argv() {
        let cmd = OracleCommand::from_argv(&["oracle".into(), "--model".into(), "x".into()])
            .expect("non-empty argv");
        assert_eq!(cmd.program, "oracle");
        assert_eq!(cmd.args, vec!["--model", "x"]);
        assert!(OracleCommand::from_argv(&[]).is_none());
    }

    #[tokio::test]
    async fn test_reads_json_array() {
        let source = sh(r#"cat >/dev/null; printf '%s' '["    if n == 0: return 1", "x = 2"]'"#);
        let out = source.propose("p", "def f(n):", 2).await.unwrap();
        assert_eq!(out, vec!["    if n == 0: return 1", "x = 2"]);
    }

    #[tokio::test]
    async fn test_request_is_sent_on_stdin() {
        let source = sh(
            r#"if grep -qF '"state":"def f(n):"'; then printf '%s' '["seen"]'; else printf '%s' '["missing"]'; fi"#,
        );
        let out = source.propose("p", "def f(n):", 1).await.unwrap();
        assert_eq!(out, vec!["seen"]);
    }

    #[tokio::test]
    async fn test_tempfail_is_transient() {
        let err = sh("cat >/dev/null; echo slow down >&2; exit 75")
            .propose("p", "", 3)
            .await
            .unwrap_err();
        assert_eq!(err, GeneratorError::Transient("slow down".into()));
    }

    #[tokio::test]
    async fn test_other_exit_is_fatal() {
        let err = sh("cat >/dev/null; exit 1").propose("p", "", 3).await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_timeout_covers_unread_request() {
        let source = CommandSource::new(OracleCommand {
            program: "sh".into(),
            args: vec!["-c".into(), "sleep 30".into()],
            timeout_ms: 500,
        });
        // Larger than any pipe buffer, so the write blocks until the timeout.
        let state = "x".repeat(1 << 20);

        let start = std::time::Instant::now();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            source.propose("p", &state, 1),
        )
        .await
        .expect("oracle timeout not enforced");

        let err = result.unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("timed out"));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_garbage_output_is_fatal() {
        let err = sh("cat >/dev/null; echo not json")
            .propose("p", "", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Fatal(msg) if msg.contains("decode")));
    }
}
