//! Static syntax validation using the interpreter's own parser.
//!
//! The candidate is piped to `ast.parse` in a short-lived process; nothing in
//! it is executed.

use std::io;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::config::{SandboxConfig, SyntaxPolicy};

/// Exit 0: parses. Exit 3: parser hit end of input inside an open block.
/// Any other exit: invalid.
const PARSE_CHECK: &str = r#"import ast, sys
src = sys.stdin.read()
try:
    ast.parse(src)
except SyntaxError as e:
    msg = e.msg or ""
    sys.exit(3 if msg.startswith(("unexpected EOF", "expected an indented block")) else 2)
"#;

/// Body appended when repairing an unfinished block.
pub const REPAIR_SUFFIX: &str = "\n    pass";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseVerdict {
    Valid,
    /// Syntactically unfinished, e.g. `def f(n):` with no body.
    Incomplete,
    Invalid,
}

/// Run the parse check for `code` once.
pub async fn parse_check(config: &SandboxConfig, code: &str) -> io::Result<ParseVerdict> {
    let mut child = Command::new(&config.interpreter)
        .arg("-c")
        .arg(PARSE_CHECK)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    let stdin = child.stdin.take();
    let status = tokio::time::timeout(config.timeout(), async {
        if let Some(mut stdin) = stdin {
            stdin.write_all(code.as_bytes()).await?;
            // Dropping stdin closes the pipe so the parser sees EOF.
        }
        child.wait().await
    })
    .await
    .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "syntax check timed out"))??;

    Ok(match status.code() {
        Some(0) => ParseVerdict::Valid,
        Some(3) => ParseVerdict::Incomplete,
        _ => ParseVerdict::Invalid,
    })
}

/// Apply `policy` on top of [`parse_check`].
pub async fn check_with_policy(config: &SandboxConfig, code: &str) -> io::Result<bool> {
    match parse_check(config, code).await? {
        ParseVerdict::Valid => Ok(true),
        ParseVerdict::Invalid => Ok(false),
        ParseVerdict::Incomplete => match config.syntax_policy {
            SyntaxPolicy::Strict => Ok(false),
            SyntaxPolicy::RepairIncompleteBlock => {
                let patched = format!("{code}{REPAIR_SUFFIX}");
                Ok(parse_check(config, &patched).await? == ParseVerdict::Valid)
            }
        },
    }
}
