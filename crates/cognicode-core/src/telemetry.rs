//! Tracing setup for the `cognicode` binary.
//!
//! Search progress lines and the final program are written by the CLI
//! itself; everything emitted through `tracing` (the `search.*`,
//! `sandbox.*` and `generator.*` events) goes to stderr so that a solved
//! program piped from stdout is never interleaved with log output.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directives when `RUST_LOG` is unset: CogniCode crates at `level`,
/// dependencies at `warn`.
fn default_directives(level: Level) -> String {
    format!("warn,cognicode_core={level},cognicode={level}")
}

/// Install the global subscriber.
///
/// With `json` set, each event is one JSON object per line, carrying the
/// `run_id` of the enclosing search span. Only the first call in a process
/// takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let _ = if json {
        registry.with(layer.json().with_current_span(true)).try_init()
    } else {
        registry.with(layer).try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_level_to_own_crates() {
        let directives = default_directives(Level::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("cognicode_core=DEBUG"));
        assert!(directives.contains("cognicode=DEBUG"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(false, Level::WARN);
        init_tracing(true, Level::DEBUG);
        tracing::info!("still fine");
    }
}
