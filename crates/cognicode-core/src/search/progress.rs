//! Human-readable progress lines for the host's step callback.

/// Trailing characters of the state shown in a progress line.
pub const EXCERPT_CHARS: usize = 60;

/// Last [`EXCERPT_CHARS`] characters of `state` on one line.
pub fn excerpt(state: &str) -> String {
    let total = state.chars().count();
    let skip = total.saturating_sub(EXCERPT_CHARS);
    let tail: String = state.chars().skip(skip).collect();
    let tail = tail.replace('\n', "⏎");
    if skip > 0 {
        format!("…{tail}")
    } else {
        tail
    }
}

pub fn progress_line(
    iteration: u32,
    depth: usize,
    reward: f64,
    state: &str,
    solved: bool,
) -> String {
    let status = if solved { "solution found" } else { "explored" };
    format!(
        "iter {iteration}: {status} | depth {depth} | reward {reward:+.2} | {}",
        excerpt(state)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_state_is_whole() {
        assert_eq!(excerpt("def f():\n    return 1"), "def f():⏎    return 1");
    }

    #[test]
    fn test_long_state_keeps_tail() {
        let state = "x".repeat(100) + "END";
        let out = excerpt(&state);
        assert!(out.starts_with('…'));
        assert!(out.ends_with("END"));
        assert_eq!(out.chars().count(), EXCERPT_CHARS + 1);
    }

    #[test]
    fn test_progress_line_fields() {
        let line = progress_line(3, 2, 0.1, "def f():", false);
        assert_eq!(line, "iter 3: explored | depth 2 | reward +0.10 | def f():");
        let line = progress_line(4, 3, 1.0, "ok", true);
        assert!(line.contains("solution found"));
        assert!(line.contains("+1.00"));
    }
}
