//! Structured observability hooks for the search lifecycle.
//!
//! - `search_span`: span tagging everything inside a run with `run_id`
//! - `emit_*`: one function per lifecycle event
//!
//! Events are emitted at `info!` (per-iteration at `debug!`), filtered through
//! `RUST_LOG`.

use tracing::{debug, info, warn, Span};

/// Span tagging everything inside one search run with its `run_id`.
///
/// Attach with `tracing::Instrument` so it stays correct across awaits.
pub fn search_span(run_id: &str) -> Span {
    tracing::info_span!("cognicode.search", run_id = %run_id)
}

pub fn emit_search_started(run_id: &str, iterations: u32, root_len: usize) {
    info!(
        event = "search.started",
        run_id = %run_id,
        iterations = iterations,
        root_len = root_len,
    );
}

pub fn emit_iteration(iteration: u32, depth: usize, reward: f64, tree_size: usize) {
    debug!(
        event = "search.iteration",
        iteration = iteration,
        depth = depth,
        reward = reward,
        tree_size = tree_size,
    );
}

pub fn emit_solution_found(run_id: &str, iteration: u32, depth: usize) {
    info!(
        event = "search.solved",
        run_id = %run_id,
        iteration = iteration,
        depth = depth,
    );
}

/// Budget ran out without a passing candidate (warning level).
pub fn emit_budget_exhausted(run_id: &str, iterations: u32, tree_size: usize) {
    warn!(
        event = "search.exhausted",
        run_id = %run_id,
        iterations = iterations,
        tree_size = tree_size,
    );
}

/// Generator broke its contract and returned nothing (warning level).
pub fn emit_empty_expansion(depth: usize) {
    warn!(event = "search.empty_expansion", depth = depth);
}
