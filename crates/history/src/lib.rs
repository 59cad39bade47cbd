//! Workflow Lite run history adapters.
//!
//! Two implementations of [`pipeline::RunHistory`]:
//!
//! - [`InMemoryRunHistory`]: process-local, used by tests and when no
//!   history path is configured.
//! - [`JsonFileRunHistory`]: a JSON array on disk, rewritten atomically after
//!   every save.
//!
//! Both keep only the [`RETENTION`] most recent runs.

mod json_file;
mod memory;

pub use json_file::JsonFileRunHistory;
pub use memory::InMemoryRunHistory;

use pipeline::WorkflowResult;

/// Number of runs kept after each save.
pub const RETENTION: usize = 5;

/// Inserts `run` and prunes `runs` down to [`RETENTION`] entries.
///
/// `runs` is kept newest first by `executed_at`. On a timestamp tie the run
/// saved later sorts first.
pub(crate) fn insert_and_prune(runs: &mut Vec<WorkflowResult>, run: WorkflowResult) {
    runs.insert(0, run);
    // Stable sort, so the fresh insert at index 0 stays ahead of equal timestamps.
    runs.sort_by(|a, b| b.executed_at().cmp(&a.executed_at()));
    runs.truncate(RETENTION);
}

#[cfg(test)]
pub(crate) mod test_runs {
    use chrono::{TimeZone, Utc};
    use pipeline::{
        GatewayResult, ModelId, RunId, StepDescriptor, StepId, StepResult, Timestamp,
        TokenCount, WorkflowResult,
    };

    /// A completed two-step run stamped `minute` minutes past a fixed hour.
    pub fn run_at(minute: u32, input: &str) -> WorkflowResult {
        let at = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, minute, 0)
            .single()
            .unwrap();
        let steps = [
            StepDescriptor::new(StepId::from_static("clean_text"), "Clean Text", "clean"),
            StepDescriptor::new(StepId::from_static("summarize"), "Summarize", "summarize"),
        ];
        let results = steps
            .iter()
            .map(|step| {
                StepResult::succeeded(
                    step,
                    GatewayResult {
                        output: format!("{} output", step.id),
                        model: ModelId::from_static("llama-3.1-8b-instant"),
                        tokens_used: TokenCount::new(10),
                        latency_ms: 5,
                    },
                )
            })
            .collect();
        WorkflowResult::new(
            RunId::new_random(),
            input.to_string(),
            steps.iter().map(|step| step.id.clone()).collect(),
            results,
            Timestamp::from_utc(at),
        )
    }
}
