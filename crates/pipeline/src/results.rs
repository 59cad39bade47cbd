//! Per-call, per-step and per-run result records.
//!
//! The serialized shape is camelCase JSON and is what the run history stores:
//!
//! ```json
//! { "stepId": "summarize", "stepName": "Summarize", "success": true,
//!   "output": "...", "model": "llama-3.1-8b-instant", "tokensUsed": 42, "latencyMs": 310 }
//! { "stepId": "tag_category", "stepName": "Tag Category", "success": false,
//!   "output": null, "error": "groq rate limit exceeded. ..." }
//! ```

use serde::{Deserialize, Serialize};

use crate::{ModelId, RunId, StepDescriptor, StepId, Timestamp, TokenCount};

// ---------------------------------------------------------------------------
// Gateway result
// ---------------------------------------------------------------------------

/// Successful output of one model gateway call.
///
/// `output` is never empty or whitespace-only; the gateway reports that case
/// as [`GatewayError::EmptyResponse`](crate::GatewayError::EmptyResponse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResult {
    /// Generated text, trimmed of surrounding whitespace.
    pub output: String,
    /// Model that produced the text.
    pub model: ModelId,
    /// Total tokens billed for the call.
    pub tokens_used: TokenCount,
    /// Wall-clock latency of the call in milliseconds.
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Step result
// ---------------------------------------------------------------------------

/// Record of one attempted step.
///
/// Built only through [`StepResult::succeeded`] and [`StepResult::failed`], so
/// a success always carries output and telemetry and a failure always carries
/// an error message and a null output. Deserialization enforces the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StepResultRecord")]
pub struct StepResult {
    step_id: StepId,
    step_name: String,
    success: bool,
    output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<ModelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tokens_used: Option<TokenCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StepResult {
    /// Records a step whose gateway call succeeded.
    pub fn succeeded(descriptor: &StepDescriptor, result: GatewayResult) -> Self {
        Self {
            step_id: descriptor.id.clone(),
            step_name: descriptor.name.clone(),
            success: true,
            output: Some(result.output),
            model: Some(result.model),
            tokens_used: Some(result.tokens_used),
            latency_ms: Some(result.latency_ms),
            error: None,
        }
    }

    /// Records a step whose gateway call failed with `error`.
    pub fn failed(descriptor: &StepDescriptor, error: impl Into<String>) -> Self {
        Self {
            step_id: descriptor.id.clone(),
            step_name: descriptor.name.clone(),
            success: false,
            output: None,
            model: None,
            tokens_used: None,
            latency_ms: None,
            error: Some(error.into()),
        }
    }

    pub fn step_id(&self) -> &StepId {
        &self.step_id
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The step's output text; `None` for a failed step.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn model(&self) -> Option<&ModelId> {
        self.model.as_ref()
    }

    pub fn tokens_used(&self) -> Option<TokenCount> {
        self.tokens_used
    }

    pub fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }

    /// The failure message; `None` for a successful step.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Unchecked wire form of [`StepResult`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepResultRecord {
    step_id: StepId,
    step_name: String,
    success: bool,
    output: Option<String>,
    #[serde(default)]
    model: Option<ModelId>,
    #[serde(default)]
    tokens_used: Option<TokenCount>,
    #[serde(default)]
    latency_ms: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<StepResultRecord> for StepResult {
    type Error = String;

    fn try_from(r: StepResultRecord) -> Result<Self, Self::Error> {
        let consistent = if r.success {
            r.output.is_some() && r.model.is_some() && r.error.is_none()
        } else {
            r.output.is_none() && r.error.is_some()
        };
        if !consistent {
            return Err(format!(
                "step result for \"{}\" has success={} but mismatched output/model/error fields",
                r.step_id, r.success
            ));
        }
        Ok(Self {
            step_id: r.step_id,
            step_name: r.step_name,
            success: r.success,
            output: r.output,
            model: r.model,
            tokens_used: r.tokens_used,
            latency_ms: r.latency_ms,
            error: r.error,
        })
    }
}

// ---------------------------------------------------------------------------
// Workflow result
// ---------------------------------------------------------------------------

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every selected step succeeded.
    Completed,
    /// A step failed; the steps after it were never attempted.
    Halted,
}

/// The complete record of one run, handed to the caller by the engine.
///
/// Immutable after construction. `results` has one entry per attempted step,
/// so `results.len() <= selected_steps.len()`, with equality exactly when the
/// run completed. A stored record that breaks this does not deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WorkflowResultRecord")]
pub struct WorkflowResult {
    run_id: RunId,
    input_text: String,
    selected_steps: Vec<StepId>,
    results: Vec<StepResult>,
    executed_at: Timestamp,
    outcome: RunOutcome,
}

impl WorkflowResult {
    /// Assembles a run record; the outcome is derived from the last result.
    pub fn new(
        run_id: RunId,
        input_text: impl Into<String>,
        selected_steps: Vec<StepId>,
        results: Vec<StepResult>,
        executed_at: Timestamp,
    ) -> Self {
        debug_assert_eq!(check_results(&selected_steps, &results), Ok(()));
        let outcome = derive_outcome(&results);
        Self {
            run_id,
            input_text: input_text.into(),
            selected_steps,
            results,
            executed_at,
            outcome,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The input exactly as the caller supplied it (untrimmed).
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn selected_steps(&self) -> &[StepId] {
        &self.selected_steps
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn executed_at(&self) -> Timestamp {
        self.executed_at
    }

    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    /// Number of steps that succeeded.
    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Output of the last successful step, if any step succeeded.
    pub fn final_output(&self) -> Option<&str> {
        self.results.iter().rev().find_map(StepResult::output)
    }

    /// Tokens used across all successful steps.
    pub fn total_tokens(&self) -> TokenCount {
        self.results.iter().filter_map(StepResult::tokens_used).sum()
    }
}

fn derive_outcome(results: &[StepResult]) -> RunOutcome {
    if results.last().is_some_and(|r| !r.is_success()) {
        RunOutcome::Halted
    } else {
        RunOutcome::Completed
    }
}

/// Results must follow the selected steps in order, only the last may have
/// failed, and a short list must end in that failure.
fn check_results(selected_steps: &[StepId], results: &[StepResult]) -> Result<(), String> {
    if results.len() > selected_steps.len() {
        return Err(format!(
            "{} results recorded for {} selected steps",
            results.len(),
            selected_steps.len()
        ));
    }
    if let Some((index, r)) = results
        .iter()
        .enumerate()
        .find(|(i, r)| r.step_id() != &selected_steps[*i])
    {
        return Err(format!(
            "result {index} is for step \"{}\" but step \"{}\" was selected there",
            r.step_id(),
            selected_steps[index]
        ));
    }
    if let Some(index) = results
        .iter()
        .take(results.len().saturating_sub(1))
        .position(|r| !r.is_success())
    {
        return Err(format!("result {index} failed but later steps still ran"));
    }
    if results.len() < selected_steps.len() && derive_outcome(results) != RunOutcome::Halted {
        return Err("run stopped early without a failed step".to_string());
    }
    Ok(())
}

/// Unchecked wire form of [`WorkflowResult`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowResultRecord {
    run_id: RunId,
    input_text: String,
    selected_steps: Vec<StepId>,
    results: Vec<StepResult>,
    executed_at: Timestamp,
    outcome: RunOutcome,
}

impl TryFrom<WorkflowResultRecord> for WorkflowResult {
    type Error = String;

    fn try_from(r: WorkflowResultRecord) -> Result<Self, Self::Error> {
        check_results(&r.selected_steps, &r.results)?;
        let outcome = derive_outcome(&r.results);
        if outcome != r.outcome {
            return Err(format!(
                "stored outcome {:?} contradicts the step results ({outcome:?})",
                r.outcome
            ));
        }
        Ok(Self {
            run_id: r.run_id,
            input_text: r.input_text,
            selected_steps: r.selected_steps,
            results: r.results,
            executed_at: r.executed_at,
            outcome,
        })
    }
}
