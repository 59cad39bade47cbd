//! The workflow engine: runs selected steps in order over one input text.
//!
//! ## Run state machine
//!
//! ```text
//! Pending ──▶ Running(0) ──▶ Running(1) ──▶ … ──▶ Completed
//!                 │               │
//!                 └───────────────┴──▶ Halted   (first failing step)
//! ```
//!
//! The text fed to step *n + 1* is the output of step *n* verbatim; the first
//! step receives the trimmed input. A step failure is recorded as a failed
//! [`StepResult`] and stops the run; the results gathered so far are kept.
//! Only contract violations (unknown step id, empty step list) are returned
//! as errors.

use std::sync::Arc;

use pipeline::{
    ModelGateway, RunId, RunOutcome, StepId, StepResult, Timestamp, WorkflowError,
    WorkflowResult,
};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::registry::StepRegistry;

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running { step_index: usize },
    Completed,
    Halted { step_index: usize },
}

/// Drives a pipeline of registered steps against a model gateway.
///
/// Cheap to share: the registry is immutable and the gateway stateless, so
/// independent runs may call [`run`](Self::run) concurrently.
#[derive(Clone)]
pub struct WorkflowEngine {
    registry: Arc<StepRegistry>,
    gateway: Arc<dyn ModelGateway>,
}

impl WorkflowEngine {
    pub fn new(registry: Arc<StepRegistry>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self { registry, gateway }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> &dyn ModelGateway {
        self.gateway.as_ref()
    }

    /// Runs `selected_steps` over `input_text`.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::NoSteps`] if `selected_steps` is empty.
    /// - [`WorkflowError::StepNotFound`] as soon as a selected id does not
    ///   resolve; no result is recorded for it.
    pub async fn run(
        &self,
        input_text: &str,
        selected_steps: &[StepId],
    ) -> Result<WorkflowResult, WorkflowError> {
        if selected_steps.is_empty() {
            return Err(WorkflowError::NoSteps);
        }

        let run_id = RunId::new_random();
        let executed_at = Timestamp::now();
        let mut state = RunState::Pending;
        let mut results = Vec::with_capacity(selected_steps.len());
        let mut current = input_text.trim().to_string();

        info!(%run_id, steps = selected_steps.len(), "starting workflow");

        for (step_index, step_id) in selected_steps.iter().enumerate() {
            state = transition(run_id, state, RunState::Running { step_index });

            let Some(resolved) = self.registry.resolve(step_id.as_str()) else {
                error!(%run_id, %step_id, "selected step is not registered");
                return Err(WorkflowError::StepNotFound {
                    step_id: step_id.clone(),
                });
            };

            let span = info_span!("workflow_step", %run_id, %step_id, step_index);
            let outcome = resolved
                .step
                .run(self.gateway.as_ref(), &current)
                .instrument(span)
                .await;

            match outcome {
                Ok(output) => {
                    current.clone_from(&output.output);
                    results.push(StepResult::succeeded(resolved.descriptor, output));
                }
                Err(err) => {
                    warn!(
                        %run_id,
                        step = %resolved.descriptor.name,
                        error = %err,
                        "step failed, halting workflow"
                    );
                    results.push(StepResult::failed(resolved.descriptor, err.to_string()));
                    state = transition(run_id, state, RunState::Halted { step_index });
                    break;
                }
            }
        }

        if let RunState::Running { .. } = state {
            state = transition(run_id, state, RunState::Completed);
        }

        let result = WorkflowResult::new(
            run_id,
            input_text,
            selected_steps.to_vec(),
            results,
            executed_at,
        );
        debug_assert_eq!(
            matches!(state, RunState::Halted { .. }),
            result.outcome() == RunOutcome::Halted
        );

        info!(
            %run_id,
            succeeded = result.succeeded_count(),
            selected = selected_steps.len(),
            outcome = ?result.outcome(),
            "workflow finished"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn transition(run_id: RunId, from: RunState, to: RunState) -> RunState {
    debug!(%run_id, ?from, ?to, "run state transition");
    to
}
