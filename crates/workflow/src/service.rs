//! Workflow service: runs a validated request and records it in history.

use std::sync::Arc;

use pipeline::{HistoryError, RunHistory, StepDescriptor, WorkflowError, WorkflowResult};
use tracing::{error, info};

use crate::engine::WorkflowEngine;
use crate::validation::{validate_request, ValidationError, WorkflowRequest};

/// Front door for callers: validation, execution and history in one place.
#[derive(Clone)]
pub struct WorkflowService {
    engine: WorkflowEngine,
    history: Arc<dyn RunHistory>,
}

impl WorkflowService {
    pub fn new(engine: WorkflowEngine, history: Arc<dyn RunHistory>) -> Self {
        Self { engine, history }
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    pub fn history(&self) -> &dyn RunHistory {
        self.history.as_ref()
    }

    /// Descriptors of every registered step, in registration order.
    pub fn available_steps(&self) -> Vec<&StepDescriptor> {
        self.engine.registry().list()
    }

    /// Validates a raw request against the engine's registry.
    pub fn validate<S: AsRef<str>>(
        &self,
        input_text: &str,
        selected_steps: &[S],
    ) -> Result<WorkflowRequest, ValidationError> {
        validate_request(self.engine.registry(), input_text, selected_steps)
    }

    /// Runs `request` and stores the result.
    ///
    /// Saving is best effort: a history failure is logged and the run result
    /// is still returned.
    pub async fn run(&self, request: &WorkflowRequest) -> Result<WorkflowResult, WorkflowError> {
        let result = self.engine.run(&request.input_text, &request.steps).await?;

        match self.history.save(&result).await {
            Ok(()) => info!(run_id = %result.run_id(), "saved workflow run"),
            Err(err) => error!(
                run_id = %result.run_id(),
                error = %err,
                "failed to save workflow run to history"
            ),
        }

        Ok(result)
    }

    /// The most recent stored runs, newest first.
    pub async fn recent_runs(&self) -> Result<Vec<WorkflowResult>, HistoryError> {
        self.history.recent().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StepRegistry;
    use crate::test_support::ScriptedGateway;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHistory {
        saved: Mutex<Vec<WorkflowResult>>,
        fail: bool,
    }

    #[async_trait]
    impl RunHistory for RecordingHistory {
        async fn save(&self, run: &WorkflowResult) -> Result<(), HistoryError> {
            if self.fail {
                return Err(HistoryError::Storage("disk full".into()));
            }
            self.saved.lock().unwrap().insert(0, run.clone());
            Ok(())
        }

        async fn recent(&self) -> Result<Vec<WorkflowResult>, HistoryError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn is_healthy(&self) -> bool {
            !self.fail
        }
    }

    fn service(history: Arc<RecordingHistory>) -> WorkflowService {
        let engine = WorkflowEngine::new(
            Arc::new(StepRegistry::builtin()),
            Arc::new(ScriptedGateway::numbered()),
        );
        WorkflowService::new(engine, history)
    }

    #[tokio::test]
    async fn run_saves_result_to_history() {
        let history = Arc::new(RecordingHistory::default());
        let service = service(history.clone());
        let request = service
            .validate("Some reasonably long input.", &["clean_text", "summarize"])
            .unwrap();

        let result = service.run(&request).await.unwrap();

        let recent = service.recent_runs().await.unwrap();
        assert_eq!(recent, vec![result]);
    }

    #[tokio::test]
    async fn history_failure_does_not_fail_the_run() {
        let history = Arc::new(RecordingHistory {
            fail: true,
            ..Default::default()
        });
        let service = service(history);
        let request = service
            .validate("Some reasonably long input.", &["summarize", "tag_category"])
            .unwrap();

        let result = service.run(&request).await.unwrap();
        assert_eq!(result.results().len(), 2);
    }

    #[test]
    fn available_steps_come_from_registry() {
        let service = service(Arc::new(RecordingHistory::default()));
        assert_eq!(service.available_steps().len(), 4);
    }
}
