use async_trait::async_trait;
use pipeline::{HistoryError, RunHistory, WorkflowResult};
use tokio::sync::Mutex;

use crate::insert_and_prune;

/// [`RunHistory`] held in process memory. Lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryRunHistory {
    runs: Mutex<Vec<WorkflowResult>>,
}

impl InMemoryRunHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunHistory for InMemoryRunHistory {
    async fn save(&self, run: &WorkflowResult) -> Result<(), HistoryError> {
        insert_and_prune(&mut *self.runs.lock().await, run.clone());
        Ok(())
    }

    async fn recent(&self) -> Result<Vec<WorkflowResult>, HistoryError> {
        Ok(self.runs.lock().await.clone())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_runs::run_at;
    use crate::RETENTION;

    #[tokio::test]
    async fn starts_empty() {
        let history = InMemoryRunHistory::new();
        assert!(history.recent().await.unwrap().is_empty());
        assert!(history.is_healthy().await);
    }

    #[tokio::test]
    async fn retains_only_the_most_recent_runs() {
        let history = InMemoryRunHistory::new();
        for minute in 0..(RETENTION as u32 + 3) {
            history.save(&run_at(minute, "text")).await.unwrap();
        }

        let recent = history.recent().await.unwrap();
        assert_eq!(recent.len(), RETENTION);
        assert!(recent
            .windows(2)
            .all(|pair| pair[0].executed_at() >= pair[1].executed_at()));
    }
}
