//! Component health report.

use pipeline::{ModelGateway, RunHistory, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Error,
}

impl ComponentStatus {
    fn from_ok(ok: bool) -> Self {
        if ok {
            Self::Ok
        } else {
            Self::Error
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Status of each component at `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Always `ok`: if this code runs, the process is up.
    pub backend: ComponentStatus,
    pub history: ComponentStatus,
    pub llm: ComponentStatus,
    pub timestamp: Timestamp,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        [self.backend, self.history, self.llm]
            .iter()
            .all(|s| *s == ComponentStatus::Ok)
    }
}

/// Probes the history store and the model gateway.
pub async fn check_health(gateway: &dyn ModelGateway, history: &dyn RunHistory) -> HealthReport {
    let (history_ok, llm_ok) = tokio::join!(history.is_healthy(), gateway.check_connectivity());
    HealthReport {
        backend: ComponentStatus::Ok,
        history: ComponentStatus::from_ok(history_ok),
        llm: ComponentStatus::from_ok(llm_ok),
        timestamp: Timestamp::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGateway;
    use async_trait::async_trait;
    use pipeline::{HistoryError, WorkflowResult};

    struct StaticHistory(bool);

    #[async_trait]
    impl RunHistory for StaticHistory {
        async fn save(&self, _run: &WorkflowResult) -> Result<(), HistoryError> {
            Ok(())
        }

        async fn recent(&self) -> Result<Vec<WorkflowResult>, HistoryError> {
            Ok(Vec::new())
        }

        async fn is_healthy(&self) -> bool {
            self.0
        }
    }

    #[tokio::test]
    async fn healthy_when_every_component_is_ok() {
        let report = check_health(&ScriptedGateway::numbered(), &StaticHistory(true)).await;
        assert!(report.is_healthy());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["llm"], "ok");
        assert_eq!(json["backend"], "ok");
    }

    #[tokio::test]
    async fn unhealthy_history_is_reported() {
        let report = check_health(&ScriptedGateway::numbered(), &StaticHistory(false)).await;
        assert_eq!(report.history, ComponentStatus::Error);
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn unreachable_model_api_is_reported() {
        let gateway = ScriptedGateway::numbered().unreachable();
        let report = check_health(&gateway, &StaticHistory(true)).await;

        assert_eq!(report.llm, ComponentStatus::Error);
        assert_eq!(report.history, ComponentStatus::Ok);
        assert_eq!(report.backend, ComponentStatus::Ok);
        assert!(!report.is_healthy());
        assert_eq!(serde_json::to_value(&report).unwrap()["llm"], "error");
    }
}
