//! File-backed run history.
//!
//! The whole history is a single JSON array (newest first) of
//! [`WorkflowResult`] records. It is small by construction, so every save
//! rewrites the file: serialize, write `<name>.tmp`, rename over the
//! original. A crash mid-write leaves the previous file intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pipeline::{HistoryError, RunHistory, WorkflowResult};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::insert_and_prune;

/// [`RunHistory`] persisted as a JSON array at a fixed path.
#[derive(Debug)]
pub struct JsonFileRunHistory {
    path: PathBuf,
    // Held across the file write so concurrent saves cannot interleave.
    runs: Mutex<Vec<WorkflowResult>>,
}

impl JsonFileRunHistory {
    /// Opens the history at `path`, creating the file and its parent
    /// directories when missing.
    ///
    /// # Errors
    ///
    /// [`HistoryError::Storage`] when the directory or file cannot be
    /// created or read; [`HistoryError::Serialization`] when an existing
    /// file is not a valid history array.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create history directory", parent, e))?;
        }

        let runs = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => {
                let mut runs: Vec<WorkflowResult> = serde_json::from_str(&contents)
                    .map_err(|e| {
                        HistoryError::Serialization(format!("{}: {e}", path.display()))
                    })?;
                runs.sort_by(|a, b| b.executed_at().cmp(&a.executed_at()));
                runs.truncate(crate::RETENTION);
                info!(path = %path.display(), runs = runs.len(), "loaded run history");
                runs
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                write_atomic(&path, &[]).await?;
                info!(path = %path.display(), "created run history file");
                Vec::new()
            }
            Err(e) => return Err(storage_error("read history file", &path, e)),
        };

        Ok(Self {
            path,
            runs: Mutex::new(runs),
        })
    }
}

#[async_trait]
impl RunHistory for JsonFileRunHistory {
    async fn save(&self, run: &WorkflowResult) -> Result<(), HistoryError> {
        let mut runs = self.runs.lock().await;
        let mut next = runs.clone();
        insert_and_prune(&mut next, run.clone());

        write_atomic(&self.path, &next).await?;
        *runs = next;

        debug!(
            path = %self.path.display(),
            run_id = %run.run_id(),
            kept = runs.len(),
            "persisted run history"
        );
        Ok(())
    }

    async fn recent(&self) -> Result<Vec<WorkflowResult>, HistoryError> {
        Ok(self.runs.lock().await.clone())
    }

    async fn is_healthy(&self) -> bool {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir,
            None => Path::new("."),
        };
        match tokio::fs::metadata(dir).await {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "history directory is unreachable");
                false
            }
        }
    }
}

async fn write_atomic(path: &Path, runs: &[WorkflowResult]) -> Result<(), HistoryError> {
    let json = serde_json::to_string_pretty(runs)
        .map_err(|e| HistoryError::Serialization(e.to_string()))?;

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(|e| storage_error("write history file", &tmp_path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| storage_error("replace history file", path, e))
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> HistoryError {
    HistoryError::Storage(format!("failed to {action} {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_runs::run_at;
    use crate::RETENTION;

    #[tokio::test]
    async fn open_creates_parent_dirs_and_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("runs.json");

        let history = JsonFileRunHistory::open(&path).await.unwrap();

        assert!(history.recent().await.unwrap().is_empty());
        let on_disk = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&on_disk).unwrap();
        assert!(parsed.is_empty());
        assert!(history.is_healthy().await);
    }

    #[tokio::test]
    async fn saved_runs_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");

        let first = run_at(1, "first input text");
        let second = run_at(2, "second input text");
        {
            let history = JsonFileRunHistory::open(&path).await.unwrap();
            history.save(&first).await.unwrap();
            history.save(&second).await.unwrap();
        }

        let reopened = JsonFileRunHistory::open(&path).await.unwrap();
        assert_eq!(reopened.recent().await.unwrap(), vec![second, first]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn file_holds_at_most_retention_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        let history = JsonFileRunHistory::open(&path).await.unwrap();

        for minute in 0..(RETENTION as u32 + 2) {
            history.save(&run_at(minute, "text")).await.unwrap();
        }

        let on_disk: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), RETENTION);
        assert_eq!(on_disk[0]["executedAt"], "2026-03-01T12:06:00Z");
        assert_eq!(history.recent().await.unwrap().len(), RETENTION);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        std::fs::write(&path, "{ not an array").unwrap();

        let err = JsonFileRunHistory::open(&path).await.unwrap_err();
        assert!(matches!(err, HistoryError::Serialization(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn record_breaking_run_invariants_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        let mut record = serde_json::to_value(run_at(0, "text")).unwrap();
        // Two results recorded against a single selected step.
        record["selectedSteps"] = serde_json::json!(["clean_text"]);
        std::fs::write(&path, serde_json::json!([record]).to_string()).unwrap();

        let err = JsonFileRunHistory::open(&path).await.unwrap_err();
        assert!(matches!(err, HistoryError::Serialization(_)), "got {err:?}");

        let mut record = serde_json::to_value(run_at(0, "text")).unwrap();
        record["outcome"] = serde_json::json!("halted");
        std::fs::write(&path, serde_json::json!([record]).to_string()).unwrap();

        let err = JsonFileRunHistory::open(&path).await.unwrap_err();
        assert!(matches!(err, HistoryError::Serialization(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn removed_directory_is_unhealthy_and_fails_saves() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let path = data_dir.join("runs.json");
        let history = JsonFileRunHistory::open(&path).await.unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();

        assert!(!history.is_healthy().await);
        let err = history.save(&run_at(0, "text")).await.unwrap_err();
        assert!(matches!(err, HistoryError::Storage(_)));
        assert!(history.recent().await.unwrap().is_empty());
    }
}
