use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::EvaluationMetrics;
use super::error::{EvaluationError, EvaluationResult};

/// One persisted evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord<'a> {
    pub query: &'a str,
    pub answer: &'a str,
    pub ground_truth: &'a [String],
    pub metrics: EvaluationMetrics,
    pub timestamp: String,
    /// `"web"` or `"document"`.
    pub source: &'static str,
}

/// Writes each evaluation as a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct EvaluationLog {
    dir: PathBuf,
}

impl EvaluationLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a record: `evaluation_{web|doc}_{YYYYmmdd_HHMMSS}_{run}.json`.
    pub fn file_name(is_web: bool, at: &DateTime<Local>, run: &str) -> String {
        format!(
            "evaluation_{}_{}_{}.json",
            if is_web { "web" } else { "doc" },
            at.format("%Y%m%d_%H%M%S"),
            run
        )
    }

    /// Persists one evaluation and returns the file written.
    pub async fn record(
        &self,
        query: &str,
        answer: &str,
        ground_truth: &[String],
        metrics: EvaluationMetrics,
        is_web: bool,
    ) -> EvaluationResult<PathBuf> {
        let now = Local::now();
        let run = uuid::Uuid::new_v4().simple().to_string();
        let path = self.dir.join(Self::file_name(is_web, &now, &run[..8]));

        let record = EvaluationRecord {
            query,
            answer,
            ground_truth,
            metrics,
            timestamp: now.format("%Y%m%d_%H%M%S").to_string(),
            source: if is_web { "web" } else { "document" },
        };
        let bytes = serde_json::to_vec_pretty(&record)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| EvaluationError::LogWrite {
                path: self.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| EvaluationError::LogWrite {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "Saved evaluation results");
        Ok(path)
    }
}
