//! Append-only audit trail of quote submissions that reached storage.
//!
//! One JSON object per line: `{"time", "status", "payload"}`. Writing is
//! best-effort; a failure is reported through `tracing` and otherwise ignored
//! so it can never change the HTTP response.

use crate::i18n::Language;
use crate::quote::QuoteRequest;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Storage outcome recorded for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Stored,
    DbUnavailable,
    SetupFailed,
    SchemaFailed,
    PrepareFailed,
    SaveFailed,
}

/// Everything known about a submission at the time it is logged.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub name: String,
    pub phone: String,
    pub area: String,
    pub service: String,
    pub message: String,
    pub language: &'static str,
    pub source_page: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionRecord {
    pub fn new(
        quote: &QuoteRequest,
        language: Language,
        ip: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            name: quote.name.clone(),
            phone: quote.phone.clone(),
            area: quote.area.clone(),
            service: quote.service.code().to_string(),
            message: quote.message.clone(),
            language: language.code(),
            source_page: quote.source_page.clone(),
            ip,
            user_agent,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    time: String,
    status: SubmissionStatus,
    payload: &'a SubmissionRecord,
}

#[derive(Debug, Clone)]
pub struct SubmissionLog {
    path: PathBuf,
}

impl SubmissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Never fails.
    pub async fn record(&self, status: SubmissionStatus, payload: &SubmissionRecord) {
        if let Err(e) = self.append(status, payload).await {
            warn!(
                "Failed to write submission log {}: {:#}",
                self.path.display(),
                e
            );
        }
    }

    async fn append(&self, status: SubmissionStatus, payload: &SubmissionRecord) -> Result<()> {
        let entry = LogEntry {
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            status,
            payload,
        };
        let mut line = serde_json::to_string(&entry).context("Failed to serialize log entry")?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create log directory")?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .context("Failed to open log file")?;

        // A single write keeps concurrent lines from interleaving under O_APPEND
        file.write_all(line.as_bytes())
            .await
            .context("Failed to append log entry")?;
        file.flush().await.context("Failed to flush log file")?;

        Ok(())
    }
}
