//! Batch outcome reporting.

use crate::error::{Error, ErrorKind};
use crate::worker::{RenderJob, RenderedDocument};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentStatus {
    /// The file was written.
    Rendered {
        bytes: usize,
        pdf_version: String,
        elapsed_ms: u64,
    },

    /// Rendering failed.
    Failed { error: String, kind: ErrorKind },

    /// Never attempted because an earlier document failed.
    Skipped,
}

/// Outcome of one document in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentOutcome {
    /// Document label
    pub name: String,

    /// Source URL
    pub url: String,

    /// Destination file
    pub output_path: PathBuf,

    /// Result
    #[serde(flatten)]
    pub status: DocumentStatus,
}

impl DocumentOutcome {
    pub(crate) fn rendered(document: &RenderedDocument) -> Self {
        Self {
            name: document.name.clone(),
            url: document.url.clone(),
            output_path: document.output_path.clone(),
            status: DocumentStatus::Rendered {
                bytes: document.bytes,
                pdf_version: document.pdf_version.clone(),
                elapsed_ms: document.elapsed.as_millis() as u64,
            },
        }
    }

    pub(crate) fn failed(job: &RenderJob, error: &Error) -> Self {
        Self::for_job(
            job,
            DocumentStatus::Failed {
                error: error.to_string(),
                kind: error.kind(),
            },
        )
    }

    pub(crate) fn skipped(job: &RenderJob) -> Self {
        Self::for_job(job, DocumentStatus::Skipped)
    }

    fn for_job(job: &RenderJob, status: DocumentStatus) -> Self {
        Self {
            name: job.name().to_string(),
            url: job.url.clone(),
            output_path: job.output_path.clone(),
            status,
        }
    }

    /// Whether the file was written.
    pub fn is_rendered(&self) -> bool {
        matches!(self.status, DocumentStatus::Rendered { .. })
    }

    /// Whether rendering failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed { .. })
    }
}

/// Aggregate result of a batch, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// Total wall time
    pub elapsed_ms: u64,

    /// Per-document outcomes
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            elapsed_ms: 0,
            outcomes: Vec::new(),
        }
    }

    /// Documents that were written.
    pub fn rendered(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| o.is_rendered())
    }

    /// Documents that failed.
    pub fn failed(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Documents that were never attempted.
    pub fn skipped(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == DocumentStatus::Skipped)
    }

    /// True when every selected document was written.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(DocumentOutcome::is_rendered)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
