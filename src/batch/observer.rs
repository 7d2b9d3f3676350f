//! Progress hooks for batch rendering.

use super::report::BatchReport;
use crate::error::Error;
use crate::worker::{RenderJob, RenderedDocument};
use log::{error, info, warn};

/// Receives progress notifications while a batch runs.
///
/// All methods have empty default implementations; implement only the
/// ones you need.
pub trait BatchObserver: Send + Sync {
    /// Called once the selection is known, before the browser starts.
    fn on_batch_start(&self, _jobs: &[RenderJob]) {}

    /// Called after the browser session is up.
    fn on_session_ready(&self) {}

    /// Called before a document is rendered.
    fn on_job_start(&self, _job: &RenderJob) {}

    /// Called after a document was written.
    fn on_job_success(&self, _job: &RenderJob, _document: &RenderedDocument) {}

    /// Called when a document failed.
    fn on_job_failure(&self, _job: &RenderJob, _error: &Error) {}

    /// Called for a document that will not be attempted.
    fn on_job_skipped(&self, _job: &RenderJob) {}

    /// Called after the session has been released.
    fn on_batch_end(&self, _report: &BatchReport) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Observer that reports progress through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl BatchObserver for LogObserver {
    fn on_batch_start(&self, jobs: &[RenderJob]) {
        info!("Rendering {} document(s)", jobs.len());
    }

    fn on_job_start(&self, job: &RenderJob) {
        info!("Generating {} ({})", job.name(), job.url);
    }

    fn on_job_success(&self, _job: &RenderJob, document: &RenderedDocument) {
        info!("Saved to {}", document.output_path.display());
    }

    fn on_job_failure(&self, job: &RenderJob, error: &Error) {
        error!("Error generating {}: {}", job.name(), error);
    }

    fn on_job_skipped(&self, job: &RenderJob) {
        warn!("Skipped {}", job.name());
    }

    fn on_batch_end(&self, report: &BatchReport) {
        info!(
            "Batch finished in {} ms: {} rendered, {} failed",
            report.elapsed_ms,
            report.rendered().count(),
            report.failed().count()
        );
    }
}
