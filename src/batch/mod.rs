//! Batch rendering of selected catalog documents.
//!
//! [`BatchDriver`] ties the pipeline together: it narrows the catalog with
//! the configured selections, acquires one browser session, renders every
//! selected document and releases the session whatever happened in between.
//!
//! # Example
//!
//! ```no_run
//! use resume_pdf::batch::{BatchConfig, BatchDriver, LogObserver};
//! use resume_pdf::catalog::{Catalog, Style};
//! use resume_pdf::select::AxisSelections;
//! use resume_pdf::session::ChromiumLauncher;
//!
//! # async fn run() -> resume_pdf::Result<()> {
//! let config = BatchConfig::new()
//!     .with_base_url("https://example.test")
//!     .with_selections(AxisSelections::new().with_style(Style::Hr));
//! let report = BatchDriver::new(config, Catalog::builtin())
//!     .run(&ChromiumLauncher::new(), &LogObserver)
//!     .await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

mod observer;
mod report;

pub use observer::{BatchObserver, LogObserver, NoopObserver};
pub use report::{BatchReport, DocumentOutcome, DocumentStatus};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::options::{LaunchOptions, RenderOptions};
use crate::select::{select, AxisSelections};
use crate::session::{Launcher, Session};
use crate::worker::{self, RenderJob};
use chrono::Utc;
use futures::StreamExt;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Origin the pages are fetched from when no override is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4321/resume";

/// Output directory, relative to the working directory, when no override is given.
pub const DEFAULT_OUTPUT_DIR: &str = "dist/pdf";

/// What to do when a document fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure; remaining documents are skipped.
    #[default]
    FailFast,
    /// Render every document and report failures at the end.
    Continue,
}

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Origin prepended to every descriptor path
    pub base_url: String,

    /// Directory the PDFs are written to
    pub output_dir: PathBuf,

    /// Locale and style selection
    pub selections: AxisSelections,

    /// Failure handling
    pub failure_policy: FailurePolicy,

    /// Maximum number of documents rendered at once
    pub concurrency: usize,

    /// Browser launch options
    pub launch: LaunchOptions,

    /// Per-page render options
    pub render: RenderOptions,
}

impl BatchConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the document selection.
    pub fn with_selections(mut self, selections: AxisSelections) -> Self {
        self.selections = selections;
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set how many documents may render at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set browser launch options.
    pub fn with_launch_options(mut self, options: LaunchOptions) -> Self {
        self.launch = options;
        self
    }

    /// Set page render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Check the configuration before anything is launched.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{}': {}", self.base_url, e)))?;
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            selections: AxisSelections::default(),
            failure_policy: FailurePolicy::default(),
            concurrency: 1,
            launch: LaunchOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

/// Renders the selected part of a catalog.
pub struct BatchDriver {
    config: BatchConfig,
    catalog: Catalog,
}

impl BatchDriver {
    /// Create a driver.
    pub fn new(config: BatchConfig, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    /// The configuration in use.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Selected documents resolved into jobs, in catalog order.
    pub fn jobs(&self) -> Vec<RenderJob> {
        select(self.catalog.descriptors(), &self.config.selections)
            .into_iter()
            .map(|d| RenderJob::resolve(d, &self.config.base_url, &self.config.output_dir))
            .collect()
    }

    /// Run the batch.
    ///
    /// One browser session serves every document and is closed before this
    /// returns, on success and failure alike. Document failures are recorded
    /// in the report; check [`BatchReport::is_success`].
    ///
    /// # Errors
    /// * `Error::Config` for an invalid configuration
    /// * `Error::Launch` if the browser cannot be started
    /// * any error from closing the session when every document succeeded
    pub async fn run(
        &self,
        launcher: &dyn Launcher,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport> {
        self.config.validate()?;

        let jobs = self.jobs();
        observer.on_batch_start(&jobs);

        let clock = Instant::now();
        let mut report = BatchReport::new(Utc::now());

        if jobs.is_empty() {
            debug!("Nothing selected, not launching the browser");
            observer.on_batch_end(&report);
            return Ok(report);
        }

        let session = launcher.launch(&self.config.launch).await?;
        debug!("Session acquired");
        observer.on_session_ready();

        report.outcomes = self.render_jobs(session.as_ref(), &jobs, observer).await;

        let closed = session.close().await;
        debug!("Session released");
        report.elapsed_ms = clock.elapsed().as_millis() as u64;
        observer.on_batch_end(&report);

        if let Err(e) = closed {
            if report.is_success() {
                return Err(e);
            }
            warn!("Failed to close browser session: {}", e);
        }

        Ok(report)
    }

    async fn render_jobs(
        &self,
        session: &dyn Session,
        jobs: &[RenderJob],
        observer: &dyn BatchObserver,
    ) -> Vec<DocumentOutcome> {
        let halted = AtomicBool::new(false);
        let halted = &halted;
        let fail_fast = self.config.failure_policy == FailurePolicy::FailFast;
        let options = &self.config.render;

        // Jobs are created lazily, so a halt set by a failure is seen by
        // every job that has not started yet.
        futures::stream::iter(jobs)
            .map(move |job| async move {
                if halted.load(Ordering::SeqCst) {
                    observer.on_job_skipped(job);
                    return DocumentOutcome::skipped(job);
                }

                observer.on_job_start(job);
                match worker::render(session, job, options).await {
                    Ok(document) => {
                        observer.on_job_success(job, &document);
                        DocumentOutcome::rendered(&document)
                    }
                    Err(e) => {
                        if fail_fast {
                            halted.store(true, Ordering::SeqCst);
                        }
                        observer.on_job_failure(job, &e);
                        DocumentOutcome::failed(job, &e)
                    }
                }
            })
            .buffered(self.config.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Locale, Style};

    #[test]
    fn test_config_defaults() {
        let config = BatchConfig::default();
        assert_eq!(config.base_url, "http://localhost:4321/resume");
        assert_eq!(config.output_dir, PathBuf::from("dist/pdf"));
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let bad_url = BatchConfig::new().with_base_url("not a url");
        assert!(matches!(bad_url.validate(), Err(Error::Config(_))));

        let no_workers = BatchConfig::new().with_concurrency(0);
        assert!(matches!(no_workers.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_jobs_follow_selection() {
        let config = BatchConfig::new()
            .with_base_url("https://example.test")
            .with_output_dir("out")
            .with_selections(AxisSelections::new().with_locale(Locale::En));
        let driver = BatchDriver::new(config, Catalog::builtin());

        let jobs = driver.jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].url, "https://example.test/en/resume-print");
        assert_eq!(jobs[0].descriptor.style, Style::Hr);
        assert_eq!(jobs[1].output_path, PathBuf::from("out").join("resume-ats-en.pdf"));
    }

    #[test]
    fn test_output_paths_unique() {
        let driver = BatchDriver::new(BatchConfig::default(), Catalog::builtin());
        let jobs = driver.jobs();
        let mut paths: Vec<_> = jobs.iter().map(|j| j.output_path.clone()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), jobs.len());
    }
}
