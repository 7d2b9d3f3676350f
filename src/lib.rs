//! # resume-pdf
//!
//! Render web pages into paginated PDF files with headless Chromium.
//!
//! The crate drives a browser through a fixed pipeline: pick documents from
//! a [`Catalog`], start one browser session, load each page in an isolated
//! context, wait for it to settle and print it with per-document paper,
//! background and margin settings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use resume_pdf::{generate, BatchConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> resume_pdf::Result<()> {
//!     let config = BatchConfig::new()
//!         .with_base_url("http://localhost:4321/resume")
//!         .with_output_dir("dist/pdf");
//!
//!     let report = generate(config).await?;
//!     println!("{} documents written", report.rendered().count());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Selection**: narrow the catalog by locale and presentation style
//! - **Reproducible output**: fixed browser flags, viewport and pixel density
//! - **Isolation**: every document renders in a fresh browser context
//! - **Failure policy**: fail fast (default) or keep going and report at the end
//! - **Pluggable backend**: the pipeline only sees the [`session`] traits

pub mod batch;
pub mod catalog;
pub mod detect;
pub mod error;
pub mod options;
pub mod select;
pub mod session;
pub mod worker;

// Re-export commonly used types
pub use batch::{
    BatchConfig, BatchDriver, BatchObserver, BatchReport, DocumentOutcome, DocumentStatus,
    FailurePolicy, LogObserver, NoopObserver, DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR,
};
pub use catalog::{Catalog, Descriptor, Length, LengthUnit, Locale, Margin, PageFormat, Style};
pub use error::{Error, ErrorKind, Result};
pub use options::{LaunchOptions, Readiness, RenderOptions, Viewport};
pub use select::{select, AxisSelection, AxisSelections};
pub use session::{ChromiumLauncher, Launcher, PageContext, PdfSettings, Session};
pub use worker::{render, RenderJob, RenderedDocument};

/// Render the built-in catalog with Chromium, logging progress.
///
/// # Example
///
/// ```no_run
/// use resume_pdf::{generate, AxisSelections, BatchConfig, Locale};
///
/// # async fn run() -> resume_pdf::Result<()> {
/// let config = BatchConfig::new()
///     .with_selections(AxisSelections::new().with_locale(Locale::Ko));
/// let report = generate(config).await?;
/// assert!(report.is_success());
/// # Ok(())
/// # }
/// ```
pub async fn generate(config: BatchConfig) -> Result<BatchReport> {
    BatchDriver::new(config, Catalog::builtin())
        .run(&ChromiumLauncher::new(), &LogObserver)
        .await
}
