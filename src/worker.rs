//! Rendering of a single document.

use crate::catalog::Descriptor;
use crate::detect;
use crate::error::{Error, Result};
use crate::options::{Readiness, RenderOptions};
use crate::session::{PageContext, PdfSettings, Session};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{sleep, Instant};

const DOCUMENT_COMPLETE: &str = "document.readyState === 'complete'";

/// A descriptor resolved against a base URL and output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// The document to render
    pub descriptor: Descriptor,

    /// Absolute URL of the page
    pub url: String,

    /// Destination file
    pub output_path: PathBuf,
}

impl RenderJob {
    /// Resolve a descriptor.
    ///
    /// The URL is `base_url` followed by the descriptor path; a doubled
    /// slash at the seam is collapsed.
    pub fn resolve(descriptor: Descriptor, base_url: &str, output_dir: &Path) -> Self {
        let url = join_url(base_url, &descriptor.path);
        let output_path = output_dir.join(&descriptor.filename);
        Self {
            descriptor,
            url,
            output_path,
        }
    }

    /// Document label.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

fn join_url(base: &str, path: &str) -> String {
    match base.strip_suffix('/') {
        Some(trimmed) if path.starts_with('/') => format!("{}{}", trimmed, path),
        _ => format!("{}{}", base, path),
    }
}

/// A document written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    /// Document label
    pub name: String,

    /// Source URL
    pub url: String,

    /// Written file
    pub output_path: PathBuf,

    /// File size in bytes
    pub bytes: usize,

    /// PDF header version of the file
    pub pdf_version: String,

    /// Time spent rendering
    pub elapsed: Duration,
}

/// Render one job into its output file.
///
/// Opens an isolated page context, loads the page, waits for it to settle,
/// prints it and writes the PDF. The page context is closed whether or not
/// rendering succeeded. Rendering the same job again overwrites the file.
///
/// # Errors
/// Any step failure is returned as `Error::Render` carrying the document name.
pub async fn render(
    session: &dyn Session,
    job: &RenderJob,
    options: &RenderOptions,
) -> Result<RenderedDocument> {
    let started = Instant::now();
    info!("Rendering {} from {}", job.name(), job.url);

    let mut page = session
        .open_page()
        .await
        .map_err(|e| Error::render(job.name(), e))?;

    let result = render_in_page(page.as_mut(), job, options).await;

    match (result, page.close().await) {
        (Ok((bytes, pdf_version)), closed) => {
            if let Err(e) = closed {
                warn!("Failed to close page for {}: {}", job.name(), e);
            }
            info!("Saved {} ({} bytes)", job.output_path.display(), bytes);
            Ok(RenderedDocument {
                name: job.name().to_string(),
                url: job.url.clone(),
                output_path: job.output_path.clone(),
                bytes,
                pdf_version,
                elapsed: started.elapsed(),
            })
        }
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!("Failed to close page for {}: {}", job.name(), close_err);
            }
            Err(Error::render(job.name(), e))
        }
    }
}

async fn render_in_page(
    page: &mut (dyn PageContext + '_),
    job: &RenderJob,
    options: &RenderOptions,
) -> Result<(usize, String)> {
    page.set_viewport(&options.viewport).await?;

    debug!("Navigating to {}", job.url);
    page.navigate(&job.url, options.navigation_timeout).await?;
    wait_until_ready(page, job, options).await?;

    if let Some(dir) = job.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| export_error(&job.output_path, e))?;
    }

    let settings = PdfSettings::for_descriptor(&job.descriptor, options);
    let data = page
        .print_pdf(&settings)
        .await
        .map_err(|e| export_error(&job.output_path, e))?;
    let version = detect::verify_pdf_bytes(&data, &job.output_path)?;

    tokio::fs::write(&job.output_path, &data)
        .await
        .map_err(|e| export_error(&job.output_path, e))?;

    Ok((data.len(), version))
}

fn export_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Export {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

async fn wait_until_ready(
    page: &mut (dyn PageContext + '_),
    job: &RenderJob,
    options: &RenderOptions,
) -> Result<()> {
    let complete = poll_until(
        page,
        DOCUMENT_COMPLETE,
        options.navigation_timeout,
        options.poll_interval,
    )
    .await?;
    if !complete {
        return Err(Error::Timeout {
            url: job.url.clone(),
            timeout_ms: options.navigation_timeout.as_millis() as u64,
        });
    }

    match &options.readiness {
        Readiness::SettleDelay(delay) => {
            debug!("Settling for {:?}", delay);
            sleep(*delay).await;
        }
        Readiness::Marker {
            selector,
            timeout,
            fallback_delay,
        } => {
            let expression = marker_expression(selector)?;
            if !poll_until(page, &expression, *timeout, options.poll_interval).await? {
                warn!(
                    "Ready marker {} not found on {} within {:?}, waiting {:?}",
                    selector, job.url, timeout, fallback_delay
                );
                sleep(*fallback_delay).await;
            }
        }
    }

    Ok(())
}

fn marker_expression(selector: &str) -> Result<String> {
    let literal = serde_json::to_string(selector)?;
    Ok(format!(
        "document.fonts.ready.then(() => document.querySelector({}) !== null)",
        literal
    ))
}

/// Evaluate `expression` until it is true or `timeout` passes.
async fn poll_until(
    page: &mut (dyn PageContext + '_),
    expression: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.evaluate_bool(expression).await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Locale, Style};

    fn descriptor(path: &str, filename: &str) -> Descriptor {
        Descriptor::new("A", path, filename, Locale::En, Style::Hr)
    }

    #[test]
    fn test_resolve_concatenates() {
        let job = RenderJob::resolve(
            descriptor("/p", "a.pdf"),
            "https://example.test",
            Path::new("out"),
        );
        assert_eq!(job.url, "https://example.test/p");
        assert_eq!(job.output_path, Path::new("out").join("a.pdf"));
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let job = RenderJob::resolve(
            descriptor("/en/resume-ats", "a.pdf"),
            "http://localhost:4321/resume",
            Path::new("dist/pdf"),
        );
        assert_eq!(job.url, "http://localhost:4321/resume/en/resume-ats");
    }

    #[test]
    fn test_resolve_collapses_double_slash() {
        let job = RenderJob::resolve(descriptor("/p", "a.pdf"), "https://example.test/", Path::new("."));
        assert_eq!(job.url, "https://example.test/p");

        let job = RenderJob::resolve(descriptor("p", "a.pdf"), "https://example.test/", Path::new("."));
        assert_eq!(job.url, "https://example.test/p");
    }

    #[test]
    fn test_marker_expression_quotes_selector() {
        let expression = marker_expression(r#"[data-ready="1"]"#).unwrap();
        assert!(expression.contains(r#"document.querySelector("[data-ready=\"1\"]")"#));
    }
}
