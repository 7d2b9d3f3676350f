//! Terminal progress output.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use resume_pdf::{BatchObserver, BatchReport, Error, RenderJob, RenderedDocument};

/// Prints each document's progress and outcome above a progress bar.
pub struct TerminalReporter {
    bar: ProgressBar,
}

impl TerminalReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    /// Remove the progress bar from the terminal.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl BatchObserver for TerminalReporter {
    fn on_batch_start(&self, jobs: &[RenderJob]) {
        self.bar.set_length(jobs.len() as u64);
        self.bar.set_message("Launching browser...");
    }

    fn on_session_ready(&self) {
        self.bar.set_message("Browser ready");
    }

    fn on_job_start(&self, job: &RenderJob) {
        self.bar.set_message(job.name().to_string());
        self.bar
            .println(format!("  {} {}...", "Generating".cyan(), job.name()));
        self.bar.println(format!("     URL: {}", job.url.dimmed()));
    }

    fn on_job_success(&self, _job: &RenderJob, document: &RenderedDocument) {
        self.bar.println(format!(
            "     {} {} ({} bytes, {:.1}s)",
            "Saved to".green(),
            document.output_path.display(),
            document.bytes,
            document.elapsed.as_secs_f64()
        ));
        self.bar.inc(1);
    }

    fn on_job_failure(&self, job: &RenderJob, error: &Error) {
        self.bar.println(format!(
            "     {} {}: {}",
            "Error generating".red().bold(),
            job.name(),
            error
        ));
        self.bar.inc(1);
    }

    fn on_job_skipped(&self, job: &RenderJob) {
        self.bar
            .println(format!("  {} {}", "Skipped".yellow(), job.name().dimmed()));
        self.bar.inc(1);
    }

    fn on_batch_end(&self, _report: &BatchReport) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume_pdf::{BatchConfig, BatchDriver, Catalog};

    #[test]
    fn test_clear_finishes_bar_started_by_batch() {
        let driver = BatchDriver::new(BatchConfig::new(), Catalog::builtin());
        let reporter = TerminalReporter::new();

        reporter.on_batch_start(&driver.jobs());
        assert!(!reporter.bar.is_finished());

        reporter.clear();
        assert!(reporter.bar.is_finished());
    }
}
