//! resume-pdf CLI - render resume pages to PDF

mod args;
mod progress;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use resume_pdf::{
    AxisSelections, BatchConfig, BatchDriver, Catalog, ChromiumLauncher, FailurePolicy,
    LaunchOptions, Locale, RenderOptions, Style, DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR,
};

#[derive(Parser, Debug)]
#[command(name = "resume-pdf")]
#[command(version)]
#[command(about = "Render resume pages to PDF with headless Chromium", long_about = None)]
struct Cli {
    /// Include the HR (designed) version
    #[arg(long)]
    hr: bool,

    /// Include the ATS (plain) version
    #[arg(long)]
    ats: bool,

    /// Include the Korean documents
    #[arg(long)]
    ko: bool,

    /// Include the English documents
    #[arg(long)]
    en: bool,

    /// Origin the pages are fetched from
    #[arg(long, value_name = "URL", env = "RESUME_PDF_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Output directory
    #[arg(long, value_name = "DIR", env = "RESUME_PDF_OUTPUT", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Load documents from a JSON catalog instead of the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Render every document even after a failure
    #[arg(long)]
    keep_going: bool,

    /// Number of documents rendered at once
    #[arg(long, value_name = "N", default_value_t = 1)]
    jobs: usize,

    /// Navigation timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    timeout: u64,

    /// Settle delay after load in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1_000)]
    settle: u64,

    /// Wait for this CSS selector before printing (falls back to the settle delay)
    #[arg(long, value_name = "CSS")]
    ready_selector: Option<String>,

    /// Browser executable
    #[arg(long, value_name = "PATH", env = "CHROME_PATH")]
    chrome: Option<PathBuf>,

    /// Write a JSON report of the batch
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// List the selected documents without rendering
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn selections(&self) -> AxisSelections {
        let mut selections = AxisSelections::new();
        if self.ko {
            selections = selections.with_locale(Locale::Ko);
        }
        if self.en {
            selections = selections.with_locale(Locale::En);
        }
        if self.hr {
            selections = selections.with_style(Style::Hr);
        }
        if self.ats {
            selections = selections.with_style(Style::Ats);
        }
        selections
    }

    fn render_options(&self) -> RenderOptions {
        let timeout = Duration::from_millis(self.timeout);
        let settle = Duration::from_millis(self.settle);
        let options = RenderOptions::new().with_navigation_timeout(timeout);

        match self.ready_selector {
            Some(ref selector) => options.with_ready_marker(selector.clone(), timeout, settle),
            None => options.with_settle_delay(settle),
        }
    }

    fn config(&self) -> std::io::Result<BatchConfig> {
        let output_dir = if self.output.is_absolute() {
            self.output.clone()
        } else {
            std::env::current_dir()?.join(&self.output)
        };

        let mut launch = LaunchOptions::new();
        if let Some(ref chrome) = self.chrome {
            launch = launch.with_executable(chrome);
        }

        let policy = if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::FailFast
        };

        Ok(BatchConfig::new()
            .with_base_url(self.base_url.clone())
            .with_output_dir(output_dir)
            .with_selections(self.selections())
            .with_failure_policy(policy)
            .with_concurrency(self.jobs)
            .with_launch_options(launch)
            .with_render_options(self.render_options()))
    }
}

fn main() {
    env_logger::init();

    let argv = args::retain_known(&Cli::command(), std::env::args_os());
    let cli = Cli::parse_from(argv);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("\n{}: {}", "PDF generation failed".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let catalog = match cli.catalog {
        Some(ref path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin(),
    };
    let driver = BatchDriver::new(cli.config()?, catalog);

    if cli.list {
        cmd_list(&driver);
        return Ok(true);
    }

    print_banner(cli, driver.config());

    let rt = tokio::runtime::Runtime::new()?;
    let reporter = progress::TerminalReporter::new();
    let report = match rt.block_on(driver.run(&ChromiumLauncher::new(), &reporter)) {
        Ok(report) => report,
        Err(e) => {
            // A launch failure ends the batch before on_batch_end.
            reporter.clear();
            return Err(e.into());
        }
    };

    if let Some(ref path) = cli.report {
        write_report(path, &report.to_json()?)?;
    }

    if report.is_success() {
        println!(
            "\n{} {} document(s) in {:.1}s\n",
            "PDF generation complete!".green().bold(),
            report.rendered().count(),
            report.elapsed_ms as f64 / 1000.0
        );
        Ok(true)
    } else {
        eprintln!(
            "\n{} {} failed, {} skipped, {} rendered\n",
            "PDF generation failed:".red().bold(),
            report.failed().count(),
            report.skipped().count(),
            report.rendered().count()
        );
        Ok(false)
    }
}

fn print_banner(cli: &Cli, config: &BatchConfig) {
    let selections = &config.selections;
    let languages: Vec<String> = [Locale::Ko, Locale::En]
        .iter()
        .filter(|l| selections.locales.includes(l))
        .map(ToString::to_string)
        .collect();
    let types: Vec<String> = [Style::Hr, Style::Ats]
        .iter()
        .filter(|s| selections.styles.includes(s))
        .map(ToString::to_string)
        .collect();

    println!("\n{}\n", "Resume PDF Generator".cyan().bold());
    println!("   {}: {}", "Base URL".bold(), config.base_url);
    println!("   {}: {}", "Output".bold(), config.output_dir.display());
    println!("   {}: {}", "Languages".bold(), languages.join(" "));
    println!("   {}: {}", "Types".bold(), types.join(" "));
    if cli.keep_going {
        println!("   {}: keep going", "On failure".bold());
    }
    println!();
}

fn cmd_list(driver: &BatchDriver) {
    let jobs = driver.jobs();
    if jobs.is_empty() {
        println!("{}", "No documents selected".yellow());
        return;
    }

    for (i, job) in jobs.iter().enumerate() {
        let branch = if i + 1 == jobs.len() { "└─" } else { "├─" };
        println!("{} {}", branch.dimmed(), job.name().bold());
        println!("   {} {}", "URL:".dimmed(), job.url);
        println!("   {} {}", "PDF:".dimmed(), job.output_path.display());
    }
}

fn write_report(path: &Path, json: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, json)?;
    println!("{} {}", "Report written to".green(), path.display());
    Ok(())
}
