//! Browser launch and page rendering options.

use std::path::PathBuf;
use std::time::Duration;

/// Arguments passed to every browser launch so output does not depend on
/// the host's sandboxing, shared memory size or font hinting.
pub const DEFAULT_BROWSER_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--font-render-hinting=none",
];

/// Default navigation timeout (30 s).
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default settle delay after the document reports `complete`.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1_000);

/// Options for launching the browser process.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,

    /// Browser executable; detected automatically when unset
    pub executable: Option<PathBuf>,

    /// Fixed browser arguments
    pub args: Vec<String>,

    /// How long to wait for the browser to come up
    pub launch_timeout: Duration,
}

impl LaunchOptions {
    /// Create launch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the browser window.
    pub fn headed(mut self) -> Self {
        self.headless = false;
        self
    }

    /// Use a specific browser executable.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Append an extra browser argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the launch timeout.
    pub fn with_launch_timeout(mut self, timeout: Duration) -> Self {
        self.launch_timeout = timeout;
        self
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            args: DEFAULT_BROWSER_ARGS.iter().map(|a| a.to_string()).collect(),
            launch_timeout: Duration::from_secs(20),
        }
    }
}

/// Browser viewport used while a page is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
    /// Device pixel ratio
    pub device_scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1600,
            device_scale_factor: 2.0,
        }
    }
}

/// How to decide that a loaded page has finished rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    /// Wait a fixed delay after the document is complete.
    SettleDelay(Duration),

    /// Poll for an element the page inserts once it is ready to print,
    /// falling back to a fixed delay if it never appears.
    Marker {
        /// CSS selector of the marker element
        selector: String,
        /// How long to poll for the marker
        timeout: Duration,
        /// Delay applied when the marker does not show up in time
        fallback_delay: Duration,
    },
}

impl Default for Readiness {
    fn default() -> Self {
        Readiness::SettleDelay(DEFAULT_SETTLE_DELAY)
    }
}

/// Options for rendering a single page to PDF.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Viewport size and pixel density
    pub viewport: Viewport,

    /// Hard limit for navigation and network idle
    pub navigation_timeout: Duration,

    /// Interval between readiness polls
    pub poll_interval: Duration,

    /// Readiness strategy after the document is complete
    pub readiness: Readiness,

    /// Let `@page` CSS rules override the paper format
    pub prefer_css_page_size: bool,
}

impl RenderOptions {
    /// Create render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the navigation timeout.
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the readiness poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Wait a fixed delay after load.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.readiness = Readiness::SettleDelay(delay);
        self
    }

    /// Wait for a marker element, falling back to `fallback_delay`.
    pub fn with_ready_marker(
        mut self,
        selector: impl Into<String>,
        timeout: Duration,
        fallback_delay: Duration,
    ) -> Self {
        self.readiness = Readiness::Marker {
            selector: selector.into(),
            timeout,
            fallback_delay,
        };
        self
    }

    /// Enable or disable CSS page size preference.
    pub fn with_css_page_size(mut self, prefer: bool) -> Self {
        self.prefer_css_page_size = prefer;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            poll_interval: Duration::from_millis(100),
            readiness: Readiness::default(),
            prefer_css_page_size: true,
        }
    }
}
