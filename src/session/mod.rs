//! Browser sessions and page contexts.
//!
//! The render pipeline talks to the browser only through the traits in this
//! module. [`ChromiumLauncher`] is the production implementation; tests plug
//! in their own.
//!
//! A [`Session`] owns one browser process for the whole batch. It hands out
//! isolated [`PageContext`]s, one per document, and is released by
//! [`Session::close`], which consumes it.

mod chromium;

pub use chromium::ChromiumLauncher;

use crate::catalog::{Descriptor, Margin, PageFormat};
use crate::error::Result;
use crate::options::{LaunchOptions, RenderOptions, Viewport};
use async_trait::async_trait;
use std::time::Duration;

/// Print parameters for one PDF export.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfSettings {
    /// Paper format
    pub format: PageFormat,

    /// Print background graphics
    pub print_background: bool,

    /// Page margins
    pub margin: Margin,

    /// Let `@page` CSS override the paper format
    pub prefer_css_page_size: bool,
}

impl PdfSettings {
    /// Print settings for a descriptor.
    ///
    /// A descriptor without margins prints with a zero margin, leaving the
    /// page's own print CSS in charge of spacing.
    pub fn for_descriptor(descriptor: &Descriptor, options: &RenderOptions) -> Self {
        Self {
            format: descriptor.format,
            print_background: descriptor.print_background,
            margin: descriptor.margin.unwrap_or_else(Margin::zero),
            prefer_css_page_size: options.prefer_css_page_size,
        }
    }
}

/// Starts browser sessions.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Start a browser process.
    ///
    /// # Errors
    /// * `Error::Launch` if the process cannot be started
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Session>>;
}

/// A running browser process.
#[async_trait]
pub trait Session: Send + Sync {
    /// Open a fresh page context that shares no cookies or storage with
    /// any other context.
    async fn open_page<'a>(&'a self) -> Result<Box<dyn PageContext + 'a>>;

    /// Terminate the browser process.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A single-document browsing context.
#[async_trait]
pub trait PageContext: Send {
    /// Set the viewport size and device pixel ratio.
    async fn set_viewport(&mut self, viewport: &Viewport) -> Result<()>;

    /// Load `url` and wait until the network is idle.
    ///
    /// # Errors
    /// * `Error::Navigation` if the page cannot be loaded
    /// * `Error::Timeout` if it does not settle within `timeout`
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Evaluate a JavaScript expression that yields a boolean.
    async fn evaluate_bool(&mut self, expression: &str) -> Result<bool>;

    /// Print the current page to PDF bytes.
    async fn print_pdf(&mut self, settings: &PdfSettings) -> Result<Vec<u8>>;

    /// Release the context.
    async fn close(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Length, Locale, Style};

    #[test]
    fn test_settings_default_to_zero_margin() {
        let descriptor = Descriptor::new("A", "/x", "a.pdf", Locale::En, Style::Hr);
        let settings = PdfSettings::for_descriptor(&descriptor, &RenderOptions::default());
        assert_eq!(settings.margin, Margin::zero());
        assert!(settings.prefer_css_page_size);
        assert!(!settings.print_background);
    }

    #[test]
    fn test_settings_follow_descriptor() {
        let descriptor = Descriptor::new("A", "/x", "a.pdf", Locale::En, Style::Ats)
            .with_format(PageFormat::Letter)
            .with_background(true)
            .with_margin(Margin::uniform(Length::mm(10.0)));
        let options = RenderOptions::new().with_css_page_size(false);
        let settings = PdfSettings::for_descriptor(&descriptor, &options);

        assert_eq!(settings.format, PageFormat::Letter);
        assert!(settings.print_background);
        assert_eq!(settings.margin.top, Length::mm(10.0));
        assert!(!settings.prefer_css_page_size);
    }
}
