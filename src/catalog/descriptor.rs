//! Document descriptors.

use super::length::Margin;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Paper format for the exported PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageFormat {
    /// ISO A3 (297 × 420 mm)
    A3,
    /// ISO A4 (210 × 297 mm)
    #[default]
    A4,
    /// ISO A5 (148 × 210 mm)
    A5,
    /// US Letter (8.5 × 11 in)
    Letter,
    /// US Legal (8.5 × 14 in)
    Legal,
}

impl PageFormat {
    /// Paper width and height in inches.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            PageFormat::A3 => (11.7, 16.54),
            PageFormat::A4 => (8.27, 11.7),
            PageFormat::A5 => (5.83, 8.27),
            PageFormat::Letter => (8.5, 11.0),
            PageFormat::Legal => (8.5, 14.0),
        }
    }
}

/// Language the document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Korean
    Ko,
    /// English
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::Ko => "KO",
            Locale::En => "EN",
        })
    }
}

/// Presentation style of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Designed layout for human readers
    Hr,
    /// Plain layout for applicant tracking systems
    Ats,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Style::Hr => "HR",
            Style::Ats => "ATS",
        })
    }
}

/// Static description of one renderable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Human-readable label
    pub name: String,

    /// URL path appended to the base URL
    pub path: String,

    /// File name inside the output directory
    pub filename: String,

    /// Paper format
    #[serde(default)]
    pub format: PageFormat,

    /// Print background graphics
    pub print_background: bool,

    /// Page margins; `None` lets the page's print CSS decide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,

    /// Locale axis value
    pub locale: Locale,

    /// Style axis value
    pub style: Style,
}

impl Descriptor {
    /// Create a descriptor with A4 paper, no background and no margin.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        filename: impl Into<String>,
        locale: Locale,
        style: Style,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            filename: filename.into(),
            format: PageFormat::default(),
            print_background: false,
            margin: None,
            locale,
            style,
        }
    }

    /// Set the paper format.
    pub fn with_format(mut self, format: PageFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable background printing.
    pub fn with_background(mut self, print_background: bool) -> Self {
        self.print_background = print_background;
        self
    }

    /// Set the page margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = Some(margin);
        self
    }
}
