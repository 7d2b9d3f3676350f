//! Document catalog: the static table of documents this tool can render.
//!
//! A catalog is a validated, ordered list of [`Descriptor`]s. The built-in
//! catalog covers the resume in two locales and two presentation styles;
//! custom catalogs can be loaded from JSON.
//!
//! # Example
//!
//! ```
//! use resume_pdf::catalog::{Catalog, Locale};
//!
//! let catalog = Catalog::builtin();
//! let korean = catalog.iter().filter(|d| d.locale == Locale::Ko).count();
//! assert_eq!(korean, 2);
//! ```

mod descriptor;
mod length;

pub use descriptor::{Descriptor, Locale, PageFormat, Style};
pub use length::{Length, LengthUnit, Margin};

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

/// An ordered set of descriptors with unique output files.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    descriptors: Vec<Descriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting descriptors that would write the same file.
    ///
    /// # Errors
    /// * `Error::DuplicateOutput` if two descriptors share a filename or
    ///   a path + filename identity
    pub fn new(descriptors: Vec<Descriptor>) -> Result<Self> {
        let mut filenames = HashSet::new();
        let mut identities = HashSet::new();

        for d in &descriptors {
            if !identities.insert((d.path.as_str(), d.filename.as_str())) {
                return Err(Error::DuplicateOutput(format!("{}{}", d.path, d.filename)));
            }
            if !filenames.insert(d.filename.as_str()) {
                return Err(Error::DuplicateOutput(d.filename.clone()));
            }
        }

        Ok(Self { descriptors })
    }

    /// The resume documents: Korean and English, HR and ATS styles.
    pub fn builtin() -> Self {
        let hr_margin = Margin::zero();
        let ats_margin = Margin::uniform(Length::mm(10.0));

        let descriptors = vec![
            Descriptor::new(
                "HR Version (Korean)",
                "/resume-print",
                "resume-hr-ko.pdf",
                Locale::Ko,
                Style::Hr,
            )
            .with_background(true)
            .with_margin(hr_margin),
            Descriptor::new(
                "ATS Version (Korean)",
                "/resume-ats",
                "resume-ats-ko.pdf",
                Locale::Ko,
                Style::Ats,
            )
            .with_margin(ats_margin),
            Descriptor::new(
                "HR Version (English)",
                "/en/resume-print",
                "resume-hr-en.pdf",
                Locale::En,
                Style::Hr,
            )
            .with_background(true)
            .with_margin(hr_margin),
            Descriptor::new(
                "ATS Version (English)",
                "/en/resume-ats",
                "resume-ats-en.pdf",
                Locale::En,
                Style::Ats,
            )
            .with_margin(ats_margin),
        ];

        Self { descriptors }
    }

    /// Parse a catalog from a JSON array of descriptors.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let descriptors: Vec<Descriptor> = serde_json::from_str(json)?;
        Self::new(descriptors)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Descriptors in catalog order.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Iterate over descriptors in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor> {
        self.descriptors.iter()
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Descriptor;
    type IntoIter = std::slice::Iter<'a, Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}
