//! Selection of catalog documents by locale and style.
//!
//! Each axis follows the same rule: when nothing is requested on an axis,
//! every value on that axis is included; once any value is requested, only
//! the requested values are.

use crate::catalog::{Descriptor, Locale, Style};

/// Values explicitly requested on one selection axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection<T> {
    requested: Vec<T>,
}

impl<T: PartialEq> AxisSelection<T> {
    /// Select every value on this axis.
    pub fn all() -> Self {
        Self {
            requested: Vec::new(),
        }
    }

    /// Select only the given values.
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        let mut selection = Self::all();
        for value in values {
            selection.request(value);
        }
        selection
    }

    /// Add a requested value.
    pub fn request(&mut self, value: T) {
        if !self.requested.contains(&value) {
            self.requested.push(value);
        }
    }

    /// Whether any value was explicitly requested.
    pub fn is_narrowed(&self) -> bool {
        !self.requested.is_empty()
    }

    /// Whether `value` passes this axis.
    pub fn includes(&self, value: &T) -> bool {
        self.requested.is_empty() || self.requested.contains(value)
    }
}

impl<T: PartialEq> Default for AxisSelection<T> {
    fn default() -> Self {
        Self::all()
    }
}

/// Selections for every axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSelections {
    /// Locale axis (`--ko`, `--en`)
    pub locales: AxisSelection<Locale>,

    /// Style axis (`--hr`, `--ats`)
    pub styles: AxisSelection<Style>,
}

impl AxisSelections {
    /// Select everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locales.request(locale);
        self
    }

    /// Request a style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.styles.request(style);
        self
    }

    /// Whether a descriptor passes every axis.
    pub fn matches(&self, descriptor: &Descriptor) -> bool {
        self.locales.includes(&descriptor.locale) && self.styles.includes(&descriptor.style)
    }
}

/// Narrow `catalog` to the descriptors that pass every axis, in catalog order.
///
/// An empty result is a valid, empty batch.
pub fn select(catalog: &[Descriptor], axes: &AxisSelections) -> Vec<Descriptor> {
    catalog
        .iter()
        .filter(|d| axes.matches(d))
        .cloned()
        .collect()
}
