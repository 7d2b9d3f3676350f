//! Print lengths and page margins.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PX_PER_INCH: f64 = 96.0;
const CM_PER_INCH: f64 = 2.54;
const MM_PER_INCH: f64 = 25.4;

/// Unit of a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    /// CSS pixels (96 per inch)
    #[default]
    Px,
    /// Inches
    In,
    /// Centimeters
    Cm,
    /// Millimeters
    Mm,
}

impl LengthUnit {
    fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
        }
    }
}

/// A length with a unit, written like CSS (`"10mm"`, `"0.5in"`, `"12px"`).
///
/// A bare number is read as pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// Create a length from a value and unit.
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Millimeters.
    pub fn mm(value: f64) -> Self {
        Self::new(value, LengthUnit::Mm)
    }

    /// Zero length.
    pub fn zero() -> Self {
        Self::mm(0.0)
    }

    /// Numeric value in the original unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Original unit.
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Convert to inches, the unit the print protocol expects.
    pub fn to_inches(&self) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value / PX_PER_INCH,
            LengthUnit::In => self.value,
            LengthUnit::Cm => self.value / CM_PER_INCH,
            LengthUnit::Mm => self.value / MM_PER_INCH,
        }
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim().to_ascii_lowercase();
        let split = text
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (number, suffix) = text.split_at(split);

        let unit = match suffix {
            "" | "px" => LengthUnit::Px,
            "in" => LengthUnit::In,
            "cm" => LengthUnit::Cm,
            "mm" => LengthUnit::Mm,
            _ => return Err(Error::InvalidLength(s.to_string())),
        };

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLength(s.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidLength(s.to_string()));
        }

        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for Length {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Length> for String {
    fn from(length: Length) -> Self {
        length.to_string()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Four-sided page margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Margin {
    /// Same length on every side.
    pub fn uniform(length: Length) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// No margin at all.
    pub fn zero() -> Self {
        Self::uniform(Length::zero())
    }
}
