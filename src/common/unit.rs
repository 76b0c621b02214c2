//! Unit conversion utilities.
//!
//! WordprocessingML stores widths and margins in twips, font sizes in
//! half-points and border weights in eighths of a point. [`Length`] keeps the
//! value in the unit it was written in and converts on demand through EMUs.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_TWIP: i64 = 635;

#[inline]
pub fn emu_to_twip_i64(emu: i64) -> i64 {
    (emu as f64 / EMUS_PER_TWIP as f64).round() as i64
}

#[inline]
pub fn twip_to_emu_i64(twips: i64) -> i64 {
    twips.saturating_mul(EMUS_PER_TWIP)
}

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Millimeter
    Millimeter,
    /// Centimeter
    Centimeter,
    /// Inch
    Inch,
    /// Point (1/72 inch)
    Point,
    /// Twentieth of a point
    Twip,
    /// English Metric Unit
    Emu,
}

impl LengthUnit {
    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Inch => "in",
            Self::Point => "pt",
            Self::Twip => "twip",
            Self::Emu => "emu",
        }
    }

    #[inline]
    fn emus_per_unit(&self) -> f64 {
        match self {
            Self::Millimeter => EMUS_PER_MM as f64,
            Self::Centimeter => EMUS_PER_CM as f64,
            Self::Inch => EMUS_PER_INCH as f64,
            Self::Point => EMUS_PER_PT as f64,
            Self::Twip => EMUS_PER_TWIP as f64,
            Self::Emu => 1.0,
        }
    }

    fn from_str_internal(s: &str) -> Option<Self> {
        match s {
            "mm" => Some(Self::Millimeter),
            "cm" => Some(Self::Centimeter),
            "in" | "inch" => Some(Self::Inch),
            "pt" => Some(Self::Point),
            "tw" | "twip" | "dxa" => Some(Self::Twip),
            "emu" => Some(Self::Emu),
            _ => None,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_internal(s)
            .ok_or_else(|| Error::InvalidLength(format!("Unknown length unit '{}'", s)))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length value with unit
///
/// Parses from strings such as `"2.5cm"` or `"11pt"`. A bare number is read
/// as centimetres, which is how column widths are usually written.
///
/// ```
/// use docx_tidy::common::unit::Length;
///
/// let width = "3cm".parse::<Length>().unwrap();
/// assert_eq!(width.to_twips(), 1701);
/// assert_eq!(Length::pt(11.0).half_points(), 22);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// Create a new length measurement
    #[inline]
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub fn cm(value: f64) -> Self {
        Self::new(value, LengthUnit::Centimeter)
    }

    #[inline]
    pub fn mm(value: f64) -> Self {
        Self::new(value, LengthUnit::Millimeter)
    }

    #[inline]
    pub fn inches(value: f64) -> Self {
        Self::new(value, LengthUnit::Inch)
    }

    #[inline]
    pub fn pt(value: f64) -> Self {
        Self::new(value, LengthUnit::Point)
    }

    #[inline]
    pub fn twips(value: i64) -> Self {
        Self::new(value as f64, LengthUnit::Twip)
    }

    /// Get the numeric value
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the unit
    #[inline]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Length in English Metric Units, rounded.
    #[inline]
    pub fn emu(&self) -> i64 {
        (self.value * self.unit.emus_per_unit()).round() as i64
    }

    /// Length in twentieths of a point (`dxa`).
    #[inline]
    pub fn to_twips(&self) -> i64 {
        emu_to_twip_i64(self.emu())
    }

    /// Font size unit used by `w:sz` in run properties.
    #[inline]
    pub fn half_points(&self) -> u32 {
        (self.emu() as f64 * 2.0 / EMUS_PER_PT as f64).round().max(0.0) as u32
    }

    /// Border weight unit used by `w:sz` in border elements.
    #[inline]
    pub fn eighth_points(&self) -> u32 {
        (self.emu() as f64 * 8.0 / EMUS_PER_PT as f64).round().max(0.0) as u32
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        if digits.is_empty() {
            return Err(Error::InvalidLength(format!(
                "No numeric value found in '{}'",
                s
            )));
        }

        let value: f64 = digits
            .parse()
            .map_err(|_| Error::InvalidLength(format!("Failed to parse numeric value from '{}'", s)))?;

        let unit = match unit.trim() {
            "" => LengthUnit::Centimeter,
            other => other.parse()?,
        };

        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

impl PartialEq for Length {
    fn eq(&self, other: &Self) -> bool {
        self.emu() == other.emu()
    }
}

impl Eq for Length {}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Length::cm(value)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_units() {
        assert_eq!("2.5cm".parse::<Length>().unwrap(), Length::cm(2.5));
        assert_eq!("11pt".parse::<Length>().unwrap(), Length::pt(11.0));
        assert_eq!("1in".parse::<Length>().unwrap(), Length::inches(1.0));
        assert_eq!("720 twip".parse::<Length>().unwrap(), Length::twips(720));
    }

    #[test]
    fn test_bare_number_is_centimetres() {
        let length = "3".parse::<Length>().unwrap();
        assert_eq!(length.unit(), LengthUnit::Centimeter);
        assert_eq!(length.value(), 3.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!("cm".parse::<Length>().is_err());
        assert!("3furlongs".parse::<Length>().is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Length::inches(1.0).to_twips(), 1440);
        assert_eq!(Length::cm(2.54).to_twips(), 1440);
        assert_eq!(Length::cm(3.0).to_twips(), 1701);
        assert_eq!(Length::pt(10.0).half_points(), 20);
        assert_eq!(Length::pt(0.5).eighth_points(), 4);
        assert_eq!(twip_to_emu_i64(1440), EMUS_PER_INCH);
    }

    #[test]
    fn test_equality_across_units() {
        assert_eq!(Length::mm(10.0), Length::cm(1.0));
        assert_ne!(Length::cm(1.0), Length::cm(1.1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::cm(2.5).to_string(), "2.5cm");
        assert_eq!(Length::pt(11.0).to_string(), "11pt");
    }
}
