//! Table cells that may be unavailable.
//!
//! Some settlement figures only exist for certain variants: the combined
//! BRP+BSP result is meaningless when the two roles are held by different
//! parties. Such cells are [`Figure::NotApplicable`] and render as `NA`.
//!
//! Arithmetic short-circuits: any operation with an unavailable operand
//! yields an unavailable result, never a panic or a bogus number.
//!
//! ```
//! use flex_core::Figure;
//!
//! let total = Figure::Value(56.0) + Figure::Value(86.0);
//! assert_eq!(total, Figure::Value(142.0));
//! assert_eq!(Figure::Value(16.0) - Figure::NotApplicable, Figure::NotApplicable);
//! assert_eq!(Figure::NotApplicable.to_string(), "NA");
//! ```

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::units::{Eur, EurPerMwh, Mwh};

/// Sentinel text for unavailable figures.
pub const NOT_APPLICABLE: &str = "NA";

/// A numeric table cell, or the `NA` sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Figure {
    Value(f64),
    NotApplicable,
}

impl Figure {
    /// `value` when `enabled`, `NA` otherwise.
    pub fn when(enabled: bool, value: impl Into<Figure>) -> Self {
        if enabled {
            value.into()
        } else {
            Figure::NotApplicable
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Figure::Value(v) => Some(v),
            Figure::NotApplicable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Figure::Value(_))
    }

    /// The value, or `fallback` when unavailable.
    pub fn or(self, fallback: impl Into<Figure>) -> Figure {
        match self {
            Figure::Value(_) => self,
            Figure::NotApplicable => fallback.into(),
        }
    }

    /// Render with a fixed number of decimals and thousands separators.
    pub fn format(self, decimals: usize) -> String {
        match self {
            Figure::Value(v) => group_thousands(&format!("{:.*}", decimals, v)),
            Figure::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }

    /// Parse a cell written by [`fmt::Display`]: a plain number or `NA`.
    pub fn parse_cell(text: &str) -> Option<Figure> {
        let text = text.trim();
        if text == NOT_APPLICABLE {
            return Some(Figure::NotApplicable);
        }
        text.parse::<f64>().ok().map(Figure::Value)
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    // "-0" reads oddly in a table
    let sign = if grouped.chars().all(|c| c == '0' || c == ',')
        && frac_part.map_or(true, |f| f.chars().all(|c| c == '0'))
    {
        ""
    } else {
        sign
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

impl From<f64> for Figure {
    fn from(value: f64) -> Self {
        Figure::Value(value)
    }
}

impl From<Mwh> for Figure {
    fn from(value: Mwh) -> Self {
        Figure::Value(value.value())
    }
}

impl From<Eur> for Figure {
    fn from(value: Eur) -> Self {
        Figure::Value(value.value())
    }
}

impl From<EurPerMwh> for Figure {
    fn from(value: EurPerMwh) -> Self {
        Figure::Value(value.value())
    }
}

impl Add for Figure {
    type Output = Figure;
    fn add(self, rhs: Figure) -> Figure {
        match (self, rhs) {
            (Figure::Value(a), Figure::Value(b)) => Figure::Value(a + b),
            _ => Figure::NotApplicable,
        }
    }
}

impl Sub for Figure {
    type Output = Figure;
    fn sub(self, rhs: Figure) -> Figure {
        match (self, rhs) {
            (Figure::Value(a), Figure::Value(b)) => Figure::Value(a - b),
            _ => Figure::NotApplicable,
        }
    }
}

impl Neg for Figure {
    type Output = Figure;
    fn neg(self) -> Figure {
        match self {
            Figure::Value(v) => Figure::Value(-v),
            Figure::NotApplicable => Figure::NotApplicable,
        }
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Figure::Value(v) => write!(f, "{v}"),
            Figure::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Figure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Figure::Value(v) => serializer.serialize_f64(*v),
            Figure::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

struct FigureVisitor;

impl<'de> Visitor<'de> for FigureVisitor {
    type Value = Figure;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a number or the string \"{NOT_APPLICABLE}\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Figure, E> {
        Ok(Figure::Value(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Figure, E> {
        Ok(Figure::Value(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Figure, E> {
        Ok(Figure::Value(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Figure, E> {
        Figure::parse_cell(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Figure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FigureVisitor)
    }
}
