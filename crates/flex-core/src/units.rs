//! Compile-time unit safety for settlement quantities.
//!
//! Settlement arithmetic mixes three kinds of numbers: energy volumes (MWh),
//! money (EUR) and prices (EUR/MWh). Keeping them as raw `f64` makes it easy
//! to add a price to a cost. The newtypes below only allow same-unit sums and
//! the physically meaningful cross-unit products:
//!
//! - `Mwh × EurPerMwh = Eur`
//! - `EurPerMwh × Mwh = Eur`
//! - `Eur / Mwh = EurPerMwh`
//!
//! ```
//! use flex_core::units::{Eur, EurPerMwh, Mwh};
//!
//! let volume = Mwh(-100.0);
//! let price = EurPerMwh(5.0);
//! let cost: Eur = volume * price;
//! assert_eq!(cost, Eur(-500.0));
//!
//! // This would NOT compile - different units
//! // let wrong = volume + price;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::FlexError;

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$type> for f64 {
            type Output = $type;
            fn mul(self, rhs: $type) -> Self::Output {
                <$type>::new(self * rhs.0)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2} {}", self.0, $unit_name)
            }
        }

        impl $type {
            pub const ZERO: Self = Self(0.0);

            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            #[inline]
            pub fn is_zero(self) -> bool {
                self.0 == 0.0
            }

            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

// =============================================================================
// Volume, money and price
// =============================================================================

/// Energy volume in megawatt-hours (MWh)
///
/// Signed where the settlement convention says so: traded and balancing
/// volumes are negative for buying and positive for selling.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Mwh(pub f64);

impl_unit_ops!(Mwh, "MWh");

/// Money in euro (EUR)
///
/// Positive amounts are revenue for the actor whose ledger holds them,
/// negative amounts are cost.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Eur(pub f64);

impl_unit_ops!(Eur, "EUR");

/// Price in euro per megawatt-hour (EUR/MWh)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EurPerMwh(pub f64);

impl_unit_ops!(EurPerMwh, "EUR/MWh");

impl Mul<EurPerMwh> for Mwh {
    type Output = Eur;
    fn mul(self, rhs: EurPerMwh) -> Eur {
        Eur(self.0 * rhs.0)
    }
}

impl Mul<Mwh> for EurPerMwh {
    type Output = Eur;
    fn mul(self, rhs: Mwh) -> Eur {
        Eur(self.0 * rhs.0)
    }
}

impl Div<Mwh> for Eur {
    type Output = EurPerMwh;
    fn div(self, rhs: Mwh) -> EurPerMwh {
        EurPerMwh(self.0 / rhs.0)
    }
}

// =============================================================================
// Unit tags for table fields
// =============================================================================

/// Unit tag attached to every named field of an output table.
///
/// The display strings are part of the export contract and must round-trip
/// through CSV unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "MWh")]
    Mwh,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "EUR/MWh")]
    EurPerMwh,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Mwh => "MWh",
            Unit::Eur => "EUR",
            Unit::EurPerMwh => "EUR/MWh",
        }
    }

    /// Decimals used when rendering a value of this unit for people.
    pub fn display_decimals(&self) -> usize {
        match self {
            Unit::Mwh | Unit::Eur => 0,
            Unit::EurPerMwh => 2,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MWh" => Ok(Unit::Mwh),
            "EUR" => Ok(Unit::Eur),
            "EUR/MWh" => Ok(Unit::EurPerMwh),
            other => Err(FlexError::Parse(format!("unknown unit '{other}'"))),
        }
    }
}
