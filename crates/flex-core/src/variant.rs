//! Scenario variant identifiers (`1a` … `5b`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::FlexError;

/// The five settlement scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scenario {
    /// BRP = BSP, settled on the bid, under-delivery
    One,
    /// BRP = BSP, settled on the bid, over-delivery (mirrored imbalance)
    Two,
    /// BRP = BSP, settled on measured activation
    Three,
    /// BRP ≠ BSP, measured activation, no compensation
    Four,
    /// BRP ≠ BSP, measured activation, with compensation
    Five,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::One,
        Scenario::Two,
        Scenario::Three,
        Scenario::Four,
        Scenario::Five,
    ];

    pub fn number(self) -> u8 {
        match self {
            Scenario::One => 1,
            Scenario::Two => 2,
            Scenario::Three => 3,
            Scenario::Four => 4,
            Scenario::Five => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Scenario::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }
}

/// Direction of the balancing adjustment. `a` variants regulate up, `b`
/// variants regulate down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Regulation {
    Up,
    Down,
}

impl Regulation {
    pub fn suffix(self) -> char {
        match self {
            Regulation::Up => 'a',
            Regulation::Down => 'b',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Regulation::Up => "up-regulation",
            Regulation::Down => "down-regulation",
        }
    }
}

/// One of the ten named variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantId {
    pub scenario: Scenario,
    pub direction: Regulation,
}

impl VariantId {
    pub const fn new(scenario: Scenario, direction: Regulation) -> Self {
        Self {
            scenario,
            direction,
        }
    }

    /// All variants in canonical order: `1a, 1b, 2a, … 5b`.
    pub fn all() -> impl Iterator<Item = VariantId> {
        Scenario::ALL.into_iter().flat_map(|scenario| {
            [Regulation::Up, Regulation::Down]
                .into_iter()
                .map(move |direction| VariantId::new(scenario, direction))
        })
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.scenario.number(), self.direction.suffix())
    }
}

impl FromStr for VariantId {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FlexError::Parse(format!("invalid variant '{s}'; expected 1a..5b"));
        let mut chars = s.trim().chars();
        let (Some(digit), Some(suffix), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let scenario = digit
            .to_digit(10)
            .and_then(|d| Scenario::from_number(d as u8))
            .ok_or_else(invalid)?;
        let direction = match suffix.to_ascii_lowercase() {
            'a' => Regulation::Up,
            'b' => Regulation::Down,
            _ => return Err(invalid()),
        };
        Ok(VariantId::new(scenario, direction))
    }
}

impl Serialize for VariantId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VariantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
