//! Dimension identifiers.
//!
//! Generation behavior is dimension-scoped. Only the Overworld has a full
//! biome generator in this build, but structure configs and viability rules
//! reference the Nether and End, so the identifier is threaded everywhere.

use serde::{Deserialize, Serialize};

/// Stable identifier for a world dimension.
///
/// Numeric values follow the game's convention (Nether = -1, End = +1) so
/// they can be passed straight through search tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Dimension {
    /// The Nether dimension.
    Nether = -1,
    /// The Overworld dimension.
    Overworld = 0,
    /// The End dimension.
    End = 1,
}

impl Dimension {
    /// Convert to the stable numeric representation.
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// Try to convert from the stable numeric representation.
    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Nether),
            0 => Some(Self::Overworld),
            1 => Some(Self::End),
            _ => None,
        }
    }

    /// Canonical string key used in configs/logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nether => "nether",
            Self::Overworld => "overworld",
            Self::End => "end",
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::Overworld
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_values_are_stable() {
        assert_eq!(Dimension::Nether.as_i8(), -1);
        assert_eq!(Dimension::Overworld.as_i8(), 0);
        assert_eq!(Dimension::End.as_i8(), 1);
        assert_eq!(Dimension::from_i8(-1), Some(Dimension::Nether));
        assert_eq!(Dimension::from_i8(0), Some(Dimension::Overworld));
        assert_eq!(Dimension::from_i8(1), Some(Dimension::End));
        assert_eq!(Dimension::from_i8(2), None);
    }
}
