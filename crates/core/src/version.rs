//! Minecraft version ordering.
//!
//! Generation behavior keys off "at least / at most" comparisons against a
//! totally ordered version enumeration. One variant covers a release family
//! (e.g. [`Version::V1_12`] is 1.12–1.12.2) except where generation changed
//! mid-release: 1.16.1 splits from 1.16.5 (fortress/bastion weighting) and
//! 1.19.2 from 1.19.4 (structure salt reshuffle never landed, but the biome
//! list did).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Minecraft release relevant to world generation, ordered oldest-first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[allow(non_camel_case_types)]
pub enum Version {
    /// Beta 1.8 (first version with the modern-style layer stack seed mixing).
    B1_8,
    /// Release 1.0.
    V1_0,
    /// Release 1.1.
    V1_1,
    /// Release 1.2.
    V1_2,
    /// Release 1.3.
    V1_3,
    /// Release 1.4.
    V1_4,
    /// Release 1.5.
    V1_5,
    /// Release 1.6.
    V1_6,
    /// Release 1.7 (climate categories, biome edge layer).
    V1_7,
    /// Release 1.8.
    V1_8,
    /// Release 1.9.
    V1_9,
    /// Release 1.10.
    V1_10,
    /// Release 1.11.
    V1_11,
    /// Release 1.12.
    V1_12,
    /// Release 1.13 (ocean variants).
    V1_13,
    /// Release 1.14 (bamboo jungle layer).
    V1_14,
    /// Release 1.15 (SHA-seeded Voronoi).
    V1_15,
    /// Release 1.16.1 (fortress placement change lands here).
    V1_16_1,
    /// Releases 1.16.2–1.16.5.
    V1_16_5,
    /// Release 1.17.
    V1_17,
    /// Release 1.18 (climate noise + biome tree).
    V1_18,
    /// Releases 1.19–1.19.2.
    V1_19_2,
    /// Releases 1.19.3–1.19.4.
    V1_19_4,
    /// Release 1.20.
    V1_20,
    /// Releases 1.21–1.21.1 (trial chambers).
    V1_21_1,
    /// Releases 1.21.2–1.21.3.
    V1_21_3,
    /// Releases 1.21.4+ (pale garden).
    V1_21_4,
}

impl Version {
    /// Newest version this build understands.
    pub const NEWEST: Self = Self::V1_21_4;

    /// Whether this version uses the 1.18+ climate-noise biome algorithm.
    pub const fn is_climate(self) -> bool {
        (self as u8) >= (Self::V1_18 as u8)
    }

    /// Whether this version uses the legacy layer-stack biome algorithm.
    pub const fn is_layered(self) -> bool {
        !self.is_climate()
    }

    /// Canonical string key used in configs/logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::B1_8 => "b1.8",
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
            Self::V1_6 => "1.6",
            Self::V1_7 => "1.7",
            Self::V1_8 => "1.8",
            Self::V1_9 => "1.9",
            Self::V1_10 => "1.10",
            Self::V1_11 => "1.11",
            Self::V1_12 => "1.12",
            Self::V1_13 => "1.13",
            Self::V1_14 => "1.14",
            Self::V1_15 => "1.15",
            Self::V1_16_1 => "1.16.1",
            Self::V1_16_5 => "1.16.5",
            Self::V1_17 => "1.17",
            Self::V1_18 => "1.18",
            Self::V1_19_2 => "1.19.2",
            Self::V1_19_4 => "1.19.4",
            Self::V1_20 => "1.20",
            Self::V1_21_1 => "1.21.1",
            Self::V1_21_3 => "1.21.3",
            Self::V1_21_4 => "1.21.4",
        }
    }

    /// Parse a version string (e.g. `"1.16.5"`, `"1.12.2"`, `"1.21"`).
    ///
    /// Patch releases map onto the generation family they belong to.
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().trim_start_matches('v');
        let mut it = key.split('.');
        let major: u32 = match it.next() {
            Some("b1") | Some("beta1") => return Some(Self::B1_8),
            Some(m) => m.parse().ok()?,
            None => return None,
        };
        if major != 1 {
            return None;
        }
        let minor: u32 = it.next()?.parse().ok()?;
        let patch: u32 = match it.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        Some(match (minor, patch) {
            (0, _) => Self::V1_0,
            (1, _) => Self::V1_1,
            (2, _) => Self::V1_2,
            (3, _) => Self::V1_3,
            (4, _) => Self::V1_4,
            (5, _) => Self::V1_5,
            (6, _) => Self::V1_6,
            (7, _) => Self::V1_7,
            (8, _) => Self::V1_8,
            (9, _) => Self::V1_9,
            (10, _) => Self::V1_10,
            (11, _) => Self::V1_11,
            (12, _) => Self::V1_12,
            (13, _) => Self::V1_13,
            (14, _) => Self::V1_14,
            (15, _) => Self::V1_15,
            (16, 0..=1) => Self::V1_16_1,
            (16, _) => Self::V1_16_5,
            (17, _) => Self::V1_17,
            (18, _) => Self::V1_18,
            (19, 0..=2) => Self::V1_19_2,
            (19, _) => Self::V1_19_4,
            (20, _) => Self::V1_20,
            (21, 0..=1) => Self::V1_21_1,
            (21, 2..=3) => Self::V1_21_3,
            (21, _) => Self::V1_21_4,
            _ => return None,
        })
    }

    /// All versions in ascending order (for iteration in tests/tools).
    pub const fn all() -> &'static [Version] {
        &[
            Self::B1_8,
            Self::V1_0,
            Self::V1_1,
            Self::V1_2,
            Self::V1_3,
            Self::V1_4,
            Self::V1_5,
            Self::V1_6,
            Self::V1_7,
            Self::V1_8,
            Self::V1_9,
            Self::V1_10,
            Self::V1_11,
            Self::V1_12,
            Self::V1_13,
            Self::V1_14,
            Self::V1_15,
            Self::V1_16_1,
            Self::V1_16_5,
            Self::V1_17,
            Self::V1_18,
            Self::V1_19_2,
            Self::V1_19_4,
            Self::V1_20,
            Self::V1_21_1,
            Self::V1_21_3,
            Self::V1_21_4,
        ]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_release_order() {
        let all = Version::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
        assert!(Version::V1_16_1 < Version::V1_16_5);
        assert!(Version::V1_17 < Version::V1_18);
        assert_eq!(*all.last().unwrap(), Version::NEWEST);
    }

    #[test]
    fn parse_maps_patches_to_families() {
        assert_eq!(Version::parse("1.12.2"), Some(Version::V1_12));
        assert_eq!(Version::parse("1.16.1"), Some(Version::V1_16_1));
        assert_eq!(Version::parse("1.16.5"), Some(Version::V1_16_5));
        assert_eq!(Version::parse("1.19.2"), Some(Version::V1_19_2));
        assert_eq!(Version::parse("1.21"), Some(Version::V1_21_1));
        assert_eq!(Version::parse("1.21.1"), Some(Version::V1_21_1));
        assert_eq!(Version::parse("1.21.4"), Some(Version::V1_21_4));
        assert_eq!(Version::parse("2.0"), None);
        assert_eq!(Version::parse("nonsense"), None);
    }

    #[test]
    fn algorithm_split_is_at_1_18() {
        assert!(Version::V1_17.is_layered());
        assert!(Version::V1_18.is_climate());
        assert!(Version::V1_21_1.is_climate());
        assert!(Version::V1_7.is_layered());
    }
}
