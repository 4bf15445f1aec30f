//! Structure type enumeration.
//!
//! Numeric values are load-bearing: search tooling exchanges them with other
//! implementations. `Feature` is the shared pre-1.13 temple attempt type (the
//! biome at the attempt position decides which temple actually spawns).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A locatable structure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum StructureType {
    Feature = 0,
    DesertPyramid = 1,
    JunglePyramid = 2,
    SwampHut = 3,
    Igloo = 4,
    Village = 5,
    OceanRuin = 6,
    Shipwreck = 7,
    Monument = 8,
    Mansion = 9,
    Outpost = 10,
    RuinedPortal = 11,
    RuinedPortalNether = 12,
    AncientCity = 13,
    Treasure = 14,
    Mineshaft = 15,
    DesertWell = 16,
    Geode = 17,
    Fortress = 18,
    Bastion = 19,
    EndCity = 20,
    EndGateway = 21,
    EndIsland = 22,
    TrailRuins = 23,
    TrialChambers = 24,
    // Placement is not implemented (ring algorithm, not region-based); the id
    // is reserved so callers can name it.
    Stronghold = 25,
}

impl StructureType {
    /// Canonical string key used by the CLI and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::DesertPyramid => "desert_pyramid",
            Self::JunglePyramid => "jungle_pyramid",
            Self::SwampHut => "swamp_hut",
            Self::Igloo => "igloo",
            Self::Village => "village",
            Self::OceanRuin => "ocean_ruin",
            Self::Shipwreck => "shipwreck",
            Self::Monument => "monument",
            Self::Mansion => "mansion",
            Self::Outpost => "outpost",
            Self::RuinedPortal => "ruined_portal",
            Self::RuinedPortalNether => "ruined_portal_nether",
            Self::AncientCity => "ancient_city",
            Self::Treasure => "treasure",
            Self::Mineshaft => "mineshaft",
            Self::DesertWell => "desert_well",
            Self::Geode => "geode",
            Self::Fortress => "fortress",
            Self::Bastion => "bastion",
            Self::EndCity => "end_city",
            Self::EndGateway => "end_gateway",
            Self::EndIsland => "end_island",
            Self::TrailRuins => "trail_ruins",
            Self::TrialChambers => "trial_chambers",
            Self::Stronghold => "stronghold",
        }
    }

    /// Parse a structure name (case-insensitive, `-`/space tolerated).
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all().iter().copied().find(|s| s.as_str() == key)
    }

    /// All structure types.
    pub const fn all() -> &'static [StructureType] {
        &[
            Self::Feature,
            Self::DesertPyramid,
            Self::JunglePyramid,
            Self::SwampHut,
            Self::Igloo,
            Self::Village,
            Self::OceanRuin,
            Self::Shipwreck,
            Self::Monument,
            Self::Mansion,
            Self::Outpost,
            Self::RuinedPortal,
            Self::RuinedPortalNether,
            Self::AncientCity,
            Self::Treasure,
            Self::Mineshaft,
            Self::DesertWell,
            Self::Geode,
            Self::Fortress,
            Self::Bastion,
            Self::EndCity,
            Self::EndGateway,
            Self::EndIsland,
            Self::TrailRuins,
            Self::TrialChambers,
            Self::Stronghold,
        ]
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        assert_eq!(StructureType::Feature as u8, 0);
        assert_eq!(StructureType::Village as u8, 5);
        assert_eq!(StructureType::Mineshaft as u8, 15);
        assert_eq!(StructureType::TrailRuins as u8, 23);
        assert_eq!(StructureType::TrialChambers as u8, 24);
        assert_eq!(StructureType::Stronghold as u8, 25);
    }

    #[test]
    fn parse_round_trips() {
        for &s in StructureType::all() {
            assert_eq!(StructureType::parse(s.as_str()), Some(s));
        }
        assert_eq!(
            StructureType::parse("Trial Chambers"),
            Some(StructureType::TrialChambers)
        );
        assert_eq!(StructureType::parse("castle"), None);
    }
}
