//! Biome catalog.
//!
//! Numeric ids are the game's save-format ids and are stable across versions;
//! several biomes were renamed over the years (e.g. `roofed_forest` became
//! `dark_forest`), so [`Biome::parse`] accepts the historical aliases and maps
//! them onto the same variant.
//!
//! Values 0–4 are *also* used by intermediate generation layers as climate
//! category codes (Oceanic/Warm/Lush/Cold/Freezing). That overload is
//! deliberate and confined to the layer stack; this catalog only deals in real
//! biomes.

use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A biome id. `None` is the -1 sentinel returned by queries that have no
/// answer (e.g. an unimplemented dimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum Biome {
    None = -1,
    Ocean = 0,
    Plains = 1,
    Desert = 2,
    Mountains = 3,
    Forest = 4,
    Taiga = 5,
    Swamp = 6,
    River = 7,
    NetherWastes = 8,
    TheEnd = 9,
    FrozenOcean = 10,
    FrozenRiver = 11,
    SnowyTundra = 12,
    SnowyMountains = 13,
    MushroomFields = 14,
    MushroomFieldShore = 15,
    Beach = 16,
    DesertHills = 17,
    WoodedHills = 18,
    TaigaHills = 19,
    MountainEdge = 20,
    Jungle = 21,
    JungleHills = 22,
    JungleEdge = 23,
    DeepOcean = 24,
    StoneShore = 25,
    SnowyBeach = 26,
    BirchForest = 27,
    BirchForestHills = 28,
    DarkForest = 29,
    SnowyTaiga = 30,
    SnowyTaigaHills = 31,
    GiantTreeTaiga = 32,
    GiantTreeTaigaHills = 33,
    WoodedMountains = 34,
    Savanna = 35,
    SavannaPlateau = 36,
    Badlands = 37,
    WoodedBadlandsPlateau = 38,
    BadlandsPlateau = 39,
    SmallEndIslands = 40,
    EndMidlands = 41,
    EndHighlands = 42,
    EndBarrens = 43,
    WarmOcean = 44,
    LukewarmOcean = 45,
    ColdOcean = 46,
    DeepWarmOcean = 47,
    DeepLukewarmOcean = 48,
    DeepColdOcean = 49,
    DeepFrozenOcean = 50,
    SeasonalForest = 51,
    Rainforest = 52,
    Shrubland = 53,
    TheVoid = 127,
    SunflowerPlains = 129,
    DesertLakes = 130,
    GravellyMountains = 131,
    FlowerForest = 132,
    TaigaMountains = 133,
    SwampHills = 134,
    IceSpikes = 140,
    ModifiedJungle = 149,
    ModifiedJungleEdge = 151,
    TallBirchForest = 155,
    TallBirchHills = 156,
    DarkForestHills = 157,
    SnowyTaigaMountains = 158,
    GiantSpruceTaiga = 160,
    GiantSpruceTaigaHills = 161,
    ModifiedGravellyMountains = 162,
    ShatteredSavanna = 163,
    ShatteredSavannaPlateau = 164,
    ErodedBadlands = 165,
    ModifiedWoodedBadlandsPlateau = 166,
    ModifiedBadlandsPlateau = 167,
    BambooJungle = 168,
    BambooJungleHills = 169,
    SoulSandValley = 170,
    CrimsonForest = 171,
    WarpedForest = 172,
    BasaltDeltas = 173,
    DripstoneCaves = 174,
    LushCaves = 175,
    Meadow = 177,
    Grove = 178,
    SnowySlopes = 179,
    JaggedPeaks = 180,
    FrozenPeaks = 181,
    StonyPeaks = 182,
    OldGrowthBirchForest = 183,
    OldGrowthPineTaiga = 184,
    OldGrowthSpruceTaiga = 185,
    SnowyPlains = 186,
    SparseJungle = 187,
    StonyShore = 188,
    WindsweptHills = 189,
    WindsweptForest = 190,
    WindsweptGravellyHills = 191,
    WindsweptSavanna = 192,
    WoodedBadlands = 193,
    DeepDark = 194,
    MangroveSwamp = 195,
    CherryGrove = 196,
    PaleGarden = 197,
}

impl Biome {
    /// Numeric id as stored in queries and buffers.
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Look a biome up by numeric id.
    pub const fn from_id(id: i32) -> Option<Self> {
        Some(match id {
            -1 => Self::None,
            0 => Self::Ocean,
            1 => Self::Plains,
            2 => Self::Desert,
            3 => Self::Mountains,
            4 => Self::Forest,
            5 => Self::Taiga,
            6 => Self::Swamp,
            7 => Self::River,
            8 => Self::NetherWastes,
            9 => Self::TheEnd,
            10 => Self::FrozenOcean,
            11 => Self::FrozenRiver,
            12 => Self::SnowyTundra,
            13 => Self::SnowyMountains,
            14 => Self::MushroomFields,
            15 => Self::MushroomFieldShore,
            16 => Self::Beach,
            17 => Self::DesertHills,
            18 => Self::WoodedHills,
            19 => Self::TaigaHills,
            20 => Self::MountainEdge,
            21 => Self::Jungle,
            22 => Self::JungleHills,
            23 => Self::JungleEdge,
            24 => Self::DeepOcean,
            25 => Self::StoneShore,
            26 => Self::SnowyBeach,
            27 => Self::BirchForest,
            28 => Self::BirchForestHills,
            29 => Self::DarkForest,
            30 => Self::SnowyTaiga,
            31 => Self::SnowyTaigaHills,
            32 => Self::GiantTreeTaiga,
            33 => Self::GiantTreeTaigaHills,
            34 => Self::WoodedMountains,
            35 => Self::Savanna,
            36 => Self::SavannaPlateau,
            37 => Self::Badlands,
            38 => Self::WoodedBadlandsPlateau,
            39 => Self::BadlandsPlateau,
            40 => Self::SmallEndIslands,
            41 => Self::EndMidlands,
            42 => Self::EndHighlands,
            43 => Self::EndBarrens,
            44 => Self::WarmOcean,
            45 => Self::LukewarmOcean,
            46 => Self::ColdOcean,
            47 => Self::DeepWarmOcean,
            48 => Self::DeepLukewarmOcean,
            49 => Self::DeepColdOcean,
            50 => Self::DeepFrozenOcean,
            51 => Self::SeasonalForest,
            52 => Self::Rainforest,
            53 => Self::Shrubland,
            127 => Self::TheVoid,
            129 => Self::SunflowerPlains,
            130 => Self::DesertLakes,
            131 => Self::GravellyMountains,
            132 => Self::FlowerForest,
            133 => Self::TaigaMountains,
            134 => Self::SwampHills,
            140 => Self::IceSpikes,
            149 => Self::ModifiedJungle,
            151 => Self::ModifiedJungleEdge,
            155 => Self::TallBirchForest,
            156 => Self::TallBirchHills,
            157 => Self::DarkForestHills,
            158 => Self::SnowyTaigaMountains,
            160 => Self::GiantSpruceTaiga,
            161 => Self::GiantSpruceTaigaHills,
            162 => Self::ModifiedGravellyMountains,
            163 => Self::ShatteredSavanna,
            164 => Self::ShatteredSavannaPlateau,
            165 => Self::ErodedBadlands,
            166 => Self::ModifiedWoodedBadlandsPlateau,
            167 => Self::ModifiedBadlandsPlateau,
            168 => Self::BambooJungle,
            169 => Self::BambooJungleHills,
            170 => Self::SoulSandValley,
            171 => Self::CrimsonForest,
            172 => Self::WarpedForest,
            173 => Self::BasaltDeltas,
            174 => Self::DripstoneCaves,
            175 => Self::LushCaves,
            177 => Self::Meadow,
            178 => Self::Grove,
            179 => Self::SnowySlopes,
            180 => Self::JaggedPeaks,
            181 => Self::FrozenPeaks,
            182 => Self::StonyPeaks,
            183 => Self::OldGrowthBirchForest,
            184 => Self::OldGrowthPineTaiga,
            185 => Self::OldGrowthSpruceTaiga,
            186 => Self::SnowyPlains,
            187 => Self::SparseJungle,
            188 => Self::StonyShore,
            189 => Self::WindsweptHills,
            190 => Self::WindsweptForest,
            191 => Self::WindsweptGravellyHills,
            192 => Self::WindsweptSavanna,
            193 => Self::WoodedBadlands,
            194 => Self::DeepDark,
            195 => Self::MangroveSwamp,
            196 => Self::CherryGrove,
            197 => Self::PaleGarden,
            _ => return None,
        })
    }

    /// Oceans, deep or shallow, of any temperature.
    pub const fn is_oceanic(self) -> bool {
        matches!(
            self,
            Self::Ocean
                | Self::FrozenOcean
                | Self::DeepOcean
                | Self::WarmOcean
                | Self::LukewarmOcean
                | Self::ColdOcean
                | Self::DeepWarmOcean
                | Self::DeepLukewarmOcean
                | Self::DeepColdOcean
                | Self::DeepFrozenOcean
        )
    }

    /// Non-deep ocean variants.
    pub const fn is_shallow_ocean(self) -> bool {
        matches!(
            self,
            Self::Ocean
                | Self::FrozenOcean
                | Self::WarmOcean
                | Self::LukewarmOcean
                | Self::ColdOcean
        )
    }

    /// Deep ocean variants.
    pub const fn is_deep_ocean(self) -> bool {
        matches!(
            self,
            Self::DeepOcean
                | Self::DeepWarmOcean
                | Self::DeepLukewarmOcean
                | Self::DeepColdOcean
                | Self::DeepFrozenOcean
        )
    }

    /// Snow-covered biomes (legacy set, used by the shore layer).
    pub const fn is_snowy(self) -> bool {
        matches!(
            self,
            Self::FrozenOcean
                | Self::FrozenRiver
                | Self::SnowyTundra
                | Self::SnowyMountains
                | Self::SnowyBeach
                | Self::SnowyTaiga
                | Self::SnowyTaigaHills
                | Self::IceSpikes
                | Self::SnowyTaigaMountains
        )
    }

    /// Badlands family.
    pub const fn is_mesa(self) -> bool {
        matches!(
            self,
            Self::Badlands
                | Self::ErodedBadlands
                | Self::ModifiedWoodedBadlandsPlateau
                | Self::ModifiedBadlandsPlateau
                | Self::WoodedBadlandsPlateau
                | Self::BadlandsPlateau
        )
    }

    /// Category representative used by layer similarity checks.
    ///
    /// The representative is itself a biome; two biomes are "similar" when
    /// their representatives match. Versions up to 1.15 group the badlands
    /// plateaus with the rest of the mesa family.
    pub fn category(self, mc: Version) -> Biome {
        match self {
            Self::Beach | Self::SnowyBeach => Self::Beach,
            Self::Desert | Self::DesertHills | Self::DesertLakes => Self::Desert,
            Self::Mountains
            | Self::MountainEdge
            | Self::WoodedMountains
            | Self::GravellyMountains
            | Self::ModifiedGravellyMountains => Self::Mountains,
            Self::Forest
            | Self::WoodedHills
            | Self::BirchForest
            | Self::BirchForestHills
            | Self::DarkForest
            | Self::FlowerForest
            | Self::TallBirchForest
            | Self::TallBirchHills
            | Self::DarkForestHills => Self::Forest,
            Self::SnowyTundra | Self::SnowyMountains | Self::IceSpikes => Self::SnowyTundra,
            Self::Jungle
            | Self::JungleHills
            | Self::JungleEdge
            | Self::ModifiedJungle
            | Self::ModifiedJungleEdge
            | Self::BambooJungle
            | Self::BambooJungleHills => Self::Jungle,
            Self::Badlands
            | Self::ErodedBadlands
            | Self::ModifiedWoodedBadlandsPlateau
            | Self::ModifiedBadlandsPlateau => Self::Badlands,
            Self::WoodedBadlandsPlateau | Self::BadlandsPlateau => {
                if mc <= Version::V1_15 {
                    Self::Badlands
                } else {
                    Self::BadlandsPlateau
                }
            }
            Self::MushroomFields | Self::MushroomFieldShore => Self::MushroomFields,
            Self::StoneShore => Self::StoneShore,
            b if b.is_oceanic() => Self::Ocean,
            Self::Plains | Self::SunflowerPlains => Self::Plains,
            Self::River | Self::FrozenRiver => Self::River,
            Self::Savanna
            | Self::SavannaPlateau
            | Self::ShatteredSavanna
            | Self::ShatteredSavannaPlateau => Self::Savanna,
            Self::Swamp | Self::SwampHills => Self::Swamp,
            Self::Taiga
            | Self::TaigaHills
            | Self::SnowyTaiga
            | Self::SnowyTaigaHills
            | Self::GiantTreeTaiga
            | Self::GiantTreeTaigaHills
            | Self::TaigaMountains
            | Self::SnowyTaigaMountains
            | Self::GiantSpruceTaiga
            | Self::GiantSpruceTaigaHills => Self::Taiga,
            Self::NetherWastes
            | Self::SoulSandValley
            | Self::CrimsonForest
            | Self::WarpedForest
            | Self::BasaltDeltas => Self::NetherWastes,
            _ => Self::None,
        }
    }

    /// Whether two biomes belong to the same category for edge/hill rules.
    pub fn are_similar(mc: Version, a: Biome, b: Biome) -> bool {
        if a == b {
            return true;
        }
        if mc <= Version::V1_15
            && matches!(a, Self::WoodedBadlandsPlateau | Self::BadlandsPlateau)
            && matches!(b, Self::WoodedBadlandsPlateau | Self::BadlandsPlateau)
        {
            return true;
        }
        a.category(mc) == b.category(mc)
    }

    /// The mutated ("modified"/M) counterpart used by the hills layer, if any.
    pub fn mutated(self, mc: Version) -> Option<Biome> {
        Some(match self {
            Self::Plains => Self::SunflowerPlains,
            Self::Desert => Self::DesertLakes,
            Self::Mountains => Self::GravellyMountains,
            Self::Forest => Self::FlowerForest,
            Self::Taiga => Self::TaigaMountains,
            Self::Swamp => Self::SwampHills,
            Self::SnowyTundra => Self::IceSpikes,
            Self::Jungle => Self::ModifiedJungle,
            Self::JungleEdge => Self::ModifiedJungleEdge,
            // 1.9 and 1.10 swapped the tall birch ids.
            Self::BirchForest => {
                if mc >= Version::V1_9 && mc <= Version::V1_10 {
                    Self::TallBirchHills
                } else {
                    Self::TallBirchForest
                }
            }
            Self::BirchForestHills => {
                if mc >= Version::V1_9 && mc <= Version::V1_10 {
                    return None;
                }
                Self::TallBirchHills
            }
            Self::DarkForest => Self::DarkForestHills,
            Self::SnowyTaiga => Self::SnowyTaigaMountains,
            Self::GiantTreeTaiga => Self::GiantSpruceTaiga,
            Self::GiantTreeTaigaHills => Self::GiantSpruceTaigaHills,
            Self::WoodedMountains => Self::ModifiedGravellyMountains,
            Self::Savanna => Self::ShatteredSavanna,
            Self::SavannaPlateau => Self::ShatteredSavannaPlateau,
            Self::Badlands => Self::ErodedBadlands,
            Self::WoodedBadlandsPlateau => Self::ModifiedWoodedBadlandsPlateau,
            Self::BadlandsPlateau => Self::ModifiedBadlandsPlateau,
            _ => return None,
        })
    }

    /// Canonical (modern) resource-style name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ocean => "ocean",
            Self::Plains => "plains",
            Self::Desert => "desert",
            Self::Mountains => "mountains",
            Self::Forest => "forest",
            Self::Taiga => "taiga",
            Self::Swamp => "swamp",
            Self::River => "river",
            Self::NetherWastes => "nether_wastes",
            Self::TheEnd => "the_end",
            Self::FrozenOcean => "frozen_ocean",
            Self::FrozenRiver => "frozen_river",
            Self::SnowyTundra => "snowy_tundra",
            Self::SnowyMountains => "snowy_mountains",
            Self::MushroomFields => "mushroom_fields",
            Self::MushroomFieldShore => "mushroom_field_shore",
            Self::Beach => "beach",
            Self::DesertHills => "desert_hills",
            Self::WoodedHills => "wooded_hills",
            Self::TaigaHills => "taiga_hills",
            Self::MountainEdge => "mountain_edge",
            Self::Jungle => "jungle",
            Self::JungleHills => "jungle_hills",
            Self::JungleEdge => "jungle_edge",
            Self::DeepOcean => "deep_ocean",
            Self::StoneShore => "stone_shore",
            Self::SnowyBeach => "snowy_beach",
            Self::BirchForest => "birch_forest",
            Self::BirchForestHills => "birch_forest_hills",
            Self::DarkForest => "dark_forest",
            Self::SnowyTaiga => "snowy_taiga",
            Self::SnowyTaigaHills => "snowy_taiga_hills",
            Self::GiantTreeTaiga => "giant_tree_taiga",
            Self::GiantTreeTaigaHills => "giant_tree_taiga_hills",
            Self::WoodedMountains => "wooded_mountains",
            Self::Savanna => "savanna",
            Self::SavannaPlateau => "savanna_plateau",
            Self::Badlands => "badlands",
            Self::WoodedBadlandsPlateau => "wooded_badlands_plateau",
            Self::BadlandsPlateau => "badlands_plateau",
            Self::SmallEndIslands => "small_end_islands",
            Self::EndMidlands => "end_midlands",
            Self::EndHighlands => "end_highlands",
            Self::EndBarrens => "end_barrens",
            Self::WarmOcean => "warm_ocean",
            Self::LukewarmOcean => "lukewarm_ocean",
            Self::ColdOcean => "cold_ocean",
            Self::DeepWarmOcean => "deep_warm_ocean",
            Self::DeepLukewarmOcean => "deep_lukewarm_ocean",
            Self::DeepColdOcean => "deep_cold_ocean",
            Self::DeepFrozenOcean => "deep_frozen_ocean",
            Self::SeasonalForest => "seasonal_forest",
            Self::Rainforest => "rainforest",
            Self::Shrubland => "shrubland",
            Self::TheVoid => "the_void",
            Self::SunflowerPlains => "sunflower_plains",
            Self::DesertLakes => "desert_lakes",
            Self::GravellyMountains => "gravelly_mountains",
            Self::FlowerForest => "flower_forest",
            Self::TaigaMountains => "taiga_mountains",
            Self::SwampHills => "swamp_hills",
            Self::IceSpikes => "ice_spikes",
            Self::ModifiedJungle => "modified_jungle",
            Self::ModifiedJungleEdge => "modified_jungle_edge",
            Self::TallBirchForest => "tall_birch_forest",
            Self::TallBirchHills => "tall_birch_hills",
            Self::DarkForestHills => "dark_forest_hills",
            Self::SnowyTaigaMountains => "snowy_taiga_mountains",
            Self::GiantSpruceTaiga => "giant_spruce_taiga",
            Self::GiantSpruceTaigaHills => "giant_spruce_taiga_hills",
            Self::ModifiedGravellyMountains => "modified_gravelly_mountains",
            Self::ShatteredSavanna => "shattered_savanna",
            Self::ShatteredSavannaPlateau => "shattered_savanna_plateau",
            Self::ErodedBadlands => "eroded_badlands",
            Self::ModifiedWoodedBadlandsPlateau => "modified_wooded_badlands_plateau",
            Self::ModifiedBadlandsPlateau => "modified_badlands_plateau",
            Self::BambooJungle => "bamboo_jungle",
            Self::BambooJungleHills => "bamboo_jungle_hills",
            Self::SoulSandValley => "soul_sand_valley",
            Self::CrimsonForest => "crimson_forest",
            Self::WarpedForest => "warped_forest",
            Self::BasaltDeltas => "basalt_deltas",
            Self::DripstoneCaves => "dripstone_caves",
            Self::LushCaves => "lush_caves",
            Self::Meadow => "meadow",
            Self::Grove => "grove",
            Self::SnowySlopes => "snowy_slopes",
            Self::JaggedPeaks => "jagged_peaks",
            Self::FrozenPeaks => "frozen_peaks",
            Self::StonyPeaks => "stony_peaks",
            Self::OldGrowthBirchForest => "old_growth_birch_forest",
            Self::OldGrowthPineTaiga => "old_growth_pine_taiga",
            Self::OldGrowthSpruceTaiga => "old_growth_spruce_taiga",
            Self::SnowyPlains => "snowy_plains",
            Self::SparseJungle => "sparse_jungle",
            Self::StonyShore => "stony_shore",
            Self::WindsweptHills => "windswept_hills",
            Self::WindsweptForest => "windswept_forest",
            Self::WindsweptGravellyHills => "windswept_gravelly_hills",
            Self::WindsweptSavanna => "windswept_savanna",
            Self::WoodedBadlands => "wooded_badlands",
            Self::DeepDark => "deep_dark",
            Self::MangroveSwamp => "mangrove_swamp",
            Self::CherryGrove => "cherry_grove",
            Self::PaleGarden => "pale_garden",
        }
    }

    /// Parse a biome name (case-insensitive); historical aliases resolve to
    /// the same id (e.g. `ice_plains` -> `snowy_tundra`, both id 12).
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase().replace(['-', ' ', ':'], "_");
        let key = key.strip_prefix("minecraft_").unwrap_or(&key);
        // Aliases first; everything else matches the canonical name table.
        let aliased = match key {
            "extreme_hills" => Some(Self::Mountains),
            "swampland" => Some(Self::Swamp),
            "hell" => Some(Self::NetherWastes),
            "sky" => Some(Self::TheEnd),
            "ice_plains" => Some(Self::SnowyTundra),
            "ice_mountains" => Some(Self::SnowyMountains),
            "mushroom_island" => Some(Self::MushroomFields),
            "mushroom_island_shore" => Some(Self::MushroomFieldShore),
            "forest_hills" => Some(Self::WoodedHills),
            "extreme_hills_edge" => Some(Self::MountainEdge),
            "stone_beach" => Some(Self::StoneShore),
            "cold_beach" => Some(Self::SnowyBeach),
            "roofed_forest" => Some(Self::DarkForest),
            "cold_taiga" => Some(Self::SnowyTaiga),
            "cold_taiga_hills" => Some(Self::SnowyTaigaHills),
            "mega_taiga" => Some(Self::GiantTreeTaiga),
            "mega_taiga_hills" => Some(Self::GiantTreeTaigaHills),
            "extreme_hills_plus" => Some(Self::WoodedMountains),
            "mesa" => Some(Self::Badlands),
            "mesa_plateau_f" => Some(Self::WoodedBadlandsPlateau),
            "mesa_plateau" => Some(Self::BadlandsPlateau),
            "warm_deep_ocean" => Some(Self::DeepWarmOcean),
            "lukewarm_deep_ocean" => Some(Self::DeepLukewarmOcean),
            "cold_deep_ocean" => Some(Self::DeepColdOcean),
            "frozen_deep_ocean" => Some(Self::DeepFrozenOcean),
            _ => None,
        };
        if aliased.is_some() {
            return aliased;
        }
        let mut id = 0;
        while id < 256 {
            if let Some(b) = Self::from_id(id) {
                if b.as_str() == key {
                    return Some(b);
                }
            }
            id += 1;
        }
        None
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for id in -1..256 {
            if let Some(b) = Biome::from_id(id) {
                assert_eq!(b.id(), id);
            }
        }
        assert_eq!(Biome::from_id(Biome::PaleGarden.id()), Some(Biome::PaleGarden));
        assert_eq!(Biome::from_id(128), None);
    }

    #[test]
    fn aliases_share_ids() {
        assert_eq!(Biome::parse("ice_plains"), Some(Biome::SnowyTundra));
        assert_eq!(Biome::parse("snowy_tundra"), Some(Biome::SnowyTundra));
        assert_eq!(Biome::parse("roofed_forest"), Some(Biome::DarkForest));
        assert_eq!(Biome::parse("mesa_plateau"), Some(Biome::BadlandsPlateau));
        assert_eq!(Biome::parse("minecraft:deep_dark"), Some(Biome::DeepDark));
        assert_eq!(Biome::parse("not_a_biome"), None);
    }

    #[test]
    fn ocean_predicates_partition() {
        for id in 0..256 {
            let Some(b) = Biome::from_id(id) else { continue };
            if b.is_oceanic() {
                assert!(b.is_shallow_ocean() ^ b.is_deep_ocean(), "{b}");
            } else {
                assert!(!b.is_shallow_ocean() && !b.is_deep_ocean(), "{b}");
            }
        }
    }

    #[test]
    fn plateau_category_split_at_1_16() {
        assert_eq!(
            Biome::WoodedBadlandsPlateau.category(Version::V1_15),
            Biome::Badlands
        );
        assert_eq!(
            Biome::WoodedBadlandsPlateau.category(Version::V1_16_1),
            Biome::BadlandsPlateau
        );
        assert!(Biome::are_similar(
            Version::V1_15,
            Biome::BadlandsPlateau,
            Biome::WoodedBadlandsPlateau
        ));
    }

    #[test]
    fn tall_birch_swap_in_1_9() {
        assert_eq!(
            Biome::BirchForest.mutated(Version::V1_9),
            Some(Biome::TallBirchHills)
        );
        assert_eq!(Biome::BirchForestHills.mutated(Version::V1_10), None);
        assert_eq!(
            Biome::BirchForest.mutated(Version::V1_12),
            Some(Biome::TallBirchForest)
        );
    }
}
