//! Structure placement: per-structure region configs, region→block position
//! derivation and generation-attempt post-filters.
//!
//! Placement is pure arithmetic over the world seed; biome viability is a
//! separate concern (see `Generator::is_viable_structure_pos`). Positions are
//! derived with the region seeding
//! `seed + rx·341873128712 + rz·132897987541 + salt` and either one draw per
//! axis (feature style) or the average of two (large-structure style).

use crate::rng::JavaRandom;
use seedsight_core::{Dimension, StructureType, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A block position (x, z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Block x.
    pub x: i32,
    /// Block z.
    pub z: i32,
}

/// How a structure's attempt position is derived from the region RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// One `nextInt(chunkRange)` per axis.
    Feature,
    /// Average of two draws per axis (monument, mansion, end city).
    Large,
    /// Per-chunk rarity roll; the "region" is a single chunk.
    Chunk,
}

/// Per-(structure, version) placement parameters.
#[derive(Debug, Clone, Copy)]
pub struct StructureConfig {
    /// Salt added to the region seed.
    pub salt: u64,
    /// Region edge length in chunks.
    pub region_size: i32,
    /// Attempt chunk range within the region, in chunks.
    pub chunk_range: i32,
    /// The structure this config belongs to.
    pub structure: StructureType,
    /// Dimension the structure generates in.
    pub dim: Dimension,
    /// Per-chunk generation chance for [`PlacementKind::Chunk`] structures.
    pub rarity: f64,
    /// Position derivation style.
    pub placement: PlacementKind,
}

/// Structure lookup/placement errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    /// The (structure, version) pair has no placement config.
    #[error("structure {structure} has no config for version {version}")]
    UnsupportedStructure {
        /// Requested structure.
        structure: StructureType,
        /// Requested version.
        version: Version,
    },
}

impl StructureConfig {
    const fn new(
        salt: u64,
        region_size: i32,
        chunk_range: i32,
        structure: StructureType,
        dim: Dimension,
        placement: PlacementKind,
    ) -> Self {
        Self {
            salt,
            region_size,
            chunk_range,
            structure,
            dim,
            rarity: 0.0,
            placement,
        }
    }

    const fn chunk(salt: u64, structure: StructureType, dim: Dimension, rarity: f64) -> Self {
        Self {
            salt,
            region_size: 1,
            chunk_range: 1,
            structure,
            dim,
            rarity,
            placement: PlacementKind::Chunk,
        }
    }
}

/// Placement config for `(structure, mc)`, or an error if the pair never
/// generates.
pub fn structure_config(
    structure: StructureType,
    mc: Version,
) -> Result<StructureConfig, StructureError> {
    use Dimension::{Nether, Overworld};
    use PlacementKind::{Feature, Large};
    use StructureType as S;
    use Version as V;

    let unsupported = Err(StructureError::UnsupportedStructure {
        structure,
        version: mc,
    });

    // The pre-1.13 temple attempt shares one salt across all temple kinds.
    let temple_117 = StructureConfig::new(14357617, 32, 24, structure, Overworld, Feature);

    let cfg = match structure {
        S::Feature => {
            if mc > V::V1_12 {
                return unsupported;
            }
            temple_117
        }
        S::DesertPyramid | S::JunglePyramid => {
            if mc < V::V1_3 {
                return unsupported;
            }
            if mc <= V::V1_12 {
                temple_117
            } else {
                let salt = if structure == S::DesertPyramid {
                    14357617
                } else {
                    14357619
                };
                StructureConfig::new(salt, 32, 24, structure, Overworld, Feature)
            }
        }
        S::SwampHut => {
            if mc < V::V1_4 {
                return unsupported;
            }
            if mc <= V::V1_12 {
                temple_117
            } else {
                StructureConfig::new(14357620, 32, 24, structure, Overworld, Feature)
            }
        }
        S::Igloo => {
            if mc < V::V1_9 {
                return unsupported;
            }
            if mc <= V::V1_12 {
                temple_117
            } else {
                StructureConfig::new(14357618, 32, 24, structure, Overworld, Feature)
            }
        }
        S::Village => {
            if mc >= V::V1_18 {
                StructureConfig::new(10387312, 34, 26, structure, Overworld, Feature)
            } else {
                StructureConfig::new(10387312, 32, 24, structure, Overworld, Feature)
            }
        }
        S::OceanRuin => {
            if mc < V::V1_13 {
                return unsupported;
            }
            if mc >= V::V1_16_1 {
                StructureConfig::new(14357621, 20, 12, structure, Overworld, Feature)
            } else {
                StructureConfig::new(14357621, 16, 8, structure, Overworld, Feature)
            }
        }
        S::Shipwreck => {
            if mc < V::V1_13 {
                return unsupported;
            }
            if mc >= V::V1_16_1 {
                StructureConfig::new(165745295, 24, 20, structure, Overworld, Feature)
            } else {
                StructureConfig::new(165745295, 16, 8, structure, Overworld, Feature)
            }
        }
        S::Monument => {
            if mc < V::V1_8 {
                return unsupported;
            }
            StructureConfig::new(10387313, 32, 27, structure, Overworld, Large)
        }
        S::Mansion => {
            if mc < V::V1_11 {
                return unsupported;
            }
            StructureConfig::new(10387319, 80, 60, structure, Overworld, Large)
        }
        S::Outpost => {
            if mc < V::V1_14 {
                return unsupported;
            }
            StructureConfig::new(165745296, 32, 24, structure, Overworld, Feature)
        }
        S::RuinedPortal => {
            if mc < V::V1_16_1 {
                return unsupported;
            }
            StructureConfig::new(34222645, 40, 25, structure, Overworld, Feature)
        }
        S::RuinedPortalNether => {
            if mc < V::V1_16_1 {
                return unsupported;
            }
            StructureConfig::new(34222645, 25, 15, structure, Nether, Feature)
        }
        S::AncientCity => {
            if mc < V::V1_19_2 {
                return unsupported;
            }
            StructureConfig::new(20083232, 24, 16, structure, Overworld, Feature)
        }
        S::Treasure => {
            if mc < V::V1_13 {
                return unsupported;
            }
            StructureConfig::chunk(10387320, structure, Overworld, 0.01)
        }
        S::Mineshaft => StructureConfig::chunk(0, structure, Overworld, 0.004),
        S::Fortress => {
            if mc >= V::V1_16_1 {
                StructureConfig::new(30084232, 27, 23, structure, Nether, Feature)
            } else {
                StructureConfig::new(0, 16, 8, structure, Nether, Feature)
            }
        }
        S::Bastion => {
            if mc < V::V1_16_1 {
                return unsupported;
            }
            StructureConfig::new(30084232, 27, 23, structure, Nether, Feature)
        }
        S::EndCity => {
            if mc < V::V1_9 {
                return unsupported;
            }
            StructureConfig::new(10387313, 20, 9, structure, Dimension::End, Large)
        }
        S::TrailRuins => {
            if mc < V::V1_20 {
                return unsupported;
            }
            StructureConfig::new(83469867, 34, 26, structure, Overworld, Feature)
        }
        S::TrialChambers => {
            if mc < V::V1_21_1 {
                return unsupported;
            }
            StructureConfig::new(94251327, 34, 22, structure, Overworld, Feature)
        }
        // Minor chunk decorations and the End ring structures have no
        // region-based placement here; stronghold uses the ring algorithm,
        // which is out of scope.
        S::DesertWell | S::Geode | S::EndGateway | S::EndIsland | S::Stronghold => {
            return unsupported;
        }
    };
    Ok(cfg)
}

/// Seed the region RNG for a structure attempt.
fn region_rng(seed: u64, salt: u64, rx: i32, rz: i32) -> JavaRandom {
    let s = seed
        .wrapping_add((rx as i64).wrapping_mul(341873128712) as u64)
        .wrapping_add((rz as i64).wrapping_mul(132897987541) as u64)
        .wrapping_add(salt);
    JavaRandom::new(s)
}

/// One attempt-chunk draw in `[0, range)`. Powers of two take the high bits,
/// everything else the plain 31-bit modulo.
fn chunk_draw(r: &mut JavaRandom, range: i32) -> i32 {
    if range & (range - 1) == 0 {
        ((range as i64 * r.next(31) as i64) >> 31) as i32
    } else {
        r.next(31) % range
    }
}

/// The 48-bit chunk-generation RNG state for (cx, cz):
/// `setSeed(nextLong·cx ^ nextLong·cz ^ worldSeed)`.
pub fn chunk_generate_rnd(world_seed: u64, cx: i32, cz: i32) -> u64 {
    let mut r = JavaRandom::new(world_seed);
    let a = r.next_long();
    let b = r.next_long();
    let s = (a.wrapping_mul(cx as i64) ^ b.wrapping_mul(cz as i64) ^ world_seed as i64) as u64;
    r.set_seed(s);
    r.state()
}

/// Attempt-seed scramble used by outposts: fold the 16-chunk cell into the
/// world seed, reseed, and burn one draw.
fn attempt_rng(world_seed: u64, cx: i32, cz: i32) -> JavaRandom {
    let s = world_seed ^ ((cx >> 4) as u64) ^ (((cz >> 4) as u64) << 4);
    let mut r = JavaRandom::new(s);
    r.next(31);
    r
}

/// Structure position finder for one version.
///
/// Stateless apart from the version; a finder can be shared or rebuilt freely
/// (positions depend only on its arguments).
#[derive(Debug, Clone, Copy)]
pub struct Finder {
    mc: Version,
}

impl Finder {
    /// Create a finder for a version.
    pub const fn new(mc: Version) -> Self {
        Self { mc }
    }

    /// The finder's version.
    pub const fn version(&self) -> Version {
        self.mc
    }

    /// Placement config for a structure under this finder's version.
    pub fn structure_config(
        &self,
        structure: StructureType,
    ) -> Result<StructureConfig, StructureError> {
        structure_config(structure, self.mc)
    }

    /// The chunk-generation RNG state for (cx, cz) (see [`chunk_generate_rnd`]).
    pub fn chunk_generate_rnd(&self, world_seed: u64, cx: i32, cz: i32) -> u64 {
        chunk_generate_rnd(world_seed, cx, cz)
    }

    /// The structure-generation attempt position for a region, if the region
    /// produces one. `Ok(None)` means the region rolls no attempt; biome
    /// viability is *not* checked here.
    pub fn structure_pos(
        &self,
        structure: StructureType,
        seed: u64,
        rx: i32,
        rz: i32,
    ) -> Result<Option<Pos>, StructureError> {
        let cfg = self.structure_config(structure)?;
        let mc = self.mc;

        // Pre-1.16.1 fortresses use their own 16-chunk-region derivation.
        if structure == StructureType::Fortress && mc < Version::V1_16_1 {
            return Ok(fortress_pos_pre116(seed, rx, rz));
        }

        let pos = match cfg.placement {
            PlacementKind::Feature => {
                let mut r = region_rng(seed, cfg.salt, rx, rz);
                let px = chunk_draw(&mut r, cfg.chunk_range);
                let pz = chunk_draw(&mut r, cfg.chunk_range);
                let pos = Pos {
                    x: (rx * cfg.region_size + px) << 4,
                    z: (rz * cfg.region_size + pz) << 4,
                };

                match structure {
                    StructureType::Outpost => {
                        let mut ar = attempt_rng(seed, pos.x >> 4, pos.z >> 4);
                        if ar.next_int(5) != 0 {
                            return Ok(None);
                        }
                    }
                    StructureType::Bastion if mc < Version::V1_18 => {
                        // The region RNG keeps rolling: 2-in-5 turns the
                        // shared nether attempt into a bastion.
                        if r.next_int(5) < 2 {
                            return Ok(None);
                        }
                    }
                    StructureType::Fortress if mc < Version::V1_18 => {
                        if r.next_int(5) >= 2 {
                            return Ok(None);
                        }
                    }
                    StructureType::Bastion => {
                        let mut cr =
                            JavaRandom::from_state(chunk_generate_rnd(seed, pos.x >> 4, pos.z >> 4));
                        if cr.next_int(5) < 2 {
                            return Ok(None);
                        }
                    }
                    _ => {}
                }
                pos
            }
            PlacementKind::Large => {
                let mut r = region_rng(seed, cfg.salt, rx, rz);
                let range = cfg.chunk_range;
                let px = (r.next(31) % range + r.next(31) % range) >> 1;
                let pz = (r.next(31) % range + r.next(31) % range) >> 1;
                let pos = Pos {
                    x: (rx * cfg.region_size + px) << 4,
                    z: (rz * cfg.region_size + pz) << 4,
                };
                if structure == StructureType::EndCity {
                    // End cities only generate outside the central island.
                    let d = pos.x as i64 * pos.x as i64 + pos.z as i64 * pos.z as i64;
                    if d < 1008 * 1008 {
                        return Ok(None);
                    }
                }
                pos
            }
            PlacementKind::Chunk => match structure {
                StructureType::Treasure => {
                    let s = (rx as i64)
                        .wrapping_mul(341873128712)
                        .wrapping_add((rz as i64).wrapping_mul(132897987541))
                        as u64;
                    let s = s.wrapping_add(seed).wrapping_add(cfg.salt);
                    let mut r = JavaRandom::new(s);
                    if r.next_float() >= cfg.rarity as f32 {
                        return Ok(None);
                    }
                    Pos {
                        x: (rx << 4) + 9,
                        z: (rz << 4) + 9,
                    }
                }
                StructureType::Mineshaft => {
                    let mut r = JavaRandom::from_state(chunk_generate_rnd(seed, rx, rz));
                    if r.next_double() >= cfg.rarity {
                        return Ok(None);
                    }
                    if mc <= Version::V1_12 {
                        // Mineshafts thin out toward the origin on old
                        // versions.
                        let d = rx.abs().max(rz.abs());
                        if r.next_int(80) >= d {
                            return Ok(None);
                        }
                    }
                    Pos {
                        x: rx << 4,
                        z: rz << 4,
                    }
                }
                _ => return Ok(None),
            },
        };

        Ok(Some(pos))
    }
}

/// Pre-1.16.1 fortress placement: 16-chunk regions, a 1-in-3 roll, then an
/// 8-chunk offset window starting 4 chunks in.
fn fortress_pos_pre116(seed: u64, rx: i32, rz: i32) -> Option<Pos> {
    let s = (rx as i64 ^ ((rz as i64) << 4)) as u64 ^ seed;
    let mut r = JavaRandom::new(s);
    r.next(31);
    if r.next_int(3) != 0 {
        return None;
    }
    Some(Pos {
        x: ((rx << 4) + 4 + r.next_int(8)) << 4,
        z: ((rz << 4) + 4 + r.next_int(8)) << 4,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configs_keep_range_within_region() {
        for &s in StructureType::all() {
            for &mc in Version::all() {
                if let Ok(cfg) = structure_config(s, mc) {
                    assert!(
                        cfg.region_size >= cfg.chunk_range && cfg.chunk_range >= 1,
                        "{s} {mc}: region {} range {}",
                        cfg.region_size,
                        cfg.chunk_range,
                    );
                }
            }
        }
    }

    #[test]
    fn village_config_matches_reference_values() {
        let cfg = structure_config(StructureType::Village, Version::V1_16_5).unwrap();
        assert_eq!(cfg.salt, 10387312);
        assert_eq!(cfg.region_size, 32);
        assert_eq!(cfg.chunk_range, 24);
        let cfg = structure_config(StructureType::Village, Version::V1_18).unwrap();
        assert_eq!((cfg.region_size, cfg.chunk_range), (34, 26));
    }

    #[test]
    fn feature_positions_stay_inside_their_region() {
        let f = Finder::new(Version::V1_16_5);
        let cfg = f.structure_config(StructureType::Village).unwrap();
        for seed in [0u64, 12345, 0xDEADBEEF] {
            for rx in -3..3 {
                for rz in -3..3 {
                    let Some(p) = f.structure_pos(StructureType::Village, seed, rx, rz).unwrap()
                    else {
                        panic!("villages attempt in every region");
                    };
                    let cx = (p.x >> 4) - rx * cfg.region_size;
                    let cz = (p.z >> 4) - rz * cfg.region_size;
                    assert!((0..cfg.chunk_range).contains(&cx), "cx {cx}");
                    assert!((0..cfg.chunk_range).contains(&cz), "cz {cz}");
                }
            }
        }
    }

    #[test]
    fn outpost_region_zero_seed_zero() {
        // A passing outpost attempt must sit inside the region and reproduce
        // its own 1-in-5 acceptance roll.
        let f = Finder::new(Version::V1_21_1);
        let cfg = f.structure_config(StructureType::Outpost).unwrap();
        if let Some(p) = f.structure_pos(StructureType::Outpost, 0, 0, 0).unwrap() {
            assert!((0..cfg.region_size * 16).contains(&p.x));
            assert!((0..cfg.region_size * 16).contains(&p.z));
            let mut ar = attempt_rng(0, p.x >> 4, p.z >> 4);
            assert_eq!(ar.next_int(5), 0);
        }
        // Regardless of acceptance, scanning a neighborhood must yield some
        // outpost attempts.
        let found = (-8..8)
            .flat_map(|rx| (-8..8).map(move |rz| (rx, rz)))
            .filter(|&(rx, rz)| {
                f.structure_pos(StructureType::Outpost, 0, rx, rz)
                    .unwrap()
                    .is_some()
            })
            .count();
        assert!(found > 0, "no outpost attempt in 256 regions");
    }

    #[test]
    fn treasure_acceptance_matches_its_seed_rule() {
        let f = Finder::new(Version::V1_12);
        for seed in [1u64, 2, 3] {
            for rx in -16..16 {
                for rz in -16..16 {
                    let accepted = f
                        .structure_pos(StructureType::Treasure, seed, rx, rz)
                        .unwrap()
                        .is_some();
                    let s = (rx as i64)
                        .wrapping_mul(341873128712)
                        .wrapping_add((rz as i64).wrapping_mul(132897987541))
                        as u64;
                    let mut r = JavaRandom::new(s.wrapping_add(seed).wrapping_add(10387320));
                    assert_eq!(accepted, r.next_float() < 0.01, "({rx},{rz})");
                }
            }
        }
    }

    #[test]
    fn structure_pos_is_idempotent() {
        let f = Finder::new(Version::V1_21_1);
        let first = f.structure_pos(StructureType::TrialChambers, 42, 3, -2).unwrap();
        for _ in 0..10 {
            // Interleave other queries; the result must not drift.
            let _ = f.structure_pos(StructureType::Village, 42, 0, 0).unwrap();
            let _ = f.chunk_generate_rnd(42, 11, -7);
            assert_eq!(
                f.structure_pos(StructureType::TrialChambers, 42, 3, -2).unwrap(),
                first
            );
        }
    }

    #[test]
    fn end_city_excludes_the_central_island() {
        let f = Finder::new(Version::V1_16_5);
        for rx in -4..4 {
            for rz in -4..4 {
                if let Some(p) = f.structure_pos(StructureType::EndCity, 9001, rx, rz).unwrap() {
                    let d = p.x as i64 * p.x as i64 + p.z as i64 * p.z as i64;
                    assert!(d >= 1008 * 1008, "end city at ({}, {})", p.x, p.z);
                }
            }
        }
    }

    #[test]
    fn large_structure_positions_use_averaged_draws() {
        let f = Finder::new(Version::V1_16_5);
        let cfg = f.structure_config(StructureType::Monument).unwrap();
        for rx in -2..2 {
            for rz in -2..2 {
                let p = f
                    .structure_pos(StructureType::Monument, 555, rx, rz)
                    .unwrap()
                    .expect("monument attempts are unconditional");
                let cx = (p.x >> 4) - rx * cfg.region_size;
                let cz = (p.z >> 4) - rz * cfg.region_size;
                assert!((0..cfg.chunk_range).contains(&cx));
                assert!((0..cfg.chunk_range).contains(&cz));
            }
        }
    }

    #[test]
    fn trial_chambers_require_1_21() {
        assert!(structure_config(StructureType::TrialChambers, Version::V1_20).is_err());
        assert!(structure_config(StructureType::TrialChambers, Version::V1_21_1).is_ok());
        assert!(structure_config(StructureType::Stronghold, Version::V1_21_1).is_err());
    }

    #[test]
    fn fortress_branches_by_version() {
        // Pre-1.16.1 positions come from the 16-chunk-region derivation.
        let f = Finder::new(Version::V1_15);
        let mut found = 0;
        for rx in -6..6 {
            for rz in -6..6 {
                if let Some(p) = f.structure_pos(StructureType::Fortress, 31415, rx, rz).unwrap() {
                    found += 1;
                    let cx = (p.x >> 4) - (rx << 4);
                    let cz = (p.z >> 4) - (rz << 4);
                    assert!((4..12).contains(&cx), "cx {cx}");
                    assert!((4..12).contains(&cz), "cz {cz}");
                }
            }
        }
        assert!(found > 0, "no fortress in 144 regions");

        // 1.18+ fortresses are plain feature placements.
        let f = Finder::new(Version::V1_18);
        assert!(f.structure_pos(StructureType::Fortress, 31415, 0, 0).unwrap().is_some());
    }

    #[test]
    fn bastion_and_fortress_split_the_same_region_before_1_18() {
        // For 1.16.x, a region resolves to at most one of the two.
        let f = Finder::new(Version::V1_16_5);
        for rx in -6..6 {
            for rz in -6..6 {
                let b = f.structure_pos(StructureType::Bastion, 777, rx, rz).unwrap();
                let ft = f.structure_pos(StructureType::Fortress, 777, rx, rz).unwrap();
                assert!(
                    b.is_none() || ft.is_none(),
                    "region ({rx},{rz}) produced both"
                );
            }
        }
    }

    #[test]
    fn mineshaft_origin_ramp_only_before_1_13() {
        let old = Finder::new(Version::V1_12);
        let new = Finder::new(Version::V1_16_5);
        // Near the origin old mineshafts are additionally suppressed, so the
        // old count can never exceed the new one over the same area.
        let count = |f: &Finder| {
            (-40..40)
                .flat_map(|cx| (-40..40).map(move |cz| (cx, cz)))
                .filter(|&(cx, cz)| {
                    f.structure_pos(StructureType::Mineshaft, 424242, cx, cz)
                        .unwrap()
                        .is_some()
                })
                .count()
        };
        assert!(count(&old) <= count(&new));
    }
}
