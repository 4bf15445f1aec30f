//! The biome generator facade.
//!
//! A [`Generator`] is built once per (version, flags), re-seeded with
//! [`Generator::apply_seed`], and then queried freely: a seeded generator is
//! read-only and safe to share across threads. Only the Overworld has a biome
//! source; queries in other dimensions return [`Biome::None`] rather than
//! failing, which is what the structure-viability rules expect.

use crate::climate::{BiomeNoise, SAMPLE_NO_SHIFT};
use crate::layers::LayerStack;
use crate::structures::{structure_config, Pos};
use crate::voronoi::{voronoi_access_3d, voronoi_sha};
use seedsight_core::{Biome, Dimension, StructureType, Version};
use thiserror::Error;

/// Generator flag: use the LARGE_BIOMES world preset.
pub const LARGE_BIOMES: u32 = 0x1;
/// Generator flag: keep 1.13+ ocean variants visible at scales above 4.
pub const FORCE_OCEAN_VARIANTS: u32 = 0x2;

/// A query window. `x`/`z` are in units of `scale` blocks; `y`/`sy` are used
/// by 3-D (climate) queries and normalized to a single layer otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// Blocks per cell: 1, 4, 16, 64 or 256.
    pub scale: i32,
    /// Window origin (in scale units).
    pub x: i32,
    /// Window origin (in scale units).
    pub z: i32,
    /// Window width.
    pub sx: i32,
    /// Window depth.
    pub sz: i32,
    /// Vertical origin (cell units for scale ≥ 4, blocks for scale 1).
    pub y: i32,
    /// Vertical extent (0 behaves as 1).
    pub sy: i32,
}

impl Range {
    /// A 2-D window at the given scale.
    pub const fn new_2d(scale: i32, x: i32, z: i32, sx: i32, sz: i32) -> Self {
        Self {
            scale,
            x,
            z,
            sx,
            sz,
            y: 0,
            sy: 1,
        }
    }
}

/// Errors from generator construction and windowed queries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// The version predates the implemented layer stack.
    #[error("version {0} has no biome generator (1.7 or newer required)")]
    UnsupportedVersion(Version),
    /// A window with a non-positive volume.
    #[error("invalid range: sx={sx} sy={sy} sz={sz}")]
    InvalidRange {
        /// Requested width.
        sx: i32,
        /// Requested height.
        sy: i32,
        /// Requested depth.
        sz: i32,
    },
    /// A scale outside {1, 4, 16, 64, 256}.
    #[error("unsupported biome scale {0} (use 1, 4, 16, 64 or 256)")]
    InvalidScale(i32),
}

enum Engine {
    Layered(LayerStack),
    Climate(BiomeNoise),
}

/// Version-parameterized biome oracle.
pub struct Generator {
    mc: Version,
    flags: u32,
    seed: u64,
    dim: Dimension,
    sha: u64,
    seeded: bool,
    engine: Engine,
}

impl Generator {
    /// Build a generator for a version. Flags: [`LARGE_BIOMES`],
    /// [`FORCE_OCEAN_VARIANTS`].
    pub fn new(mc: Version, flags: u32) -> Result<Self, GeneratorError> {
        if mc < Version::V1_7 {
            return Err(GeneratorError::UnsupportedVersion(mc));
        }
        let engine = if mc.is_climate() {
            Engine::Climate(BiomeNoise::new(mc))
        } else {
            Engine::Layered(LayerStack::new(mc, flags & LARGE_BIOMES != 0))
        };
        Ok(Self {
            mc,
            flags,
            seed: 0,
            dim: Dimension::Overworld,
            sha: 0,
            seeded: false,
            engine,
        })
    }

    /// The generator's version.
    pub const fn version(&self) -> Version {
        self.mc
    }

    /// The applied dimension.
    pub const fn dimension(&self) -> Dimension {
        self.dim
    }

    /// Derive all per-seed state for (seed, dimension).
    pub fn apply_seed(&mut self, seed: u64, dim: Dimension) {
        self.seed = seed;
        self.dim = dim;
        self.seeded = true;
        match &mut self.engine {
            Engine::Layered(stack) => {
                stack.apply_seed(seed);
                self.sha = if self.mc >= Version::V1_15 {
                    voronoi_sha(seed)
                } else {
                    0
                };
            }
            Engine::Climate(noise) => {
                noise.set_seed(seed, self.flags & LARGE_BIOMES != 0);
                self.sha = voronoi_sha(seed);
            }
        }
        tracing::debug!(seed, dim = dim.as_str(), mc = %self.mc, "applied world seed");
    }

    /// Biome at a single cell. `x`/`z` are in units of `scale`; `y` is the
    /// block height for scale 1 and the cell height for larger scales.
    /// Returns [`Biome::None`] for dimensions without a biome source.
    pub fn biome_at(&self, scale: i32, x: i32, y: i32, z: i32) -> Biome {
        if !self.seeded || self.dim != Dimension::Overworld {
            return Biome::None;
        }
        let id = match &self.engine {
            Engine::Layered(stack) => {
                if self.flags & FORCE_OCEAN_VARIANTS != 0 && matches!(scale, 16 | 64 | 256) {
                    let s4 = scale / 4;
                    let cx = x * s4 + s4 / 2;
                    let cz = z * s4 + s4 / 2;
                    match stack.entry(4) {
                        Some(entry) => stack.get_map(entry, cx, cz, 1, 1)[0],
                        None => return Biome::None,
                    }
                } else {
                    match stack.entry(scale) {
                        Some(entry) => stack.get_map(entry, x, z, 1, 1)[0],
                        None => return Biome::None,
                    }
                }
            }
            Engine::Climate(noise) => match scale {
                1 => {
                    let (cx, cy, cz) = voronoi_access_3d(self.sha, x, y, z);
                    noise.sample(cx, cy, cz, 0)
                }
                4 => noise.sample(x, y, z, 0),
                16 | 64 | 256 => {
                    let s4 = scale / 4;
                    noise.sample(x * s4 + s4 / 2, y, z * s4 + s4 / 2, SAMPLE_NO_SHIFT)
                }
                _ => return Biome::None,
            },
        };
        Biome::from_id(id).unwrap_or(Biome::None)
    }

    /// Generate biomes over a window. Output is row-major with z outer,
    /// y middle, x inner. Layered versions are 2-D: `sy` collapses to 1.
    pub fn gen_biomes(&self, r: Range) -> Result<Vec<Biome>, GeneratorError> {
        let sy = r.sy.max(1);
        if r.sx <= 0 || r.sz <= 0 || r.sy < 0 {
            return Err(GeneratorError::InvalidRange {
                sx: r.sx,
                sy: r.sy,
                sz: r.sz,
            });
        }
        if !matches!(r.scale, 1 | 4 | 16 | 64 | 256) {
            return Err(GeneratorError::InvalidScale(r.scale));
        }

        match &self.engine {
            Engine::Layered(stack) => {
                if self.dim != Dimension::Overworld || !self.seeded {
                    return Ok(vec![Biome::None; (r.sx * r.sz) as usize]);
                }
                if self.flags & FORCE_OCEAN_VARIANTS != 0 && matches!(r.scale, 16 | 64 | 256) {
                    let mut out = Vec::with_capacity((r.sx * r.sz) as usize);
                    for zi in 0..r.sz {
                        for xi in 0..r.sx {
                            out.push(self.biome_at(r.scale, r.x + xi, 0, r.z + zi));
                        }
                    }
                    return Ok(out);
                }
                let entry = stack
                    .entry(r.scale)
                    .ok_or(GeneratorError::InvalidScale(r.scale))?;
                let ids = stack.get_map(entry, r.x, r.z, r.sx, r.sz);
                Ok(ids
                    .into_iter()
                    .map(|id| Biome::from_id(id).unwrap_or(Biome::None))
                    .collect())
            }
            Engine::Climate(_) => {
                let mut out = Vec::with_capacity((r.sx * sy * r.sz) as usize);
                for zi in 0..r.sz {
                    for yi in 0..sy {
                        for xi in 0..r.sx {
                            out.push(self.biome_at(r.scale, r.x + xi, r.y + yi, r.z + zi));
                        }
                    }
                }
                Ok(out)
            }
        }
    }

    /// Whether a structure-generation attempt at block (x, z) is
    /// biome-viable. `_variant_flags` is reserved for village-variant
    /// selection and currently ignored.
    pub fn is_viable_structure_pos(
        &self,
        structure: StructureType,
        x: i32,
        z: i32,
        _variant_flags: u32,
    ) -> bool {
        use StructureType as S;

        let Ok(cfg) = structure_config(structure, self.mc) else {
            return false;
        };
        if cfg.dim != self.dim {
            return false;
        }

        match cfg.dim {
            Dimension::Nether => {
                // No Nether biome source: fortress attempts always pass, and
                // the bastion's basalt-deltas exclusion passes vacuously.
                return structure != S::Bastion
                    || self.biome_at(1, x, 64, z) != Biome::BasaltDeltas;
            }
            Dimension::End => {
                return self.biome_at(1, x, 64, z) == Biome::EndHighlands;
            }
            Dimension::Overworld => {}
        }

        let biome = self.biome_at(1, x, 64, z);
        match structure {
            S::Village => {
                let base = matches!(
                    biome,
                    Biome::Plains | Biome::Desert | Biome::Savanna | Biome::Taiga | Biome::SnowyTaiga
                );
                if self.mc >= Version::V1_18 {
                    base || matches!(biome, Biome::Meadow | Biome::SnowyPlains)
                } else {
                    base || biome == Biome::SnowyTundra
                }
            }
            S::DesertPyramid => matches!(biome, Biome::Desert | Biome::DesertLakes),
            S::JunglePyramid => matches!(biome, Biome::Jungle | Biome::BambooJungle),
            S::SwampHut => biome == Biome::Swamp,
            S::Igloo => {
                matches!(biome, Biome::SnowyTundra | Biome::SnowyTaiga)
                    || (self.mc >= Version::V1_18 && biome == Biome::SnowyPlains)
            }
            S::Feature => matches!(
                biome,
                Biome::Desert
                    | Biome::DesertLakes
                    | Biome::Jungle
                    | Biome::BambooJungle
                    | Biome::Swamp
                    | Biome::SnowyTundra
                    | Biome::SnowyTaiga
            ),
            S::OceanRuin => biome.is_oceanic(),
            S::Shipwreck => {
                biome.is_oceanic() || matches!(biome, Biome::Beach | Biome::SnowyBeach)
            }
            S::Monument => biome.is_deep_ocean(),
            S::Mansion => matches!(biome, Biome::DarkForest | Biome::DarkForestHills),
            S::AncientCity => biome == Biome::DeepDark,
            S::TrailRuins => matches!(
                biome,
                Biome::Taiga
                    | Biome::SnowyTaiga
                    | Biome::OldGrowthBirchForest
                    | Biome::OldGrowthPineTaiga
                    | Biome::OldGrowthSpruceTaiga
                    | Biome::Jungle
                    | Biome::SparseJungle
                    | Biome::BambooJungle
            ),
            // Outposts, trial chambers and the remaining overworld structures
            // place anywhere their dimension allows.
            _ => true,
        }
    }

    /// Convenience: viability at a structure position.
    pub fn is_viable_pos(&self, structure: StructureType, pos: Pos) -> bool {
        self.is_viable_structure_pos(structure, pos.x, pos.z, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_versions_are_rejected() {
        assert_eq!(
            Generator::new(Version::V1_6, 0).err(),
            Some(GeneratorError::UnsupportedVersion(Version::V1_6))
        );
        assert!(Generator::new(Version::V1_7, 0).is_ok());
        assert!(Generator::new(Version::V1_21_1, 0).is_ok());
    }

    #[test]
    fn queries_without_a_seed_return_the_sentinel() {
        let g = Generator::new(Version::V1_16_5, 0).unwrap();
        assert_eq!(g.biome_at(4, 0, 0, 0), Biome::None);
    }

    #[test]
    fn nether_queries_return_the_sentinel() {
        let mut g = Generator::new(Version::V1_16_5, 0).unwrap();
        g.apply_seed(1, Dimension::Nether);
        assert_eq!(g.biome_at(1, 0, 64, 0), Biome::None);
        // But the overworld works after re-applying.
        g.apply_seed(1, Dimension::Overworld);
        assert_ne!(g.biome_at(1, 0, 64, 0), Biome::None);
    }

    #[test]
    fn biome_at_is_deterministic_across_generators() {
        for &mc in &[Version::V1_12, Version::V1_16_5, Version::V1_18] {
            let mut a = Generator::new(mc, 0).unwrap();
            let mut b = Generator::new(mc, 0).unwrap();
            a.apply_seed(987654, Dimension::Overworld);
            b.apply_seed(987654, Dimension::Overworld);
            for i in 0..20 {
                let (x, z) = (i * 53 - 500, i * 31 - 300);
                assert_eq!(a.biome_at(1, x, 64, z), b.biome_at(1, x, 64, z), "{mc}");
                assert_eq!(a.biome_at(4, x, 15, z), b.biome_at(4, x, 15, z), "{mc}");
            }
        }
    }

    #[test]
    fn gen_biomes_matches_pointwise_queries() {
        let mut g = Generator::new(Version::V1_18, 0).unwrap();
        g.apply_seed(2468, Dimension::Overworld);
        let r = Range::new_2d(4, -8, -8, 16, 16);
        let grid = g.gen_biomes(r).unwrap();
        for zi in 0..16 {
            for xi in 0..16 {
                assert_eq!(
                    grid[(zi * 16 + xi) as usize],
                    g.biome_at(4, r.x + xi, 0, r.z + zi),
                    "cell ({xi},{zi})"
                );
            }
        }
    }

    #[test]
    fn gen_biomes_rejects_empty_windows() {
        let mut g = Generator::new(Version::V1_18, 0).unwrap();
        g.apply_seed(1, Dimension::Overworld);
        assert!(matches!(
            g.gen_biomes(Range::new_2d(4, 0, 0, 0, 8)),
            Err(GeneratorError::InvalidRange { .. })
        ));
        assert!(matches!(
            g.gen_biomes(Range::new_2d(3, 0, 0, 8, 8)),
            Err(GeneratorError::InvalidScale(3))
        ));
    }

    #[test]
    fn fortress_viability_tracks_the_dimension() {
        let mut g = Generator::new(Version::V1_16_5, 0).unwrap();
        g.apply_seed(7, Dimension::Overworld);
        assert!(!g.is_viable_structure_pos(StructureType::Fortress, 100, 100, 0));
        g.apply_seed(7, Dimension::Nether);
        assert!(g.is_viable_structure_pos(StructureType::Fortress, 100, 100, 0));
        assert!(g.is_viable_structure_pos(StructureType::Bastion, 100, 100, 0));
        // Overworld structures are never viable in the nether.
        assert!(!g.is_viable_structure_pos(StructureType::Village, 100, 100, 0));
    }

    #[test]
    fn viability_agrees_with_the_sampled_biome() {
        let mut g = Generator::new(Version::V1_16_5, 0).unwrap();
        g.apply_seed(1337, Dimension::Overworld);
        for i in 0..50 {
            let (x, z) = (i * 97 - 2000, i * 61 - 1500);
            let biome = g.biome_at(1, x, 64, z);
            let viable = g.is_viable_structure_pos(StructureType::SwampHut, x, z, 0);
            assert_eq!(viable, biome == Biome::Swamp, "at ({x},{z}) biome {biome}");
        }
    }

    #[test]
    fn large_biomes_flag_changes_legacy_output() {
        let mut plain = Generator::new(Version::V1_16_5, 0).unwrap();
        let mut large = Generator::new(Version::V1_16_5, LARGE_BIOMES).unwrap();
        plain.apply_seed(24601, Dimension::Overworld);
        large.apply_seed(24601, Dimension::Overworld);
        let a = plain.gen_biomes(Range::new_2d(4, -32, -32, 64, 64)).unwrap();
        let b = large.gen_biomes(Range::new_2d(4, -32, -32, 64, 64)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn forced_ocean_variants_surface_at_coarse_scales() {
        let mut g = Generator::new(Version::V1_16_5, FORCE_OCEAN_VARIANTS).unwrap();
        g.apply_seed(31337, Dimension::Overworld);
        // The forced path must agree with the scale-4 map sampled at the
        // matching cell centers.
        for i in 0..10 {
            let (x, z) = (i * 3 - 15, i * 2 - 10);
            let forced = g.biome_at(16, x, 0, z);
            let expect = g.biome_at(4, x * 4 + 2, 0, z * 4 + 2);
            assert_eq!(forced, expect);
        }
    }
}
