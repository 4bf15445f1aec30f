//! 1.18+ climate sampling and the packed biome parameter tree.
//!
//! Six double-Perlin channels (temperature, humidity, continentalness,
//! erosion, shift and weirdness) are sampled per cell, quantized to units of
//! 1/10000, and resolved to a biome by nearest-parameter-box search over a
//! packed decision tree.
//!
//! The tree's leaf boxes are generated from the overworld climate parameter
//! tables rather than stored pre-expanded; the generation walks the same
//! weirdness slices the game does. Two trees exist: 1.18–1.20, and 1.21+
//! (cherry grove plateau variants, pale garden).

use crate::noise::DoublePerlinNoise;
use crate::rng::Xoroshiro128;
use seedsight_core::{Biome, Version};
use std::sync::OnceLock;

/// Climate channel indices.
pub const NP_TEMPERATURE: usize = 0;
/// Humidity channel.
pub const NP_HUMIDITY: usize = 1;
/// Continentalness channel.
pub const NP_CONTINENTALNESS: usize = 2;
/// Erosion channel.
pub const NP_EROSION: usize = 3;
/// Shift channel; its slot doubles as depth in the sampled vector.
pub const NP_SHIFT: usize = 4;
/// Depth occupies the shift slot after sampling.
pub const NP_DEPTH: usize = NP_SHIFT;
/// Weirdness channel.
pub const NP_WEIRDNESS: usize = 5;
/// Number of climate channels.
pub const NP_MAX: usize = 6;

/// Skip the coordinate shift (used by coarse-scale queries).
pub const SAMPLE_NO_SHIFT: u32 = 0x1;
/// Skip the depth computation (leaves the depth param at zero).
pub const SAMPLE_NO_DEPTH: u32 = 0x2;

/// The six climate channels for one seeded generator.
#[derive(Clone)]
pub struct BiomeNoise {
    climate: [DoublePerlinNoise; NP_MAX],
    mc: Version,
}

impl BiomeNoise {
    /// Create unseeded channels for a version.
    pub fn new(mc: Version) -> Self {
        Self {
            climate: std::array::from_fn(|_| DoublePerlinNoise::default()),
            mc,
        }
    }

    /// Derive all channel noises from the world seed. `large` selects the
    /// LARGE_BIOMES octave ranges and fork constants.
    pub fn set_seed(&mut self, seed: u64, large: bool) {
        let mut xr = Xoroshiro128::from_seed(seed);
        let xlo = xr.next_long();
        let xhi = xr.next_long();
        for np in 0..NP_MAX {
            self.init_climate_seed(np, xlo, xhi, large);
        }
    }

    fn init_climate_seed(&mut self, nptype: usize, xlo: u64, xhi: u64, large: bool) {
        let (amp, lo, hi, omin, len): (&[f64], u64, u64, i32, i32) = match nptype {
            NP_SHIFT => {
                let amp: &[f64] = &[1.0, 1.0, 1.0, 0.0];
                (amp, 0x080518cf6af25384, 0x3f3dfb40a54febd5, -3, 4)
            }
            NP_TEMPERATURE => {
                let amp: &[f64] = &[1.5, 0.0, 1.0, 0.0, 0.0, 0.0];
                if large {
                    (amp, 0x944b0073edf549db, 0x4ff44347e9d22b96, -12, 6)
                } else {
                    (amp, 0x5c7e6b29735f0d7f, 0xf7d86f1bbc734988, -10, 6)
                }
            }
            NP_HUMIDITY => {
                let amp: &[f64] = &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
                if large {
                    (amp, 0x71b8ab943dbd5301, 0xbb63ddcf39ff7a2b, -10, 6)
                } else {
                    (amp, 0x81bb4d22e8dc168e, 0xf1c8b4bea16303cd, -8, 6)
                }
            }
            NP_CONTINENTALNESS => {
                let amp: &[f64] = &[1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0];
                if large {
                    (amp, 0x9a3f51a113fce8dc, 0xee2dbd157e5dcdad, -11, 9)
                } else {
                    (amp, 0x83886c9d0ae3a662, 0xafa638a61b42e8ad, -9, 9)
                }
            }
            NP_EROSION => {
                let amp: &[f64] = &[1.0, 1.0, 0.0, 1.0, 1.0];
                if large {
                    (amp, 0x8c984b1f8702a951, 0xead7b1f92bae535f, -11, 5)
                } else {
                    (amp, 0xd02491e6058f6fd8, 0x4792512c94c17a80, -9, 5)
                }
            }
            NP_WEIRDNESS => {
                let amp: &[f64] = &[1.0, 2.0, 1.0, 0.0, 0.0, 0.0];
                (amp, 0xefc8ef4d36102b34, 0x1beeeb324a0f24ea, -7, 6)
            }
            _ => unreachable!("climate channel index"),
        };
        let mut xr = Xoroshiro128::from_state(xlo ^ lo, xhi ^ hi);
        self.climate[nptype].init_xoroshiro(&mut xr, amp, omin, len);
    }

    /// Sample the climate vector at cell (x, y, z), quantized to 1/10000.
    pub fn sample_np(&self, x: i32, y: i32, z: i32, flags: u32) -> [u64; NP_MAX] {
        let mut fx = x as f64;
        let mut fz = z as f64;

        if flags & SAMPLE_NO_SHIFT == 0 {
            fx += self.climate[NP_SHIFT].sample(x as f64, 0.0, z as f64) * 4.0;
            // The shift channel's inputs are swapped on the z axis on purpose.
            fz += self.climate[NP_SHIFT].sample(z as f64, x as f64, 0.0) * 4.0;
        }

        let q = |v: f64| (v * 10000.0) as i32 as i64 as u64;
        let mut np = [0u64; NP_MAX];
        np[NP_TEMPERATURE] = q(self.climate[NP_TEMPERATURE].sample(fx, 0.0, fz));
        np[NP_HUMIDITY] = q(self.climate[NP_HUMIDITY].sample(fx, 0.0, fz));
        np[NP_CONTINENTALNESS] = q(self.climate[NP_CONTINENTALNESS].sample(fx, 0.0, fz));
        np[NP_EROSION] = q(self.climate[NP_EROSION].sample(fx, 0.0, fz));
        np[NP_WEIRDNESS] = q(self.climate[NP_WEIRDNESS].sample(fx, 0.0, fz));

        // Depth is a linear falloff from the surface; the terrain spline is
        // intentionally not wired in here.
        np[NP_DEPTH] = if flags & SAMPLE_NO_DEPTH == 0 {
            q(1.0 - (y * 4) as f64 / 128.0 - 83.0 / 160.0)
        } else {
            0
        };

        np
    }

    /// Biome at cell (x, y, z).
    pub fn sample(&self, x: i32, y: i32, z: i32, flags: u32) -> i32 {
        let np = self.sample_np(x, y, z, flags);
        biome_tree(self.mc).lookup(&np)
    }
}

/// The packed nearest-parameter-box tree.
///
/// `nodes[i]`: low 48 bits are six 8-bit indices into `param` pairs; the top
/// 16 bits are the first-child index for inner nodes, or (negative) the leaf
/// marker with the biome id in bits 48–55. `steps[depth]` is the child stride
/// per depth, zero-terminated; `order` is the fan-out.
pub struct BiomeTree {
    steps: Vec<u32>,
    param: Vec<i32>,
    nodes: Vec<u64>,
    order: u32,
}

impl BiomeTree {
    /// Squared gap between `np` and the node's parameter box.
    fn np_dist(&self, np: &[u64; NP_MAX], idx: usize) -> u64 {
        let node = self.nodes[idx];
        let mut ds = 0u64;
        for (i, &v) in np.iter().enumerate() {
            let para = ((node >> (8 * i)) & 0xFF) as usize;
            let min = self.param[2 * para] as i64 as u64;
            let max = self.param[2 * para + 1] as i64 as u64;
            // Wrapped differences with signed tests handle boxes and samples
            // on opposite sides of zero.
            let a = v.wrapping_sub(max);
            let b = min.wrapping_sub(v);
            let d = if (a as i64) > 0 {
                a
            } else if (b as i64) > 0 {
                b
            } else {
                0
            };
            ds = ds.wrapping_add(d.wrapping_mul(d));
        }
        ds
    }

    fn resulting_node(
        &self,
        np: &[u64; NP_MAX],
        idx: usize,
        alt: usize,
        mut ds: u64,
        mut depth: usize,
    ) -> usize {
        if self.steps[depth] == 0 {
            return idx;
        }
        let mut step = self.steps[depth] as usize;
        while idx + step >= self.nodes.len() {
            depth += 1;
            step = self.steps[depth] as usize;
            if step == 0 {
                return idx;
            }
        }

        let node = self.nodes[idx];
        let inner = (node >> 48) as i16;
        if inner < 0 {
            return idx;
        }
        let mut inner = inner as usize;

        let mut leaf = alt;
        for _ in 0..self.order {
            if inner >= self.nodes.len() {
                break;
            }
            let ds_inner = self.np_dist(np, inner);
            if ds_inner < ds {
                let leaf2 = self.resulting_node(np, inner, leaf, ds, depth + 1);
                let ds_leaf2 = if inner == leaf2 {
                    ds_inner
                } else {
                    self.np_dist(np, leaf2)
                };
                if ds_leaf2 < ds {
                    ds = ds_leaf2;
                    leaf = leaf2;
                }
            }
            inner += step;
            if inner >= self.nodes.len() {
                break;
            }
        }
        leaf
    }

    /// Resolve a climate vector to a biome id.
    pub fn lookup(&self, np: &[u64; NP_MAX]) -> i32 {
        let idx = self.resulting_node(np, 0, 0, u64::MAX, 0);
        ((self.nodes[idx] >> 48) & 0xFF) as i32
    }

    /// Whether a node index holds a leaf.
    pub fn is_leaf(&self, idx: usize) -> bool {
        ((self.nodes[idx] >> 48) as i16) < 0
    }

    /// Leaf count (tree fan-out at the root).
    pub fn leaf_count(&self) -> usize {
        self.order as usize
    }

    /// Brute-force nearest leaf, for validation.
    #[cfg(test)]
    fn lookup_linear(&self, np: &[u64; NP_MAX]) -> i32 {
        let mut best = u64::MAX;
        let mut best_idx = 0;
        for idx in 1..self.nodes.len() {
            let d = self.np_dist(np, idx);
            if d < best {
                best = d;
                best_idx = idx;
            }
        }
        ((self.nodes[best_idx] >> 48) & 0xFF) as i32
    }
}

/// The parameter tree serving a climate-generation version.
pub fn biome_tree(mc: Version) -> &'static BiomeTree {
    static TREE_18: OnceLock<BiomeTree> = OnceLock::new();
    static TREE_21: OnceLock<BiomeTree> = OnceLock::new();
    if mc >= Version::V1_21_1 {
        TREE_21.get_or_init(|| pack_tree(&build_entries(true)))
    } else {
        TREE_18.get_or_init(|| pack_tree(&build_entries(false)))
    }
}

/// One leaf parameter box: [temp, humid, cont, erosion, depth, weirdness].
struct ClimateEntry {
    ranges: [(f64, f64); NP_MAX],
    biome: Biome,
}

/// Pack entries into the flat tree layout: node 0 is the root whose box is
/// the union of all leaves; nodes 1..=N are the leaves in insertion order
/// (ties in the nearest search resolve to the earliest entry, matching the
/// game's list order).
fn pack_tree(entries: &[ClimateEntry]) -> BiomeTree {
    let mut param: Vec<i32> = Vec::new();
    let mut pair_index = |param: &mut Vec<i32>, min: i32, max: i32| -> u64 {
        let mut k = 0;
        while k < param.len() / 2 {
            if param[2 * k] == min && param[2 * k + 1] == max {
                return k as u64;
            }
            k += 1;
        }
        param.push(min);
        param.push(max);
        assert!(param.len() / 2 <= 256, "parameter pool overflow");
        (param.len() / 2 - 1) as u64
    };
    let quant = |v: f64| (v * 10000.0) as i32;

    let mut nodes = Vec::with_capacity(entries.len() + 1);
    nodes.push(0u64); // root placeholder

    let mut union: [(i32, i32); NP_MAX] = [(i32::MAX, i32::MIN); NP_MAX];
    for e in entries {
        let mut packed = 0u64;
        for (i, &(lo, hi)) in e.ranges.iter().enumerate() {
            let (lo, hi) = (quant(lo), quant(hi));
            union[i].0 = union[i].0.min(lo);
            union[i].1 = union[i].1.max(hi);
            packed |= pair_index(&mut param, lo, hi) << (8 * i);
        }
        let high = 0xFF00u64 | (e.biome.id() as u64 & 0xFF);
        nodes.push(packed | (high << 48));
    }

    let mut root = 0u64;
    for (i, &(lo, hi)) in union.iter().enumerate() {
        root |= pair_index(&mut param, lo, hi) << (8 * i);
    }
    nodes[0] = root | (1u64 << 48);

    BiomeTree {
        steps: vec![1, 0],
        param,
        nodes,
        order: entries.len() as u32,
    }
}

// ---------------------------------------------------------------------------
// Parameter table generation.
// ---------------------------------------------------------------------------

const FULL: (f64, f64) = (-1.0, 1.0);

const TEMPS: [(f64, f64); 5] = [
    (-1.0, -0.45),
    (-0.45, -0.15),
    (-0.15, 0.2),
    (0.2, 0.55),
    (0.55, 1.0),
];

const HUMIDS: [(f64, f64); 5] = [
    (-1.0, -0.35),
    (-0.35, -0.1),
    (-0.1, 0.1),
    (0.1, 0.3),
    (0.3, 1.0),
];

const EROSIONS: [(f64, f64); 7] = [
    (-1.0, -0.78),
    (-0.78, -0.375),
    (-0.375, -0.2225),
    (-0.2225, 0.05),
    (0.05, 0.45),
    (0.45, 0.55),
    (0.55, 1.0),
];

// Continentalness bands.
const C_MUSHROOM: (f64, f64) = (-1.2, -1.05);
const C_DEEP_OCEAN: (f64, f64) = (-1.05, -0.455);
const C_OCEAN: (f64, f64) = (-0.455, -0.19);
const C_COAST: (f64, f64) = (-0.19, -0.11);
const C_INLAND: (f64, f64) = (-0.11, 0.55);
const C_NEAR_INLAND: (f64, f64) = (-0.11, 0.03);
const C_MID_INLAND: (f64, f64) = (0.03, 0.3);
const C_FAR_INLAND: (f64, f64) = (0.3, 1.0);

const OCEANS: [[Biome; 5]; 2] = [
    [
        Biome::DeepFrozenOcean,
        Biome::DeepColdOcean,
        Biome::DeepOcean,
        Biome::DeepLukewarmOcean,
        Biome::WarmOcean,
    ],
    [
        Biome::FrozenOcean,
        Biome::ColdOcean,
        Biome::Ocean,
        Biome::LukewarmOcean,
        Biome::WarmOcean,
    ],
];

const MIDDLE: [[Biome; 5]; 5] = [
    [
        Biome::SnowyPlains,
        Biome::SnowyPlains,
        Biome::SnowyPlains,
        Biome::SnowyTaiga,
        Biome::Taiga,
    ],
    [
        Biome::Plains,
        Biome::Plains,
        Biome::Forest,
        Biome::Taiga,
        Biome::OldGrowthSpruceTaiga,
    ],
    [
        Biome::FlowerForest,
        Biome::Plains,
        Biome::Forest,
        Biome::BirchForest,
        Biome::DarkForest,
    ],
    [
        Biome::Savanna,
        Biome::Savanna,
        Biome::Forest,
        Biome::Jungle,
        Biome::Jungle,
    ],
    [
        Biome::Desert,
        Biome::Desert,
        Biome::Desert,
        Biome::Desert,
        Biome::Desert,
    ],
];

const PLATEAU: [[Biome; 5]; 5] = [
    [
        Biome::SnowyPlains,
        Biome::SnowyPlains,
        Biome::SnowyPlains,
        Biome::SnowyTaiga,
        Biome::SnowyTaiga,
    ],
    [
        Biome::Meadow,
        Biome::Meadow,
        Biome::Forest,
        Biome::Taiga,
        Biome::OldGrowthSpruceTaiga,
    ],
    [
        Biome::Meadow,
        Biome::Meadow,
        Biome::Meadow,
        Biome::Meadow,
        Biome::DarkForest,
    ],
    [
        Biome::SavannaPlateau,
        Biome::SavannaPlateau,
        Biome::Forest,
        Biome::Forest,
        Biome::Jungle,
    ],
    [
        Biome::Badlands,
        Biome::Badlands,
        Biome::Badlands,
        Biome::WoodedBadlands,
        Biome::WoodedBadlands,
    ],
];

const SHATTERED: [[Option<Biome>; 5]; 5] = [
    [
        Some(Biome::WindsweptGravellyHills),
        Some(Biome::WindsweptGravellyHills),
        Some(Biome::WindsweptHills),
        Some(Biome::WindsweptForest),
        Some(Biome::WindsweptForest),
    ],
    [
        Some(Biome::WindsweptGravellyHills),
        Some(Biome::WindsweptGravellyHills),
        Some(Biome::WindsweptHills),
        Some(Biome::WindsweptForest),
        Some(Biome::WindsweptForest),
    ],
    [
        Some(Biome::WindsweptHills),
        Some(Biome::WindsweptHills),
        Some(Biome::WindsweptHills),
        Some(Biome::WindsweptForest),
        Some(Biome::WindsweptForest),
    ],
    [None, None, None, None, None],
    [None, None, None, None, None],
];

/// Version-dependent variant tables plus the slice walker.
struct ParamTables {
    middle_variant: [[Option<Biome>; 5]; 5],
    plateau_variant: [[Option<Biome>; 5]; 5],
    entries: Vec<ClimateEntry>,
}

fn span(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0.min(b.0), a.1.max(b.1))
}

impl ParamTables {
    fn new(v121: bool) -> Self {
        let mut middle_variant: [[Option<Biome>; 5]; 5] = [
            [Some(Biome::IceSpikes), None, Some(Biome::SnowyTaiga), None, None],
            [None, None, None, None, Some(Biome::OldGrowthPineTaiga)],
            [
                Some(Biome::SunflowerPlains),
                None,
                None,
                Some(Biome::OldGrowthBirchForest),
                None,
            ],
            [None, None, Some(Biome::Plains), Some(Biome::SparseJungle), Some(Biome::BambooJungle)],
            [None, None, None, None, None],
        ];
        let mut plateau_variant: [[Option<Biome>; 5]; 5] = [
            [Some(Biome::IceSpikes), None, None, None, None],
            [None, None, Some(Biome::Meadow), Some(Biome::Meadow), Some(Biome::OldGrowthPineTaiga)],
            [None, None, Some(Biome::Forest), Some(Biome::BirchForest), None],
            [None, None, None, None, None],
            [Some(Biome::ErodedBadlands), Some(Biome::ErodedBadlands), None, None, None],
        ];
        if v121 {
            plateau_variant[1][0] = Some(Biome::CherryGrove);
            plateau_variant[2][0] = Some(Biome::CherryGrove);
            plateau_variant[2][1] = Some(Biome::CherryGrove);
            middle_variant[2][4] = Some(Biome::PaleGarden);
        }
        Self {
            middle_variant,
            plateau_variant,
            entries: Vec::new(),
        }
    }

    fn surface(
        &mut self,
        t: (f64, f64),
        h: (f64, f64),
        c: (f64, f64),
        e: (f64, f64),
        w: (f64, f64),
        biome: Biome,
    ) {
        // Surface boxes exist at depth 0 and depth 1.
        for depth in [0.0, 1.0] {
            self.entries.push(ClimateEntry {
                ranges: [t, h, c, e, (depth, depth), w],
                biome,
            });
        }
    }

    fn underground(
        &mut self,
        t: (f64, f64),
        h: (f64, f64),
        c: (f64, f64),
        e: (f64, f64),
        w: (f64, f64),
        biome: Biome,
    ) {
        self.entries.push(ClimateEntry {
            ranges: [t, h, c, e, (0.2, 0.9), w],
            biome,
        });
    }

    fn bottom(
        &mut self,
        t: (f64, f64),
        h: (f64, f64),
        c: (f64, f64),
        e: (f64, f64),
        w: (f64, f64),
        biome: Biome,
    ) {
        self.entries.push(ClimateEntry {
            ranges: [t, h, c, e, (1.1, 1.1), w],
            biome,
        });
    }

    // Biome pickers; `w.1 < 0` selects the non-variant table.

    fn middle_biome(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        if w.1 < 0.0 {
            MIDDLE[t][h]
        } else {
            self.middle_variant[t][h].unwrap_or(MIDDLE[t][h])
        }
    }

    fn badlands(&self, h: usize, w: (f64, f64)) -> Biome {
        if h < 2 {
            if w.1 < 0.0 {
                Biome::Badlands
            } else {
                Biome::ErodedBadlands
            }
        } else if h < 3 {
            Biome::Badlands
        } else {
            Biome::WoodedBadlands
        }
    }

    fn middle_or_badlands(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        if t == 4 {
            self.badlands(h, w)
        } else {
            self.middle_biome(t, h, w)
        }
    }

    fn middle_or_badlands_or_slope(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        if t == 0 {
            self.slope_biome(t, h, w)
        } else {
            self.middle_or_badlands(t, h, w)
        }
    }

    fn windswept_or(&self, t: usize, h: usize, w: (f64, f64), fallback: Biome) -> Biome {
        if t > 1 && h < 4 && w.1 >= 0.0 {
            Biome::WindsweptSavanna
        } else {
            fallback
        }
    }

    fn shattered_coast(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        let base = if w.1 >= 0.0 {
            self.middle_biome(t, h, w)
        } else {
            self.beach_biome(t)
        };
        self.windswept_or(t, h, w, base)
    }

    fn beach_biome(&self, t: usize) -> Biome {
        if t == 0 {
            Biome::SnowyBeach
        } else if t == 4 {
            Biome::Desert
        } else {
            Biome::Beach
        }
    }

    fn plateau_biome(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        if w.1 >= 0.0 {
            if let Some(v) = self.plateau_variant[t][h] {
                return v;
            }
        }
        PLATEAU[t][h]
    }

    fn peak_biome(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        if t <= 2 {
            if w.1 < 0.0 {
                Biome::JaggedPeaks
            } else {
                Biome::FrozenPeaks
            }
        } else if t == 3 {
            Biome::StonyPeaks
        } else {
            self.badlands(h, w)
        }
    }

    fn slope_biome(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        if t >= 3 {
            self.plateau_biome(t, h, w)
        } else if h <= 1 {
            Biome::SnowySlopes
        } else {
            Biome::Grove
        }
    }

    fn shattered_biome(&self, t: usize, h: usize, w: (f64, f64)) -> Biome {
        SHATTERED[t][h].unwrap_or_else(|| self.middle_biome(t, h, w))
    }

    fn off_coast(&mut self) {
        self.surface(FULL, FULL, C_MUSHROOM, FULL, FULL, Biome::MushroomFields);
        for t in 0..TEMPS.len() {
            self.surface(TEMPS[t], FULL, C_DEEP_OCEAN, FULL, FULL, OCEANS[0][t]);
            self.surface(TEMPS[t], FULL, C_OCEAN, FULL, FULL, OCEANS[1][t]);
        }
    }

    fn inland(&mut self) {
        self.mid_slice((-1.0, -0.93333334));
        self.high_slice((-0.93333334, -0.7666667));
        self.peaks((-0.7666667, -0.56666666));
        self.high_slice((-0.56666666, -0.4));
        self.mid_slice((-0.4, -0.26666668));
        self.low_slice((-0.26666668, -0.05));
        self.valleys((-0.05, 0.05));
        self.low_slice((0.05, 0.26666668));
        self.mid_slice((0.26666668, 0.4));
        self.high_slice((0.4, 0.56666666));
        self.peaks((0.56666666, 0.7666667));
        self.high_slice((0.7666667, 0.93333334));
        self.mid_slice((0.93333334, 1.0));
    }

    fn peaks(&mut self, w: (f64, f64)) {
        for t in 0..TEMPS.len() {
            for h in 0..HUMIDS.len() {
                let tt = TEMPS[t];
                let hh = HUMIDS[h];
                let middle = self.middle_biome(t, h, w);
                let mid_bad = self.middle_or_badlands(t, h, w);
                let mid_bad_slope = self.middle_or_badlands_or_slope(t, h, w);
                let plateau = self.plateau_biome(t, h, w);
                let shattered = self.shattered_biome(t, h, w);
                let windswept = self.windswept_or(t, h, w, shattered);
                let peak = self.peak_biome(t, h, w);

                self.surface(tt, hh, span(C_COAST, C_FAR_INLAND), EROSIONS[0], w, peak);
                self.surface(tt, hh, span(C_COAST, C_NEAR_INLAND), EROSIONS[1], w, mid_bad_slope);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[1], w, peak);
                self.surface(
                    tt,
                    hh,
                    span(C_COAST, C_NEAR_INLAND),
                    span(EROSIONS[2], EROSIONS[3]),
                    w,
                    middle,
                );
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[2], w, plateau);
                self.surface(tt, hh, C_MID_INLAND, EROSIONS[3], w, mid_bad);
                self.surface(tt, hh, C_FAR_INLAND, EROSIONS[3], w, plateau);
                self.surface(tt, hh, span(C_COAST, C_FAR_INLAND), EROSIONS[4], w, middle);
                self.surface(tt, hh, span(C_COAST, C_NEAR_INLAND), EROSIONS[5], w, windswept);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[5], w, shattered);
                self.surface(tt, hh, span(C_COAST, C_FAR_INLAND), EROSIONS[6], w, middle);
            }
        }
    }

    fn high_slice(&mut self, w: (f64, f64)) {
        for t in 0..TEMPS.len() {
            for h in 0..HUMIDS.len() {
                let tt = TEMPS[t];
                let hh = HUMIDS[h];
                let middle = self.middle_biome(t, h, w);
                let mid_bad = self.middle_or_badlands(t, h, w);
                let mid_bad_slope = self.middle_or_badlands_or_slope(t, h, w);
                let plateau = self.plateau_biome(t, h, w);
                let shattered = self.shattered_biome(t, h, w);
                let windswept = self.windswept_or(t, h, w, middle);
                let slope = self.slope_biome(t, h, w);
                let peak = self.peak_biome(t, h, w);

                self.surface(tt, hh, C_COAST, span(EROSIONS[0], EROSIONS[1]), w, middle);
                self.surface(tt, hh, C_NEAR_INLAND, EROSIONS[0], w, slope);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[0], w, peak);
                self.surface(tt, hh, C_NEAR_INLAND, EROSIONS[1], w, mid_bad_slope);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[1], w, slope);
                self.surface(
                    tt,
                    hh,
                    span(C_COAST, C_NEAR_INLAND),
                    span(EROSIONS[2], EROSIONS[3]),
                    w,
                    middle,
                );
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[2], w, plateau);
                self.surface(tt, hh, C_MID_INLAND, EROSIONS[3], w, mid_bad);
                self.surface(tt, hh, C_FAR_INLAND, EROSIONS[3], w, plateau);
                self.surface(tt, hh, span(C_COAST, C_FAR_INLAND), EROSIONS[4], w, middle);
                self.surface(tt, hh, span(C_COAST, C_NEAR_INLAND), EROSIONS[5], w, windswept);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[5], w, shattered);
                self.surface(tt, hh, span(C_COAST, C_FAR_INLAND), EROSIONS[6], w, middle);
            }
        }
    }

    fn mid_slice(&mut self, w: (f64, f64)) {
        self.surface(
            FULL,
            FULL,
            C_COAST,
            span(EROSIONS[0], EROSIONS[2]),
            w,
            Biome::StonyShore,
        );
        self.surface(
            span(TEMPS[1], TEMPS[2]),
            FULL,
            span(C_NEAR_INLAND, C_FAR_INLAND),
            EROSIONS[6],
            w,
            Biome::Swamp,
        );
        self.surface(
            span(TEMPS[3], TEMPS[4]),
            FULL,
            span(C_NEAR_INLAND, C_FAR_INLAND),
            EROSIONS[6],
            w,
            Biome::MangroveSwamp,
        );

        for t in 0..TEMPS.len() {
            for h in 0..HUMIDS.len() {
                let tt = TEMPS[t];
                let hh = HUMIDS[h];
                let middle = self.middle_biome(t, h, w);
                let mid_bad = self.middle_or_badlands(t, h, w);
                let mid_bad_slope = self.middle_or_badlands_or_slope(t, h, w);
                let shattered = self.shattered_biome(t, h, w);
                let plateau = self.plateau_biome(t, h, w);
                let beach = self.beach_biome(t);
                let windswept = self.windswept_or(t, h, w, middle);
                let shattered_coast = self.shattered_coast(t, h, w);
                let slope = self.slope_biome(t, h, w);

                self.surface(tt, hh, span(C_NEAR_INLAND, C_FAR_INLAND), EROSIONS[0], w, slope);
                self.surface(tt, hh, span(C_NEAR_INLAND, C_MID_INLAND), EROSIONS[1], w, mid_bad_slope);
                self.surface(
                    tt,
                    hh,
                    C_FAR_INLAND,
                    EROSIONS[1],
                    w,
                    if t == 0 { slope } else { plateau },
                );
                self.surface(tt, hh, C_NEAR_INLAND, EROSIONS[2], w, middle);
                self.surface(tt, hh, C_MID_INLAND, EROSIONS[2], w, mid_bad);
                self.surface(tt, hh, C_FAR_INLAND, EROSIONS[2], w, plateau);
                self.surface(tt, hh, span(C_COAST, C_NEAR_INLAND), EROSIONS[3], w, middle);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[3], w, mid_bad);

                if w.1 < 0.0 {
                    self.surface(tt, hh, C_COAST, EROSIONS[4], w, beach);
                    self.surface(tt, hh, span(C_NEAR_INLAND, C_FAR_INLAND), EROSIONS[4], w, middle);
                } else {
                    self.surface(tt, hh, span(C_COAST, C_FAR_INLAND), EROSIONS[4], w, middle);
                }

                self.surface(tt, hh, C_COAST, EROSIONS[5], w, shattered_coast);
                self.surface(tt, hh, C_NEAR_INLAND, EROSIONS[5], w, windswept);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[5], w, shattered);

                if w.1 < 0.0 {
                    self.surface(tt, hh, C_COAST, EROSIONS[6], w, beach);
                } else {
                    self.surface(tt, hh, C_COAST, EROSIONS[6], w, middle);
                }
                if t == 0 {
                    self.surface(tt, hh, span(C_NEAR_INLAND, C_FAR_INLAND), EROSIONS[6], w, middle);
                }
            }
        }
    }

    fn low_slice(&mut self, w: (f64, f64)) {
        self.surface(
            FULL,
            FULL,
            C_COAST,
            span(EROSIONS[0], EROSIONS[2]),
            w,
            Biome::StonyShore,
        );
        self.surface(
            span(TEMPS[1], TEMPS[2]),
            FULL,
            span(C_NEAR_INLAND, C_FAR_INLAND),
            EROSIONS[6],
            w,
            Biome::Swamp,
        );
        self.surface(
            span(TEMPS[3], TEMPS[4]),
            FULL,
            span(C_NEAR_INLAND, C_FAR_INLAND),
            EROSIONS[6],
            w,
            Biome::MangroveSwamp,
        );

        for t in 0..TEMPS.len() {
            for h in 0..HUMIDS.len() {
                let tt = TEMPS[t];
                let hh = HUMIDS[h];
                let middle = self.middle_biome(t, h, w);
                let mid_bad = self.middle_or_badlands(t, h, w);
                let mid_bad_slope = self.middle_or_badlands_or_slope(t, h, w);
                let beach = self.beach_biome(t);
                let windswept = self.windswept_or(t, h, w, middle);
                let shattered_coast = self.shattered_coast(t, h, w);

                self.surface(tt, hh, C_NEAR_INLAND, span(EROSIONS[0], EROSIONS[1]), w, mid_bad);
                self.surface(
                    tt,
                    hh,
                    span(C_MID_INLAND, C_FAR_INLAND),
                    span(EROSIONS[0], EROSIONS[1]),
                    w,
                    mid_bad_slope,
                );
                self.surface(tt, hh, C_NEAR_INLAND, span(EROSIONS[2], EROSIONS[3]), w, middle);
                self.surface(
                    tt,
                    hh,
                    span(C_MID_INLAND, C_FAR_INLAND),
                    span(EROSIONS[2], EROSIONS[3]),
                    w,
                    mid_bad,
                );
                self.surface(tt, hh, C_COAST, span(EROSIONS[3], EROSIONS[4]), w, beach);
                self.surface(tt, hh, span(C_NEAR_INLAND, C_FAR_INLAND), EROSIONS[4], w, middle);
                self.surface(tt, hh, C_COAST, EROSIONS[5], w, shattered_coast);
                self.surface(tt, hh, C_NEAR_INLAND, EROSIONS[5], w, windswept);
                self.surface(tt, hh, span(C_MID_INLAND, C_FAR_INLAND), EROSIONS[5], w, middle);
                self.surface(tt, hh, C_COAST, EROSIONS[6], w, beach);
                if t == 0 {
                    self.surface(tt, hh, span(C_NEAR_INLAND, C_FAR_INLAND), EROSIONS[6], w, middle);
                }
            }
        }
    }

    fn valleys(&mut self, w: (f64, f64)) {
        let frozen = TEMPS[0];
        let unfrozen = span(TEMPS[1], TEMPS[4]);

        self.surface(
            frozen,
            FULL,
            C_COAST,
            span(EROSIONS[0], EROSIONS[1]),
            w,
            if w.1 < 0.0 { Biome::StonyShore } else { Biome::FrozenRiver },
        );
        self.surface(
            unfrozen,
            FULL,
            C_COAST,
            span(EROSIONS[0], EROSIONS[1]),
            w,
            if w.1 < 0.0 { Biome::StonyShore } else { Biome::River },
        );
        self.surface(
            frozen,
            FULL,
            C_NEAR_INLAND,
            span(EROSIONS[0], EROSIONS[1]),
            w,
            Biome::FrozenRiver,
        );
        self.surface(
            unfrozen,
            FULL,
            C_NEAR_INLAND,
            span(EROSIONS[0], EROSIONS[1]),
            w,
            Biome::River,
        );
        self.surface(
            frozen,
            FULL,
            span(C_COAST, C_FAR_INLAND),
            span(EROSIONS[2], EROSIONS[5]),
            w,
            Biome::FrozenRiver,
        );
        self.surface(
            unfrozen,
            FULL,
            span(C_COAST, C_FAR_INLAND),
            span(EROSIONS[2], EROSIONS[5]),
            w,
            Biome::River,
        );
        self.surface(frozen, FULL, C_COAST, EROSIONS[6], w, Biome::FrozenRiver);
        self.surface(unfrozen, FULL, C_COAST, EROSIONS[6], w, Biome::River);
        self.surface(
            span(TEMPS[1], TEMPS[2]),
            FULL,
            span(C_INLAND, C_FAR_INLAND),
            EROSIONS[6],
            w,
            Biome::Swamp,
        );
        self.surface(
            span(TEMPS[3], TEMPS[4]),
            FULL,
            span(C_INLAND, C_FAR_INLAND),
            EROSIONS[6],
            w,
            Biome::MangroveSwamp,
        );
        self.surface(
            frozen,
            FULL,
            span(C_INLAND, C_FAR_INLAND),
            EROSIONS[6],
            w,
            Biome::FrozenRiver,
        );

        for t in 0..TEMPS.len() {
            for h in 0..HUMIDS.len() {
                let mid_bad = self.middle_or_badlands(t, h, w);
                self.surface(
                    TEMPS[t],
                    HUMIDS[h],
                    span(C_MID_INLAND, C_FAR_INLAND),
                    span(EROSIONS[0], EROSIONS[1]),
                    w,
                    mid_bad,
                );
            }
        }
    }

    fn underground_biomes(&mut self) {
        self.underground(FULL, FULL, (0.8, 1.0), FULL, FULL, Biome::DripstoneCaves);
        self.underground(FULL, (0.7, 1.0), FULL, FULL, FULL, Biome::LushCaves);
        self.bottom(
            FULL,
            FULL,
            FULL,
            span(EROSIONS[0], EROSIONS[1]),
            FULL,
            Biome::DeepDark,
        );
    }
}

fn build_entries(v121: bool) -> Vec<ClimateEntry> {
    let mut t = ParamTables::new(v121);
    t.off_coast();
    t.inland();
    t.underground_biomes();
    t.entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_lookup_matches_brute_force() {
        let tree = biome_tree(Version::V1_18);
        // Deterministic pseudo-random climate vectors across the value range.
        let mut s = 0x9E3779B97F4A7C15u64;
        for _ in 0..2000 {
            let mut np = [0u64; NP_MAX];
            for v in np.iter_mut() {
                s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let raw = ((s >> 33) % 30000) as i64 - 15000;
                *v = raw as u64;
            }
            assert_eq!(tree.lookup(&np), tree.lookup_linear(&np));
        }
    }

    #[test]
    fn tree_lookup_returns_leaves() {
        let tree = biome_tree(Version::V1_18);
        let idx = tree.resulting_node(&[0; NP_MAX], 0, 0, u64::MAX, 0);
        assert!(tree.is_leaf(idx));
        assert!(!tree.is_leaf(0), "root is an inner node");
    }

    #[test]
    fn trees_differ_between_1_18_and_1_21() {
        let t18 = biome_tree(Version::V1_18);
        let t21 = biome_tree(Version::V1_21_1);
        let has = |t: &BiomeTree, b: Biome| {
            (1..=t.leaf_count()).any(|i| ((t.nodes[i] >> 48) & 0xFF) as i32 == b.id())
        };
        assert!(!has(t18, Biome::PaleGarden));
        assert!(has(t21, Biome::PaleGarden));
        assert!(!has(t18, Biome::CherryGrove));
        assert!(has(t21, Biome::CherryGrove));
        assert!(has(t18, Biome::DeepDark));
        assert!(has(t18, Biome::MangroveSwamp));
    }

    #[test]
    fn ocean_climate_resolves_to_ocean() {
        let tree = biome_tree(Version::V1_18);
        // Deep mid-temperature ocean: continentalness well below the coast
        // band, everything else neutral, surface depth.
        let np = |cont: i64| -> [u64; NP_MAX] {
            let mut np = [0u64; NP_MAX];
            np[NP_CONTINENTALNESS] = cont as u64;
            np
        };
        assert_eq!(tree.lookup(&np(-7000)), Biome::DeepOcean.id());
        assert_eq!(tree.lookup(&np(-3000)), Biome::Ocean.id());
        assert_eq!(tree.lookup(&np(-11500)), Biome::MushroomFields.id());
    }

    #[test]
    fn climate_sampling_is_deterministic() {
        let mut a = BiomeNoise::new(Version::V1_18);
        let mut b = BiomeNoise::new(Version::V1_18);
        a.set_seed(12345, false);
        b.set_seed(12345, false);
        for i in 0..50 {
            let (x, z) = (i * 13 - 300, i * 7 - 150);
            assert_eq!(a.sample(x, 15, z, 0), b.sample(x, 15, z, 0));
            assert_eq!(a.sample_np(x, 15, z, 0), b.sample_np(x, 15, z, 0));
        }
    }

    #[test]
    fn large_biomes_changes_the_sampling() {
        let mut a = BiomeNoise::new(Version::V1_18);
        let mut b = BiomeNoise::new(Version::V1_18);
        a.set_seed(777, false);
        b.set_seed(777, true);
        let mut differs = false;
        for i in 0..64 {
            let (x, z) = (i * 101, i * 37);
            if a.sample_np(x, 15, z, 0) != b.sample_np(x, 15, z, 0) {
                differs = true;
                break;
            }
        }
        assert!(differs, "LARGE_BIOMES must alter the climate fields");
    }

    #[test]
    fn no_depth_flag_zeroes_the_depth_param() {
        let mut bn = BiomeNoise::new(Version::V1_18);
        bn.set_seed(5, false);
        let np = bn.sample_np(10, 15, 10, SAMPLE_NO_DEPTH);
        assert_eq!(np[NP_DEPTH], 0);
        let np = bn.sample_np(10, 15, 10, 0);
        assert_ne!(np[NP_DEPTH], 0);
    }

    #[test]
    fn parameter_pool_fits_the_packed_index() {
        for v121 in [false, true] {
            let tree = pack_tree(&build_entries(v121));
            assert!(tree.param.len() / 2 <= 256);
            assert_eq!(tree.nodes.len() - 1, tree.leaf_count());
            assert_eq!(tree.steps, vec![1, 0]);
        }
    }
}
