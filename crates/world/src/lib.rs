#![warn(missing_docs)]
//! Deterministic Overworld world-generation prediction.
//!
//! Given a 64-bit world seed and a target game version this crate answers,
//! bit-for-bit as the game would: what biome is at a position, where does a
//! region's structure-generation attempt land, and is that attempt
//! biome-viable. Everything is a pure function of (version, flags, seed,
//! query); there is no I/O and no global mutable state.

pub mod climate;
pub mod generator;
pub mod layers;
pub mod noise;
pub mod rng;
pub mod structures;
pub mod voronoi;

pub use climate::{BiomeNoise, BiomeTree};
pub use generator::{Generator, GeneratorError, Range, FORCE_OCEAN_VARIANTS, LARGE_BIOMES};
pub use layers::LayerStack;
pub use noise::{DoublePerlinNoise, OctaveNoise, PerlinNoise};
pub use rng::{JavaRandom, Xoroshiro128};
pub use structures::{
    chunk_generate_rnd, structure_config, Finder, PlacementKind, Pos, StructureConfig,
    StructureError,
};
pub use voronoi::{voronoi_access_3d, voronoi_sha};

pub use seedsight_core::{Biome, Dimension, StructureType, Version};
