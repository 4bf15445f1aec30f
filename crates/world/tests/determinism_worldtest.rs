//! Determinism Validation Worldtest
//!
//! Validates that biome and structure queries are completely deterministic.
//! Focus areas:
//! - Same seed produces identical biome grids across generator instances
//! - Query order independence (windows vs. pointwise)
//! - Scale-1 Voronoi agrees with the scale-4 grid where cells are uniform
//! - Structure positions are stable under interleaved queries
//! - Metrics artifact export

use seedsight_testkit::{BiomeMetrics, MetricsReport, StructureMetrics, TestResult};
use seedsight_world::{Dimension, Finder, Generator, Range, StructureType, Version};
use std::collections::HashSet;
use std::time::Instant;

const WORLD_SEED: u64 = 11223344556677;
const GRID: i32 = 48;

#[test]
fn determinism_worldtest() {
    let start = Instant::now();
    let mut report = MetricsReport::new("determinism_worldtest");
    let mut phases = 0;
    let mut cells = 0usize;
    let mut unique = HashSet::new();

    // ═══════════════════════════════════════════════════════════════════
    // Phase 1: identical grids across independent generators
    // ═══════════════════════════════════════════════════════════════════
    for &mc in &[Version::V1_7, Version::V1_12, Version::V1_16_5, Version::V1_18, Version::V1_21_1]
    {
        let mut a = Generator::new(mc, 0).unwrap();
        let mut b = Generator::new(mc, 0).unwrap();
        a.apply_seed(WORLD_SEED, Dimension::Overworld);
        b.apply_seed(WORLD_SEED, Dimension::Overworld);

        let r = Range::new_2d(4, -GRID / 2, -GRID / 2, GRID, GRID);
        let grid_a = a.gen_biomes(r).unwrap();
        let grid_b = b.gen_biomes(r).unwrap();
        assert_eq!(grid_a, grid_b, "grid mismatch on {mc}");

        cells += grid_a.len();
        unique.extend(grid_a.iter().map(|b| b.id()));
    }
    phases += 1;

    // ═══════════════════════════════════════════════════════════════════
    // Phase 2: windowed generation equals pointwise queries
    // ═══════════════════════════════════════════════════════════════════
    for &mc in &[Version::V1_16_5, Version::V1_18] {
        let mut g = Generator::new(mc, 0).unwrap();
        g.apply_seed(WORLD_SEED, Dimension::Overworld);
        let r = Range::new_2d(4, 7, -13, 20, 20);
        let grid = g.gen_biomes(r).unwrap();
        for zi in 0..r.sz {
            for xi in 0..r.sx {
                assert_eq!(
                    grid[(zi * r.sx + xi) as usize],
                    g.biome_at(4, r.x + xi, 0, r.z + zi),
                    "{mc} cell ({xi},{zi})"
                );
            }
        }
        cells += grid.len();
    }
    phases += 1;

    // ═══════════════════════════════════════════════════════════════════
    // Phase 3: 1:1 refinement reproduces uniform 1:4 neighborhoods
    // ═══════════════════════════════════════════════════════════════════
    for &mc in &[Version::V1_16_5, Version::V1_18] {
        let mut g = Generator::new(mc, 0).unwrap();
        g.apply_seed(WORLD_SEED, Dimension::Overworld);

        let mut r = Range::new_2d(4, 0, 0, 24, 24);
        // Sample the 1:4 grid at the sea-level cell so the depth channel
        // matches the block-level queries below.
        r.y = 15;
        let cells4 = g.gen_biomes(r).unwrap();
        let mut checked = 0;
        for cj in 1..22 {
            for ci in 1..22 {
                let v = cells4[(cj * 24 + ci) as usize];
                // All cells the block's corner search can reach must agree.
                let uniform = (-1..=1).all(|dj| {
                    (-1..=1).all(|di| cells4[((cj + dj) * 24 + ci + di) as usize] == v)
                });
                if !uniform {
                    continue;
                }
                let bx = ci * 4 + 1;
                let bz = cj * 4 + 1;
                assert_eq!(g.biome_at(1, bx, 62, bz), v, "{mc} block ({bx},{bz})");
                checked += 1;
            }
        }
        assert!(checked > 0, "{mc}: no uniform neighborhood in the window");
    }
    phases += 1;

    // ═══════════════════════════════════════════════════════════════════
    // Phase 4: structure queries are pure functions
    // ═══════════════════════════════════════════════════════════════════
    let finder = Finder::new(Version::V1_21_1);
    let mut g = Generator::new(Version::V1_21_1, 0).unwrap();
    g.apply_seed(WORLD_SEED, Dimension::Overworld);

    let mut attempts = 0;
    let mut viable = 0;
    let mut first_pass = Vec::new();
    for rz in -4..4 {
        for rx in -4..4 {
            let p = finder
                .structure_pos(StructureType::Village, WORLD_SEED, rx, rz)
                .unwrap();
            if let Some(p) = p {
                attempts += 1;
                if g.is_viable_pos(StructureType::Village, p) {
                    viable += 1;
                }
            }
            first_pass.push(p);
        }
    }
    // Interleave biome traffic, then re-derive every position.
    let _ = g.gen_biomes(Range::new_2d(4, -64, -64, 32, 32)).unwrap();
    let mut idx = 0;
    for rz in -4..4 {
        for rx in -4..4 {
            let p = finder
                .structure_pos(StructureType::Village, WORLD_SEED, rx, rz)
                .unwrap();
            assert_eq!(p, first_pass[idx], "region ({rx},{rz}) drifted");
            idx += 1;
        }
    }
    phases += 1;

    report.result = TestResult::Pass;
    report.biomes = Some(BiomeMetrics {
        cells_sampled: cells,
        unique_biomes: unique.len(),
        cells_per_second: cells as f64 / start.elapsed().as_secs_f64(),
    });
    report.structures = Some(StructureMetrics {
        regions_scanned: 64,
        attempts,
        viable,
    });
    report.execution.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    report.execution.phases = phases;
    report
        .write_to_file("target/metrics/determinism_worldtest.json")
        .expect("metrics export");
}
