//! Structure Scenario Worldtest
//!
//! End-to-end scenarios over the structure pipeline:
//! - Outpost attempt on 1.21.1/seed 0 stays in-region and reproduces its
//!   acceptance roll
//! - Village on 1.16.5 honors the reference salt/region/range
//! - Treasure acceptance follows its dedicated seed derivation
//! - Java-LCG reference vector cross-check
//! - The full 1.21.1 config table is pinned as a golden snapshot

use seedsight_testkit::assert_json_snapshot;
use seedsight_world::{Dimension, Finder, Generator, JavaRandom, StructureType, Version};
use serde::Serialize;
use std::path::Path;

#[test]
fn java_lcg_reference_vector() {
    let mut r = JavaRandom::new(0);
    assert_eq!(r.next_long(), -4962768465676381896);
}

#[test]
fn outpost_attempts_on_1_21_1_seed_zero() {
    let finder = Finder::new(Version::V1_21_1);
    let cfg = finder.structure_config(StructureType::Outpost).unwrap();
    let region_blocks = cfg.region_size * 16;

    let mut attempts = 0;
    for rz in -16..16 {
        for rx in -16..16 {
            let Some(p) = finder.structure_pos(StructureType::Outpost, 0, rx, rz).unwrap() else {
                continue;
            };
            attempts += 1;
            // In-region bounds.
            assert!(p.x >= rx * region_blocks && p.x < (rx + 1) * region_blocks);
            assert!(p.z >= rz * region_blocks && p.z < (rz + 1) * region_blocks);
            // The 1-in-5 acceptance roll must reproduce from the attempt seed.
            let s = 0u64 ^ (((p.x >> 4) >> 4) as u64) ^ ((((p.z >> 4) >> 4) as u64) << 4);
            let mut r = JavaRandom::new(s);
            r.next(31);
            assert_eq!(r.next_int(5), 0, "attempt at ({}, {})", p.x, p.z);
        }
    }
    // Roughly 1/5 of 1024 regions; anything in double digits means the
    // filter wiring is broken one way or the other.
    assert!(attempts > 100, "only {attempts} outpost attempts in 1024 regions");
    assert!(attempts < 400, "{attempts} outpost attempts in 1024 regions");
}

#[test]
fn village_1_16_5_reference_config_and_bounds() {
    let finder = Finder::new(Version::V1_16_5);
    let cfg = finder.structure_config(StructureType::Village).unwrap();
    assert_eq!(cfg.salt, 10387312);
    assert_eq!(cfg.region_size, 32);
    assert_eq!(cfg.chunk_range, 24);

    let p = finder
        .structure_pos(StructureType::Village, 12345, 0, 0)
        .unwrap()
        .expect("village regions always produce an attempt");
    assert!((0..24).contains(&(p.x >> 4)), "chunk x {}", p.x >> 4);
    assert!((0..24).contains(&(p.z >> 4)), "chunk z {}", p.z >> 4);
}

#[test]
fn treasure_1_12_2_seed_rule() {
    let finder = Finder::new(Version::V1_12);
    // Region (0,0) on seed 1: acceptance iff nextFloat() < 0.01 from the
    // treasure-specific seed (region terms vanish at the origin).
    let accepted = finder
        .structure_pos(StructureType::Treasure, 1, 0, 0)
        .unwrap()
        .is_some();
    let mut r = JavaRandom::new(1 + 10387320);
    assert_eq!(accepted, r.next_float() < 0.01);

    if let Some(p) = finder.structure_pos(StructureType::Treasure, 1, 3, -7).unwrap() {
        assert_eq!((p.x, p.z), (3 * 16 + 9, -7 * 16 + 9));
    }
}

#[test]
fn viable_search_finds_structures_on_known_versions() {
    // A coarse smoke-search: some viable village must exist in a modest
    // radius on both algorithm families.
    for &mc in &[Version::V1_16_5, Version::V1_18] {
        let finder = Finder::new(mc);
        let mut gen = Generator::new(mc, 0).unwrap();
        gen.apply_seed(12345, Dimension::Overworld);

        let mut viable = 0;
        'scan: for rz in -10..10 {
            for rx in -10..10 {
                if let Some(p) = finder.structure_pos(StructureType::Village, 12345, rx, rz).unwrap()
                {
                    if gen.is_viable_pos(StructureType::Village, p) {
                        viable += 1;
                        break 'scan;
                    }
                }
            }
        }
        assert!(viable > 0, "no viable village near spawn on {mc}");
    }
}

#[derive(Serialize)]
struct ConfigRow {
    structure: String,
    salt: u64,
    region_size: i32,
    chunk_range: i32,
}

#[test]
fn structure_config_table_1_21_1_golden() {
    let finder = Finder::new(Version::V1_21_1);
    let rows: Vec<ConfigRow> = StructureType::all()
        .iter()
        .filter_map(|&s| finder.structure_config(s).ok())
        .map(|cfg| ConfigRow {
            structure: cfg.structure.to_string(),
            salt: cfg.salt,
            region_size: cfg.region_size,
            chunk_range: cfg.chunk_range,
        })
        .collect();

    let golden = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/goldens/structure_configs_1_21_1.json");
    assert_json_snapshot(golden, &rows).unwrap();
}
