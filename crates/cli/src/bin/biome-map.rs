//! Biome Map Tool
//!
//! Debugging utility for inspecting generator output.
//!
//! Features:
//! - Biome map display (ASCII art) at any query scale
//! - Structure attempt listing with viability per region window
//!
//! Usage:
//!   biome-map biomes --version 1.18 --seed 12345 --region -40,-40,40,40
//!   biome-map biomes --version 1.16.5 --seed 1 --scale 16 --region -20,-20,20,20
//!   biome-map structures --version 1.21.1 --seed 0 --structure trial_chambers --region -5,-5,5,5

use anyhow::Result;
use seedsight_world::{Biome, Dimension, Finder, Generator, Range, StructureType, Version};
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
struct Config {
    command: Command,
    version: Version,
    seed: u64,
    output: Option<PathBuf>,
}

#[derive(Debug)]
enum Command {
    Biomes {
        scale: i32,
        min_x: i32,
        min_z: i32,
        max_x: i32,
        max_z: i32,
    },
    Structures {
        structure: StructureType,
        min_rx: i32,
        min_rz: i32,
        max_rx: i32,
        max_rz: i32,
    },
    Help,
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Ok(Config {
            command: Command::Help,
            version: Version::NEWEST,
            seed: 0,
            output: None,
        });
    }

    let command_name = args[1].clone();
    let mut version = Version::NEWEST;
    let mut seed = 0u64;
    let mut scale = 4;
    let mut region = (-32, -32, 32, 32);
    let mut structure = StructureType::Village;
    let mut output = None;

    let mut i = 2;
    while i < args.len() {
        let take = |i: &mut usize| -> Result<String, String> {
            *i += 1;
            args.get(*i)
                .cloned()
                .ok_or_else(|| format!("{} expects a value", args[*i - 1]))
        };
        match args[i].as_str() {
            "--version" => {
                let v = take(&mut i)?;
                version = Version::parse(&v).ok_or_else(|| format!("unknown version {v}"))?;
            }
            "--seed" => {
                let v = take(&mut i)?;
                seed = v
                    .parse::<i64>()
                    .map(|s| s as u64)
                    .or_else(|_| v.parse::<u64>())
                    .map_err(|_| format!("bad seed {v}"))?;
            }
            "--scale" => {
                let v = take(&mut i)?;
                scale = v.parse().map_err(|_| format!("bad scale {v}"))?;
            }
            "--structure" => {
                let v = take(&mut i)?;
                structure =
                    StructureType::parse(&v).ok_or_else(|| format!("unknown structure {v}"))?;
            }
            "--region" => {
                let v = take(&mut i)?;
                let parts: Vec<i32> = v
                    .split(',')
                    .map(|p| p.trim().parse())
                    .collect::<Result<_, _>>()
                    .map_err(|_| format!("bad region {v} (want x0,z0,x1,z1)"))?;
                if parts.len() != 4 {
                    return Err(format!("bad region {v} (want x0,z0,x1,z1)"));
                }
                region = (parts[0], parts[1], parts[2], parts[3]);
            }
            "--output" => output = Some(PathBuf::from(take(&mut i)?)),
            other => return Err(format!("unknown argument {other}")),
        }
        i += 1;
    }

    let command = match command_name.as_str() {
        "biomes" => Command::Biomes {
            scale,
            min_x: region.0,
            min_z: region.1,
            max_x: region.2,
            max_z: region.3,
        },
        "structures" => Command::Structures {
            structure,
            min_rx: region.0,
            min_rz: region.1,
            max_rx: region.2,
            max_rz: region.3,
        },
        "help" | "--help" | "-h" => Command::Help,
        other => return Err(format!("unknown command {other}")),
    };

    Ok(Config {
        command,
        version,
        seed,
        output,
    })
}

fn main() -> Result<()> {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            print_help();
            std::process::exit(2);
        }
    };

    let rendered = match config.command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Biomes {
            scale,
            min_x,
            min_z,
            max_x,
            max_z,
        } => render_biome_map(&config, scale, min_x, min_z, max_x, max_z)?,
        Command::Structures {
            structure,
            min_rx,
            min_rz,
            max_rx,
            max_rz,
        } => render_structures(&config, structure, min_rx, min_rz, max_rx, max_rz)?,
    };

    match &config.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn print_help() {
    eprintln!("biome-map - render generator output as ASCII");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  biomes      --version <v> --seed <s> [--scale 1|4|16|64|256] --region x0,z0,x1,z1");
    eprintln!("  structures  --version <v> --seed <s> --structure <name> --region rx0,rz0,rx1,rz1");
    eprintln!();
    eprintln!("  --output <path> writes the rendering to a file instead of stdout");
}

/// One display glyph per biome family, chosen for contrast on dark terminals.
fn biome_glyph(b: Biome) -> char {
    use Biome as B;
    match b {
        B::None => '!',
        b if b.is_deep_ocean() => '#',
        b if b.is_oceanic() => '~',
        B::River | B::FrozenRiver => '=',
        B::Beach | B::SnowyBeach | B::StoneShore | B::StonyShore => '.',
        B::Desert | B::DesertHills | B::DesertLakes => 'd',
        B::Badlands
        | B::ErodedBadlands
        | B::WoodedBadlands
        | B::WoodedBadlandsPlateau
        | B::BadlandsPlateau
        | B::ModifiedBadlandsPlateau
        | B::ModifiedWoodedBadlandsPlateau => 'b',
        B::Savanna | B::SavannaPlateau | B::ShatteredSavanna | B::ShatteredSavannaPlateau
        | B::WindsweptSavanna => 's',
        B::Jungle | B::JungleHills | B::JungleEdge | B::ModifiedJungle | B::ModifiedJungleEdge
        | B::BambooJungle | B::BambooJungleHills | B::SparseJungle => 'j',
        B::Swamp | B::SwampHills | B::MangroveSwamp => 'w',
        B::MushroomFields | B::MushroomFieldShore => 'M',
        B::SnowyTundra | B::SnowyPlains | B::IceSpikes | B::SnowyMountains => '*',
        B::SnowyTaiga | B::SnowyTaigaHills | B::SnowyTaigaMountains => '+',
        B::Taiga | B::TaigaHills | B::TaigaMountains | B::GiantTreeTaiga | B::GiantTreeTaigaHills
        | B::GiantSpruceTaiga | B::GiantSpruceTaigaHills | B::OldGrowthPineTaiga
        | B::OldGrowthSpruceTaiga => 't',
        B::DarkForest | B::DarkForestHills | B::PaleGarden => 'D',
        B::Forest | B::WoodedHills | B::FlowerForest | B::BirchForest | B::BirchForestHills
        | B::TallBirchForest | B::TallBirchHills | B::OldGrowthBirchForest => 'f',
        B::Plains | B::SunflowerPlains | B::Meadow | B::CherryGrove => ',',
        B::Mountains | B::WoodedMountains | B::GravellyMountains | B::ModifiedGravellyMountains
        | B::MountainEdge | B::WindsweptHills | B::WindsweptForest | B::WindsweptGravellyHills => '^',
        B::JaggedPeaks | B::FrozenPeaks | B::StonyPeaks | B::SnowySlopes | B::Grove => 'A',
        B::DripstoneCaves | B::LushCaves | B::DeepDark => 'c',
        _ => '?',
    }
}

fn render_biome_map(
    config: &Config,
    scale: i32,
    min_x: i32,
    min_z: i32,
    max_x: i32,
    max_z: i32,
) -> Result<String> {
    let mut gen = Generator::new(config.version, 0)?;
    gen.apply_seed(config.seed, Dimension::Overworld);

    let sx = max_x - min_x + 1;
    let sz = max_z - min_z + 1;
    let mut r = Range::new_2d(scale, min_x, min_z, sx, sz);
    // Sample around sea level.
    r.y = if scale == 1 { 64 } else { 15 };
    let grid = gen.gen_biomes(r)?;

    let mut out = String::new();
    out.push_str(&format!(
        "biomes @ scale {} | seed {} | version {} | x {}..{} z {}..{}\n",
        scale, config.seed, config.version, min_x, max_x, min_z, max_z
    ));
    for zi in 0..sz {
        for xi in 0..sx {
            out.push(biome_glyph(grid[(zi * sx + xi) as usize]));
        }
        out.push('\n');
    }
    Ok(out)
}

fn render_structures(
    config: &Config,
    structure: StructureType,
    min_rx: i32,
    min_rz: i32,
    max_rx: i32,
    max_rz: i32,
) -> Result<String> {
    let finder = Finder::new(config.version);
    let mut gen = Generator::new(config.version, 0)?;
    gen.apply_seed(config.seed, Dimension::Overworld);

    let mut out = String::new();
    out.push_str(&format!(
        "{} attempts | seed {} | version {} | regions ({},{})..({},{})\n",
        structure, config.seed, config.version, min_rx, min_rz, max_rx, max_rz
    ));
    let mut attempts = 0;
    let mut viable = 0;
    for rz in min_rz..=max_rz {
        for rx in min_rx..=max_rx {
            let pos = match finder.structure_pos(structure, config.seed, rx, rz) {
                Ok(Some(pos)) => pos,
                Ok(None) => continue,
                Err(err) => {
                    out.push_str(&format!("{err}\n"));
                    return Ok(out);
                }
            };
            attempts += 1;
            let ok = gen.is_viable_pos(structure, pos);
            if ok {
                viable += 1;
            }
            out.push_str(&format!(
                "  region ({:>3},{:>3}) -> ({:>7},{:>7}) {}\n",
                rx,
                rz,
                pos.x,
                pos.z,
                if ok { "viable" } else { "-" }
            ));
        }
    }
    out.push_str(&format!("{attempts} attempts, {viable} viable\n"));
    Ok(out)
}
