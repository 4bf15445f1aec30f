//! Seed Search Tool
//!
//! Scans structure regions around the origin, filters attempts by biome
//! viability, and reports matches sorted by distance. Pair/triple modes
//! additionally cluster results within a configurable distance.
//!
//! Usage:
//!   seedsight-cli --version 1.21.1 --seed 0 --structure outpost --radius 5000
//!   seedsight-cli --version 1.16.5 --seed 12345 --structure swamp_hut \
//!       --mode pairs --cluster-dist 128 --report html --output huts.html

use anyhow::{bail, Context, Result};
use seedsight_world::{Finder, Generator, Pos, StructureType, Version};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::fmt;

fn main() {
    let _ = fmt().with_max_level(Level::INFO).try_init();
    let config = match Config::from_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };
    if let Err(err) = run(config) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Nearest,
    Pairs,
    Triples,
    NearestPair,
    NearestTriple,
}

impl SearchMode {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "nearest" => Some(Self::Nearest),
            "pairs" => Some(Self::Pairs),
            "triples" => Some(Self::Triples),
            "nearest-pair" => Some(Self::NearestPair),
            "nearest-triple" => Some(Self::NearestTriple),
            _ => None,
        }
    }

    fn group_size(self) -> usize {
        match self {
            Self::Nearest => 1,
            Self::Pairs | Self::NearestPair => 2,
            Self::Triples | Self::NearestTriple => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Json,
    Markdown,
    Html,
}

#[derive(Debug)]
struct Config {
    version: Version,
    seed: u64,
    structure: StructureType,
    mode: SearchMode,
    radius: i32,
    workers: usize,
    cluster_dist: f64,
    report: Option<ReportFormat>,
    output: Option<PathBuf>,
}

impl Config {
    fn from_args() -> Result<Self> {
        let mut version = None;
        let mut seed = None;
        let mut structure = None;
        let mut mode = SearchMode::Nearest;
        let mut radius = 5000;
        let mut workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let mut cluster_dist = 128.0;
        let mut report = None;
        let mut output = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .with_context(|| format!("{name} expects a value"))
            };
            match arg.as_str() {
                "--version" => {
                    let v = value("--version")?;
                    version =
                        Some(Version::parse(&v).with_context(|| format!("unknown version {v}"))?);
                }
                "--seed" => {
                    let v = value("--seed")?;
                    // Accept negative seeds the way the game prints them.
                    seed = Some(match v.parse::<i64>() {
                        Ok(signed) => signed as u64,
                        Err(_) => v.parse::<u64>().with_context(|| format!("bad seed {v}"))?,
                    });
                }
                "--structure" => {
                    let v = value("--structure")?;
                    structure = Some(
                        StructureType::parse(&v)
                            .with_context(|| format!("unknown structure {v}"))?,
                    );
                }
                "--mode" => {
                    let v = value("--mode")?;
                    mode = SearchMode::parse(&v).with_context(|| format!("unknown mode {v}"))?;
                }
                "--radius" => radius = value("--radius")?.parse().context("bad --radius")?,
                "--workers" => workers = value("--workers")?.parse().context("bad --workers")?,
                "--cluster-dist" => {
                    cluster_dist = value("--cluster-dist")?.parse().context("bad --cluster-dist")?
                }
                "--report" => {
                    report = Some(match value("--report")?.as_str() {
                        "json" => ReportFormat::Json,
                        "md" | "markdown" => ReportFormat::Markdown,
                        "html" => ReportFormat::Html,
                        other => bail!("unknown report format {other}"),
                    });
                }
                "--output" => output = Some(PathBuf::from(value("--output")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown argument {other}"),
            }
        }

        if radius <= 0 {
            bail!("--radius must be positive");
        }
        Ok(Self {
            version: version.context("--version is required")?,
            seed: seed.context("--seed is required")?,
            structure: structure.context("--structure is required")?,
            mode,
            radius,
            workers: workers.max(1),
            cluster_dist,
            report,
            output,
        })
    }
}

fn print_usage() {
    eprintln!("seedsight-cli - structure search over a world seed");
    eprintln!();
    eprintln!("  --version <v>        Minecraft version (e.g. 1.21.1, 1.16.5)");
    eprintln!("  --seed <s>           world seed (decimal, negative accepted)");
    eprintln!("  --structure <name>   e.g. village, monument, swamp_hut, outpost");
    eprintln!("  --mode <m>           nearest | pairs | triples | nearest-pair | nearest-triple");
    eprintln!("  --radius <blocks>    search radius around the origin (default 5000)");
    eprintln!("  --workers <n>        worker threads (default: all cores)");
    eprintln!("  --cluster-dist <d>   max pairwise distance within a cluster (default 128)");
    eprintln!("  --report <fmt>       json | md | html");
    eprintln!("  --output <path>      report destination (default: stdout)");
}

#[derive(Debug, Clone, Serialize)]
struct Cluster {
    positions: Vec<Pos>,
    center_dist: f64,
}

#[derive(Debug, Serialize)]
struct SearchReport {
    version: String,
    seed: u64,
    structure: String,
    mode: String,
    radius: i32,
    duration_ms: u128,
    found: usize,
    clusters: Vec<Cluster>,
}

fn run(config: Config) -> Result<()> {
    let started = Instant::now();
    let finder = Finder::new(config.version);
    let cfg = finder
        .structure_config(config.structure)
        .with_context(|| format!("{} does not generate on {}", config.structure, config.version))?;

    let region_blocks = cfg.region_size * 16;
    let r = (config.radius + region_blocks - 1) / region_blocks;
    tracing::info!(
        structure = %config.structure,
        version = %config.version,
        seed = config.seed,
        regions = (2 * r + 1) * (2 * r + 1),
        workers = config.workers,
        "scanning regions"
    );

    let positions = scan_regions(&config, r);
    let mut positions = positions;
    positions.sort_by_key(|p| p.x as i64 * p.x as i64 + p.z as i64 * p.z as i64);

    tracing::info!(
        found = positions.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan complete"
    );

    if positions.is_empty() {
        println!("no viable {} within {} blocks", config.structure, config.radius);
        return Ok(());
    }

    let clusters = cluster_positions(&positions, config.mode, config.cluster_dist);
    if clusters.is_empty() {
        println!("no {}-cluster within {} blocks of spread", config.mode.group_size(), config.cluster_dist);
        return Ok(());
    }

    let report = SearchReport {
        version: config.version.to_string(),
        seed: config.seed,
        structure: config.structure.to_string(),
        mode: format!("{:?}", config.mode).to_lowercase(),
        radius: config.radius,
        duration_ms: started.elapsed().as_millis(),
        found: positions.len(),
        clusters,
    };
    emit_report(&config, &report)
}

/// Scan the (2r+1)^2 region square with a worker pool. Each worker owns its
/// finder and generator; regions are handed out row by row.
fn scan_regions(config: &Config, r: i32) -> Vec<Pos> {
    let next_row = AtomicUsize::new(0);
    let rows: Vec<i32> = (-r..=r).collect();
    let found = Mutex::new(Vec::new());
    let radius_sq = config.radius as i64 * config.radius as i64;

    std::thread::scope(|scope| {
        for _ in 0..config.workers {
            scope.spawn(|| {
                let finder = Finder::new(config.version);
                let mut gen = match Generator::new(config.version, 0) {
                    Ok(gen) => gen,
                    Err(_) => return,
                };
                gen.apply_seed(config.seed, seedsight_core::Dimension::Overworld);

                let mut local = Vec::new();
                loop {
                    let row = next_row.fetch_add(1, Ordering::Relaxed);
                    let Some(&rz) = rows.get(row) else { break };
                    for rx in -r..=r {
                        let Ok(Some(pos)) =
                            finder.structure_pos(config.structure, config.seed, rx, rz)
                        else {
                            continue;
                        };
                        let dist = pos.x as i64 * pos.x as i64 + pos.z as i64 * pos.z as i64;
                        if dist > radius_sq {
                            continue;
                        }
                        if gen.is_viable_pos(config.structure, pos) {
                            local.push(pos);
                        }
                    }
                }
                found.lock().expect("collector poisoned").extend(local);
            });
        }
    });

    found.into_inner().expect("collector poisoned")
}

fn dist(a: Pos, b: Pos) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dz = (a.z - b.z) as f64;
    (dx * dx + dz * dz).sqrt()
}

fn center_dist(ps: &[Pos]) -> f64 {
    let n = ps.len() as f64;
    let cx = ps.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let cz = ps.iter().map(|p| p.z as f64).sum::<f64>() / n;
    (cx * cx + cz * cz).sqrt()
}

/// Group sorted positions into clusters of the mode's size. The nearest-*
/// modes stop at the first match (positions are distance-sorted, so the
/// first is the closest-to-origin cluster the scan can produce).
fn cluster_positions(found: &[Pos], mode: SearchMode, cluster_dist: f64) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    match mode {
        SearchMode::Nearest => {
            clusters.push(Cluster {
                positions: vec![found[0]],
                center_dist: center_dist(&found[0..1]),
            });
        }
        SearchMode::Pairs | SearchMode::NearestPair => {
            'outer: for i in 0..found.len() {
                for j in i + 1..found.len() {
                    if dist(found[i], found[j]) < cluster_dist {
                        let ps = vec![found[i], found[j]];
                        clusters.push(Cluster {
                            center_dist: center_dist(&ps),
                            positions: ps,
                        });
                        if mode == SearchMode::NearestPair {
                            break 'outer;
                        }
                    }
                }
            }
        }
        SearchMode::Triples | SearchMode::NearestTriple => {
            'outer: for i in 0..found.len() {
                for j in i + 1..found.len() {
                    if dist(found[i], found[j]) >= cluster_dist {
                        continue;
                    }
                    for k in j + 1..found.len() {
                        if dist(found[j], found[k]) < cluster_dist
                            && dist(found[i], found[k]) < cluster_dist
                        {
                            let ps = vec![found[i], found[j], found[k]];
                            clusters.push(Cluster {
                                center_dist: center_dist(&ps),
                                positions: ps,
                            });
                            if mode == SearchMode::NearestTriple {
                                break 'outer;
                            }
                        }
                    }
                }
            }
        }
    }
    clusters.sort_by(|a, b| a.center_dist.total_cmp(&b.center_dist));
    clusters
}

fn emit_report(config: &Config, report: &SearchReport) -> Result<()> {
    let rendered = match config.report {
        None => render_text(report),
        Some(ReportFormat::Json) => serde_json::to_string_pretty(report)? + "\n",
        Some(ReportFormat::Markdown) => render_markdown(report),
        Some(ReportFormat::Html) => render_html(report),
    };
    match &config.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render_text(report: &SearchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} matches for {} (seed {}, {})",
        report.found, report.structure, report.seed, report.version
    );
    for (i, c) in report.clusters.iter().enumerate() {
        let coords: Vec<String> = c
            .positions
            .iter()
            .map(|p| format!("({}, {})", p.x, p.z))
            .collect();
        let _ = writeln!(
            out,
            "{:>3}. {}  (center distance {:.1})",
            i + 1,
            coords.join("  "),
            c.center_dist
        );
    }
    out
}

fn render_markdown(report: &SearchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} search", report.structure);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "seed `{}` | version {} | mode {} | radius {} | {} ms",
        report.seed, report.version, report.mode, report.radius, report.duration_ms
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| # | positions | center distance |");
    let _ = writeln!(out, "|---|---|---|");
    for (i, c) in report.clusters.iter().enumerate() {
        let coords: Vec<String> = c
            .positions
            .iter()
            .map(|p| format!("`/tp @s {} ~ {}`", p.x, p.z))
            .collect();
        let _ = writeln!(
            out,
            "| {} | {} | {:.1} |",
            i + 1,
            coords.join(" "),
            c.center_dist
        );
    }
    out
}

fn render_html(report: &SearchReport) -> String {
    let mut rows = String::new();
    for (i, c) in report.clusters.iter().enumerate() {
        let coords: Vec<String> = c
            .positions
            .iter()
            .map(|p| format!("<span class=\"coords\">/tp @s {} ~ {}</span>", p.x, p.z))
            .collect();
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td class=\"dist\">{:.1}</td></tr>",
            i + 1,
            coords.join(" | "),
            c.center_dist
        );
    }
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>seedsight search results</title>
<style>
  body {{ font-family: sans-serif; margin: 20px; background: #f0f0f0; }}
  .container {{ max-width: 1000px; margin: auto; background: white; padding: 20px;
               border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}
  h1 {{ color: #333; border-bottom: 2px solid #eee; padding-bottom: 10px; }}
  .meta {{ color: #666; margin-bottom: 20px; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
  th, td {{ padding: 12px; text-align: left; border-bottom: 1px solid #eee; }}
  th {{ background: #f8f8f8; }}
  .coords {{ font-family: monospace; background: #eee; padding: 2px 5px; border-radius: 3px; }}
  .dist {{ color: #888; font-size: 0.9em; }}
</style>
</head>
<body>
<div class="container">
<h1>{structure} search results</h1>
<div class="meta">
  <p>seed <b>{seed}</b> | version {version} | mode {mode}</p>
  <p>search took {duration} ms | clusters found: {count}</p>
</div>
<table>
<tr><th>#</th><th>positions</th><th>center distance</th></tr>
{rows}</table>
</div>
</body>
</html>
"#,
        structure = report.structure,
        seed = report.seed,
        version = report.version,
        mode = report.mode,
        duration = report.duration_ms,
        count = report.clusters.len(),
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, z: i32) -> Pos {
        Pos { x, z }
    }

    #[test]
    fn pairs_require_both_within_cluster_dist() {
        let found = vec![p(0, 0), p(50, 0), p(500, 500)];
        let clusters = cluster_positions(&found, SearchMode::Pairs, 128.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].positions, vec![p(0, 0), p(50, 0)]);
    }

    #[test]
    fn triples_check_all_three_edges() {
        // A chain (a-b close, b-c close, a-c far) is not a triple.
        let found = vec![p(0, 0), p(100, 0), p(200, 0), p(30, 30), p(60, -20)];
        let clusters = cluster_positions(&found, SearchMode::Triples, 128.0);
        for c in &clusters {
            for i in 0..3 {
                for j in i + 1..3 {
                    assert!(dist(c.positions[i], c.positions[j]) < 128.0);
                }
            }
        }
        assert!(!clusters.is_empty());
    }

    #[test]
    fn nearest_pair_stops_at_the_first_match() {
        let found = vec![p(10, 0), p(20, 0), p(1000, 0), p(1010, 0)];
        let clusters = cluster_positions(&found, SearchMode::NearestPair, 64.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].positions, vec![p(10, 0), p(20, 0)]);
    }

    #[test]
    fn clusters_sort_by_center_distance() {
        let found = vec![p(1000, 1000), p(1010, 1010), p(5, 5), p(15, 15)];
        let clusters = cluster_positions(&found, SearchMode::Pairs, 64.0);
        assert_eq!(clusters.len(), 2);
        assert!(clusters[0].center_dist < clusters[1].center_dist);
    }

    #[test]
    fn html_report_contains_teleport_commands() {
        let report = SearchReport {
            version: "1.21.1".into(),
            seed: 42,
            structure: "outpost".into(),
            mode: "pairs".into(),
            radius: 5000,
            duration_ms: 10,
            found: 2,
            clusters: vec![Cluster {
                positions: vec![p(160, -320)],
                center_dist: 357.8,
            }],
        };
        let html = render_html(&report);
        assert!(html.contains("/tp @s 160 ~ -320"));
        let md = render_markdown(&report);
        assert!(md.contains("`/tp @s 160 ~ -320`"));
    }
}
