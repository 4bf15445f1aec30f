//! Standardized metrics collection for CI integration.
//!
//! Worldtests export a `metrics.json` artifact in this schema so regressions
//! in throughput or coverage show up in automated diffs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level metrics report exported by integration tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test identifier.
    pub test_name: String,

    /// Overall test result.
    pub result: TestResult,

    /// Biome query metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biomes: Option<BiomeMetrics>,

    /// Structure search metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structures: Option<StructureMetrics>,

    /// Wall-clock execution metrics.
    pub execution: ExecutionMetrics,
}

/// Overall test result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Test passed all validations.
    Pass,
    /// Test failed.
    Fail,
    /// Test was skipped.
    Skip,
}

/// Biome query throughput and coverage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiomeMetrics {
    /// Cells sampled across all queries.
    pub cells_sampled: usize,
    /// Distinct biome ids observed.
    pub unique_biomes: usize,
    /// Cells sampled per second.
    pub cells_per_second: f64,
}

/// Structure search throughput and yield.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureMetrics {
    /// Regions scanned.
    pub regions_scanned: usize,
    /// Attempts produced by the region RNG.
    pub attempts: usize,
    /// Attempts that passed biome viability.
    pub viable: usize,
}

/// Wall-clock execution metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Total test duration in milliseconds.
    pub duration_ms: f64,
    /// Number of assertion phases executed.
    pub phases: usize,
}

impl MetricsReport {
    /// Start a report for a test, assumed passing until marked otherwise.
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            result: TestResult::Pass,
            biomes: None,
            structures: None,
            execution: ExecutionMetrics::default(),
        }
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let mut report = MetricsReport::new("unit");
        report.biomes = Some(BiomeMetrics {
            cells_sampled: 1024,
            unique_biomes: 17,
            cells_per_second: 9000.0,
        });
        let json = serde_json::to_string(&report).unwrap();
        let back: MetricsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.test_name, "unit");
        assert_eq!(back.result, TestResult::Pass);
        assert_eq!(back.biomes.unwrap().unique_biomes, 17);
        // Unset sections stay out of the artifact entirely.
        assert!(!json.contains("structures"));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!(
            "seedsight-metrics-{}",
            std::process::id()
        ));
        let path = dir.join("nested").join("metrics.json");
        MetricsReport::new("io").write_to_file(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"io\""));
        let _ = fs::remove_dir_all(&dir);
    }
}
