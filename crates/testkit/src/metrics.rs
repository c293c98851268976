//! Metrics reports for generation runs and headless sessions.
//!
//! Reports are exported as pretty JSON so CI can diff block distributions and
//! timings between commits.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use terra2d_core::BlockKind;

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test or tool identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (RFC 3339)
    pub timestamp: String,

    /// Overall result
    pub result: TestResult,

    /// World generation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain: Option<TerrainMetrics>,

    /// Headless session metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionMetrics>,

    /// Test execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// All validations passed
    Pass,
    /// Something failed
    Fail,
    /// Not run
    Skip,
}

/// Shape and content of one generated world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainMetrics {
    /// World seed
    pub seed: u64,

    /// Columns
    pub width: usize,

    /// Rows
    pub height: usize,

    /// Generation wall time (milliseconds)
    pub gen_time_ms: f64,

    /// Highest noise line (smallest row index)
    pub min_surface: i32,

    /// Lowest noise line (largest row index)
    pub max_surface: i32,

    /// Mean noise line
    pub avg_surface: f64,

    /// Trees planted
    pub trees: usize,

    /// Cell count per block name
    pub block_counts: BTreeMap<String, usize>,
}

impl TerrainMetrics {
    /// Fraction of all cells holding `kind`.
    pub fn fraction(&self, kind: BlockKind) -> f64 {
        let total = self.width * self.height;
        if total == 0 {
            return 0.0;
        }
        self.block_counts.get(kind.name()).copied().unwrap_or(0) as f64 / total as f64
    }
}

/// Count block kinds by name.
pub fn block_histogram<I>(kinds: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = BlockKind>,
{
    let mut counts = BTreeMap::new();
    for kind in kinds {
        *counts.entry(kind.name().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Outcome of a scripted headless session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Ticks simulated
    pub ticks: u64,

    /// Blocks fully broken
    pub blocks_broken: usize,

    /// Blocks placed
    pub blocks_placed: usize,

    /// Times the actor touched down
    pub landings: usize,

    /// Final actor position in pixels
    pub final_position: [f32; 2],

    /// Actor health at the end of the run
    pub final_health: u32,

    /// Actor hunger at the end of the run
    pub final_hunger: u32,
}

/// Test execution and infrastructure metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total duration (seconds)
    pub duration_seconds: f64,

    /// Number of assertions checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,

    /// Number of validations passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations_passed: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with test name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: TestResult::Pass,
                terrain: None,
                session: None,
                test_execution: TestExecutionMetrics::default(),
            },
        }
    }

    /// Set test result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set terrain metrics
    pub fn terrain(mut self, metrics: TerrainMetrics) -> Self {
        self.report.terrain = Some(metrics);
        self
    }

    /// Set session metrics
    pub fn session(mut self, metrics: SessionMetrics) -> Self {
        self.report.session = Some(metrics);
        self
    }

    /// Set test execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
