use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reservoir capacity used when none is configured.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 50_000;

/// Lines between two progress reports when none is configured.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 5_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Scalar snapshot file (`.sca`).
    pub scalar_path: PathBuf,
    /// Vector time-series file (`.vec`).
    pub vector_path: PathBuf,
    /// Maximum number of points retained per series. Zero keeps counts only.
    pub sample_capacity: usize,
    /// Invoke the progress observer every this many vector lines. Zero disables it.
    pub progress_interval: u64,
    /// Seed of the random source driving replacement decisions.
    pub seed: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            scalar_path: PathBuf::from("results/TurkeyCoverage-#0.sca"),
            vector_path: PathBuf::from("results/TurkeyCoverage-#0.vec"),
            sample_capacity: DEFAULT_SAMPLE_CAPACITY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            seed: 0,
        }
    }
}

/// Partial configuration layered on top of [`IngestConfig::default`].
#[derive(Deserialize, Debug, Clone, Default)]
pub struct IngestConfigOverride {
    pub scalar_path: Option<PathBuf>,
    pub vector_path: Option<PathBuf>,
    pub sample_capacity: Option<usize>,
    pub progress_interval: Option<u64>,
    pub seed: Option<u64>,
}

impl IngestConfigOverride {
    pub fn apply_to(&self, config: &mut IngestConfig) {
        if let Some(v) = &self.scalar_path {
            config.scalar_path = v.clone();
        }
        if let Some(v) = &self.vector_path {
            config.vector_path = v.clone();
        }
        if let Some(v) = self.sample_capacity {
            config.sample_capacity = v;
        }
        if let Some(v) = self.progress_interval {
            config.progress_interval = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
    }
}
