use leo_analysis_abstract::IngestConfig;
use serde::Serialize;

use crate::engine::VectorIngestStats;
use crate::error::Result;
use crate::scalar::ScalarParseStats;

/// Outcome of one input file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileReport<T> {
    Ingested { stats: T },
    Failed { error: String },
}

impl<T: Copy> FileReport<T> {
    pub(crate) fn from_result<U>(result: &Result<U>, stats: impl Fn(&U) -> T) -> Self {
        match result {
            Ok(ingest) => FileReport::Ingested {
                stats: stats(ingest),
            },
            Err(err) => FileReport::Failed {
                error: err.to_string(),
            },
        }
    }

    pub fn stats(&self) -> Option<T> {
        match self {
            FileReport::Ingested { stats } => Some(*stats),
            FileReport::Failed { .. } => None,
        }
    }
}

/// Serializable summary of an ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub config: IngestConfig,
    pub scalar: FileReport<ScalarParseStats>,
    pub vector: FileReport<VectorIngestStats>,
}
