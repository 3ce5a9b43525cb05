pub mod config;
pub mod definitions;
pub mod engine;
pub mod error;
mod lines;
mod pace;
pub mod report;
pub mod reservoir;
pub mod runner;
pub mod scalar;

pub use config::{load_config, parse_config};
pub use definitions::{DefinitionCatalog, DefinitionStats, scan_vector_definitions};
pub use engine::{
    SamplingEngine, SamplingOptions, VectorIngest, VectorIngestStats, ingest_vector_file,
    ingest_vectors,
};
pub use error::{IngestError, Result};
pub use report::{FileReport, IngestReport};
pub use reservoir::{Reservoir, SeededIndexSource};
pub use runner::{IngestRun, Ingestor, LogProgress};
pub use scalar::{ScalarIngest, ScalarParseStats, parse_scalar_file, parse_scalars};
