use leo_analysis_abstract::{
    IndexSource, IngestConfig, IngestProgress, ProgressObserver, StopHandle,
};
use tracing::{info, warn};

use crate::engine::{SamplingOptions, VectorIngest, ingest_vector_file};
use crate::error::Result;
use crate::report::{FileReport, IngestReport};
use crate::reservoir::SeededIndexSource;
use crate::scalar::{ScalarIngest, parse_scalar_file};

/// Progress observer that logs each report.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, progress: &IngestProgress) {
        info!(
            "Processed {} lines ({} records, {} vectors)...",
            progress.lines_read, progress.records_accepted, progress.series_seen
        );
    }
}

/// Both files of one run. Either side may have failed independently.
#[derive(Debug)]
pub struct IngestRun {
    pub scalars: Result<ScalarIngest>,
    pub vectors: Result<VectorIngest>,
}

/// Ingests the files named by an [`IngestConfig`].
#[derive(Debug, Clone)]
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn ingest_scalars(&self) -> Result<ScalarIngest> {
        parse_scalar_file(&self.config.scalar_path)
    }

    /// Sample the vector file with the configured seed, logging progress.
    pub fn ingest_vectors(&self, stop: &StopHandle) -> Result<VectorIngest> {
        self.ingest_vectors_with(SeededIndexSource::new(self.config.seed), &mut LogProgress, stop)
    }

    pub fn ingest_vectors_with<S, O>(
        &self,
        source: S,
        observer: &mut O,
        stop: &StopHandle,
    ) -> Result<VectorIngest>
    where
        S: IndexSource,
        O: ProgressObserver + ?Sized,
    {
        ingest_vector_file(
            &self.config.vector_path,
            SamplingOptions::from(&self.config),
            source,
            observer,
            stop,
        )
    }

    /// Ingest both files; a failure on one does not prevent the other.
    pub fn run(&self, stop: &StopHandle) -> IngestRun {
        let scalars = self.ingest_scalars();
        if let Err(err) = &scalars {
            warn!("Scalar ingestion failed: {}", err);
        }
        let vectors = self.ingest_vectors(stop);
        if let Err(err) = &vectors {
            warn!("Vector ingestion failed: {}", err);
        }
        IngestRun { scalars, vectors }
    }

    pub fn report(&self, run: &IngestRun) -> IngestReport {
        IngestReport {
            config: self.config.clone(),
            scalar: FileReport::from_result(&run.scalars, |ingest| ingest.stats),
            vector: FileReport::from_result(&run.vectors, |ingest| ingest.stats),
        }
    }
}
