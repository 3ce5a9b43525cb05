use indexmap::IndexMap;
use indexmap::map::Entry;
use leo_analysis_abstract::{
    IndexSource, IngestConfig, IngestProgress, ProgressObserver, SamplePoint, SampledSeries,
    SampledSeriesSet, SeriesDescriptor, SeriesId, StopHandle,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::definitions::{DefinitionCatalog, DefinitionStats, scan_definitions};
use crate::error::{IngestError, Result};
use crate::lines::{Line, LineReader, VectorLine, parse_vector_line};
use crate::pace::Pace;
use crate::reservoir::Reservoir;

/// Knobs of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingOptions {
    pub capacity: usize,
    /// Report progress every this many lines; zero disables reporting.
    pub progress_interval: u64,
}

impl From<&IngestConfig> for SamplingOptions {
    fn from(config: &IngestConfig) -> Self {
        Self {
            capacity: config.sample_capacity,
            progress_interval: config.progress_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VectorIngestStats {
    pub capacity: usize,
    /// Every line read from the file, header included.
    pub lines_read: u64,
    pub header: DefinitionStats,
    /// Definitions found after data lines had started.
    pub late_definitions: u64,
    pub malformed_late_definitions: u64,
    /// Valid data records, each counted towards its series.
    pub records_accepted: u64,
    /// Data-shaped lines skipped for arity or non-numeric fields.
    pub records_malformed: u64,
    /// Lines that were not valid UTF-8, header included.
    pub undecodable_lines: u64,
    /// Series that only ever appeared on data lines.
    pub undeclared_series: u64,
    /// Highest event number among accepted records.
    pub last_event: Option<u64>,
    /// The pass ended on a stop request rather than end of file.
    pub stopped_early: bool,
}

#[derive(Debug)]
struct SeriesSlot {
    descriptor: SeriesDescriptor,
    reservoir: Reservoir,
}

/// Per-series reservoirs fed one data record at a time.
///
/// Every declared series starts with an empty reservoir. Records for an id
/// with no definition are kept under [`SeriesDescriptor::undeclared`]; a later
/// definition for that id replaces the placeholder and keeps the sample.
pub struct SamplingEngine<S> {
    capacity: usize,
    source: S,
    series: IndexMap<SeriesId, SeriesSlot>,
    stats: VectorIngestStats,
}

impl<S: IndexSource> SamplingEngine<S> {
    pub fn new(capacity: usize, catalog: DefinitionCatalog, source: S) -> Self {
        let header = catalog.stats;
        let series = catalog
            .into_descriptors()
            .into_iter()
            .map(|(id, descriptor)| {
                let slot = SeriesSlot {
                    descriptor,
                    reservoir: Reservoir::new(capacity),
                };
                (id, slot)
            })
            .collect();

        Self {
            capacity,
            source,
            series,
            stats: VectorIngestStats {
                capacity,
                header,
                undecodable_lines: header.undecodable,
                ..Default::default()
            },
        }
    }

    /// Fold one valid record into the reservoir of `id`.
    pub fn offer(&mut self, id: SeriesId, point: SamplePoint) {
        let slot = match self.series.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                warn!("Data for undeclared vector id {}; keeping it under a placeholder", id);
                entry.insert(SeriesSlot {
                    descriptor: SeriesDescriptor::undeclared(id),
                    reservoir: Reservoir::new(self.capacity),
                })
            }
        };
        slot.reservoir.offer(point, &mut self.source);
        self.stats.records_accepted += 1;
    }

    /// Register a definition that showed up after data lines began.
    pub fn define(&mut self, descriptor: SeriesDescriptor) {
        self.stats.late_definitions += 1;
        if self.stats.late_definitions == 1 {
            warn!("Vector definition for id {} appears after data lines began", descriptor.id);
        }
        match self.series.entry(descriptor.id) {
            Entry::Occupied(mut entry) => entry.get_mut().descriptor = descriptor,
            Entry::Vacant(entry) => {
                entry.insert(SeriesSlot {
                    descriptor,
                    reservoir: Reservoir::new(self.capacity),
                });
            }
        }
    }

    pub(crate) fn process_line(&mut self, line: Line<'_>) {
        let text = match line {
            Line::Text(text) => text,
            Line::Undecodable => {
                self.stats.undecodable_lines += 1;
                return;
            }
        };

        match parse_vector_line(text) {
            VectorLine::Data(record) => {
                self.offer(record.id, record.point);
                self.stats.last_event = self.stats.last_event.max(Some(record.event));
            }
            VectorLine::MalformedData => {
                self.stats.records_malformed += 1;
                debug!("Skipping malformed data line: {:?}", text);
            }
            VectorLine::Definition(descriptor) => self.define(descriptor),
            VectorLine::MalformedDefinition => {
                self.stats.malformed_late_definitions += 1;
                debug!("Skipping malformed vector definition: {:?}", text);
            }
            VectorLine::Other => {}
        }
    }

    fn progress(&self, lines_read: u64) -> IngestProgress {
        IngestProgress {
            lines_read,
            records_accepted: self.stats.records_accepted,
            series_seen: self.series.len(),
        }
    }

    pub fn finish(self) -> VectorIngest {
        let mut stats = self.stats;
        stats.undeclared_series = self
            .series
            .values()
            .filter(|slot| !slot.descriptor.declared)
            .count() as u64;

        let series = self
            .series
            .into_values()
            .map(|slot| SampledSeries {
                descriptor: slot.descriptor,
                sample: slot.reservoir.into_sample(),
            })
            .collect();

        VectorIngest { series, stats }
    }
}

#[derive(Debug, Clone)]
pub struct VectorIngest {
    pub series: SampledSeriesSet,
    pub stats: VectorIngestStats,
}

/// Scan the definition header of `reader`, then sample every data line in a
/// single forward pass.
///
/// `stop` is checked before each line, header included; once raised the pass
/// ends and the result covers exactly the lines consumed so far.
pub fn ingest_vectors<R, S, O>(
    reader: R,
    options: SamplingOptions,
    source: S,
    observer: &mut O,
    stop: &StopHandle,
) -> Result<VectorIngest>
where
    R: BufRead,
    S: IndexSource,
    O: ProgressObserver + ?Sized,
{
    let mut lines = LineReader::new(reader);
    let mut pace = Pace::new(options.progress_interval, observer, stop);
    let catalog = scan_definitions(&mut lines, &mut pace)?;
    let mut engine = SamplingEngine::new(options.capacity, catalog, source);

    loop {
        if pace.stop_requested() {
            engine.stats.stopped_early = true;
            info!("Stop requested after {} lines", lines.lines_read());
            break;
        }
        let Some(line) = lines.next_line()? else {
            break;
        };
        engine.process_line(line);
        pace.line_done(engine.progress(lines.lines_read()));
    }
    engine.stats.lines_read = lines.lines_read();

    let ingest = engine.finish();
    info!(
        "Sampling complete. Total data points processed: {} across {} vectors",
        ingest.stats.records_accepted,
        ingest.series.len()
    );
    Ok(ingest)
}

/// Open `path` and run [`ingest_vectors`] over it.
pub fn ingest_vector_file<S, O>(
    path: &Path,
    options: SamplingOptions,
    source: S,
    observer: &mut O,
    stop: &StopHandle,
) -> Result<VectorIngest>
where
    S: IndexSource,
    O: ProgressObserver + ?Sized,
{
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if let Ok(meta) = file.metadata() {
        info!(
            "Parsing vector file (sampled): {} ({:.2} GB, {} points per vector)",
            path.display(),
            meta.len() as f64 / (1024.0 * 1024.0 * 1024.0),
            options.capacity
        );
    }
    ingest_vectors(BufReader::new(file), options, source, observer, stop)
        .map_err(|e| e.with_path(path))
}
