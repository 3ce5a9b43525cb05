pub mod config;
pub mod interface;
pub mod model;

pub use interface::{IndexSource, IngestProgress, NoProgress, ProgressObserver, StopHandle};
pub use model::{
    ReservoirSample, SamplePoint, SampledSeries, SampledSeriesSet, ScalarTable,
    ScalarTableBuilder, SeriesDescriptor, SeriesId, StatisticMap,
};

pub use config::{
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_SAMPLE_CAPACITY, IngestConfig, IngestConfigOverride,
};
