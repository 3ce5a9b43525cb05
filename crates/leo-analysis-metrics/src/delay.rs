use indexmap::IndexMap;
use leo_analysis_abstract::SampledSeriesSet;
use serde::Serialize;

use crate::stats::{DistributionSummary, PooledSummary, pooled_summary};

pub const END_TO_END_DELAY: &str = "endToEndDelay";
pub const HOP_COUNT: &str = "hopCount";

/// Sampled values of one series together with its population size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSamples {
    pub values: Vec<f64>,
    pub total_count: u64,
}

impl SeriesSamples {
    pub fn summary(&self) -> Option<DistributionSummary> {
        DistributionSummary::from_values(&self.values)
    }
}

/// Sampled values of every series called `name`, keyed by the leaf of the
/// owning entity and scaled by `scale`. Series with no retained points are
/// left out. When two entities share a leaf, the later series wins.
pub fn samples_named(
    series: &SampledSeriesSet,
    name: &str,
    scale: f64,
) -> IndexMap<String, SeriesSamples> {
    series
        .named(name)
        .filter(|s| !s.sample.is_empty())
        .map(|s| {
            let samples = SeriesSamples {
                values: s.sample.values().map(|v| v * scale).collect(),
                total_count: s.sample.total_count(),
            };
            (s.descriptor.entity_leaf().to_string(), samples)
        })
        .collect()
}

/// End-to-end delays per station, in milliseconds.
pub fn delay_samples(series: &SampledSeriesSet) -> IndexMap<String, SeriesSamples> {
    samples_named(series, END_TO_END_DELAY, 1000.0)
}

/// Hop counts per reporting module.
pub fn hop_count_samples(series: &SampledSeriesSet) -> IndexMap<String, SeriesSamples> {
    samples_named(series, HOP_COUNT, 1.0)
}

/// Population-weighted summary over every entry of `samples`.
pub fn pool(samples: &IndexMap<String, SeriesSamples>) -> Option<PooledSummary> {
    pooled_summary(
        samples
            .values()
            .map(|s| (s.values.as_slice(), s.total_count)),
    )
}
