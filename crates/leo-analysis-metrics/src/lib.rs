//! Domain metrics derived from an ingested simulation run.
//!
//! Every function here is pure: it reads a [`ScalarTable`] and/or a
//! [`SampledSeriesSet`] and returns plain values.
//!
//! [`ScalarTable`]: leo_analysis_abstract::ScalarTable
//! [`SampledSeriesSet`]: leo_analysis_abstract::SampledSeriesSet

pub mod delay;
pub mod ground;
pub mod layout;
pub mod satellite;
pub mod stats;
pub mod summary;

pub use delay::{
    END_TO_END_DELAY, HOP_COUNT, SeriesSamples, delay_samples, hop_count_samples, pool,
    samples_named,
};
pub use ground::{GroundStationMetrics, ground_station_metrics};
pub use layout::NetworkLayout;
pub use satellite::{SatelliteMetrics, satellite_metrics};
pub use stats::{DistributionSummary, PooledSummary, empirical_cdf, mean, percent, pooled_summary};
pub use summary::{
    AnalysisMetrics, HubComparison, NetworkSummary, TrafficVolume, analyze, hub_comparison,
    network_summary,
};
