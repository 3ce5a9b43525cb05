use indexmap::IndexMap;
use leo_analysis_abstract::{SampledSeriesSet, ScalarTable};
use serde::Serialize;
use tracing::{debug, info};

use crate::delay::{SeriesSamples, delay_samples, hop_count_samples, pool};
use crate::ground::{GroundStationMetrics, ground_station_metrics};
use crate::layout::NetworkLayout;
use crate::satellite::{SatelliteMetrics, satellite_metrics};
use crate::stats::{DistributionSummary, PooledSummary, mean, percent};

/// Network-wide totals and averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub total_sent: f64,
    pub total_received: f64,
    pub dropped_at_ground: f64,
    pub dropped_at_satellites: f64,
    /// `received / (sent + ground drops)` in percent.
    pub overall_pdr: f64,
    pub ground_throughput_mbps: f64,
    pub satellite_throughput_mbps: f64,
    pub mean_pdr: f64,
    pub mean_ground_drop_rate: f64,
    pub mean_satellite_success_rate: f64,
    pub mean_satellite_drop_rate: f64,
}

pub fn network_summary(
    ground: &IndexMap<String, GroundStationMetrics>,
    satellites: &IndexMap<String, SatelliteMetrics>,
) -> NetworkSummary {
    let total_sent = ground.values().map(|g| g.sent).sum();
    let total_received = ground.values().map(|g| g.received).sum();
    let dropped_at_ground = ground.values().map(|g| g.dropped).sum();

    NetworkSummary {
        total_sent,
        total_received,
        dropped_at_ground,
        dropped_at_satellites: satellites.values().map(|s| s.dropped).sum(),
        overall_pdr: percent(total_received, total_sent + dropped_at_ground),
        ground_throughput_mbps: ground.values().map(|g| g.throughput_mbps).sum(),
        satellite_throughput_mbps: satellites.values().map(|s| s.throughput_mbps).sum(),
        mean_pdr: mean(ground.values().map(|g| g.pdr)),
        mean_ground_drop_rate: mean(ground.values().map(|g| g.drop_rate)),
        mean_satellite_success_rate: mean(satellites.values().map(|s| s.success_rate)),
        mean_satellite_drop_rate: mean(satellites.values().map(|s| s.drop_rate)),
    }
}

/// Sent, received and dropped packets of one station or an average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrafficVolume {
    pub sent: f64,
    pub received: f64,
    pub dropped: f64,
    pub pdr: f64,
    pub throughput_mbps: f64,
}

/// The hub set against the average of the other stations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HubComparison {
    pub hub: TrafficVolume,
    pub others_mean: TrafficVolume,
    pub others_min_pdr: f64,
    pub others_max_pdr: f64,
}

pub fn hub_comparison(
    ground: &IndexMap<String, GroundStationMetrics>,
    layout: &NetworkLayout,
) -> HubComparison {
    let hub = ground
        .get(&layout.hub)
        .map(|g| TrafficVolume {
            sent: g.sent,
            received: g.received,
            dropped: g.dropped,
            pdr: g.pdr,
            throughput_mbps: g.throughput_mbps,
        })
        .unwrap_or_default();

    let others: Vec<&GroundStationMetrics> = ground
        .iter()
        .filter(|(name, _)| **name != layout.hub)
        .map(|(_, g)| g)
        .collect();
    let others_mean = TrafficVolume {
        sent: mean(others.iter().map(|g| g.sent)),
        received: mean(others.iter().map(|g| g.received)),
        dropped: mean(others.iter().map(|g| g.dropped)),
        pdr: mean(others.iter().map(|g| g.pdr)),
        throughput_mbps: mean(others.iter().map(|g| g.throughput_mbps)),
    };
    let pdrs = || others.iter().map(|g| g.pdr);

    HubComparison {
        hub,
        others_mean,
        others_min_pdr: pdrs().reduce(f64::min).unwrap_or(0.0),
        others_max_pdr: pdrs().reduce(f64::max).unwrap_or(0.0),
    }
}

/// Everything extracted from one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetrics {
    pub ground_stations: IndexMap<String, GroundStationMetrics>,
    pub satellites: IndexMap<String, SatelliteMetrics>,
    pub delays_ms: IndexMap<String, SeriesSamples>,
    pub delay_summaries: IndexMap<String, DistributionSummary>,
    pub overall_delay: Option<PooledSummary>,
    pub hop_counts: IndexMap<String, SeriesSamples>,
    pub overall_hop_count: Option<PooledSummary>,
    pub network: NetworkSummary,
    pub hub: HubComparison,
}

pub fn analyze(
    table: &ScalarTable,
    series: &SampledSeriesSet,
    layout: &NetworkLayout,
) -> AnalysisMetrics {
    let ground_stations = ground_station_metrics(table, layout);
    let satellites = satellite_metrics(table, layout);
    let delays_ms = delay_samples(series);
    let hop_counts = hop_count_samples(series);
    debug!(
        "Extracted metrics for {} stations, {} satellites, {} delay and {} hop count series",
        ground_stations.len(),
        satellites.len(),
        delays_ms.len(),
        hop_counts.len()
    );

    let delay_summaries = delays_ms
        .iter()
        .filter_map(|(station, samples)| Some((station.clone(), samples.summary()?)))
        .collect();
    let overall_delay = pool(&delays_ms);
    let overall_hop_count = pool(&hop_counts);

    let network = network_summary(&ground_stations, &satellites);
    let hub = hub_comparison(&ground_stations, layout);
    info!(
        "Overall PDR {:.2}%, mean station PDR {:.2}%",
        network.overall_pdr, network.mean_pdr
    );

    AnalysisMetrics {
        ground_stations,
        satellites,
        delays_ms,
        delay_summaries,
        overall_delay,
        hop_counts,
        overall_hop_count,
        network,
        hub,
    }
}
