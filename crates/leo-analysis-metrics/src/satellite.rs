use indexmap::IndexMap;
use leo_analysis_abstract::ScalarTable;
use serde::Serialize;

use crate::layout::NetworkLayout;
use crate::stats::percent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SatelliteMetrics {
    pub forwarded: f64,
    pub dropped: f64,
    pub throughput_mbps: f64,
    /// `ForwardSuccessRate` scaled to percent.
    pub success_rate: f64,
    pub drop_rate: f64,
    pub plane: usize,
}

/// Forwarding metrics for each `sat[i]` of the layout present in `table`,
/// keyed by `sat[i]`.
pub fn satellite_metrics(
    table: &ScalarTable,
    layout: &NetworkLayout,
) -> IndexMap<String, SatelliteMetrics> {
    (0..layout.satellite_count)
        .filter_map(|index| {
            let stats = table.entity(&layout.satellite_path(index))?;
            let counter = |name: &str| stats.get(name).copied().unwrap_or(0.0);

            let forwarded = counter("PacketsForwarded");
            let dropped = counter("PacketsDropped");
            let metrics = SatelliteMetrics {
                forwarded,
                dropped,
                throughput_mbps: counter("ForwardThroughput_bps") / 1e6,
                success_rate: counter("ForwardSuccessRate") * 100.0,
                drop_rate: percent(dropped, forwarded + dropped),
                plane: layout.plane_of(index),
            };
            Some((NetworkLayout::satellite_name(index), metrics))
        })
        .collect()
}
