use indexmap::IndexMap;
use leo_analysis_abstract::ScalarTable;
use serde::Serialize;

use crate::layout::NetworkLayout;
use crate::stats::percent;

const SENT: &str = "PacketsSent";
const RECEIVED: &str = "PacketsReceived";
const DROPPED: &str = "PacketsDropped";
const THROUGHPUT: &str = "Throughput_bps";

/// Delivery figures for one ground station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundStationMetrics {
    pub sent: f64,
    pub received: f64,
    pub dropped: f64,
    pub throughput_mbps: f64,
    /// Delivery ratio in percent, at most 100.
    pub pdr: f64,
    /// `dropped / (sent + dropped)` in percent.
    pub drop_rate: f64,
}

/// Metrics for every layout station present in `table`, hub first.
///
/// Traffic flows between the hub and the hometowns, so the hub's delivery
/// ratio is what the hometowns received out of what the hub sent, and every
/// hometown shares the ratio of what the hub received out of what all
/// hometowns sent.
pub fn ground_station_metrics(
    table: &ScalarTable,
    layout: &NetworkLayout,
) -> IndexMap<String, GroundStationMetrics> {
    let counter = |station: &str, statistic: &str| {
        table.value_or_zero(&layout.station_path(station), statistic)
    };

    let hub_sent = counter(layout.hub.as_str(), SENT);
    let hub_received = counter(layout.hub.as_str(), RECEIVED);
    let hometown_total = |statistic: &str| -> f64 {
        layout
            .hometowns
            .iter()
            .map(|h| counter(h.as_str(), statistic))
            .sum()
    };
    let hometowns_received = hometown_total(RECEIVED);
    let hometowns_sent = hometown_total(SENT);

    let hub_pdr = percent(hometowns_received, hub_sent);
    let hometown_pdr = percent(hub_received, hometowns_sent);

    let mut stations: IndexMap<String, GroundStationMetrics> = IndexMap::new();
    for station in layout.stations() {
        let present = table.contains_entity(&layout.station_path(station));
        if !present || stations.contains_key(station) {
            continue;
        }
        let sent = counter(station, SENT);
        let dropped = counter(station, DROPPED);
        let pdr = if station == layout.hub { hub_pdr } else { hometown_pdr };

        stations.insert(
            station.to_string(),
            GroundStationMetrics {
                sent,
                received: counter(station, RECEIVED),
                dropped,
                throughput_mbps: counter(station, THROUGHPUT) / 1e6,
                pdr: pdr.min(100.0),
                drop_rate: percent(dropped, sent + dropped),
            },
        );
    }
    stations
}

#[cfg(test)]
mod tests {
    use leo_analysis_abstract::ScalarTableBuilder;

    use super::*;

    fn layout() -> NetworkLayout {
        NetworkLayout {
            hometowns: vec!["sivas".to_string(), "ordu".to_string(), "sinop".to_string()],
            ..NetworkLayout::default()
        }
    }

    #[test]
    fn test_hub_and_hometown_delivery_ratios() {
        let mut b = ScalarTableBuilder::new();
        b.record("LEONetwork.istanbul", SENT, 1000.0);
        b.record("LEONetwork.istanbul", RECEIVED, 720.0);
        b.record("LEONetwork.istanbul", DROPPED, 25.0);
        b.record("LEONetwork.istanbul", THROUGHPUT, 2_500_000.0);
        b.record("LEONetwork.sivas", SENT, 400.0);
        b.record("LEONetwork.sivas", RECEIVED, 450.0);
        b.record("LEONetwork.ordu", SENT, 400.0);
        b.record("LEONetwork.ordu", RECEIVED, 450.0);
        let table = b.finish();

        let metrics = ground_station_metrics(&table, &layout());
        // sinop never reported anything
        assert_eq!(metrics.keys().collect::<Vec<_>>(), ["istanbul", "sivas", "ordu"]);

        let hub = &metrics["istanbul"];
        assert_eq!(hub.pdr, 90.0);
        assert_eq!(hub.throughput_mbps, 2.5);
        assert_eq!(hub.drop_rate, 25.0 / 1025.0 * 100.0);

        let sivas = &metrics["sivas"];
        assert_eq!(sivas.pdr, 90.0);
        assert_eq!(sivas.dropped, 0.0);
        assert_eq!(sivas.drop_rate, 0.0);
        assert_eq!(metrics["ordu"].pdr, sivas.pdr);
    }

    #[test]
    fn test_pdr_is_capped_and_zero_without_senders() {
        let mut b = ScalarTableBuilder::new();
        b.record("LEONetwork.istanbul", SENT, 10.0);
        b.record("LEONetwork.istanbul", RECEIVED, 5.0);
        b.record("LEONetwork.sivas", RECEIVED, 50.0);
        let table = b.finish();

        let metrics = ground_station_metrics(&table, &layout());
        assert_eq!(metrics["istanbul"].pdr, 100.0);
        assert_eq!(metrics["sivas"].pdr, 0.0);
    }

    #[test]
    fn test_empty_table() {
        let metrics = ground_station_metrics(&ScalarTable::default(), &NetworkLayout::default());
        assert!(metrics.is_empty());
    }
}
