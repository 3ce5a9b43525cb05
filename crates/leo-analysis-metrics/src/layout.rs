use serde::{Deserialize, Serialize};

/// Where the simulated stations and satellites live in the module tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkLayout {
    /// Top-level network module, e.g. `LEONetwork`.
    pub network: String,
    /// Ground station every hometown exchanges traffic with.
    pub hub: String,
    pub hometowns: Vec<String>,
    pub satellite_count: usize,
    pub satellites_per_plane: usize,
}

impl Default for NetworkLayout {
    fn default() -> Self {
        Self {
            network: "LEONetwork".to_string(),
            hub: "istanbul".to_string(),
            hometowns: [
                "sivas",
                "kastamonu",
                "ordu",
                "giresun",
                "tokat",
                "erzurum",
                "malatya",
                "samsun",
                "trabzon",
                "sinop",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            satellite_count: 18,
            satellites_per_plane: 6,
        }
    }
}

impl NetworkLayout {
    /// Hub first, then hometowns in configured order.
    pub fn stations(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.hub.as_str()).chain(self.hometowns.iter().map(String::as_str))
    }

    pub fn station_path(&self, station: &str) -> String {
        format!("{}.{}", self.network, station)
    }

    pub fn satellite_name(index: usize) -> String {
        format!("sat[{index}]")
    }

    pub fn satellite_path(&self, index: usize) -> String {
        format!("{}.{}", self.network, Self::satellite_name(index))
    }

    /// Orbital plane of satellite `index`; everything is plane 0 when the
    /// per-plane count is zero.
    pub fn plane_of(&self, index: usize) -> usize {
        index.checked_div(self.satellites_per_plane).unwrap_or(0)
    }
}
