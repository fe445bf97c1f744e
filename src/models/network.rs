// Network interface models

use serde::{Deserialize, Serialize};

/// Cumulative byte/packet counters for one interface, as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(default)]
    pub received: u64,
    #[serde(default)]
    pub transmitted: u64,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub packets_received: u64,
    #[serde(default)]
    pub packets_transmitted: u64,
}

impl NetworkInterface {
    pub fn is_loopback(&self) -> bool {
        self.name == "lo"
    }

    pub fn has_traffic(&self) -> bool {
        self.received > 0 || self.transmitted > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkGroup {
    #[serde(default)]
    pub interfaces: Vec<NetworkInterface>,
}

impl NetworkGroup {
    /// First non-loopback interface that has moved any bytes, else the first interface.
    pub fn main_interface(&self) -> Option<&NetworkInterface> {
        self.interfaces
            .iter()
            .find(|i| !i.is_loopback() && i.has_traffic())
            .or_else(|| self.interfaces.first())
    }
}
