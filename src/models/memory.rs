// System memory model (all values in MB)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMemory {
    #[serde(default)]
    pub total_memory: u64,
    #[serde(default)]
    pub used_memory: u64,
    #[serde(default)]
    pub total_swap: u64,
    #[serde(default)]
    pub used_swap: u64,
}

impl SystemMemory {
    /// Used share of total memory in percent; 0.0 when total is unknown.
    pub fn usage_percent(&self) -> f64 {
        if self.total_memory == 0 {
            return 0.0;
        }
        self.used_memory as f64 / self.total_memory as f64 * 100.0
    }
}
