// Per-core CPU models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuCore {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    /// MHz.
    #[serde(default)]
    pub frequency: u64,
    /// Percent, 0..=100.
    #[serde(default)]
    pub usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuGroup {
    #[serde(default)]
    pub cpus: Vec<CpuCore>,
}

impl CpuGroup {
    /// Mean usage across cores; 0.0 with no cores.
    pub fn average_usage(&self) -> f64 {
        if self.cpus.is_empty() {
            return 0.0;
        }
        self.cpus.iter().map(|c| c.usage).sum::<f64>() / self.cpus.len() as f64
    }

    pub fn core_count(&self) -> usize {
        self.cpus.len()
    }
}
