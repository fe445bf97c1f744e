// Process tree models: a parent process plus its forked threads/children

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known attribute keys. Attributes are opaque; any of these may be missing.
pub mod attr {
    pub const CPU_USAGE: &str = "CpuUsage";
    /// Replaces `CpuUsage` when the provider flags the process as CPU-heavy.
    pub const HIGH_CPU: &str = "HighCpu";
    pub const MEMORY_USAGE: &str = "MemoryUsage";
    /// Replaces `MemoryUsage` when the provider flags the process as memory-heavy.
    pub const HIGH_MEMORY: &str = "HighMemory";
    pub const TOTAL_CPU: &str = "TotalCpu";
    pub const TOTAL_MEMORY: &str = "TotalMemory";
    pub const THREAT_SCORE: &str = "ThreatScore";
    pub const THREAT_REASON: &str = "ThreatReason";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub fd_count: u64,
}

impl ProcessRecord {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute parsed as a finite number; `None` when missing or malformed.
    pub fn numeric_attribute(&self, key: &str) -> Option<f64> {
        self.attribute(key)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// CPU usage in percent.
    pub fn cpu_usage(&self) -> Option<f64> {
        self.numeric_attribute(attr::CPU_USAGE)
            .or_else(|| self.numeric_attribute(attr::HIGH_CPU))
    }

    /// Resident memory in MB.
    pub fn memory_usage_mb(&self) -> Option<f64> {
        self.numeric_attribute(attr::MEMORY_USAGE)
            .or_else(|| self.numeric_attribute(attr::HIGH_MEMORY))
    }

    /// Host-wide CPU usage reported alongside the process, in percent.
    pub fn total_cpu(&self) -> Option<f64> {
        self.numeric_attribute(attr::TOTAL_CPU)
    }

    /// Host-wide memory in MB reported alongside the process.
    pub fn total_memory_mb(&self) -> Option<f64> {
        self.numeric_attribute(attr::TOTAL_MEMORY)
    }

    pub fn is_high_cpu(&self) -> bool {
        self.attributes.contains_key(attr::HIGH_CPU)
    }

    pub fn is_high_memory(&self) -> bool {
        self.attributes.contains_key(attr::HIGH_MEMORY)
    }

    pub fn threat_score(&self) -> Option<f64> {
        self.numeric_attribute(attr::THREAT_SCORE)
    }

    pub fn threat_reason(&self) -> Option<&str> {
        self.attribute(attr::THREAT_REASON).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessGroup {
    pub parent_process: ProcessRecord,
    #[serde(default)]
    pub forked_threads: Vec<ProcessRecord>,
}

impl ProcessGroup {
    /// Group identity is the parent's pid. Pids can be reused by the OS between snapshots.
    pub fn pid(&self) -> u32 {
        self.parent_process.pid
    }
}
