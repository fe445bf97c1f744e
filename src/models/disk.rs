// Disk volume models (sizes in GB)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub used: f64,
    #[serde(default)]
    pub available: f64,
    /// Percent of `total` in use.
    #[serde(default)]
    pub usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskGroup {
    #[serde(default)]
    pub disks: Vec<DiskUsage>,
}

impl DiskGroup {
    /// The volume shown on the disk card.
    pub fn primary(&self) -> Option<&DiskUsage> {
        self.disks.first()
    }
}
