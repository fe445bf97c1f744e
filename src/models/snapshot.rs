// Raw provider payload and the reconciled state built from it

use serde::{Deserialize, Serialize};

use super::{CpuGroup, DiskGroup, NetworkGroup, ProcessGroup, SystemMemory};

/// One decoded metrics payload, exactly as received. Every field may be absent or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub cpu: Option<CpuGroup>,
    #[serde(default)]
    pub memory: Option<SystemMemory>,
    #[serde(default)]
    pub disks: Option<DiskGroup>,
    #[serde(default)]
    pub network: Option<NetworkGroup>,
    #[serde(default)]
    pub processes: Option<Vec<ProcessGroup>>,
}

impl Snapshot {
    /// Snapshot carrying only a process list (the `/processes` view).
    pub fn processes_only(processes: Vec<ProcessGroup>) -> Self {
        Self {
            processes: Some(processes),
            ..Self::default()
        }
    }
}

/// Best-known view of the provider after merging every snapshot seen so far.
///
/// `Default` is the documented empty shape shown before the first successful poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciledState {
    pub cpu: CpuGroup,
    pub memory: SystemMemory,
    pub disks: DiskGroup,
    pub network: NetworkGroup,
    pub processes: Vec<ProcessGroup>,
    /// Number of successful snapshots merged in.
    pub generation: u64,
}

impl ReconciledState {
    /// True until a snapshot has been merged successfully.
    pub fn is_loading(&self) -> bool {
        self.generation == 0
    }
}
