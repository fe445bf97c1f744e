// Domain models (provider wire format + reconciled state)

mod cpu;
mod disk;
mod memory;
mod network;
mod process;
mod snapshot;

pub use cpu::{CpuCore, CpuGroup};
pub use disk::{DiskGroup, DiskUsage};
pub use memory::SystemMemory;
pub use network::{NetworkGroup, NetworkInterface};
pub use process::{ProcessGroup, ProcessRecord, attr};
pub use snapshot::{ReconciledState, Snapshot};
