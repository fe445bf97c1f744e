// Snapshot merger: fold a poll outcome into the last known-good state.
//
// Each top-level field is taken from the incoming snapshot only when it carries data;
// otherwise the previous value is kept. A failed poll leaves the state untouched.

use crate::fetcher::FetchError;
use crate::models::{
    CpuGroup, DiskGroup, NetworkGroup, ProcessGroup, ReconciledState, Snapshot, SystemMemory,
};

/// Whether an incoming field is worth adopting. Lists (and list wrappers) need an element.
pub trait HasData {
    fn has_data(&self) -> bool;
}

impl HasData for CpuGroup {
    fn has_data(&self) -> bool {
        !self.cpus.is_empty()
    }
}

impl HasData for DiskGroup {
    fn has_data(&self) -> bool {
        !self.disks.is_empty()
    }
}

impl HasData for NetworkGroup {
    fn has_data(&self) -> bool {
        !self.interfaces.is_empty()
    }
}

impl HasData for SystemMemory {
    fn has_data(&self) -> bool {
        true
    }
}

impl HasData for Vec<ProcessGroup> {
    fn has_data(&self) -> bool {
        !self.is_empty()
    }
}

fn pick<T: HasData + Clone>(incoming: Option<&T>, previous: &T) -> T {
    match incoming {
        Some(value) if value.has_data() => value.clone(),
        _ => previous.clone(),
    }
}

/// Returns the next reconciled state. `merge(s, Err(_)) == s`.
pub fn merge(
    previous: &ReconciledState,
    incoming: Result<&Snapshot, &FetchError>,
) -> ReconciledState {
    let Ok(snapshot) = incoming else {
        return previous.clone();
    };
    ReconciledState {
        cpu: pick(snapshot.cpu.as_ref(), &previous.cpu),
        memory: pick(snapshot.memory.as_ref(), &previous.memory),
        disks: pick(snapshot.disks.as_ref(), &previous.disks),
        network: pick(snapshot.network.as_ref(), &previous.network),
        processes: pick(snapshot.processes.as_ref(), &previous.processes),
        generation: previous.generation + 1,
    }
}
