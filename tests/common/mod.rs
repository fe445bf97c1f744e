// Shared test helpers

#![allow(dead_code)]

use std::collections::BTreeMap;

use sysdash::models::*;

pub fn record(pid: u32, name: &str, attributes: &[(&str, &str)]) -> ProcessRecord {
    ProcessRecord {
        pid,
        name: name.into(),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        fd_count: 0,
    }
}

pub fn group(pid: u32, name: &str, threads: Vec<ProcessRecord>) -> ProcessGroup {
    ProcessGroup {
        parent_process: record(pid, name, &[("CpuUsage", "1.5"), ("MemoryUsage", "20")]),
        forked_threads: threads,
    }
}

pub fn cpu(usages: &[f64]) -> CpuGroup {
    CpuGroup {
        cpus: usages
            .iter()
            .enumerate()
            .map(|(i, &usage)| CpuCore {
                name: format!("cpu{}", i),
                brand: "Test CPU".into(),
                frequency: 2400,
                usage,
            })
            .collect(),
    }
}

pub fn memory(used_mb: u64, total_mb: u64) -> SystemMemory {
    SystemMemory {
        total_memory: total_mb,
        used_memory: used_mb,
        total_swap: 0,
        used_swap: 0,
    }
}

pub fn disk(used: f64, total: f64) -> DiskGroup {
    DiskGroup {
        disks: vec![DiskUsage {
            total,
            used,
            available: total - used,
            usage: used / total * 100.0,
        }],
    }
}

pub fn interface(name: &str, received: u64, transmitted: u64) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        received,
        transmitted,
        ..Default::default()
    }
}

/// Snapshot with every top-level field populated.
pub fn full_snapshot() -> Snapshot {
    Snapshot {
        cpu: Some(cpu(&[10.0, 30.0])),
        memory: Some(memory(4096, 16384)),
        disks: Some(disk(100.0, 500.0)),
        network: Some(NetworkGroup {
            interfaces: vec![
                interface("lo", 10, 10),
                interface("eth0", 10 * 1024 * 1024, 2 * 1024 * 1024),
            ],
        }),
        processes: Some(vec![
            group(1, "init", vec![]),
            group(42, "nginx", vec![record(43, "nginx-worker", &[])]),
        ]),
    }
}
