// View-model assembly: reconciled state + smoothed metrics + expansion set -> render-ready data.
// Pure; holds no state of its own.

use serde::Serialize;

use crate::expansion::ExpansionTracker;
use crate::models::{ProcessGroup, ProcessRecord};
use crate::scheduler::DashboardState;

const MB_PER_GB: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    /// No successful poll yet.
    Loading,
    /// Loaded, but the provider has not reported any process.
    Empty,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub sub_value: Option<String>,
}

/// One point of the per-core chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreSeriesPoint {
    pub name: String,
    pub usage: f64,
    pub frequency: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub cpu_usage: Option<f64>,
    pub memory_mb: Option<f64>,
    pub high_cpu: bool,
    pub high_memory: bool,
    pub threat_score: Option<f64>,
    pub threat_reason: Option<String>,
}

impl From<&ProcessRecord> for ProcessRow {
    fn from(p: &ProcessRecord) -> Self {
        Self {
            pid: p.pid,
            name: p.name.clone(),
            cpu_usage: p.cpu_usage(),
            memory_mb: p.memory_usage_mb(),
            high_cpu: p.is_high_cpu(),
            high_memory: p.is_high_memory(),
            threat_score: p.threat_score(),
            threat_reason: p.threat_reason().map(str::to_string),
        }
    }
}

/// Resource readout drawn under an expanded parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProcessResources {
    pub cpu_usage: Option<f64>,
    pub memory_mb: Option<f64>,
    pub total_cpu: Option<f64>,
    pub total_memory_mb: Option<f64>,
}

impl From<&ProcessRecord> for ProcessResources {
    fn from(p: &ProcessRecord) -> Self {
        Self {
            cpu_usage: p.cpu_usage(),
            memory_mb: p.memory_usage_mb(),
            total_cpu: p.total_cpu(),
            total_memory_mb: p.total_memory_mb(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessTreeNode {
    pub parent: ProcessRow,
    pub expanded: bool,
    /// Set only while expanded.
    pub resources: Option<ProcessResources>,
    pub threads: Vec<ProcessRow>,
}

impl ProcessTreeNode {
    /// Child rows to draw: all threads when expanded, none when collapsed.
    pub fn visible_threads(&self) -> &[ProcessRow] {
        if self.expanded { self.threads.as_slice() } else { &[] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub status: ViewStatus,
    pub cards: Vec<MetricCard>,
    pub cpu_series: Vec<CoreSeriesPoint>,
    pub processes: Vec<ProcessTreeNode>,
}

pub fn assemble(state: &DashboardState, expansion: &ExpansionTracker) -> ViewModel {
    let reconciled = &state.reconciled;
    let status = if reconciled.is_loading() {
        ViewStatus::Loading
    } else if reconciled.processes.is_empty() {
        ViewStatus::Empty
    } else {
        ViewStatus::Ready
    };

    ViewModel {
        status,
        cards: metric_cards(state),
        cpu_series: reconciled
            .cpu
            .cpus
            .iter()
            .enumerate()
            .map(|(i, core)| CoreSeriesPoint {
                name: format!("CPU {}", i),
                usage: core.usage,
                frequency: core.frequency,
            })
            .collect(),
        processes: reconciled
            .processes
            .iter()
            .map(|group| tree_node(group, expansion))
            .collect(),
    }
}

fn tree_node(group: &ProcessGroup, expansion: &ExpansionTracker) -> ProcessTreeNode {
    let expanded = expansion.is_expanded(group.pid());
    ProcessTreeNode {
        parent: ProcessRow::from(&group.parent_process),
        expanded,
        resources: expanded.then(|| ProcessResources::from(&group.parent_process)),
        threads: group.forked_threads.iter().map(ProcessRow::from).collect(),
    }
}

// Percentages and network volumes come from the smoothed metrics; absolute sizes (used and
// total GB) are shown as reported. On a first poll "4.0 GB" can therefore sit next to a
// percentage that is still converging.
fn metric_cards(state: &DashboardState) -> Vec<MetricCard> {
    let r = &state.reconciled;
    let m = &state.metrics;
    let disk = r.disks.primary();
    let disk_used = disk.map(|d| d.used).unwrap_or(0.0);
    let disk_total = disk.map(|d| d.total).unwrap_or(0.0);

    vec![
        MetricCard {
            title: "CPU Usage",
            value: format!("{:.1}%", m.cpu_usage),
            sub_value: Some(format!("{} cores", r.cpu.core_count())),
        },
        MetricCard {
            title: "Memory",
            value: format!("{:.1} GB", r.memory.used_memory as f64 / MB_PER_GB),
            sub_value: Some(format!(
                "{:.1}% of {:.1} GB",
                m.memory_usage,
                r.memory.total_memory as f64 / MB_PER_GB
            )),
        },
        MetricCard {
            title: "Disk",
            value: format!("{:.1} GB", disk_used),
            sub_value: Some(format!("{:.1}% of {:.1} GB", m.disk_usage, disk_total)),
        },
        MetricCard {
            title: "Network",
            value: format!("{:.1} MB", m.network_rx),
            sub_value: Some(format!("{:.1} MB TX", m.network_tx)),
        },
    ]
}
