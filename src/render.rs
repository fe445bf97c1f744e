// Headless renderer: writes each view model as structured log lines.

use crate::config::DashboardView;
use crate::view::{ProcessResources, ProcessRow, ViewModel, ViewStatus};

/// One-line text form of a process row, e.g. `nginx PID:42 cpu=1.5% mem=20MB threat=0.8 (reason)`.
pub fn format_row(row: &ProcessRow) -> String {
    let cpu = row
        .cpu_usage
        .map(|v| format!("{}%", v))
        .unwrap_or_else(|| "0%".into());
    let mem = row
        .memory_mb
        .map(|v| format!("{}MB", v))
        .unwrap_or_else(|| "0MB".into());
    let mut line = format!("{} PID:{} cpu={} mem={}", row.name, row.pid, cpu, mem);
    if row.high_cpu {
        line.push_str(" [high cpu]");
    }
    if row.high_memory {
        line.push_str(" [high mem]");
    }
    if let Some(score) = row.threat_score {
        line.push_str(&format!(" threat={}", score));
        if let Some(reason) = &row.threat_reason {
            line.push_str(&format!(" ({})", reason));
        }
    }
    line
}

/// Resource readout of an expanded parent; missing values print as 0.
pub fn format_resources(res: &ProcessResources) -> String {
    format!(
        "cpu={}% mem={}MB total_cpu={}% total_mem={}MB",
        res.cpu_usage.unwrap_or(0.0),
        res.memory_mb.unwrap_or(0.0),
        res.total_cpu.unwrap_or(0.0),
        res.total_memory_mb.unwrap_or(0.0)
    )
}

pub fn render(view: &ViewModel, kind: DashboardView) {
    match view.status {
        ViewStatus::Loading => {
            tracing::info!("Loading data...");
            return;
        }
        ViewStatus::Empty if kind == DashboardView::Processes => {
            tracing::info!("No process data available");
            return;
        }
        _ => {}
    }

    if kind == DashboardView::Full {
        for card in &view.cards {
            tracing::info!(
                card = card.title,
                value = %card.value,
                sub_value = card.sub_value.as_deref().unwrap_or(""),
                "metric"
            );
        }
        for point in &view.cpu_series {
            tracing::debug!(
                core = %point.name,
                usage = point.usage,
                frequency_mhz = point.frequency,
                "cpu core"
            );
        }
    }

    for node in &view.processes {
        let marker = if node.expanded { "v" } else { ">" };
        tracing::info!("{} {}", marker, format_row(&node.parent));
        if let Some(res) = &node.resources {
            tracing::info!("    resources {}", format_resources(res));
        }
        for thread in node.visible_threads() {
            tracing::info!("    {}", format_row(thread));
        }
    }
}
