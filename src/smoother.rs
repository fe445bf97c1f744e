// Bounded exponential smoothing for scalar dashboard metrics.
//
// The store keeps the last *raw* value per key; only the returned display value is smoothed,
// so stored state never drifts from the true input.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::ReconciledState;

/// Metric keys smoothed on every poll.
pub mod metric {
    pub const CPU_USAGE: &str = "cpuUsage";
    pub const MEMORY_USAGE: &str = "memoryUsage";
    pub const DISK_USAGE: &str = "diskUsage";
    pub const NETWORK_RX: &str = "networkRx";
    pub const NETWORK_TX: &str = "networkTx";
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingPolicy {
    /// Weight of the new sample, in (0, 1].
    pub factor: f64,
    /// Absolute delta above which the raw value is adopted directly.
    pub step_threshold: f64,
}

impl Default for SmoothingPolicy {
    fn default() -> Self {
        Self {
            factor: 0.5,
            step_threshold: 50.0,
        }
    }
}

/// One smoothing step. Returns `(display, next_previous)`, or `None` for a non-finite sample,
/// in which case the caller keeps `previous` for both.
pub fn smooth_step(policy: &SmoothingPolicy, previous: f64, raw: f64) -> Option<(f64, f64)> {
    if !raw.is_finite() {
        return None;
    }
    if (raw - previous).abs() > policy.step_threshold {
        return Some((raw, raw));
    }
    Some((previous + (raw - previous) * policy.factor, raw))
}

/// Last raw value per metric key. Owned by the poll loop; unknown keys start at 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothingStore {
    previous: HashMap<String, f64>,
}

impl SmoothingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored raw value for `key` (0.0 before the first valid observation).
    pub fn previous(&self, key: &str) -> f64 {
        self.previous.get(key).copied().unwrap_or(0.0)
    }

    pub fn smooth(&mut self, policy: &SmoothingPolicy, key: &str, raw: f64) -> f64 {
        let previous = self.previous(key);
        match smooth_step(policy, previous, raw) {
            Some((display, next)) => {
                self.previous.insert(key.to_string(), next);
                display
            }
            None => {
                tracing::debug!(metric = key, raw, "ignoring non-finite metric sample");
                previous
            }
        }
    }

    /// Smooths every dashboard scalar derived from `state`.
    pub fn smooth_state(
        &mut self,
        policy: &SmoothingPolicy,
        state: &ReconciledState,
    ) -> SmoothedMetrics {
        let raw = RawMetrics::from_state(state);
        SmoothedMetrics {
            cpu_usage: self.smooth(policy, metric::CPU_USAGE, raw.cpu_usage),
            memory_usage: self.smooth(policy, metric::MEMORY_USAGE, raw.memory_usage),
            disk_usage: self.smooth(policy, metric::DISK_USAGE, raw.disk_usage),
            network_rx: self.smooth(policy, metric::NETWORK_RX, raw.network_rx),
            network_tx: self.smooth(policy, metric::NETWORK_TX, raw.network_tx),
        }
    }
}

/// Unsmoothed scalars read off a reconciled state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMetrics {
    /// Mean per-core usage, percent.
    pub cpu_usage: f64,
    /// Used memory, percent of total.
    pub memory_usage: f64,
    /// Primary volume usage, percent.
    pub disk_usage: f64,
    /// Main interface received, MB.
    pub network_rx: f64,
    /// Main interface transmitted, MB.
    pub network_tx: f64,
}

impl RawMetrics {
    pub fn from_state(state: &ReconciledState) -> Self {
        let main = state.network.main_interface();
        Self {
            cpu_usage: state.cpu.average_usage(),
            memory_usage: state.memory.usage_percent(),
            disk_usage: state.disks.primary().map(|d| d.usage).unwrap_or(0.0),
            network_rx: main.map(|i| i.received as f64 / BYTES_PER_MB).unwrap_or(0.0),
            network_tx: main
                .map(|i| i.transmitted as f64 / BYTES_PER_MB)
                .unwrap_or(0.0),
        }
    }
}

/// Display values for the metric cards, same units as [`RawMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SmoothedMetrics {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_rx: f64,
    pub network_tx: f64,
}
