// Expand/collapse state of process rows, keyed by parent pid.
//
// Only user toggles mutate the set; polls never touch it. Pids are not stable identities
// (the OS reuses them), so a new process that inherits an expanded pid shows up expanded.
// The provider does not report process start times, so there is nothing better to key on.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct ExpansionTracker {
    expanded: HashSet<u32>,
    /// `Some(n)`: forget a pid after `n` consecutive observed lists without it.
    evict_after: Option<u32>,
    misses: HashMap<u32, u32>,
}

impl ExpansionTracker {
    /// Unbounded tracker; stale pids simply never match again.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker that drops pids missing from `after` consecutive [`observe`](Self::observe) calls.
    pub fn with_eviction(after: u32) -> Self {
        Self {
            evict_after: Some(after.max(1)),
            ..Self::default()
        }
    }

    pub fn toggle(&mut self, pid: u32) {
        if !self.expanded.remove(&pid) {
            self.expanded.insert(pid);
        } else {
            self.misses.remove(&pid);
        }
    }

    pub fn is_expanded(&self, pid: u32) -> bool {
        self.expanded.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Reports the pids of a freshly rendered process list. No-op without an eviction policy.
    pub fn observe<I>(&mut self, live_pids: I)
    where
        I: IntoIterator<Item = u32>,
    {
        let Some(limit) = self.evict_after else {
            return;
        };
        let live: HashSet<u32> = live_pids.into_iter().collect();
        let mut evicted = Vec::new();
        for &pid in &self.expanded {
            if live.contains(&pid) {
                self.misses.remove(&pid);
                continue;
            }
            let count = self.misses.entry(pid).or_insert(0);
            *count += 1;
            if *count >= limit {
                evicted.push(pid);
            }
        }
        for pid in evicted {
            self.expanded.remove(&pid);
            self.misses.remove(&pid);
            tracing::debug!(pid, "evicted expanded pid absent from recent process lists");
        }
    }
}
