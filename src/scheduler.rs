// Poll scheduler: fetch -> merge -> smooth on a fixed cadence, one cycle at a time.
// The first cycle runs immediately; the reconciled state is published only after a cycle
// completes, and a fetch still in flight at shutdown is dropped without being applied.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::Instrument;

use crate::fetcher::{FetchError, SnapshotSource};
use crate::merge::merge;
use crate::models::{ReconciledState, Snapshot};
use crate::smoother::{SmoothedMetrics, SmoothingPolicy, SmoothingStore};

/// Everything a cycle publishes to the rendering side, replaced as one value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub reconciled: ReconciledState,
    pub metrics: SmoothedMetrics,
}

impl DashboardState {
    pub fn is_loading(&self) -> bool {
        self.reconciled.is_loading()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Polling,
    Stopped,
}

/// Synchronous core of a poll cycle. Sole owner of the reconciled state and smoothing store.
#[derive(Debug, Default)]
pub struct DashboardEngine {
    state: DashboardState,
    smoothing: SmoothingStore,
    policy: SmoothingPolicy,
    consecutive_failures: u32,
}

impl DashboardEngine {
    pub fn new(policy: SmoothingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn smoothing(&self) -> &SmoothingStore {
        &self.smoothing
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Folds one fetch outcome into the state. Returns `true` when the state changed;
    /// a failure never changes it.
    pub fn apply(&mut self, outcome: Result<Snapshot, FetchError>) -> bool {
        match outcome {
            Ok(snapshot) => {
                if self.consecutive_failures > 0 {
                    tracing::info!(
                        failed_polls = self.consecutive_failures,
                        "metrics source recovered"
                    );
                    self.consecutive_failures = 0;
                }
                let reconciled = merge(&self.state.reconciled, Ok(&snapshot));
                let metrics = self.smoothing.smooth_state(&self.policy, &reconciled);
                self.state = DashboardState {
                    reconciled,
                    metrics,
                };
                true
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures == 1 {
                    tracing::warn!(
                        error = %e,
                        operation = "fetch_snapshot",
                        "metrics fetch failed; keeping last known state"
                    );
                } else {
                    tracing::debug!(
                        error = %e,
                        operation = "fetch_snapshot",
                        consecutive_failures = self.consecutive_failures,
                        "metrics fetch failed"
                    );
                }
                false
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay between cycle starts (5s process view, 30s full view by default).
    pub interval: Duration,
    pub policy: SmoothingPolicy,
}

/// Owner-side handle of a running scheduler. Dropping it also stops the loop.
pub struct SchedulerHandle {
    state_rx: watch::Receiver<Arc<DashboardState>>,
    phase_rx: watch::Receiver<PollPhase>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: tokio::task::JoinHandle<()>,
}

impl SchedulerHandle {
    /// Receiver that is marked changed after every cycle that altered the state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.state_rx.clone()
    }

    pub fn latest(&self) -> Arc<DashboardState> {
        self.state_rx.borrow().clone()
    }

    pub fn phase(&self) -> PollPhase {
        *self.phase_rx.borrow()
    }

    pub fn phase_watch(&self) -> watch::Receiver<PollPhase> {
        self.phase_rx.clone()
    }

    /// Cancels the timer and any in-flight fetch, then waits for the loop to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.join).await {
            tracing::warn!(error = %e, "poll scheduler task ended abnormally");
        }
    }
}

/// Starts the poll loop on the current runtime. Fails on a zero interval.
pub fn spawn<S: SnapshotSource>(
    source: S,
    config: SchedulerConfig,
) -> anyhow::Result<SchedulerHandle> {
    anyhow::ensure!(
        !config.interval.is_zero(),
        "poll interval must be > 0, got {:?}",
        config.interval
    );

    let (state_tx, state_rx) = watch::channel(Arc::new(DashboardState::default()));
    let (phase_tx, phase_rx) = watch::channel(PollPhase::Idle);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let span = tracing::debug_span!(
        "poll_scheduler",
        interval_ms = config.interval.as_millis() as u64
    );
    let join = tokio::spawn(run(source, config, state_tx, phase_tx, shutdown_rx).instrument(span));

    Ok(SchedulerHandle {
        state_rx,
        phase_rx,
        shutdown_tx: Some(shutdown_tx),
        join,
    })
}

async fn run<S: SnapshotSource>(
    source: S,
    config: SchedulerConfig,
    state_tx: watch::Sender<Arc<DashboardState>>,
    phase_tx: watch::Sender<PollPhase>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut engine = DashboardEngine::new(config.policy);
    let mut tick = interval(config.interval);
    // A slow fetch delays the loop; ticks missed meanwhile are dropped, never replayed.
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::debug!("poll scheduler shutting down");
                break;
            }
            _ = tick.tick() => {
                phase_tx.send_replace(PollPhase::Polling);
                let outcome = tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => None,
                    outcome = source.fetch() => Some(outcome),
                };
                let Some(outcome) = outcome else {
                    tracing::debug!("shutdown during fetch; discarding in-flight result");
                    break;
                };
                if engine.apply(outcome) {
                    let state = engine.state();
                    tracing::debug!(
                        generation = state.reconciled.generation,
                        process_groups = state.reconciled.processes.len(),
                        cores = state.reconciled.cpu.cpus.len(),
                        "state reconciled"
                    );
                    state_tx.send_replace(Arc::new(state.clone()));
                }
                phase_tx.send_replace(PollPhase::Idle);
            }
        }
    }
    phase_tx.send_replace(PollPhase::Stopped);
}
