use anyhow::Result;
use sysdash::expansion::ExpansionTracker;
use sysdash::fetcher::HttpFetcher;
use sysdash::scheduler::{self, SchedulerConfig};
use sysdash::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let view_kind = app_config.source.view;
    let fetcher = HttpFetcher::new(&app_config.source.base_url, view_kind)?;
    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        url = fetcher.url(),
        interval_secs = app_config.poll_interval().as_secs(),
        "Polling metrics"
    );

    let handle = scheduler::spawn(
        fetcher,
        SchedulerConfig {
            interval: app_config.poll_interval(),
            policy: app_config.smoothing_policy(),
        },
    )?;
    let mut state_rx = handle.subscribe();

    let mut expansion = match app_config.expansion.evict_after_updates {
        Some(n) => ExpansionTracker::with_eviction(n),
        None => ExpansionTracker::new(),
    };
    let mut last_generation = 0;

    // Toggle events: one pid per line on stdin.
    let mut toggles = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    render::render(&view::assemble(&state_rx.borrow(), &expansion), view_kind);

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("poll scheduler stopped unexpectedly");
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                if state.reconciled.generation != last_generation {
                    last_generation = state.reconciled.generation;
                    expansion.observe(state.reconciled.processes.iter().map(|g| g.pid()));
                }
                render::render(&view::assemble(&state, &expansion), view_kind);
            }
            line = toggles.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match line.trim().parse::<u32>() {
                        Ok(pid) => {
                            expansion.toggle(pid);
                            tracing::debug!(pid, expanded = expansion.is_expanded(pid), "toggled process");
                            render::render(&view::assemble(&state_rx.borrow(), &expansion), view_kind);
                        }
                        Err(_) if line.trim().is_empty() => {}
                        Err(e) => tracing::warn!(input = %line.trim(), error = %e, "expected a pid"),
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed; toggles disabled");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
