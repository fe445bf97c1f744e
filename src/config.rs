use serde::Deserialize;
use std::time::Duration;

use crate::smoother::SmoothingPolicy;

/// Base URL used when neither the config file nor `API_URL` sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
}

/// Which provider endpoint the dashboard renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    /// CPU, memory, disk, network cards plus the process tree (`/metrics`).
    Full,
    /// Process tree only (`/processes`).
    #[default]
    Processes,
}

impl DashboardView {
    pub fn path(self) -> &'static str {
        match self {
            DashboardView::Full => "/metrics",
            DashboardView::Processes => "/processes",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub view: DashboardView,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            view: DashboardView::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_process_interval_secs")]
    pub process_interval_secs: u64,
    #[serde(default = "default_full_interval_secs")]
    pub full_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            process_interval_secs: default_process_interval_secs(),
            full_interval_secs: default_full_interval_secs(),
        }
    }
}

fn default_process_interval_secs() -> u64 {
    5
}

fn default_full_interval_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmoothingConfig {
    #[serde(default = "default_smoothing_factor")]
    pub factor: f64,
    /// Deltas larger than this (in the metric's own units) bypass smoothing.
    #[serde(default = "default_step_threshold")]
    pub step_threshold: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            factor: default_smoothing_factor(),
            step_threshold: default_step_threshold(),
        }
    }
}

fn default_smoothing_factor() -> f64 {
    0.5
}

fn default_step_threshold() -> f64 {
    50.0
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpansionConfig {
    /// Forget an expanded pid after it is missing from this many consecutive state updates
    /// received by the renderer. Polls that land before the renderer catches up collapse into
    /// one update, so this counts renders, not polls. Unset keeps every toggled pid.
    #[serde(default)]
    pub evict_after_updates: Option<u32>,
}

impl AppConfig {
    /// Loads `CONFIG_FILE` (default `config.toml`); falls back to built-in defaults when the
    /// file does not exist. `API_URL` overrides `source.base_url`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path, "no config file; using defaults");
                AppConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        if let Ok(url) = std::env::var("API_URL")
            && !url.is_empty()
        {
            config.source.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Poll cadence for the configured view.
    pub fn poll_interval(&self) -> Duration {
        let secs = match self.source.view {
            DashboardView::Full => self.polling.full_interval_secs,
            DashboardView::Processes => self.polling.process_interval_secs,
        };
        Duration::from_secs(secs)
    }

    pub fn smoothing_policy(&self) -> SmoothingPolicy {
        SmoothingPolicy {
            factor: self.smoothing.factor,
            step_threshold: self.smoothing.step_threshold,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        let base = &self.source.base_url;
        anyhow::ensure!(
            base.starts_with("http://") || base.starts_with("https://"),
            "source.base_url must start with http:// or https://, got {:?}",
            base
        );
        anyhow::ensure!(
            self.polling.process_interval_secs > 0,
            "polling.process_interval_secs must be > 0, got {}",
            self.polling.process_interval_secs
        );
        anyhow::ensure!(
            self.polling.full_interval_secs > 0,
            "polling.full_interval_secs must be > 0, got {}",
            self.polling.full_interval_secs
        );
        anyhow::ensure!(
            self.smoothing.factor > 0.0 && self.smoothing.factor <= 1.0,
            "smoothing.factor must be in (0, 1], got {}",
            self.smoothing.factor
        );
        anyhow::ensure!(
            self.smoothing.step_threshold.is_finite() && self.smoothing.step_threshold >= 0.0,
            "smoothing.step_threshold must be a finite value >= 0, got {}",
            self.smoothing.step_threshold
        );
        if let Some(n) = self.expansion.evict_after_updates {
            anyhow::ensure!(
                n > 0,
                "expansion.evict_after_updates must be > 0 when set, got {}",
                n
            );
        }
        Ok(())
    }
}
