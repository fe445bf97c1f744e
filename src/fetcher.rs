// Snapshot fetcher: one GET against the metrics provider, typed outcome, no retries.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::instrument;

use crate::config::DashboardView;
use crate::models::{ProcessGroup, Snapshot};
use crate::version;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a poll produced no snapshot. Always recoverable; the merger keeps the previous state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can produce the latest metrics snapshot.
///
/// The scheduler is the only caller and awaits one fetch at a time.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;
}

/// Fetches snapshots over HTTP from `{base_url}/metrics` or `{base_url}/processes`.
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
    view: DashboardView,
}

impl HttpFetcher {
    pub fn new(base_url: &str, view: DashboardView) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(version::user_agent())
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url, view))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, view: DashboardView) -> Self {
        let url = format!("{}{}", base_url.trim_end_matches('/'), view.path());
        Self { client, url, view }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get_body(&self) -> Result<Bytes, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: self.url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        resp.bytes().await.map_err(|source| FetchError::Transport {
            url: self.url.clone(),
            source,
        })
    }
}

impl SnapshotSource for HttpFetcher {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let body = self.get_body().await?;
        let decoded = match self.view {
            DashboardView::Full => decode_metrics(&body),
            DashboardView::Processes => decode_processes(&body),
        };
        decoded.map_err(|source| FetchError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// Decodes a full `/metrics` document.
pub fn decode_metrics(body: &[u8]) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Decodes a `/processes` document: a JSON array whose first element is the process list.
///
/// An empty array, or a first element that is not a list, yields a snapshot with no
/// process field.
pub fn decode_processes(body: &[u8]) -> Result<Snapshot, serde_json::Error> {
    let outer: Vec<serde_json::Value> = serde_json::from_slice(body)?;
    match outer.into_iter().next() {
        Some(first @ serde_json::Value::Array(_)) => {
            let processes: Vec<ProcessGroup> = serde_json::from_value(first)?;
            Ok(Snapshot::processes_only(processes))
        }
        _ => Ok(Snapshot::default()),
    }
}
