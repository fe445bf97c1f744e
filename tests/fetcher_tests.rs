// HTTP fetcher against a local fake metrics provider

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use serde_json::json;
use sysdash::config::DashboardView;
use sysdash::fetcher::{FetchError, HttpFetcher, SnapshotSource};

/// Serves `app` on an ephemeral port and returns its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn provider() -> Router {
    Router::new()
        .route(
            "/metrics",
            get(|| async {
                axum::Json(json!({
                    "cpu": {"cpus": [{"name": "cpu0", "brand": "x", "frequency": 1000, "usage": 42.0}]},
                    "memory": {"total_memory": 1024, "used_memory": 512, "total_swap": 0, "used_swap": 0},
                    "disks": {"disks": []},
                    "network": {"interfaces": []},
                    "processes": [
                        {"parent_process": {"pid": 1, "name": "init", "attributes": {"CpuUsage": "0.1"}},
                         "forked_threads": []}
                    ]
                }))
            }),
        )
        .route(
            "/processes",
            get(|| async {
                axum::Json(json!([[
                    {"parent_process": {"pid": 7, "name": "sshd", "attributes": {}},
                     "forked_threads": [{"pid": 8, "name": "sshd-session", "attributes": {}}]}
                ]]))
            }),
        )
}

#[tokio::test]
async fn fetches_full_metrics() {
    let base = serve(provider()).await;
    let fetcher = HttpFetcher::new(&base, DashboardView::Full).unwrap();
    assert_eq!(fetcher.url(), format!("{}/metrics", base));

    let snapshot = fetcher.fetch().await.expect("fetch");
    assert_eq!(snapshot.cpu.unwrap().cpus[0].usage, 42.0);
    assert_eq!(snapshot.memory.unwrap().used_memory, 512);
    assert!(snapshot.disks.unwrap().disks.is_empty());
    assert_eq!(snapshot.processes.unwrap()[0].parent_process.name, "init");
}

#[tokio::test]
async fn fetches_process_view() {
    let base = serve(provider()).await;
    // Trailing slash on the base URL is tolerated.
    let fetcher = HttpFetcher::new(&format!("{}/", base), DashboardView::Processes).unwrap();
    assert_eq!(fetcher.url(), format!("{}/processes", base));

    let snapshot = fetcher.fetch().await.expect("fetch");
    assert!(snapshot.cpu.is_none());
    let processes = snapshot.processes.unwrap();
    assert_eq!(processes[0].pid(), 7);
    assert_eq!(processes[0].forked_threads[0].pid, 8);
}

#[tokio::test]
async fn sends_crate_user_agent() {
    let app = Router::new().route(
        "/metrics",
        get(|headers: HeaderMap| async move {
            let ua = headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            axum::Json(json!({"processes": [{"parent_process": {"pid": 1, "name": ua}}]}))
        }),
    );
    let base = serve(app).await;
    let fetcher = HttpFetcher::new(&base, DashboardView::Full).unwrap();
    let snapshot = fetcher.fetch().await.unwrap();
    assert_eq!(
        snapshot.processes.unwrap()[0].parent_process.name,
        format!("sysdash/{}", sysdash::version::VERSION)
    );
}

#[tokio::test]
async fn with_client_appends_view_path() {
    let base = serve(provider()).await;
    let fetcher = HttpFetcher::with_client(reqwest::Client::new(), &base, DashboardView::Processes);
    assert_eq!(fetcher.url(), format!("{}/processes", base));
    assert!(fetcher.fetch().await.is_ok());
}

#[tokio::test]
async fn server_error_is_a_status_failure() {
    let app = Router::new().route(
        "/metrics",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(app).await;
    let fetcher = HttpFetcher::new(&base, DashboardView::Full).unwrap();
    match fetcher.fetch().await {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/metrics"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_route_is_a_status_failure() {
    let base = serve(Router::new()).await;
    let fetcher = HttpFetcher::new(&base, DashboardView::Processes).unwrap();
    assert!(matches!(
        fetcher.fetch().await,
        Err(FetchError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let app = Router::new().route("/metrics", get(|| async { "definitely not json" }));
    let base = serve(app).await;
    let fetcher = HttpFetcher::new(&base, DashboardView::Full).unwrap();
    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
    assert!(err.to_string().contains("malformed payload"));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpFetcher::new(&format!("http://{}", addr), DashboardView::Full).unwrap();
    assert!(matches!(
        fetcher.fetch().await,
        Err(FetchError::Transport { .. })
    ));
}
