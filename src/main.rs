//! adboard-sync entry point.
//!
//! Loads the first page of every bundled resource concurrently and prints a
//! JSON summary. Useful as a smoke test against a live backend.

use futures_util::future::join_all;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use adboard_sync::app_state::AppState;
use adboard_sync::config::ClientConfig;
use adboard_sync::service::LoadStatus;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSummary {
    resource: String,
    status: LoadStatus,
    rows: usize,
    total_count: u64,
    error: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = ClientConfig::from_env()?;
    tracing::info!(base_url = %config.api_base_url, "starting adboard-sync");

    let state = AppState::from_config(&config)?;

    // Failures are recorded in each controller's state
    join_all(state.resources.iter().map(|h| h.list.reload())).await;

    let mut summaries = Vec::with_capacity(state.resources.len());
    for handle in &state.resources {
        let snap = handle.list.snapshot().await;
        tracing::info!(
            resource = %handle.list.resource().name,
            status = ?snap.status,
            rows = snap.rows.len(),
            total = snap.total_count,
            "resource summary"
        );
        summaries.push(ResourceSummary {
            resource: handle.list.resource().name.clone(),
            status: snap.status,
            rows: snap.rows.len(),
            total_count: snap.total_count,
            error: snap.error,
        });
    }

    println!("{}", serde_json::to_string_pretty(&summaries)?);

    if summaries.iter().all(|s| s.status == LoadStatus::Error) {
        anyhow::bail!("no resource could be loaded");
    }
    Ok(())
}
