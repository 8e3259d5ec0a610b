//! Read-only HTTP API over a Synthspace database.
//!
//! Every data handler opens the SQLite file read-only for the duration of
//! one request; the server never creates or mutates a database. Listing
//! endpoints speak both pagination styles: offset mode by default, keyset
//! mode whenever the `cursor` query parameter is present, with the follow-up
//! token delivered in the `x-next-cursor` response header.

mod error;
mod routes;

pub use error::ApiError;

use std::io;
use std::path::PathBuf;

use axum::{Router, routing::get};
use tracing::info;

use synthspace_core::db::Store;

///
/// AppState
///

#[derive(Clone)]
pub struct AppState {
    db_path: PathBuf,
}

impl AppState {
    pub(crate) fn open(&self) -> Result<Store, ApiError> {
        Ok(Store::open_read_only(&self.db_path)?)
    }
}

/// Builds the API router for one database path.
#[must_use]
pub fn router(db_path: PathBuf) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/workspaces", get(routes::list_workspaces))
        .route("/workspaces/{workspace_id}", get(routes::workspace_summary))
        .route("/workspaces/{workspace_id}/users", get(routes::list_users))
        .route(
            "/workspaces/{workspace_id}/channels",
            get(routes::list_channels),
        )
        .route(
            "/workspaces/{workspace_id}/channel-members",
            get(routes::list_channel_members),
        )
        .route(
            "/workspaces/{workspace_id}/messages",
            get(routes::list_messages),
        )
        .route("/workspaces/{workspace_id}/files", get(routes::list_files))
        .with_state(AppState { db_path })
}

/// Binds `host:port` and serves the API until the task is cancelled.
pub async fn serve(db_path: PathBuf, host: &str, port: u16) -> io::Result<()> {
    let app = router(db_path);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "synthspace api listening");
    }

    axum::serve(listener, app).await
}
