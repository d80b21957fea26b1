//! HTTP surface of faleproxy.
//!
//! `POST /fetch` takes a URL, downloads the page through a [`PageFetcher`],
//! rewrites it with the configured [`faleproxy_rewrite::Substitution`] and
//! answers with the rewritten markup and title. `GET /health` reports liveness
//! and every other GET is served from the static directory.

pub mod error;
pub mod fetcher;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use fetcher::PageFetcher;
pub use routes::{FetchRequest, FetchResponse, HealthResponse, create_app};
pub use state::{AppState, ServerSettings};

use faleproxy_common::Result;
use tokio::net::TcpListener;

/// Bind, serve, and block until CTRL-C.
pub async fn serve(state: AppState, settings: ServerSettings) -> Result<()> {
    let app = create_app(state, &settings.static_dir);
    let listener = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    let port = listener.local_addr()?.port();

    tracing::info!(
        host = %settings.host,
        port,
        static_dir = %settings.static_dir.display(),
        "Faleproxy server running at http://localhost:{port}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("server.shutdown");
        })
        .await?;
    Ok(())
}
