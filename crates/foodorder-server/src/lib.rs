//! HTTP gateway for order batches.
//!
//! | route | result |
//! |---|---|
//! | `POST /api/survey-data/add` | validate and store a batch, `{id}` |
//! | `GET /api/survey-data/all` | every batch, newest first |
//! | `GET /api/survey-data/latest` | payload of the newest batch |
//! | `GET /api/survey-data/{id}` | one batch |

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/survey-data/add", post(routes::add_batch))
        .route("/api/survey-data/all", get(routes::list_batches))
        .route("/api/survey-data/latest", get(routes::latest_batch))
        .route("/api/survey-data/{id}", get(routes::get_batch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn bind(address: SocketAddr) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "server listening");
    Ok(listener)
}

/// Serves until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
