//! HTTP service in front of the FiscalAPI invoicing API.
//!
//! # Routes
//! - `/api/todos`: in-memory CRUD example backed by `TodoStore`.
//! - `/api/products`: bodies relayed to the API as-is.
//! - `/api/invoices`: sample documents from `Fixtures` sent to the API.
//! - `/api-docs`: Swagger UI over the generated OpenAPI document.
//!
//! # Design
//! Requests to the API are built by `fiscal_core` and executed by a
//! `Transport`, so tests swap the network for an in-process stub. Handlers
//! never panic on bad input; a panic that does happen is turned into a 500
//! by `CatchPanicLayer`.

use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

pub mod config;
pub mod docs;
pub mod error;
pub mod fiscal;
pub mod fixtures;
pub mod invoices;
pub mod products;
pub mod state;
pub mod store;
pub mod todos;
pub mod transport;

pub use config::{Config, ConfigError};
pub use error::AppError;
pub use state::AppState;
pub use store::TodoStore;
pub use todos::Todo;

pub const INFO: &str = "FiscalAPI demo server is running. Documentation at /api-docs";

pub fn app(state: AppState) -> Router {
    let panic_handler = error::PanicHandler {
        development: state.config.development,
    };
    Router::new()
        .route("/", get(|| async { INFO }))
        .merge(docs::router())
        .merge(todos::router())
        .merge(products::router())
        .merge(invoices::router())
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
