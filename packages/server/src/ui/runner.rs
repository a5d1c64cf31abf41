//! Server startup and routing.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use fanout_shared::{protocol::WS_PATH, time::now_millis};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    error::ServerError,
    ui::{
        handler::{health_check, hub_stats, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
    usecase::BroadcastCoordinator,
};

/// Bind `0.0.0.0:PORT` and serve until Ctrl+C / SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve(listener, config, shutdown_signal()).await
}

/// Serve the hub on an already bound listener until `shutdown` resolves.
///
/// On shutdown the coordinator is cancelled, which closes every registered
/// connection, and the HTTP server stops accepting.
pub async fn serve<F>(listener: TcpListener, config: ServerConfig, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let (coordinator, hub) = BroadcastCoordinator::new(config.hub.clone(), cancel.clone());
    let coordinator_task = coordinator.spawn();

    let state = Arc::new(AppState {
        hub,
        started_at: now_millis(),
    });
    let app = router(state);

    let local_addr = listener.local_addr()?;
    tracing::info!(
        write_timeout = ?config.hub.write_timeout,
        echo_to_sender = config.hub.echo_to_sender,
        "Server listening on {}{}",
        local_addr,
        WS_PATH
    );

    let stop = cancel.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            stop.cancel();
        })
        .await;

    cancel.cancel();
    if let Err(e) = coordinator_task.await {
        tracing::error!("broadcast coordinator task failed: {}", e);
    }
    tracing::info!("Server stopped");

    result.map_err(ServerError::from)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(WS_PATH, get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/stats", get(hub_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
