//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        check_host, close_room, create_room, debug_room, get_room, health_check, list_doubts,
        similarity, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Classroom Q&A server
///
/// # Example
///
/// ```ignore
/// let state = AppState::in_memory(ServerConfig::default());
/// Server::new(state).run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", post(create_room))
            .route("/api/rooms/{room_id}", get(get_room).delete(close_room))
            .route("/api/rooms/{room_id}/host/{identity}", get(check_host))
            .route("/api/rooms/{room_id}/doubts", get(list_doubts))
            .route("/api/rooms/{room_id}/similarity", get(similarity))
            .route("/debug/rooms/{room_id}", get(debug_room))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        tracing::info!("Q&A server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    pub async fn run(self) -> std::io::Result<()> {
        let bind_addr = self.state.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await
    }
}
