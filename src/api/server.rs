//! HTTP server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Handle to a running API server.
pub struct ApiServer {
    /// Bound address (the real port when started on port 0).
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Signal graceful shutdown. In-flight requests are allowed to finish.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the server task to exit.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "API server task failed");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` and serve the API router in a background task.
pub async fn start_server(
    ctx: ApiContext,
    cors_origins: &[String],
    addr: SocketAddr,
) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let addr = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    let app = api_router(ctx, cors_origins);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use crate::api::types::InMemoryRateLimiter;
    use crate::core_state::CoreState;

    fn localhost() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_ctx() -> ApiContext {
        ApiContext::new(Arc::new(CoreState::without_store()))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_server(test_ctx(), &[], localhost())
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "healthy");

        server.shutdown();
        server.join().await;
    }

    #[tokio::test]
    async fn serves_analysis_over_http() {
        let mut server = start_server(test_ctx(), &[], localhost()).await.unwrap();

        let resp = reqwest::Client::new()
            .post(format!("http://{}/api/analyze", server.addr))
            .json(&serde_json::json!({
                "age": 28, "cycle_length": 31, "period_length": 4, "symptoms": ["acne"]
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert!(body["entry_id"].is_null());

        let resp = reqwest::get(format!("http://{}/nonexistent", server.addr)).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
        server.join().await;
    }

    #[tokio::test]
    async fn rate_limit_keys_on_peer_address() {
        let ctx = ApiContext::with_limiter(
            Arc::new(CoreState::without_store()),
            Arc::new(InMemoryRateLimiter::with_limits(1, 1000)),
        );
        let mut server = start_server(ctx, &[], localhost()).await.unwrap();
        let url = format!("http://{}/health", server.addr);

        assert_eq!(reqwest::get(&url).await.unwrap().status(), reqwest::StatusCode::OK);
        let limited = reqwest::get(&url).await.unwrap();
        assert_eq!(limited.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert!(limited.headers().contains_key("retry-after"));

        server.shutdown();
        server.join().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let mut first = start_server(test_ctx(), &[], localhost()).await.unwrap();
        let result = start_server(test_ctx(), &[], first.addr).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));

        first.shutdown();
        first.join().await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server(test_ctx(), &[], localhost()).await.unwrap();
        server.shutdown();
        server.shutdown(); // Second call should be safe
        server.join().await;
        server.join().await;
    }
}
