use crate::types::{ChatRequest, ErrorBody};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use solace_core::{Conversation, EngineResult};
use solace_reasoning::CompanionEngine;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

const MESSAGES_REQUIRED: &str = "messages array is required";

/// Shared state for the gateway server.
#[derive(Clone)]
struct AppState {
    engine: Arc<CompanionEngine>,
    /// Deadline for one `/chat` request, backend call included.
    request_timeout: Duration,
}

/// The gateway HTTP server.
///
/// - `POST /chat`: one engine turn per request
/// - `GET /health`: liveness
pub struct GatewayServer {
    engine: Arc<CompanionEngine>,
    host: String,
    port: u16,
    request_timeout: Duration,
}

impl GatewayServer {
    pub fn new(engine: Arc<CompanionEngine>, host: &str, port: u16) -> Self {
        Self {
            engine,
            host: host.to_string(),
            port,
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Start the server. This spawns a background task and returns the join handle.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        let app = router(self.engine.clone(), self.request_timeout);
        let addr = self.addr();

        tokio::spawn(async move {
            let listener = match tokio::net::TcpListener::bind(&addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!("Gateway failed to bind {}: {}", addr, e);
                    return;
                }
            };
            tracing::info!("Gateway listening on {}", addr);
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Gateway server error: {}", e);
            }
        })
    }
}

/// Build the router. Exposed so tests can drive it without a socket.
pub fn router(engine: Arc<CompanionEngine>, request_timeout: Duration) -> Router {
    let state = AppState {
        engine,
        request_timeout,
    };
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(handle_chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Route handlers
// ============================================================================

async fn health() -> &'static str {
    "ok"
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(MESSAGES_REQUIRED))).into_response()
}

fn reconnect() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(EngineResult::reconnect())).into_response()
}

/// POST /chat: run the engine over the supplied history.
///
/// The engine runs on its own task so a panic inside it becomes a 500
/// instead of a dropped connection. Past the deadline the task is aborted.
async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let turns = match body {
        Ok(Json(req)) => req.into_turns(),
        Err(e) => {
            tracing::debug!("Rejected chat body: {}", e);
            None
        }
    };
    let Some(conversation) = turns.and_then(|t| Conversation::new(t).ok()) else {
        return bad_request();
    };

    let engine = state.engine.clone();
    let mut task = tokio::spawn(async move { engine.respond(&conversation).await });

    match tokio::time::timeout(state.request_timeout, &mut task).await {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Engine task failed: {}", e);
            reconnect()
        }
        Err(_) => {
            // Dropping the handle would leave the backend call running.
            task.abort();
            tracing::warn!("Chat request exceeded {:?}", state.request_timeout);
            reconnect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::Catalogue;

    #[tokio::test]
    async fn test_health_endpoint() {
        let result = health().await;
        assert_eq!(result, "ok");
    }

    #[test]
    fn test_gateway_server_creates() {
        let engine = Arc::new(CompanionEngine::new(Arc::new(Catalogue::builtin()), None));
        let server = GatewayServer::new(engine, "127.0.0.1", 0)
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(server.addr(), "127.0.0.1:0");
        assert_eq!(server.request_timeout, Duration::from_secs(5));
    }
}
