//! HTTP inference service
//!
//! Serves a saved model artifact over a single prediction endpoint. The model
//! runs on a dedicated worker thread behind a bounded queue so blocking
//! inference never executes inside an async handler.

mod handlers;
mod state;
mod worker;

pub use handlers::{health_check, predict};
pub use state::{AppState, Predictor};
pub use worker::InferenceHandle;

use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server errors surfaced to clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was not a valid prediction request
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The inference queue is at capacity
    #[error("inference queue is full")]
    Busy,

    /// The inference worker is not running
    #[error("inference worker is not running")]
    Unavailable,
}

impl ApiError {
    /// The HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Busy | ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listener to
    pub address: SocketAddr,

    /// Maximum number of queued inference requests
    pub queue_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8000".parse().expect("valid literal address"),
            queue_depth: 64,
        }
    }
}

impl ServerConfig {
    /// Create config with a custom address
    pub fn with_address(mut self, address: SocketAddr) -> Self {
        self.address = address;
        self
    }

    /// Create config with a custom queue depth
    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }
}

/// Prediction request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// The texts to classify
    pub texts: Vec<String>,
}

/// Prediction response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// One predicted class id per input text, in input order
    pub predictions: Vec<usize>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status
    pub status: String,

    /// Server version
    pub version: String,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong
    pub error: String,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind the listener and serve until ctrl-c
pub async fn serve(state: AppState, config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.address)
        .await
        .map_err(|e| anyhow!("Unable to bind {}: {}", config.address, e))?;

    log::info!("Listening on http://{}", config.address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Unable to listen for the shutdown signal: {e}");
    }
}
