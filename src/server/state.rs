use std::{sync::Arc, time::Instant};

use async_trait::async_trait;

use super::ApiError;

/// The seam between the HTTP handlers and the model execution layer
///
/// Handlers only see this trait, so tests can substitute a stub and the real
/// implementation can live behind a worker queue.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Classify a batch of texts, one class id per input in input order
    async fn predict(&self, texts: Vec<String>) -> Result<Vec<usize>, ApiError>;
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The predictor handling inference requests
    pub predictor: Arc<dyn Predictor>,

    started_at: Instant,
}

impl AppState {
    /// Create state around an injected predictor
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            predictor,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
