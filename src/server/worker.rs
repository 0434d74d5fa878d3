use async_trait::async_trait;
use burn::tensor::backend::Backend;
use tokio::sync::{mpsc, oneshot};

use crate::pipelines::text_classification::Classifier;

use super::{ApiError, Predictor};

/// A queued inference request
struct Job {
    texts: Vec<String>,
    reply: oneshot::Sender<Vec<usize>>,
}

/// Handle to the inference worker thread
///
/// Requests are queued over a bounded channel and answered over oneshot
/// channels, so blocking model execution stays off the async runtime.
/// Dropping the last handle closes the queue and the worker thread exits.
#[derive(Clone)]
pub struct InferenceHandle {
    tx: mpsc::Sender<Job>,
}

impl InferenceHandle {
    /// Spawn a worker thread owning the classifier
    pub fn spawn<B: Backend>(classifier: Classifier<B>, queue_depth: usize) -> Self
    where
        Classifier<B>: Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Job>(queue_depth.max(1));

        std::thread::Builder::new()
            .name("inference-worker".to_string())
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    let predictions = classifier.predict(job.texts);

                    // The requester may have hung up; nothing to do then
                    let _ = job.reply.send(predictions);
                }

                log::info!("Inference worker shutting down");
            })
            .expect("unable to spawn the inference worker thread");

        Self { tx }
    }
}

#[async_trait]
impl Predictor for InferenceHandle {
    async fn predict(&self, texts: Vec<String>) -> Result<Vec<usize>, ApiError> {
        let (reply, response) = oneshot::channel();

        self.tx
            .try_send(Job { texts, reply })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => ApiError::Busy,
                mpsc::error::TrySendError::Closed(_) => ApiError::Unavailable,
            })?;

        // A dropped reply means the worker died mid-request
        response.await.map_err(|_| ApiError::Unavailable)
    }
}
