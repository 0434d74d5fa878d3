use std::path::{Path, PathBuf};

use bert_burn::data::BertInferenceBatch;
use burn::{
    config::Config as _,
    data::dataloader::batcher::Batcher as BatcherTrait,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};
use tokenizers::Tokenizer;

use crate::models::bert::sequence_classification::{Config, Model};

use super::Batcher;

/// Why loading a saved model artifact failed
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The artifact's config.json could not be read
    #[error("unable to load model config from {path}: {reason}")]
    Config {
        /// The path that failed to load
        path: PathBuf,
        /// The underlying failure
        reason: String,
    },

    /// The artifact's tokenizer.json could not be read
    #[error("unable to load tokenizer from {path}: {reason}")]
    Tokenizer {
        /// The path that failed to load
        path: PathBuf,
        /// The underlying failure
        reason: String,
    },

    /// The artifact's model record could not be read
    #[error("unable to load trained model weights from {path}: {reason}")]
    Weights {
        /// The path that failed to load
        path: PathBuf,
        /// The underlying failure
        reason: String,
    },
}

/// A text classifier backed by a saved model artifact directory
///
/// Holds the model, tokenizer, and config for the process lifetime; construct
/// once at startup.
pub struct Classifier<B: Backend> {
    model: Model<B>,
    batcher: Batcher<B>,
    config: Config,
}

impl<B: Backend> Classifier<B> {
    /// Load the config, tokenizer, and trained weights from an artifact directory
    pub fn load(artifact_dir: &str, device: B::Device) -> Result<Self, LoadError> {
        let config_path = Path::new(artifact_dir).join("config.json");
        let mut config = Config::load(&config_path).map_err(|e| LoadError::Config {
            path: config_path,
            reason: e.to_string(),
        })?;

        // Inference always runs with dropout disabled
        config.hidden_dropout_prob = 0.0;

        let tokenizer_path = Path::new(artifact_dir).join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| LoadError::Tokenizer {
            path: tokenizer_path,
            reason: e.to_string(),
        })?;

        let weights_path = Path::new(artifact_dir).join("model");
        let record = CompactRecorder::new()
            .load(weights_path.clone(), &device)
            .map_err(|e| LoadError::Weights {
                path: weights_path,
                reason: e.to_string(),
            })?;

        let model = config.init::<B>(&device).load_record(record);
        let batcher = Batcher::new(tokenizer, &config, device);

        log::info!("Loaded model artifact from {artifact_dir}");

        Ok(Self {
            model,
            batcher,
            config,
        })
    }

    /// Classify a batch of texts
    ///
    /// Returns one class id per input, in input order. An empty input yields
    /// an empty output.
    pub fn predict(&self, texts: Vec<String>) -> Vec<usize> {
        if texts.is_empty() {
            return Vec::new();
        }

        let batch: BertInferenceBatch<B> = self.batcher.batch(texts);
        let scores = self.model.infer(batch);

        scores
            .argmax(1)
            .into_data()
            .convert::<i64>()
            .value
            .into_iter()
            .map(|id| id as usize)
            .collect()
    }

    /// The class name for a class id, if defined
    pub fn label(&self, class_id: usize) -> Option<&str> {
        self.config.id2label.get(&class_id).map(String::as_str)
    }
}
