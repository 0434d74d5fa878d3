/// Text Classification Items
pub mod item;

/// Batcher
pub mod batcher;

/// Training
pub mod training;

/// Evaluation
pub mod evaluation;

/// Inference
pub mod inference;

pub use batcher::Batcher;
pub use inference::{Classifier, LoadError};
pub use item::Item;
pub use training::train;
