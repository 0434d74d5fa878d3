/// Hugging Face utilities
pub mod hugging_face;

/// Classification metrics
pub mod metrics;

/// Renderer Utilities
pub mod renderer;

/// Utilities for classification tasks
pub mod classes;
