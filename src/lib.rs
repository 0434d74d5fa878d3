//! # Smart Detector
//!
//! Binary text classification for flagging at-risk social posts, built on the
//! Burn deep learning framework. The crate ships two binaries: `train`
//! fine-tunes a pretrained RoBERTa encoder on a labeled CSV and writes a model
//! artifact directory, and `serve` exposes that artifact over an HTTP
//! prediction endpoint.
#![forbid(unsafe_code)]

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Datasets
pub mod datasets;

/// HTTP serving
pub mod server;

/// Utilities
pub mod utils;

/// Error macros
#[macro_use]
extern crate anyhow;
