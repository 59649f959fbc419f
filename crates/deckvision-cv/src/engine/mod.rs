//! High-level recognition engine

pub mod config;
pub mod recognition;
pub mod recognizer;

pub use config::{FeatureBackend, FeatureConfig, PathsConfig, RecognizerConfig};
pub use recognition::RecognitionEngine;
pub use recognizer::{FeatureRecognizer, HashRecognizer};
