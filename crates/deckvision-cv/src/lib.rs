//! Deckvision Computer Vision Library
//!
//! Recognizes calibrated regions of a game screen capture against reference
//! cards, hero classes and fixed UI states, using perceptual hashes and local
//! feature descriptors.

pub mod calibration;
pub mod engine;
pub mod error;
pub mod features;
pub mod hashing;
pub mod heuristic;
pub mod utils;

// Re-export commonly used types
pub use calibration::{Calibration, Resolution};
pub use engine::{RecognitionEngine, RecognizerConfig};
pub use error::{CalibrationError, DatasetError, FeatureError};
pub use features::{DescriptorReference, DescriptorSet, FastBriefExtractor, FeatureMatcher};
pub use hashing::{Dataset, HashMatcher};

#[cfg(feature = "opencv")]
pub use features::OrbExtractor;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;
    use deckvision_core::{RecognitionResult, RecognizerKind};
    use image::{DynamicImage, GrayImage};

    /// Turns a grayscale image into a set of local feature descriptors
    pub trait FeatureExtractor: Send + Sync {
        fn extract(&self, image: &GrayImage) -> Result<DescriptorSet>;
    }

    /// One named recognizer bound to its regions and reference data
    pub trait Recognizer: Send + Sync {
        fn kind(&self) -> RecognizerKind;

        /// Run over an already normalized frame; `None` when nothing valid was found
        fn attempt(&self, frame: &DynamicImage) -> Option<RecognitionResult>;
    }
}
