//! Engine configuration

use crate::features::extractor::{DEFAULT_FAST_THRESHOLD, DEFAULT_MAX_KEYPOINTS};
use crate::features::FastBriefExtractor;
use crate::traits::FeatureExtractor;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Hash distances strictly below this count as a match
    pub phash_threshold: u32,
    pub paths: PathsConfig,
    pub features: FeatureConfig,
}

/// Where calibrations, reference artwork and the database live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub calibrations_path: PathBuf,
    pub card_image_path: PathBuf,
    pub hero_image_path: PathBuf,
    pub misc_image_path: PathBuf,
    pub database_path: PathBuf,
}

/// Descriptor extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub backend: FeatureBackend,
    pub fast_threshold: u8,
    pub max_keypoints: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureBackend {
    /// FAST corners with BRIEF descriptors, no native dependencies
    FastBrief,
    /// OpenCV ORB, requires the `opencv` feature
    Orb,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            phash_threshold: 16,
            paths: PathsConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            calibrations_path: "assets/calibrations".into(),
            card_image_path: "assets/cards".into(),
            hero_image_path: "assets/heroes".into(),
            misc_image_path: "assets/misc".into(),
            database_path: "assets/database.json".into(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            backend: FeatureBackend::FastBrief,
            fast_threshold: DEFAULT_FAST_THRESHOLD,
            max_keypoints: DEFAULT_MAX_KEYPOINTS,
        }
    }
}

impl RecognizerConfig {
    /// Load a JSON config; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
    }
}

impl FeatureConfig {
    /// Instantiate the configured descriptor extractor
    pub fn build_extractor(&self) -> Result<Arc<dyn FeatureExtractor>> {
        match self.backend {
            FeatureBackend::FastBrief => Ok(Arc::new(FastBriefExtractor::new(
                self.fast_threshold,
                self.max_keypoints,
            ))),
            #[cfg(feature = "opencv")]
            FeatureBackend::Orb => Ok(Arc::new(crate::features::OrbExtractor::new())),
            #[cfg(not(feature = "opencv"))]
            FeatureBackend::Orb => Err(crate::error::FeatureError::UnsupportedBackend("orb".to_string()).into()),
        }
    }
}
