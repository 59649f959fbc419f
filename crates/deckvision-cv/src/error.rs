//! Typed errors for failures a caller may want to tell apart

use deckvision_core::{RecognizerKind, Region};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("calibration resolution must be non-zero, got {width}x{height}")]
    EmptyResolution { width: u32, height: u32 },

    #[error("{kind} region {index} is empty")]
    EmptyRegion { kind: RecognizerKind, index: usize },

    #[error("{kind} region {index} {region:?} exceeds the {width}x{height} frame")]
    RegionOutOfBounds {
        kind: RecognizerKind,
        index: usize,
        region: Region,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset has {entries} entries but {hashes} hashes")]
    LengthMismatch { entries: usize, hashes: usize },
}

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("descriptor extraction backend failed: {0}")]
    Backend(String),

    #[error("feature backend '{0}' is not available in this build")]
    UnsupportedBackend(String),
}
