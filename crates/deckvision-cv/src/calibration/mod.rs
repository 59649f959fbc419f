//! Calibrated screen layout: expected frame resolution and regions per recognizer

use crate::error::CalibrationError;
use crate::Result;
use anyhow::Context;
use deckvision_core::{RecognizerKind, Region};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File stem of the calibration used when the requested one cannot be loaded
pub const DEFAULT_CALIBRATION_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Region layout for one screen resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub resolution: Resolution,
    #[serde(default)]
    regions: HashMap<RecognizerKind, Vec<Region>>,
}

impl Calibration {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            regions: HashMap::new(),
        }
    }

    pub fn with_regions(mut self, kind: RecognizerKind, regions: Vec<Region>) -> Self {
        self.regions.insert(kind, regions);
        self
    }

    /// Regions for `kind` in calibration order, empty when none are declared
    pub fn regions(&self, kind: RecognizerKind) -> &[Region] {
        self.regions.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Load and validate a JSON calibration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read calibration: {:?}", path))?;
        let calibration: Calibration = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse calibration: {:?}", path))?;

        calibration
            .validate()
            .with_context(|| format!("Invalid calibration: {:?}", path))?;
        Ok(calibration)
    }

    /// Load `<dir>/<id>.json`, falling back to `<dir>/default.json`.
    ///
    /// Only a failure of the default calibration is an error.
    pub fn load_with_fallback<P: AsRef<Path>>(dir: P, id: &str) -> Result<Self> {
        let dir = dir.as_ref();
        match Self::load(dir.join(format!("{}.json", id))) {
            Ok(calibration) => {
                tracing::info!(
                    "Using calibration '{}' ({}x{})",
                    id,
                    calibration.resolution.width,
                    calibration.resolution.height
                );
                Ok(calibration)
            }
            Err(e) => {
                tracing::warn!(
                    "Calibration with ID {} was not properly initialized ({:#}), trying to use default...",
                    id,
                    e
                );
                Self::load(dir.join(format!("{}.json", DEFAULT_CALIBRATION_ID)))
                    .context("Failed to load default calibration")
            }
        }
    }

    /// Check that every region is non-empty and inside the declared resolution
    pub fn validate(&self) -> std::result::Result<(), CalibrationError> {
        let Resolution { width, height } = self.resolution;
        if width == 0 || height == 0 {
            return Err(CalibrationError::EmptyResolution { width, height });
        }

        for kind in RecognizerKind::ALL {
            for (index, region) in self.regions(kind).iter().enumerate() {
                if region.is_empty() {
                    return Err(CalibrationError::EmptyRegion { kind, index });
                }
                if !region.fits_within(width, height) {
                    return Err(CalibrationError::RegionOutOfBounds {
                        kind,
                        index,
                        region: *region,
                        width,
                        height,
                    });
                }
            }
        }

        Ok(())
    }
}
