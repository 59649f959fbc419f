//! OpenCV ORB descriptors, enabled with the `opencv` feature

use super::DescriptorSet;
use crate::error::FeatureError;
use crate::traits::FeatureExtractor;
use crate::Result;
use image::{DynamicImage, GrayImage, ImageFormat};
use opencv::{
    core::{KeyPoint, Mat, Vector},
    features2d::ORB,
    imgcodecs::{imdecode, IMREAD_GRAYSCALE},
    prelude::*,
};
use std::io::Cursor;

/// ORB keypoints and 32-byte binary descriptors from OpenCV
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbExtractor;

impl OrbExtractor {
    pub fn new() -> Self {
        Self
    }

    fn to_mat(image: &GrayImage) -> Result<Mat> {
        // round-trip through PNG so OpenCV owns a contiguous 8UC1 buffer
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        let buf = Mat::from_slice(&bytes)?;
        Ok(imdecode(&buf, IMREAD_GRAYSCALE)?)
    }

    fn detect(image: &Mat) -> opencv::Result<Mat> {
        let mut orb = ORB::create_def()?;
        let mut keypoints = Vector::<KeyPoint>::new();
        let mut descriptors = Mat::default();
        let mask = Mat::default();
        orb.detect_and_compute(image, &mask, &mut keypoints, &mut descriptors, false)?;
        Ok(descriptors)
    }
}

impl FeatureExtractor for OrbExtractor {
    fn extract(&self, image: &GrayImage) -> Result<DescriptorSet> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(DescriptorSet::empty());
        }

        let mat = Self::to_mat(image)?;
        if mat.empty() {
            return Ok(DescriptorSet::empty());
        }

        let descriptors = Self::detect(&mat).map_err(|e| FeatureError::Backend(e.to_string()))?;
        if descriptors.empty() {
            return Ok(DescriptorSet::empty());
        }

        let cols = descriptors.cols() as usize;
        let bytes = descriptors
            .data_bytes()
            .map_err(|e| FeatureError::Backend(e.to_string()))?;
        let rows = bytes.chunks(cols).map(<[u8]>::to_vec).collect();

        Ok(DescriptorSet::Binary(rows))
    }
}
