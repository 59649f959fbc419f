//! Image processing utilities built on the `image` crate

use crate::Result;
use anyhow::Context;
use deckvision_core::Region;
use image::{imageops::FilterType, DynamicImage, GenericImageView, GrayImage, Rgb};
use std::borrow::Cow;
use std::path::Path;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load an image of any supported format
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        image::open(&path).with_context(|| format!("Failed to open image: {:?}", path.as_ref()))
    }

    /// Load an image as 8-bit grayscale
    pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
        Ok(Self::load(path)?.to_luma8())
    }

    /// Resize to exactly `width` x `height` unless the frame already has that size
    pub fn normalize(frame: &DynamicImage, width: u32, height: u32) -> Cow<'_, DynamicImage> {
        if frame.dimensions() == (width, height) {
            Cow::Borrowed(frame)
        } else {
            Cow::Owned(frame.resize_exact(width, height, FilterType::Triangle))
        }
    }

    /// Copy out a region; parts outside the image are clipped
    pub fn crop(image: &DynamicImage, region: &Region) -> DynamicImage {
        image.crop_imm(region.x, region.y, region.width, region.height)
    }

    pub fn crop_grayscale(image: &DynamicImage, region: &Region) -> GrayImage {
        match image {
            DynamicImage::ImageLuma8(gray) => {
                image::imageops::crop_imm(gray, region.x, region.y, region.width, region.height)
                    .to_image()
            }
            other => Self::crop(other, region).to_luma8(),
        }
    }

    /// Convert one RGB pixel to HSV using the 8-bit OpenCV convention:
    /// hue in [0, 180), saturation and value in [0, 255]
    pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> [f32; 3] {
        let [r, g, b] = pixel.0.map(f32::from);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        let saturation = if max > 0.0 { (255.0 * diff / max).round() } else { 0.0 };

        let hue_degrees = if diff == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / diff
        } else if max == g {
            120.0 + 60.0 * (b - r) / diff
        } else {
            240.0 + 60.0 * (r - g) / diff
        };
        let hue_degrees = if hue_degrees < 0.0 { hue_degrees + 360.0 } else { hue_degrees };
        let mut hue = (hue_degrees / 2.0).round();
        if hue >= 180.0 {
            hue -= 180.0;
        }

        [hue, saturation, max]
    }

    /// Per-channel HSV mean over every pixel of the image
    pub fn mean_hsv(image: &DynamicImage) -> [f32; 3] {
        let rgb = image.to_rgb8();
        let count = rgb.width() as usize * rgb.height() as usize;
        if count == 0 {
            return [0.0; 3];
        }

        let mut sums = [0f64; 3];
        for pixel in rgb.pixels() {
            let hsv = Self::rgb_to_hsv(pixel);
            for (sum, channel) in sums.iter_mut().zip(hsv) {
                *sum += channel as f64;
            }
        }

        sums.map(|sum| (sum / count as f64) as f32)
    }
}
