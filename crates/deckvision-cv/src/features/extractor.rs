//! Pure-Rust FAST-9 keypoints with BRIEF binary descriptors

use super::DescriptorSet;
use crate::traits::FeatureExtractor;
use crate::Result;
use image::GrayImage;
use imageproc::corners::corners_fast9;
use imageproc::filter::gaussian_blur_f32;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Half-size of the square patch sampled around each keypoint
const PATCH_RADIUS: i32 = 15;
const DESCRIPTOR_BITS: usize = 256;
const PATTERN_SEED: u64 = 0x00de_c4b1;
const SMOOTHING_SIGMA: f32 = 2.0;

pub const DEFAULT_FAST_THRESHOLD: u8 = 30;
pub const DEFAULT_MAX_KEYPOINTS: usize = 500;

/// FAST corner detector plus 256-bit BRIEF descriptors over a fixed pattern
pub struct FastBriefExtractor {
    fast_threshold: u8,
    max_keypoints: usize,
    pattern: Vec<[(i32, i32); 2]>,
}

impl FastBriefExtractor {
    pub fn new(fast_threshold: u8, max_keypoints: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
        let mut offset = || {
            (
                rng.gen_range(-PATCH_RADIUS..=PATCH_RADIUS),
                rng.gen_range(-PATCH_RADIUS..=PATCH_RADIUS),
            )
        };
        let pattern = (0..DESCRIPTOR_BITS).map(|_| [offset(), offset()]).collect();

        Self {
            fast_threshold,
            max_keypoints,
            pattern,
        }
    }

    fn describe(&self, smoothed: &GrayImage, x: i32, y: i32) -> Vec<u8> {
        let mut bits = vec![0u8; DESCRIPTOR_BITS / 8];
        for (i, [(ax, ay), (bx, by)]) in self.pattern.iter().enumerate() {
            let a = smoothed.get_pixel((x + ax) as u32, (y + ay) as u32)[0];
            let b = smoothed.get_pixel((x + bx) as u32, (y + by) as u32)[0];
            if a < b {
                bits[i / 8] |= 1u8 << (i % 8);
            }
        }
        bits
    }
}

impl Default for FastBriefExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FAST_THRESHOLD, DEFAULT_MAX_KEYPOINTS)
    }
}

impl FeatureExtractor for FastBriefExtractor {
    fn extract(&self, image: &GrayImage) -> Result<DescriptorSet> {
        let (width, height) = image.dimensions();
        let margin = PATCH_RADIUS as u32;
        if width <= 2 * margin || height <= 2 * margin {
            return Ok(DescriptorSet::empty());
        }

        let mut corners = corners_fast9(image, self.fast_threshold);
        corners.retain(|c| {
            c.x >= margin && c.y >= margin && c.x < width - margin && c.y < height - margin
        });
        corners.sort_by(|a, b| b.score.total_cmp(&a.score));
        corners.truncate(self.max_keypoints);

        let smoothed = gaussian_blur_f32(image, SMOOTHING_SIGMA);
        let rows = corners
            .iter()
            .map(|c| self.describe(&smoothed, c.x as i32, c.y as i32))
            .collect();

        Ok(DescriptorSet::Binary(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::good_matches;
    use image::Luma;

    /// 8x8 blocks of pseudo-random intensity
    fn blocks(seed: u64, width: u32, height: u32) -> GrayImage {
        let mut rng = StdRng::seed_from_u64(seed);
        let cols = width.div_ceil(8);
        let levels: Vec<u8> = (0..cols * height.div_ceil(8)).map(|_| rng.r#gen()).collect();
        GrayImage::from_fn(width, height, |x, y| Luma([levels[((y / 8) * cols + x / 8) as usize]]))
    }

    #[test]
    fn test_flat_image_has_no_features() -> Result<()> {
        let flat = GrayImage::from_pixel(100, 100, Luma([90]));
        assert!(FastBriefExtractor::default().extract(&flat)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_tiny_image_has_no_features() -> Result<()> {
        let tiny = blocks(1, 30, 30);
        assert!(FastBriefExtractor::default().extract(&tiny)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_descriptors_are_256_bits() -> Result<()> {
        let image = blocks(2, 160, 120);
        let descriptors = FastBriefExtractor::default().extract(&image)?;
        assert!(descriptors.len() >= 7, "only {} keypoints", descriptors.len());
        match descriptors {
            DescriptorSet::Binary(rows) => assert!(rows.iter().all(|r| r.len() == 32)),
            DescriptorSet::Float(_) => panic!("expected binary descriptors"),
        }
        Ok(())
    }

    #[test]
    fn test_respects_keypoint_cap() -> Result<()> {
        let image = blocks(3, 200, 200);
        let descriptors = FastBriefExtractor::new(10, 12).extract(&image)?;
        assert!(descriptors.len() <= 12);
        Ok(())
    }

    #[test]
    fn test_same_image_matches_itself() -> Result<()> {
        let extractor = FastBriefExtractor::default();
        let image = blocks(4, 160, 160);
        let first = extractor.extract(&image)?;
        let second = extractor.extract(&image)?;
        assert_eq!(first, second);
        assert!(good_matches(&first, &second).len() >= 7);
        Ok(())
    }
}
