//! 64-bit DCT perceptual hash

use image::{imageops::FilterType, GrayImage};
use imageproc::filter::box_filter;
use std::f64::consts::PI;

const SAMPLE_SIZE: usize = 32;
const BLOCK: usize = 8;
const BLUR_RADIUS: u32 = 3;

/// Perceptual hash of a grayscale image.
///
/// The image is mean-filtered, shrunk to 32x32 and transformed with a 2-D DCT.
/// The 8x8 low-frequency block (skipping the first row and column) is compared
/// against its median; bit 63 holds the first coefficient.
pub fn phash(image: &GrayImage) -> u64 {
    if image.width() == 0 || image.height() == 0 {
        return 0;
    }

    let blurred = box_filter(image, BLUR_RADIUS, BLUR_RADIUS);
    let sample = image::imageops::resize(
        &blurred,
        SAMPLE_SIZE as u32,
        SAMPLE_SIZE as u32,
        FilterType::Triangle,
    );

    let coefficients = low_frequency_block(&sample);

    let mut sorted = coefficients;
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = (sorted[BLOCK * BLOCK / 2 - 1] + sorted[BLOCK * BLOCK / 2]) / 2.0;

    coefficients
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > median)
        .fold(0u64, |hash, (i, _)| hash | 1u64 << (63 - i))
}

/// Number of differing bits
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// DCT coefficients at rows and columns 1..=8, row-major
fn low_frequency_block(sample: &GrayImage) -> [f64; BLOCK * BLOCK] {
    let basis = dct_basis();

    // rows of C * X for the frequencies we keep
    let mut partial = [[0f64; SAMPLE_SIZE]; BLOCK];
    for (u, row) in partial.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..SAMPLE_SIZE)
                .map(|i| basis[u + 1][i] * sample.get_pixel(j as u32, i as u32)[0] as f64)
                .sum();
        }
    }

    let mut block = [0f64; BLOCK * BLOCK];
    for u in 0..BLOCK {
        for v in 0..BLOCK {
            block[u * BLOCK + v] = (0..SAMPLE_SIZE)
                .map(|j| partial[u][j] * basis[v + 1][j])
                .sum();
        }
    }
    block
}

/// Orthonormal DCT-II basis, `basis[k][n]`
fn dct_basis() -> [[f64; SAMPLE_SIZE]; SAMPLE_SIZE] {
    let n = SAMPLE_SIZE as f64;
    let mut basis = [[0f64; SAMPLE_SIZE]; SAMPLE_SIZE];
    for (k, row) in basis.iter_mut().enumerate() {
        let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
        for (i, cell) in row.iter_mut().enumerate() {
            *cell = scale * (PI * (2 * i + 1) as f64 * k as f64 / (2.0 * n)).cos();
        }
    }
    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn noise(seed: u64, width: u32, height: u32) -> GrayImage {
        let mut rng = StdRng::seed_from_u64(seed);
        GrayImage::from_fn(width, height, |_, _| Luma([rng.r#gen()]))
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance(0, 0), 0);
        assert_eq!(hamming_distance(0b1011, 0b0001), 2);
        assert_eq!(hamming_distance(u64::MAX, 0), 64);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let image = noise(7, 120, 90);
        assert_eq!(phash(&image), phash(&image.clone()));
    }

    #[test]
    fn test_half_bits_set() {
        // strictly-above-median leaves at most 32 bits set
        let hash = phash(&noise(3, 64, 64));
        assert!(hash.count_ones() <= 32);
        assert!(hash.count_ones() >= 24);
    }

    #[test]
    fn test_robust_to_rescaling() {
        let image = noise(11, 160, 160);
        let scaled = image::imageops::resize(&image, 200, 200, FilterType::Triangle);
        let other = noise(12, 160, 160);

        let near = hamming_distance(phash(&image), phash(&scaled));
        let far = hamming_distance(phash(&image), phash(&other));
        assert!(near < far, "near={} far={}", near, far);
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(phash(&GrayImage::new(0, 0)), 0);
    }
}
