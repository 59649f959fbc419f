//! Nearest-neighbor lookup of perceptual hashes

use super::phash::{hamming_distance, phash};
use super::Dataset;
use crate::utils::ImageUtils;
use deckvision_core::{DatasetEntry, Region};
use image::DynamicImage;
use std::sync::Arc;

/// Closest reference to a query hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashComparison {
    pub index: usize,
    pub distance: u32,
}

/// Find the reference hash closest to `hash`; the first of equal distances wins
pub fn best_match(hash: u64, hashes: &[u64]) -> Option<HashComparison> {
    let mut best: Option<HashComparison> = None;
    for (index, candidate) in hashes.iter().enumerate() {
        let distance = hamming_distance(hash, *candidate);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(HashComparison { index, distance });
        }
    }
    best
}

/// Matches region crops against one shared dataset
#[derive(Debug, Clone)]
pub struct HashMatcher {
    dataset: Arc<Dataset>,
}

impl HashMatcher {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Entry for the closest reference when it is strictly under the threshold
    pub fn match_hash(&self, hash: u64) -> DatasetEntry {
        match best_match(hash, self.dataset.hashes()) {
            Some(best) if best.distance < self.dataset.threshold() => {
                self.dataset.entries()[best.index]
            }
            _ => DatasetEntry::none(),
        }
    }

    /// One entry per region, in region order
    pub fn match_regions(&self, image: &DynamicImage, regions: &[Region]) -> Vec<DatasetEntry> {
        regions
            .iter()
            .map(|region| {
                let crop = ImageUtils::crop_grayscale(image, region);
                let hash = phash(&crop);
                let entry = self.match_hash(hash);
                tracing::debug!("Region {:?}: pHash {:016x} -> {:?}", region, hash, entry.matched());
                entry
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(threshold: u32) -> HashMatcher {
        let dataset = Dataset::from_pairs(
            [(10, 0b0000u64), (20, 0b1111), (30, 0xff00), (40, 0b0011)],
            threshold,
        );
        HashMatcher::new(Arc::new(dataset))
    }

    #[test]
    fn test_best_match_first_wins_ties() {
        // equidistant (4 bits) from both references
        let best = best_match(0b0011 ^ 0b0011_0000_0000, &[0b0000, 0b1111]);
        assert_eq!(best, Some(HashComparison { index: 0, distance: 4 }));

        let best = best_match(0b0101, &[0b0000, 0b1111]);
        assert_eq!(best, Some(HashComparison { index: 0, distance: 2 }));

        assert_eq!(best_match(1, &[]), None);
    }

    #[test]
    fn test_match_strictly_below_threshold() {
        // distance to entry 30 is exactly 3
        let query = 0xff00 ^ 0b0111_0000_0000_0000_0000;
        assert_eq!(matcher(4).match_hash(query).matched(), Some(30));
        assert_eq!(matcher(3).match_hash(query).matched(), None);
    }

    #[test]
    fn test_argmin_identifier_returned() {
        let m = matcher(64);
        assert_eq!(m.match_hash(0b0111).matched(), Some(20));
        assert_eq!(m.match_hash(0b0010).matched(), Some(10));
        assert_eq!(m.match_hash(0b0011).matched(), Some(40));
    }

    #[test]
    fn test_empty_dataset_never_matches() {
        let m = HashMatcher::new(Arc::new(Dataset::from_pairs([], 64)));
        assert_eq!(m.match_hash(0), DatasetEntry::none());
    }
}
