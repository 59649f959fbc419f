//! Perceptual-hash reference sets and nearest-neighbor lookup

pub mod matcher;
pub mod phash;
pub mod precompute;

pub use matcher::{HashComparison, HashMatcher};
pub use phash::{hamming_distance, phash};
pub use precompute::precompute_reference_hashes;

use crate::error::DatasetError;
use deckvision_core::{DatasetEntry, ReferenceDatabase};

/// Reference entries with their hashes, index-aligned, plus the match threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
    hashes: Vec<u64>,
    threshold: u32,
}

impl Dataset {
    pub fn new(
        entries: Vec<DatasetEntry>,
        hashes: Vec<u64>,
        threshold: u32,
    ) -> Result<Self, DatasetError> {
        if entries.len() != hashes.len() {
            return Err(DatasetError::LengthMismatch {
                entries: entries.len(),
                hashes: hashes.len(),
            });
        }
        Ok(Self {
            entries,
            hashes,
            threshold,
        })
    }

    /// Build from `(identifier, hash)` pairs
    pub fn from_pairs<I>(pairs: I, threshold: u32) -> Self
    where
        I: IntoIterator<Item = (u32, u64)>,
    {
        let (entries, hashes) = pairs
            .into_iter()
            .map(|(id, hash)| (DatasetEntry::new(id), hash))
            .unzip();
        Self {
            entries,
            hashes,
            threshold,
        }
    }

    /// Card set; records without a hash are left out
    pub fn from_cards(db: &ReferenceDatabase, threshold: u32) -> Self {
        let skipped = db.cards.iter().filter(|c| c.phash.is_none()).count();
        if skipped > 0 {
            tracing::warn!("{} cards have no pHash and will never be recognized", skipped);
        }
        Self::from_pairs(
            db.cards.iter().filter_map(|c| c.phash.map(|hash| (c.id, hash))),
            threshold,
        )
    }

    /// Hero class set; records without a hash are left out
    pub fn from_heroes(db: &ReferenceDatabase, threshold: u32) -> Self {
        let skipped = db.heroes.iter().filter(|h| h.phash.is_none()).count();
        if skipped > 0 {
            tracing::warn!("{} heroes have no pHash and will never be recognized", skipped);
        }
        Self::from_pairs(
            db.heroes.iter().filter_map(|h| h.phash.map(|hash| (h.id, hash))),
            threshold,
        )
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn hashes(&self) -> &[u64] {
        &self.hashes
    }

    /// Distances strictly below this value count as a match
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
