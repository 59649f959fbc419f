//! Local feature descriptors and descriptor-set matching

pub mod extractor;
pub mod matcher;
#[cfg(feature = "opencv")]
pub mod orb;
pub mod references;

pub use extractor::FastBriefExtractor;
pub use matcher::{
    good_matches, is_good_descriptor_match, knn_match, passes_ratio_test, Correspondence,
    FeatureMatcher, MIN_GOOD_MATCHES, RATIO_TEST,
};
#[cfg(feature = "opencv")]
pub use orb::OrbExtractor;

/// Descriptors extracted from one image, one row per keypoint
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorSet {
    /// Bit strings compared by Hamming distance
    Binary(Vec<Vec<u8>>),
    /// Real vectors compared by Euclidean distance
    Float(Vec<Vec<f32>>),
}

impl DescriptorSet {
    pub fn empty() -> Self {
        DescriptorSet::Binary(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            DescriptorSet::Binary(rows) => rows.len(),
            DescriptorSet::Float(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DescriptorSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Reference descriptors tagged with the outcome they stand for
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorReference {
    pub descriptors: DescriptorSet,
    pub outcome: u32,
}

impl DescriptorReference {
    pub fn new(descriptors: DescriptorSet, outcome: u32) -> Self {
        Self {
            descriptors,
            outcome,
        }
    }
}
