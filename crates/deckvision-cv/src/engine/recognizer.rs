//! The two recognizer flavours the engine dispatches to

use crate::features::FeatureMatcher;
use crate::hashing::HashMatcher;
use crate::traits::Recognizer;
use deckvision_core::{RecognitionResult, RecognizerKind, Region};
use image::DynamicImage;

/// Perceptual-hash recognizer: valid only when every region matched
pub struct HashRecognizer {
    kind: RecognizerKind,
    regions: Vec<Region>,
    matcher: HashMatcher,
}

impl HashRecognizer {
    pub fn new(kind: RecognizerKind, regions: Vec<Region>, matcher: HashMatcher) -> Self {
        Self {
            kind,
            regions,
            matcher,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl Recognizer for HashRecognizer {
    fn kind(&self) -> RecognizerKind {
        self.kind
    }

    fn attempt(&self, frame: &DynamicImage) -> Option<RecognitionResult> {
        // an undeclared layout recognizes nothing
        if self.regions.is_empty() {
            return None;
        }
        let ids = self
            .matcher
            .match_regions(frame, &self.regions)
            .iter()
            .map(|entry| entry.matched())
            .collect::<Option<Vec<u32>>>()?;
        Some(RecognitionResult::new(self.kind, ids))
    }
}

/// Descriptor recognizer: valid when any region matched
pub struct FeatureRecognizer {
    kind: RecognizerKind,
    regions: Vec<Region>,
    matcher: FeatureMatcher,
}

impl FeatureRecognizer {
    pub fn new(kind: RecognizerKind, regions: Vec<Region>, matcher: FeatureMatcher) -> Self {
        Self {
            kind,
            regions,
            matcher,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl Recognizer for FeatureRecognizer {
    fn kind(&self) -> RecognizerKind {
        self.kind
    }

    fn attempt(&self, frame: &DynamicImage) -> Option<RecognitionResult> {
        let result = self.matcher.match_regions(frame, &self.regions, self.kind);
        result.valid.then_some(result)
    }
}
