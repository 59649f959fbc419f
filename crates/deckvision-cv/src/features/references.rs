//! Reference descriptor sets for the game end and coin toss screens

use super::{DescriptorReference, DescriptorSet};
use crate::traits::FeatureExtractor;
use crate::utils::ImageUtils;
use deckvision_core::Outcome;
use std::path::Path;

/// Reference artwork file for each descriptor outcome
pub fn reference_file(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::GameEndVictory => "game_end_victory.png",
        Outcome::GameEndDefeat => "game_end_defeat.png",
        Outcome::GameCoinFirst => "game_coin_first.png",
        Outcome::GameCoinSecond => "game_coin_second.png",
    }
}

/// Extract one reference; unreadable artwork gives an empty set that never matches
pub fn load_reference(extractor: &dyn FeatureExtractor, dir: &Path, outcome: Outcome) -> DescriptorReference {
    let path = dir.join(reference_file(outcome));
    let descriptors = ImageUtils::load_grayscale(&path)
        .and_then(|image| extractor.extract(&image))
        .unwrap_or_else(|e| {
            tracing::warn!("Reference {:?} unavailable: {:#}", outcome, e);
            DescriptorSet::empty()
        });

    tracing::debug!("Reference {:?}: {} descriptors", outcome, descriptors.len());
    DescriptorReference::new(descriptors, outcome.code())
}

/// Victory then defeat
pub fn end_references(extractor: &dyn FeatureExtractor, dir: &Path) -> Vec<DescriptorReference> {
    [Outcome::GameEndVictory, Outcome::GameEndDefeat]
        .into_iter()
        .map(|outcome| load_reference(extractor, dir, outcome))
        .collect()
}

/// Going first then going second
pub fn coin_references(extractor: &dyn FeatureExtractor, dir: &Path) -> Vec<DescriptorReference> {
    [Outcome::GameCoinFirst, Outcome::GameCoinSecond]
        .into_iter()
        .map(|outcome| load_reference(extractor, dir, outcome))
        .collect()
}
