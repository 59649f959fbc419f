//! Brute-force k-nearest-neighbor matching with Lowe's ratio test

use super::{DescriptorReference, DescriptorSet};
use crate::traits::FeatureExtractor;
use crate::utils::ImageUtils;
use deckvision_core::{RecognitionResult, RecognizerKind, Region};
use image::DynamicImage;
use std::sync::Arc;

/// Best neighbor must be at most this fraction of the second best
pub const RATIO_TEST: f32 = 0.6;

/// Accepted correspondences needed before a reference counts as present
pub const MIN_GOOD_MATCHES: usize = 7;

/// A query descriptor paired with one train descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    pub query: usize,
    pub train: usize,
    pub distance: f32,
}

fn hamming(a: &[u8], b: &[u8]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum::<u32>() as f32
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

fn nearest<T, F>(query: &[Vec<T>], train: &[Vec<T>], k: usize, distance: F) -> Vec<Vec<Correspondence>>
where
    F: Fn(&[T], &[T]) -> f32,
{
    query
        .iter()
        .enumerate()
        .map(|(q, descriptor)| {
            let mut neighbors: Vec<Correspondence> = train
                .iter()
                .enumerate()
                .map(|(t, candidate)| Correspondence {
                    query: q,
                    train: t,
                    distance: distance(descriptor, candidate),
                })
                .collect();
            // stable: equal distances keep train order
            neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            neighbors.truncate(k);
            neighbors
        })
        .collect()
}

/// Up to `k` nearest train descriptors for every query descriptor, closest first.
///
/// Sets of different kinds never correspond.
pub fn knn_match(query: &DescriptorSet, train: &DescriptorSet, k: usize) -> Vec<Vec<Correspondence>> {
    match (query, train) {
        (DescriptorSet::Binary(q), DescriptorSet::Binary(t)) => nearest(q, t, k, hamming),
        (DescriptorSet::Float(q), DescriptorSet::Float(t)) => nearest(q, t, k, euclidean),
        _ => {
            tracing::debug!("Descriptor kinds differ, no correspondences");
            Vec::new()
        }
    }
}

pub fn passes_ratio_test(best: f32, second: f32) -> bool {
    best <= RATIO_TEST * second
}

/// Correspondences from a k=2 search that survive the ratio test
pub fn good_matches(query: &DescriptorSet, train: &DescriptorSet) -> Vec<Correspondence> {
    knn_match(query, train, 2)
        .into_iter()
        .filter_map(|pair| match pair.as_slice() {
            [best, second] if passes_ratio_test(best.distance, second.distance) => Some(*best),
            _ => None,
        })
        .collect()
}

pub fn is_good_descriptor_match(matches: &[Correspondence]) -> bool {
    matches.len() >= MIN_GOOD_MATCHES
}

/// Matches region crops against a short list of reference descriptor sets
#[derive(Clone)]
pub struct FeatureMatcher {
    extractor: Arc<dyn FeatureExtractor>,
    references: Arc<[DescriptorReference]>,
}

impl FeatureMatcher {
    pub fn new(extractor: Arc<dyn FeatureExtractor>, references: Arc<[DescriptorReference]>) -> Self {
        Self {
            extractor,
            references,
        }
    }

    pub fn references(&self) -> &[DescriptorReference] {
        &self.references
    }

    /// Outcome of the reference with the most accepted correspondences, if any
    /// reaches [`MIN_GOOD_MATCHES`]. Earlier references win ties.
    pub fn best_reference(&self, descriptors: &DescriptorSet) -> Option<(u32, usize)> {
        let mut best: Option<(u32, usize)> = None;
        for reference in self.references.iter() {
            let matches = good_matches(descriptors, &reference.descriptors);
            tracing::debug!(
                "Reference {}: {} good matches",
                reference.outcome,
                matches.len()
            );
            if is_good_descriptor_match(&matches) && best.is_none_or(|(_, count)| matches.len() > count) {
                best = Some((reference.outcome, matches.len()));
            }
        }
        best
    }

    /// Valid when at least one region produced a winning reference
    pub fn match_regions(
        &self,
        image: &DynamicImage,
        regions: &[Region],
        kind: RecognizerKind,
    ) -> RecognitionResult {
        let mut outcomes = Vec::new();

        for (index, region) in regions.iter().enumerate() {
            let crop = ImageUtils::crop_grayscale(image, region);
            let descriptors = match self.extractor.extract(&crop) {
                Ok(descriptors) => descriptors,
                Err(e) => {
                    tracing::warn!("[{} region {}] descriptor extraction failed: {:#}", kind, index, e);
                    continue;
                }
            };

            if descriptors.is_empty() {
                tracing::debug!("[{} region {}] no descriptors", kind, index);
                continue;
            }

            if let Some((outcome, count)) = self.best_reference(&descriptors) {
                tracing::debug!("[{} region {}] outcome {} with {} matches", kind, index, outcome, count);
                outcomes.push(outcome);
            }
        }

        if outcomes.is_empty() {
            RecognitionResult::invalid(kind)
        } else {
            RecognitionResult::new(kind, outcomes)
        }
    }
}
