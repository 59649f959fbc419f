//! Recognition engine: calibrated regions dispatched to registered recognizers

use super::config::RecognizerConfig;
use super::recognizer::{FeatureRecognizer, HashRecognizer};
use crate::calibration::Calibration;
use crate::features::{references, DescriptorReference, FeatureMatcher};
use crate::hashing::{precompute_reference_hashes, Dataset, HashMatcher};
use crate::heuristic;
use crate::traits::{FeatureExtractor, Recognizer};
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use deckvision_core::{
    CardCatalog, DraftContext, RecognitionResult, RecognizerKind, RecognizerSet, ReferenceDatabase,
};
use image::DynamicImage;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// Hash recognizers in dispatch order, with the reference domain they match against
const HASH_RECOGNIZERS: [(RecognizerKind, Domain); 6] = [
    (RecognizerKind::DraftClassPick, Domain::Classes),
    (RecognizerKind::DraftCardPick, Domain::Cards),
    (RecognizerKind::GameClassShow, Domain::Classes),
    (RecognizerKind::GameDraw, Domain::Cards),
    (RecognizerKind::GameDrawInit1, Domain::Cards),
    (RecognizerKind::GameDrawInit2, Domain::Cards),
];

#[derive(Debug, Clone, Copy)]
enum Domain {
    Cards,
    Classes,
}

/// Main recognition engine.
///
/// Read-only after construction. Session state lives in the caller's
/// [`DraftContext`].
pub struct RecognitionEngine {
    calibration: Calibration,
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl RecognitionEngine {
    /// Build the engine from configuration.
    ///
    /// Loads calibration `calibration_id` (or the default), fills and saves any
    /// missing reference hashes, and extracts the coin and game end reference
    /// descriptors.
    pub fn new(
        config: &RecognizerConfig,
        db: &mut ReferenceDatabase,
        calibration_id: &str,
        extractor: Arc<dyn FeatureExtractor>,
    ) -> Result<Self> {
        let paths = &config.paths;
        let calibration = Calibration::load_with_fallback(&paths.calibrations_path, calibration_id)?;

        if db.has_missing_data() {
            let stats =
                precompute_reference_hashes(db, &paths.card_image_path, &paths.hero_image_path);
            tracing::info!(
                "Filled pHashes for {} cards and {} heroes ({} failed)",
                stats.cards,
                stats.heroes,
                stats.failed
            );
            if db.path().is_some() {
                db.save().context("Failed to save precomputed pHashes")?;
            } else {
                tracing::warn!("Reference database has no backing file, pHashes not saved");
            }
        }

        let cards = Arc::new(Dataset::from_cards(db, config.phash_threshold));
        let classes = Arc::new(Dataset::from_heroes(db, config.phash_threshold));

        let coin = references::coin_references(extractor.as_ref(), &paths.misc_image_path);
        let end = references::end_references(extractor.as_ref(), &paths.misc_image_path);

        tracing::info!(
            "Recognizer ready: {} cards, {} classes, pHash threshold {}",
            cards.len(),
            classes.len(),
            config.phash_threshold
        );

        Ok(Self::from_parts(calibration, cards, classes, coin, end, extractor))
    }

    /// Assemble an engine from already loaded parts
    pub fn from_parts(
        calibration: Calibration,
        cards: Arc<Dataset>,
        classes: Arc<Dataset>,
        coin: Vec<DescriptorReference>,
        end: Vec<DescriptorReference>,
        extractor: Arc<dyn FeatureExtractor>,
    ) -> Self {
        let mut recognizers: Vec<Box<dyn Recognizer>> = Vec::new();

        for (kind, domain) in HASH_RECOGNIZERS {
            let dataset = match domain {
                Domain::Cards => cards.clone(),
                Domain::Classes => classes.clone(),
            };
            recognizers.push(Box::new(HashRecognizer::new(
                kind,
                calibration.regions(kind).to_vec(),
                HashMatcher::new(dataset),
            )));
        }

        for (kind, descriptor_refs) in [(RecognizerKind::GameCoin, coin), (RecognizerKind::GameEnd, end)] {
            recognizers.push(Box::new(FeatureRecognizer::new(
                kind,
                calibration.regions(kind).to_vec(),
                FeatureMatcher::new(extractor.clone(), descriptor_refs.into()),
            )));
        }

        Self {
            calibration,
            recognizers,
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Registered recognizer kinds in dispatch order
    pub fn recognizer_kinds(&self) -> Vec<RecognizerKind> {
        self.recognizers.iter().map(|r| r.kind()).collect()
    }

    /// Resize to the calibration resolution if needed
    pub fn normalize<'a>(&self, frame: &'a DynamicImage) -> Cow<'a, DynamicImage> {
        let resolution = self.calibration.resolution;
        ImageUtils::normalize(frame, resolution.width, resolution.height)
    }

    /// Run every selected recognizer over the frame.
    ///
    /// Only valid results are returned, in dispatch order. A valid draft card
    /// pick is also recorded in `context`.
    pub fn recognize(
        &self,
        frame: &DynamicImage,
        selection: RecognizerSet,
        context: &mut DraftContext,
    ) -> Vec<RecognitionResult> {
        let image = self.normalize(frame);

        let results: Vec<RecognitionResult> = self
            .recognizers
            .iter()
            .filter(|r| selection.contains(r.kind()))
            .filter_map(|r| r.attempt(&image))
            .collect();

        if selection.contains(RecognizerKind::DraftCardPick) {
            if let Some(draft) = results.iter().find(|r| r.source == RecognizerKind::DraftCardPick) {
                context.record(&draft.results);
            }
        }

        tracing::debug!(
            "Recognized {} of {} selected recognizers",
            results.len(),
            selection.iter().count()
        );
        results
    }

    /// Load a frame from disk and recognize it
    pub fn recognize_file<P: AsRef<Path>>(
        &self,
        path: P,
        selection: RecognizerSet,
        context: &mut DraftContext,
    ) -> Result<Vec<RecognitionResult>> {
        let frame = ImageUtils::load(path)?;
        Ok(self.recognize(&frame, selection, context))
    }

    /// Highlighted draft slot, judged over the draft card pick regions
    pub fn pick_bluest(
        &self,
        frame: &DynamicImage,
        context: &DraftContext,
        catalog: &dyn CardCatalog,
    ) -> Option<usize> {
        let image = self.normalize(frame);
        heuristic::pick_bluest(
            &image,
            self.calibration.regions(RecognizerKind::DraftCardPick),
            context,
            catalog,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Resolution;
    use crate::features::FastBriefExtractor;

    fn empty_engine() -> RecognitionEngine {
        RecognitionEngine::from_parts(
            Calibration::new(Resolution { width: 64, height: 48 }),
            Arc::new(Dataset::from_pairs([], 16)),
            Arc::new(Dataset::from_pairs([], 16)),
            Vec::new(),
            Vec::new(),
            Arc::new(FastBriefExtractor::default()),
        )
    }

    #[test]
    fn test_dispatch_order() {
        assert_eq!(empty_engine().recognizer_kinds(), RecognizerKind::ALL.to_vec());
    }

    #[test]
    fn test_normalize_to_calibration() {
        let engine = empty_engine();
        let frame = DynamicImage::new_rgb8(640, 360);
        let image = engine.normalize(&frame);
        assert_eq!((image.width(), image.height()), (64, 48));
    }

    #[test]
    fn test_empty_selection_runs_nothing() {
        let engine = empty_engine();
        let mut context = DraftContext::new();
        context.record(&[5]);
        let results = engine.recognize(&DynamicImage::new_rgb8(64, 48), RecognizerSet::empty(), &mut context);
        assert!(results.is_empty());
        assert_eq!(context.last_draft(), Some(&[5][..]));
    }
}
