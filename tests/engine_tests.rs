// tests/engine_tests.rs
use deckvision_core::{
    CardQuality, CardRecord, DraftContext, HeroRecord, Outcome, RecognitionResult, RecognizerKind,
    RecognizerSet, ReferenceDatabase, Region,
};
use deckvision_cv::{
    hashing::{hamming_distance, phash},
    traits::FeatureExtractor,
    utils::ImageUtils,
    Calibration, Dataset, DescriptorReference, DescriptorSet, FastBriefExtractor,
    RecognitionEngine, RecognizerConfig, Resolution, Result,
};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs;
use std::sync::Arc;

const WIDTH: u32 = 300;
const HEIGHT: u32 = 200;

/// Same descriptors for every crop
struct FixedExtractor(DescriptorSet);

impl FeatureExtractor for FixedExtractor {
    fn extract(&self, _image: &GrayImage) -> Result<DescriptorSet> {
        Ok(self.0.clone())
    }
}

/// One-dimensional float descriptors at 1000 * 2^i. Against a copy of the
/// first `n` points exactly `n` correspondences pass the ratio test.
fn spread(n: usize) -> DescriptorSet {
    DescriptorSet::Float((0..n).map(|i| vec![1000.0 * (1u32 << i) as f32]).collect())
}

fn card_pick_regions() -> Vec<Region> {
    vec![
        Region::new(0, 0, 100, 100),
        Region::new(100, 0, 100, 100),
        Region::new(200, 0, 100, 100),
    ]
}

fn calibration() -> Calibration {
    Calibration::new(Resolution { width: WIDTH, height: HEIGHT })
        .with_regions(RecognizerKind::DraftCardPick, card_pick_regions())
        .with_regions(RecognizerKind::GameCoin, vec![Region::new(100, 100, 100, 100)])
}

fn noise_frame(seed: u64) -> DynamicImage {
    let mut rng = StdRng::seed_from_u64(seed);
    DynamicImage::ImageLuma8(GrayImage::from_fn(WIDTH, HEIGHT, |_, _| Luma([rng.gen()])))
}

fn region_hashes(frame: &DynamicImage) -> Vec<u64> {
    card_pick_regions()
        .iter()
        .map(|r| phash(&ImageUtils::crop_grayscale(frame, r)))
        .collect()
}

fn engine(cards: Dataset, coin_extractor: Arc<dyn FeatureExtractor>) -> RecognitionEngine {
    RecognitionEngine::from_parts(
        calibration(),
        Arc::new(cards),
        Arc::new(Dataset::from_pairs([], 16)),
        vec![
            DescriptorReference::new(spread(8), Outcome::GameCoinFirst.code()),
            DescriptorReference::new(spread(5), Outcome::GameCoinSecond.code()),
        ],
        Vec::new(),
        coin_extractor,
    )
}

#[test]
fn test_card_pick_recognized_in_region_order() {
    let frame = noise_frame(1);
    let h = region_hashes(&frame);
    let cards = Dataset::from_pairs([(900, !h[0]), (103, h[2]), (101, h[0]), (102, h[1])], 10);
    let engine = engine(cards, Arc::new(FastBriefExtractor::default()));

    let mut context = DraftContext::new();
    let results = engine.recognize(&frame, RecognizerKind::DraftCardPick.into(), &mut context);

    assert_eq!(
        results,
        vec![RecognitionResult::new(RecognizerKind::DraftCardPick, vec![101, 102, 103])]
    );
    assert_eq!(context.last_draft(), Some(&[101, 102, 103][..]));
}

#[test]
fn test_distance_equal_to_threshold_is_a_miss() {
    let frame = noise_frame(2);
    let h = region_hashes(&frame);
    let shifted = h[1] ^ 0xff;

    // the middle region's best distance becomes the threshold itself
    let threshold = [h[0], shifted, h[2]]
        .iter()
        .map(|r| hamming_distance(h[1], *r))
        .min()
        .unwrap();
    assert!(threshold > 0);

    let cards = Dataset::from_pairs([(101, h[0]), (102, shifted), (103, h[2])], threshold);
    let engine = engine(cards, Arc::new(FastBriefExtractor::default()));

    let mut context = DraftContext::new();
    context.record(&[7, 8, 9]);
    let results = engine.recognize(&frame, RecognizerKind::DraftCardPick.into(), &mut context);

    assert!(results.is_empty());
    assert_eq!(context.last_draft(), Some(&[7, 8, 9][..]));
}

#[test]
fn test_coin_picks_reference_with_most_matches() {
    let engine = engine(Dataset::from_pairs([], 10), Arc::new(FixedExtractor(spread(8))));

    let mut context = DraftContext::new();
    let results = engine.recognize(&noise_frame(3), RecognizerKind::GameCoin.into(), &mut context);

    assert_eq!(results.len(), 1);
    assert!(results[0].valid);
    assert_eq!(results[0].source, RecognizerKind::GameCoin);
    assert_eq!(results[0].results, vec![Outcome::GameCoinFirst.code()]);
    assert!(context.last_draft().is_none());
}

#[test]
fn test_unselected_recognizers_do_not_run() {
    let frame = noise_frame(4);
    let h = region_hashes(&frame);
    let cards = Dataset::from_pairs([(1, h[0]), (2, h[1]), (3, h[2])], 10);
    let engine = engine(cards, Arc::new(FixedExtractor(spread(8))));

    let mut context = DraftContext::new();
    let results = engine.recognize(&frame, RecognizerKind::GameCoin.into(), &mut context);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source, RecognizerKind::GameCoin);
    // card pick matched nothing because it never ran
    assert!(context.last_draft().is_none());
}

#[test]
fn test_results_follow_dispatch_order() {
    let frame = noise_frame(5);
    let h = region_hashes(&frame);
    let cards = Dataset::from_pairs([(1, h[0]), (2, h[1]), (3, h[2])], 10);
    let engine = engine(cards, Arc::new(FixedExtractor(spread(8))));

    let selection = RecognizerSet::from_bits(
        RecognizerKind::GameCoin.bit() | RecognizerKind::DraftCardPick.bit() | RecognizerKind::GameEnd.bit(),
    );
    let mut context = DraftContext::new();
    let results = engine.recognize(&frame, selection, &mut context);

    let sources: Vec<RecognizerKind> = results.iter().map(|r| r.source).collect();
    // game end has no regions in this calibration
    assert_eq!(sources, vec![RecognizerKind::DraftCardPick, RecognizerKind::GameCoin]);
}

#[test]
fn test_frames_are_resized_to_calibration() {
    let engine = engine(Dataset::from_pairs([], 10), Arc::new(FixedExtractor(spread(8))));
    let mut context = DraftContext::new();

    let larger = DynamicImage::new_rgb8(WIDTH * 3, HEIGHT * 2);
    let results = engine.recognize(&larger, RecognizerSet::all(), &mut context);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source, RecognizerKind::GameCoin);

    let smaller = DynamicImage::new_luma8(40, 10);
    assert_eq!(engine.recognize(&smaller, RecognizerSet::all(), &mut context).len(), 1);
}

#[test]
fn test_bluest_slot_uses_recognized_pick() {
    let frame = noise_frame(6);
    let h = region_hashes(&frame);
    let cards = Dataset::from_pairs([(11, h[0]), (12, h[1]), (13, h[2])], 10);
    let engine = engine(cards, Arc::new(FastBriefExtractor::default()));
    let catalog = ReferenceDatabase::new(
        vec![CardRecord { id: 11, quality: CardQuality::Common, phash: None }],
        Vec::new(),
    );

    let mut context = DraftContext::new();
    let glowing = DynamicImage::ImageRgb8(RgbImage::from_fn(WIDTH, HEIGHT, |x, _| {
        if (200..300).contains(&x) {
            Rgb([225, 255, 255])
        } else {
            Rgb([255, 120, 120])
        }
    }));

    // no draft recognized yet
    assert_eq!(engine.pick_bluest(&glowing, &context, &catalog), None);

    engine.recognize(&frame, RecognizerKind::DraftCardPick.into(), &mut context);
    assert_eq!(context.last_draft(), Some(&[11, 12, 13][..]));
    assert_eq!(engine.pick_bluest(&glowing, &context, &catalog), Some(2));
}

#[test]
fn test_engine_from_disk_with_fallback_and_precompute() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut config = RecognizerConfig::default();
    config.paths.calibrations_path = root.path().join("calibrations");
    config.paths.card_image_path = root.path().join("cards");
    config.paths.hero_image_path = root.path().join("heroes");
    config.paths.misc_image_path = root.path().join("misc");
    config.paths.database_path = root.path().join("database.json");
    for dir in [
        &config.paths.calibrations_path,
        &config.paths.card_image_path,
        &config.paths.hero_image_path,
    ] {
        fs::create_dir_all(dir)?;
    }

    fs::write(
        config.paths.calibrations_path.join("default.json"),
        serde_json::to_string(&calibration())?,
    )?;

    let frame = noise_frame(7);
    for (id, region) in [21u32, 22, 23].into_iter().zip(card_pick_regions()) {
        ImageUtils::crop_grayscale(&frame, &region)
            .save(config.paths.card_image_path.join(format!("{:03}.png", id)))?;
    }

    ReferenceDatabase::new(
        vec![
            CardRecord { id: 21, quality: CardQuality::Rare, phash: None },
            CardRecord { id: 22, quality: CardQuality::Epic, phash: None },
            CardRecord { id: 23, quality: CardQuality::Common, phash: None },
        ],
        vec![HeroRecord { id: 1, phash: Some(0) }],
    )
    .save_to(&config.paths.database_path)?;

    let mut db = ReferenceDatabase::load(&config.paths.database_path)?;
    let engine = RecognitionEngine::new(
        &config,
        &mut db,
        "not-calibrated",
        Arc::new(FastBriefExtractor::default()),
    )?;

    assert_eq!(engine.calibration().resolution, Resolution { width: WIDTH, height: HEIGHT });
    assert!(!db.has_missing_data());
    let saved = ReferenceDatabase::load(&config.paths.database_path)?;
    assert!(!saved.has_missing_data());

    let mut context = DraftContext::new();
    let results = engine.recognize(&frame, RecognizerSet::all(), &mut context);
    assert_eq!(
        results,
        vec![RecognitionResult::new(RecognizerKind::DraftCardPick, vec![21, 22, 23])]
    );
    Ok(())
}
