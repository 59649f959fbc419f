//! One-time fill of missing reference hashes from the card and hero artwork

use super::phash::phash;
use crate::utils::ImageUtils;
use deckvision_core::ReferenceDatabase;
use std::path::{Path, PathBuf};

/// Outcome of a precompute pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecomputeStats {
    pub cards: usize,
    pub heroes: usize,
    /// Records whose image could not be read; they keep no hash
    pub failed: usize,
}

/// Artwork path for a reference identifier, e.g. `cards/007.png`
pub fn reference_image_path(dir: &Path, id: u32) -> PathBuf {
    dir.join(format!("{:03}.png", id))
}

fn hash_file(path: &Path) -> Option<u64> {
    match ImageUtils::load_grayscale(path) {
        Ok(image) => Some(phash(&image)),
        Err(e) => {
            tracing::warn!("Cannot hash reference image: {:#}", e);
            None
        }
    }
}

/// Compute the pHash of every card and hero that lacks one.
///
/// Does not save the database.
pub fn precompute_reference_hashes(
    db: &mut ReferenceDatabase,
    card_dir: &Path,
    hero_dir: &Path,
) -> PrecomputeStats {
    let missing_cards = db.cards.iter().filter(|c| c.phash.is_none()).count();
    let missing_heroes = db.heroes.iter().filter(|h| h.phash.is_none()).count();
    tracing::info!(
        "pHashes missing from database, filling {} cards and {} heroes...",
        missing_cards,
        missing_heroes
    );

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        db.cards
            .par_iter_mut()
            .filter(|c| c.phash.is_none())
            .for_each(|c| c.phash = hash_file(&reference_image_path(card_dir, c.id)));
        db.heroes
            .par_iter_mut()
            .filter(|h| h.phash.is_none())
            .for_each(|h| h.phash = hash_file(&reference_image_path(hero_dir, h.id)));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for card in db.cards.iter_mut().filter(|c| c.phash.is_none()) {
            card.phash = hash_file(&reference_image_path(card_dir, card.id));
        }
        for hero in db.heroes.iter_mut().filter(|h| h.phash.is_none()) {
            hero.phash = hash_file(&reference_image_path(hero_dir, hero.id));
        }
    }

    let still_missing = db.cards.iter().filter(|c| c.phash.is_none()).count()
        + db.heroes.iter().filter(|h| h.phash.is_none()).count();

    PrecomputeStats {
        cards: missing_cards,
        heroes: missing_heroes,
        failed: still_missing,
    }
}
