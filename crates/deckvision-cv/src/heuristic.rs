//! Picks the one draft slot glowing in the rarity color of the last recognized pick

use crate::utils::ImageUtils;
use deckvision_core::{CardCatalog, CardQuality, DraftContext, Region};
use image::DynamicImage;

/// Minimum mean brightness of the slots when the last pick was legendary
pub const LEGENDARY_VALUE_GATE: f32 = 200.0;
/// Minimum mean brightness of the slots otherwise
pub const VALUE_GATE: f32 = 220.0;

/// Mean HSV of one slot (OpenCV 8-bit scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotColor {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl SlotColor {
    pub fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Hue band of the highlighted slot for the given quality
    pub fn is_candidate(&self, quality: CardQuality) -> bool {
        let h = self.hue;
        if quality == CardQuality::Epic {
            (110.0..=150.0).contains(&h)
        } else {
            (90.0..=110.0).contains(&h) || (50.0..=80.0).contains(&h)
        }
    }

    pub fn is_red(&self) -> bool {
        self.hue < 30.0
    }
}

/// Mean color of every slot, in region order
pub fn slot_colors(image: &DynamicImage, regions: &[Region]) -> Vec<SlotColor> {
    regions
        .iter()
        .map(|region| {
            let [hue, saturation, value] = ImageUtils::mean_hsv(&ImageUtils::crop(image, region));
            SlotColor::new(hue, saturation, value)
        })
        .collect()
}

/// Decide from precomputed slot colors.
///
/// Abstains when the slots are too dark, when more than one slot is in the
/// candidate hue band, or when the candidate is not the least saturated slot.
pub fn pick_from_colors(colors: &[SlotColor], quality: CardQuality) -> Option<usize> {
    let first = colors.first()?;

    let average_value = colors.iter().map(|c| c.value).sum::<f32>() / colors.len() as f32;
    let gate = if quality == CardQuality::Legendary {
        LEGENDARY_VALUE_GATE
    } else {
        VALUE_GATE
    };
    if average_value < gate {
        tracing::debug!("Slots too dark to judge ({:.1} < {})", average_value, gate);
        return None;
    }

    let mut candidate: Option<usize> = None;
    let mut unique = true;
    let mut min_saturation = first.saturation;
    let mut min_saturation_index = 0;
    let mut red = Vec::with_capacity(colors.len());

    for (i, color) in colors.iter().enumerate() {
        if color.saturation < min_saturation {
            min_saturation = color.saturation;
            min_saturation_index = i;
        }
        red.push(color.is_red());
        if color.is_candidate(quality) {
            if candidate.is_some() {
                unique = false;
            }
            candidate = Some(i);
        }
    }

    tracing::debug!(
        "Slot colors {:?}: candidate={:?} unique={} least saturated={} red={:?}",
        colors,
        candidate,
        unique,
        min_saturation_index,
        red
    );

    match candidate {
        Some(index) if unique && index == min_saturation_index => Some(index),
        _ => None,
    }
}

/// Index of the highlighted slot, judged against the quality of the first card
/// in the last recognized draft pick
pub fn pick_bluest(
    image: &DynamicImage,
    regions: &[Region],
    context: &DraftContext,
    catalog: &dyn CardCatalog,
) -> Option<usize> {
    let last_draft = context.last_draft()?;
    let quality = match catalog.quality(last_draft[0]) {
        Some(quality) => quality,
        None => {
            tracing::debug!("Card {} is not in the catalog", last_draft[0]);
            return None;
        }
    };

    pick_from_colors(&slot_colors(image, regions), quality)
}
