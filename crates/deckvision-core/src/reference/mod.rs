//! Reference data the recognizers compare against

pub mod database;
pub mod quality;

pub use database::{CardRecord, HeroRecord, ReferenceDatabase};
pub use quality::CardQuality;

/// Lookup of card attributes by card identifier
pub trait CardCatalog {
    fn quality(&self, card_id: u32) -> Option<CardQuality>;
}
