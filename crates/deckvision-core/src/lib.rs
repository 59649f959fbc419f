//! Plain data shared by the deckvision recognition crates: screen regions,
//! recognizer kinds, recognition results and the card/hero reference database.

pub mod recognition;
pub mod reference;

pub use recognition::{
    DatasetEntry, DraftContext, Outcome, RecognitionResult, RecognizerKind, RecognizerSet, Region,
};
pub use reference::{CardCatalog, CardQuality, CardRecord, HeroRecord, ReferenceDatabase};
