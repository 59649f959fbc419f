//! Matching outcomes and retained session context

use super::kind::RecognizerKind;
use serde::{Deserialize, Serialize};

/// One reference-set lookup outcome.
///
/// `id` is meaningless unless `valid` is set; prefer [`DatasetEntry::matched`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub id: u32,
    pub valid: bool,
}

impl DatasetEntry {
    pub const fn new(id: u32) -> Self {
        Self { id, valid: true }
    }

    /// The no-match sentinel
    pub const fn none() -> Self {
        Self { id: 0, valid: false }
    }

    pub fn matched(&self) -> Option<u32> {
        self.valid.then_some(self.id)
    }
}

/// Result of running one recognizer over its regions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub valid: bool,
    pub source: RecognizerKind,
    /// Matched identifiers in region order
    pub results: Vec<u32>,
}

impl RecognitionResult {
    pub fn new(source: RecognizerKind, results: Vec<u32>) -> Self {
        Self {
            valid: true,
            source,
            results,
        }
    }

    pub fn invalid(source: RecognizerKind) -> Self {
        Self {
            valid: false,
            source,
            results: Vec::new(),
        }
    }
}

/// Outcome identifiers reported by the descriptor-based recognizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    GameEndVictory,
    GameEndDefeat,
    GameCoinFirst,
    GameCoinSecond,
}

impl Outcome {
    pub const fn code(self) -> u32 {
        match self {
            Outcome::GameEndVictory | Outcome::GameCoinFirst => 1,
            Outcome::GameEndDefeat | Outcome::GameCoinSecond => 2,
        }
    }

    pub const fn kind(self) -> RecognizerKind {
        match self {
            Outcome::GameEndVictory | Outcome::GameEndDefeat => RecognizerKind::GameEnd,
            Outcome::GameCoinFirst | Outcome::GameCoinSecond => RecognizerKind::GameCoin,
        }
    }

    /// Decode an identifier reported by a recognizer of `kind`
    pub fn from_code(kind: RecognizerKind, code: u32) -> Option<Outcome> {
        match (kind, code) {
            (RecognizerKind::GameEnd, 1) => Some(Outcome::GameEndVictory),
            (RecognizerKind::GameEnd, 2) => Some(Outcome::GameEndDefeat),
            (RecognizerKind::GameCoin, 1) => Some(Outcome::GameCoinFirst),
            (RecognizerKind::GameCoin, 2) => Some(Outcome::GameCoinSecond),
            _ => None,
        }
    }
}

/// Context carried between recognition calls of one session.
///
/// Holds the identifiers of the last valid draft card pick. Nothing detects
/// staleness: if the card pick recognizer is not re-run after the screen
/// changes, readers see the old pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftContext {
    last_draft: Vec<u32>,
}

impl DraftContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ids: &[u32]) {
        self.last_draft.clear();
        self.last_draft.extend_from_slice(ids);
    }

    /// Last draft card pick, `None` until one was recorded
    pub fn last_draft(&self) -> Option<&[u32]> {
        if self.last_draft.is_empty() {
            None
        } else {
            Some(&self.last_draft)
        }
    }

    pub fn clear(&mut self) {
        self.last_draft.clear();
    }
}
