//! Recognizer kinds and selection sets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every screen element the engine knows how to recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerKind {
    DraftClassPick,
    DraftCardPick,
    GameClassShow,
    GameDraw,
    GameDrawInit1,
    GameDrawInit2,
    GameCoin,
    GameEnd,
}

impl RecognizerKind {
    pub const ALL: [RecognizerKind; 8] = [
        RecognizerKind::DraftClassPick,
        RecognizerKind::DraftCardPick,
        RecognizerKind::GameClassShow,
        RecognizerKind::GameDraw,
        RecognizerKind::GameDrawInit1,
        RecognizerKind::GameDrawInit2,
        RecognizerKind::GameCoin,
        RecognizerKind::GameEnd,
    ];

    /// Bit occupied by this kind in a raw selection mask
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            RecognizerKind::DraftClassPick => "draft_class_pick",
            RecognizerKind::DraftCardPick => "draft_card_pick",
            RecognizerKind::GameClassShow => "game_class_show",
            RecognizerKind::GameDraw => "game_draw",
            RecognizerKind::GameDrawInit1 => "game_draw_init_1",
            RecognizerKind::GameDrawInit2 => "game_draw_init_2",
            RecognizerKind::GameCoin => "game_coin",
            RecognizerKind::GameEnd => "game_end",
        }
    }
}

impl fmt::Display for RecognizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecognizerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        RecognizerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown recognizer kind: '{}'", s))
    }
}

/// Set of recognizer kinds selected for one recognition call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RecognizerSet {
    bits: u32,
}

impl RecognizerSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        RecognizerKind::ALL.iter().copied().collect()
    }

    /// Build from a raw mask; bits that name no kind are dropped
    pub fn from_bits(bits: u32) -> Self {
        let known = Self::all().bits;
        Self { bits: bits & known }
    }

    pub const fn bits(&self) -> u32 {
        self.bits
    }

    pub fn with(mut self, kind: RecognizerKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: RecognizerKind) {
        self.bits |= kind.bit();
    }

    pub fn remove(&mut self, kind: RecognizerKind) {
        self.bits &= !kind.bit();
    }

    pub fn contains(&self, kind: RecognizerKind) -> bool {
        self.bits & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Selected kinds in declaration order
    pub fn iter(&self) -> impl Iterator<Item = RecognizerKind> + '_ {
        RecognizerKind::ALL
            .iter()
            .copied()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<RecognizerKind> for RecognizerSet {
    fn from_iter<I: IntoIterator<Item = RecognizerKind>>(iter: I) -> Self {
        let mut set = RecognizerSet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<RecognizerKind> for RecognizerSet {
    fn from(kind: RecognizerKind) -> Self {
        RecognizerSet::empty().with(kind)
    }
}
