use super::{CardCatalog, CardQuality};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: u32,
    pub quality: CardQuality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phash: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRecord {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phash: Option<u64>,
}

/// Known cards and heroes with their precomputed perceptual hashes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceDatabase {
    #[serde(default)]
    pub cards: Vec<CardRecord>,
    #[serde(default)]
    pub heroes: Vec<HeroRecord>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl ReferenceDatabase {
    pub fn new(cards: Vec<CardRecord>, heroes: Vec<HeroRecord>) -> Self {
        Self {
            cards,
            heroes,
            path: None,
        }
    }

    /// Load a JSON database and remember its location for [`save`](Self::save)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open reference database: {:?}", path))?;

        let mut db: ReferenceDatabase = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse reference database: {:?}", path))?;
        db.path = Some(path.to_path_buf());

        tracing::info!(
            "Loaded {} cards and {} heroes from {:?}",
            db.cards.len(),
            db.heroes.len(),
            path
        );
        Ok(db)
    }

    /// Write back to the file this database was loaded from
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .context("Reference database has no backing file")?;
        self.save_to(path)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize reference database")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write reference database: {:?}", path))?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True when any card or hero still lacks its perceptual hash
    pub fn has_missing_data(&self) -> bool {
        self.cards.iter().any(|c| c.phash.is_none()) || self.heroes.iter().any(|h| h.phash.is_none())
    }

    pub fn card(&self, id: u32) -> Option<&CardRecord> {
        self.cards.iter().find(|c| c.id == id)
    }
}

impl CardCatalog for ReferenceDatabase {
    fn quality(&self, card_id: u32) -> Option<CardQuality> {
        self.card(card_id).map(|c| c.quality)
    }
}
