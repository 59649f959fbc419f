use serde::{Deserialize, Serialize};
use std::fmt;

/// Card rarity tier, stored as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CardQuality {
    Free,
    Common,
    Rare,
    Epic,
    Legendary,
}

impl CardQuality {
    pub const fn code(self) -> u8 {
        match self {
            CardQuality::Free => 0,
            CardQuality::Common => 1,
            CardQuality::Rare => 3,
            CardQuality::Epic => 4,
            CardQuality::Legendary => 5,
        }
    }
}

impl TryFrom<u8> for CardQuality {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CardQuality::Free),
            1 => Ok(CardQuality::Common),
            3 => Ok(CardQuality::Rare),
            4 => Ok(CardQuality::Epic),
            5 => Ok(CardQuality::Legendary),
            other => Err(format!("Invalid card quality code: {}", other)),
        }
    }
}

impl From<CardQuality> for u8 {
    fn from(quality: CardQuality) -> Self {
        quality.code()
    }
}

impl fmt::Display for CardQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardQuality::Free => "free",
            CardQuality::Common => "common",
            CardQuality::Rare => "rare",
            CardQuality::Epic => "epic",
            CardQuality::Legendary => "legendary",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_serializes_as_code() -> anyhow::Result<()> {
        let json = serde_json::to_string(&CardQuality::Epic)?;
        assert_eq!(json, "4");
        let parsed: CardQuality = serde_json::from_str("5")?;
        assert_eq!(parsed, CardQuality::Legendary);
        assert!(serde_json::from_str::<CardQuality>("2").is_err());
        Ok(())
    }
}
