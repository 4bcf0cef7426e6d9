use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Market segment an instrument trades in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Spot,
    Margin,
    Futures,
    Perpetual,
    Index,
}

impl AssetType {
    pub const ALL: [AssetType; 5] = [
        AssetType::Spot,
        AssetType::Margin,
        AssetType::Futures,
        AssetType::Perpetual,
        AssetType::Index,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Spot => "spot",
            AssetType::Margin => "margin",
            AssetType::Futures => "futures",
            AssetType::Perpetual => "perpetual",
            AssetType::Index => "index",
        }
    }
}

impl FromStr for AssetType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        AssetType::ALL
            .into_iter()
            .find(|asset| asset.as_str() == lowered)
            .ok_or_else(|| ParseError::UnknownAssetType(s.to_string()))
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
