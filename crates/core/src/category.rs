//! Fixed set of registry item categories.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Category an item is filed under in the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Nursery,
    Feeding,
    Diapering,
    Bath,
    Clothing,
    Gear,
    Toys,
    Health,
    #[default]
    Other,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 9] = [
        Self::Nursery,
        Self::Feeding,
        Self::Diapering,
        Self::Bath,
        Self::Clothing,
        Self::Gear,
        Self::Toys,
        Self::Health,
        Self::Other,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nursery => "nursery",
            Self::Feeding => "feeding",
            Self::Diapering => "diapering",
            Self::Bath => "bath",
            Self::Clothing => "clothing",
            Self::Gear => "gear",
            Self::Toys => "toys",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    /// Parse a stored category name.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid category '{value}'. Must be one of: {valid:?}"
                ))
            })
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
