//! Category records: named, colored grouping buckets for tasks.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The fixed color palette categories may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Red,
    Orange,
    Yellow,
    Green,
    #[default]
    Blue,
    Indigo,
    Purple,
    Pink,
}

impl CategoryColor {
    pub const ALL: [CategoryColor; 8] = [
        CategoryColor::Red,
        CategoryColor::Orange,
        CategoryColor::Yellow,
        CategoryColor::Green,
        CategoryColor::Blue,
        CategoryColor::Indigo,
        CategoryColor::Purple,
        CategoryColor::Pink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoryColor::Red => "red",
            CategoryColor::Orange => "orange",
            CategoryColor::Yellow => "yellow",
            CategoryColor::Green => "green",
            CategoryColor::Blue => "blue",
            CategoryColor::Indigo => "indigo",
            CategoryColor::Purple => "purple",
            CategoryColor::Pink => "pink",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.name() == trimmed)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown color '{trimmed}' (expected one of: red, orange, yellow, green, blue, indigo, purple, pink)"
                ))
            })
    }
}

/// A grouping bucket for tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: CategoryColor,
    #[serde(default)]
    pub order: i64,
}

/// Fields supplied when creating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub color: CategoryColor,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, color: CategoryColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(
                "category name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update for a category (rename, recolor, reposition).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<CategoryColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.order.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation(
                    "category name cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Merge this patch into `category`, preserving the id.
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(order) = self.order {
            category.order = order;
        }
    }
}
