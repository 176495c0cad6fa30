//! Relationship table

use serde::{Deserialize, Serialize};
use std::fmt;

/// UI grouping for relationships; never used for content selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipCategory {
    Family,
    Romantic,
    Friends,
    Professional,
    #[default]
    #[serde(other)]
    Other,
}

impl RelationshipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipCategory::Family => "family",
            RelationshipCategory::Romantic => "romantic",
            RelationshipCategory::Friends => "friends",
            RelationshipCategory::Professional => "professional",
            RelationshipCategory::Other => "other",
        }
    }
}

impl fmt::Display for RelationshipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "family" => Ok(RelationshipCategory::Family),
            "romantic" => Ok(RelationshipCategory::Romantic),
            "friends" => Ok(RelationshipCategory::Friends),
            "professional" => Ok(RelationshipCategory::Professional),
            "other" => Ok(RelationshipCategory::Other),
            other => Err(format!(
                "Unknown relationship category '{other}' (expected family, romantic, friends, professional or other)"
            )),
        }
    }
}

/// Who the greeting is for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,

    /// Key into the message template table (e.g. "friend")
    pub name: String,

    /// Label shown to users (e.g. "Best Friend")
    pub display_name: String,

    /// Missing, null or unrecognised values become `Other`
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub category: RelationshipCategory,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub sort_order: i32,
}

/// Relationships in source order
#[derive(Debug, Clone, Default)]
pub struct RelationshipCatalog {
    relationships: Vec<Relationship>,
}

impl RelationshipCatalog {
    pub fn new(relationships: Vec<Relationship>) -> Self {
        Self { relationships }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Case-insensitive name lookup
    pub fn find_by_name(&self, name: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    pub fn list_all(&self) -> Vec<&Relationship> {
        self.relationships.iter().collect()
    }

    /// Exact category match; `None` returns everything
    pub fn list_by_category(&self, category: Option<RelationshipCategory>) -> Vec<&Relationship> {
        match category {
            Some(category) => self
                .relationships
                .iter()
                .filter(|r| r.category == category)
                .collect(),
            None => self.list_all(),
        }
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<RelationshipCategory> {
        let mut seen = Vec::new();
        for relationship in &self.relationships {
            if !seen.contains(&relationship.category) {
                seen.push(relationship.category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}
