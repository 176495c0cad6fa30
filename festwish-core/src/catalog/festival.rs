//! Festival table

use serde::{Deserialize, Serialize};

/// Card image attached to a festival
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FestivalImage {
    #[serde(alias = "image_url")]
    pub url: String,

    #[serde(
        alias = "alt_text",
        default,
        deserialize_with = "crate::serde_util::null_as_default"
    )]
    pub alt: String,
}

/// A cultural festival
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Festival {
    /// Stable identifier
    pub id: String,

    /// URL-safe human-readable key, unique within the catalog
    pub slug: String,

    pub name: String,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub description: String,

    #[serde(default)]
    pub religion_culture: Option<String>,

    #[serde(default)]
    pub typical_month: Option<String>,

    #[serde(default)]
    pub story_history: Option<String>,

    #[serde(default)]
    pub cultural_significance: Option<String>,

    #[serde(default)]
    pub traditions: Option<String>,

    /// Single card image; galleries live on the backend only
    #[serde(default)]
    pub image: Option<FestivalImage>,
}

impl Festival {
    /// Whether `query` (already lowercased) appears in the name or description
    fn matches_lowercase(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.description.to_lowercase().contains(query)
    }

    /// First line of the description
    pub fn short_description(&self) -> &str {
        self.description
            .lines()
            .next()
            .unwrap_or(&self.description)
            .trim()
    }
}

/// Combined listing criteria; unset fields match everything
#[derive(Debug, Clone, Copy, Default)]
pub struct FestivalFilter<'a> {
    /// Case-insensitive substring of name or description
    pub query: Option<&'a str>,
    /// Exact `religion_culture`
    pub culture: Option<&'a str>,
    /// Exact `typical_month`
    pub month: Option<&'a str>,
}

/// Festivals in source order
#[derive(Debug, Clone, Default)]
pub struct FestivalCatalog {
    festivals: Vec<Festival>,
}

impl FestivalCatalog {
    pub fn new(festivals: Vec<Festival>) -> Self {
        Self { festivals }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Festival> {
        self.festivals.iter().find(|f| f.id == id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Festival> {
        self.festivals.iter().find(|f| f.slug == slug)
    }

    /// Look up by id first, then by slug
    pub fn find(&self, id_or_slug: &str) -> Option<&Festival> {
        self.find_by_id(id_or_slug)
            .or_else(|| self.find_by_slug(id_or_slug))
    }

    pub fn list_all(&self) -> Vec<&Festival> {
        self.festivals.iter().collect()
    }

    /// Festivals matching every criterion set in `filter`, in source order
    pub fn filter(&self, filter: &FestivalFilter<'_>) -> Vec<&Festival> {
        let query_lower = filter.query.map(str::to_lowercase);
        self.festivals
            .iter()
            .filter(|f| match query_lower.as_deref() {
                Some(query) => f.matches_lowercase(query),
                None => true,
            })
            .filter(|f| filter.culture.is_none() || f.religion_culture.as_deref() == filter.culture)
            .filter(|f| filter.month.is_none() || f.typical_month.as_deref() == filter.month)
            .collect()
    }

    /// Exact match on `religion_culture`
    pub fn list_by_culture(&self, culture: &str) -> Vec<&Festival> {
        self.filter(&FestivalFilter {
            culture: Some(culture),
            ..Default::default()
        })
    }

    /// Exact match on `typical_month`
    pub fn list_by_month(&self, month: &str) -> Vec<&Festival> {
        self.filter(&FestivalFilter {
            month: Some(month),
            ..Default::default()
        })
    }

    /// Case-insensitive substring search over name and description
    pub fn search(&self, query: &str) -> Vec<&Festival> {
        self.filter(&FestivalFilter {
            query: Some(query),
            ..Default::default()
        })
    }

    /// Distinct non-empty cultures in first-seen order
    pub fn cultures(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for culture in self
            .festivals
            .iter()
            .filter_map(|f| f.religion_culture.as_deref())
            .filter(|c| !c.is_empty())
        {
            if !seen.contains(&culture) {
                seen.push(culture);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.festivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.festivals.is_empty()
    }
}
