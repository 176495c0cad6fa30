//! Catalog loading and normalization
//!
//! Festival records arrive with a flat `image_url` field; the loader turns
//! it into the nested [`FestivalImage`] the rest of the crate expects and
//! checks the id/slug invariants before anything can read the tables.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use super::{
    Catalogs, Festival, FestivalCatalog, FestivalImage, MessageCatalog, MessageTemplate, Quote,
    QuoteCatalog, Relationship, RelationshipCatalog,
};

pub const FESTIVALS_FILE: &str = "festivals.json";
pub const RELATIONSHIPS_FILE: &str = "relationships.json";
pub const MESSAGES_FILE: &str = "message_templates.json";
pub const QUOTES_FILE: &str = "quotes.json";

const BUILTIN_FESTIVALS: &str = include_str!("../../data/festivals.json");
const BUILTIN_RELATIONSHIPS: &str = include_str!("../../data/relationships.json");
const BUILTIN_MESSAGES: &str = include_str!("../../data/message_templates.json");
const BUILTIN_QUOTES: &str = include_str!("../../data/quotes.json");

/// Festival as stored in `festivals.json`
#[derive(Debug, Deserialize)]
struct FestivalRecord {
    id: String,
    slug: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    religion_culture: Option<String>,
    #[serde(default)]
    typical_month: Option<String>,
    #[serde(default)]
    story_history: Option<String>,
    #[serde(default)]
    cultural_significance: Option<String>,
    #[serde(default)]
    traditions: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image: Option<FestivalImage>,
}

impl FestivalRecord {
    fn normalize(self) -> Festival {
        let image = match (self.image, self.image_url) {
            (Some(mut image), _) => {
                if image.alt.is_empty() {
                    image.alt = self.name.clone();
                }
                Some(image)
            }
            (None, Some(url)) if !url.trim().is_empty() => Some(FestivalImage {
                url,
                alt: self.name.clone(),
            }),
            _ => None,
        };

        Festival {
            id: self.id,
            slug: self.slug,
            name: self.name,
            description: self.description.unwrap_or_default(),
            religion_culture: self.religion_culture,
            typical_month: self.typical_month,
            story_history: self.story_history,
            cultural_significance: self.cultural_significance,
            traditions: self.traditions,
            image,
        }
    }
}

/// Builds [`Catalogs`] from JSON sources
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load the four catalog files from a directory
    ///
    /// `festivals.json` and `relationships.json` are required. Missing
    /// message or quote files yield empty tables.
    pub fn from_dir(dir: &Path) -> Result<Catalogs> {
        let festivals = read_required(dir, FESTIVALS_FILE)?;
        let relationships = read_required(dir, RELATIONSHIPS_FILE)?;
        let messages = read_optional(dir, MESSAGES_FILE)?;
        let quotes = read_optional(dir, QUOTES_FILE)?;

        let catalogs = Self::from_json(
            &festivals,
            &relationships,
            messages.as_deref(),
            quotes.as_deref(),
        )
        .with_context(|| format!("Failed to load catalog from {}", dir.display()))?;

        info!(
            "Loaded catalog from {}: {} festivals, {} relationships, {} templates, {} quotes",
            dir.display(),
            catalogs.festivals.len(),
            catalogs.relationships.len(),
            catalogs.messages.template_count(),
            catalogs.quotes.quote_count()
        );
        Ok(catalogs)
    }

    /// Built-in demo catalog
    pub fn builtin() -> Result<Catalogs> {
        debug!("Loading built-in catalog");
        Self::from_json(
            BUILTIN_FESTIVALS,
            BUILTIN_RELATIONSHIPS,
            Some(BUILTIN_MESSAGES),
            Some(BUILTIN_QUOTES),
        )
        .context("Failed to load built-in catalog")
    }

    /// Parse, normalize and validate catalog JSON documents
    pub fn from_json(
        festivals: &str,
        relationships: &str,
        messages: Option<&str>,
        quotes: Option<&str>,
    ) -> Result<Catalogs> {
        let records: Vec<FestivalRecord> =
            serde_json::from_str(festivals).context("Failed to parse festivals JSON")?;
        let festivals: Vec<Festival> = records.into_iter().map(FestivalRecord::normalize).collect();
        validate_festivals(&festivals)?;

        let relationships: Vec<Relationship> =
            serde_json::from_str(relationships).context("Failed to parse relationships JSON")?;
        validate_relationships(&relationships)?;

        let messages: HashMap<String, HashMap<String, Vec<MessageTemplate>>> = match messages {
            Some(content) => {
                serde_json::from_str(content).context("Failed to parse message templates JSON")?
            }
            None => HashMap::new(),
        };

        let quotes: HashMap<String, Vec<Quote>> = match quotes {
            Some(content) => serde_json::from_str(content).context("Failed to parse quotes JSON")?,
            None => HashMap::new(),
        };

        Ok(Catalogs {
            festivals: FestivalCatalog::new(festivals),
            relationships: RelationshipCatalog::new(relationships),
            messages: MessageCatalog::new(messages),
            quotes: QuoteCatalog::new(quotes),
        })
    }
}

fn read_required(dir: &Path, file: &str) -> Result<String> {
    let path = dir.join(file);
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))
}

fn read_optional(dir: &Path, file: &str) -> Result<Option<String>> {
    let path = dir.join(file);
    if !path.exists() {
        debug!("No {} in {}, using empty table", file, dir.display());
        return Ok(None);
    }
    read_required(dir, file).map(Some)
}

/// Slugs are lowercase ASCII alphanumerics separated by single hyphens
pub(crate) fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn validate_festivals(festivals: &[Festival]) -> Result<()> {
    let mut ids = HashSet::new();
    let mut slugs = HashSet::new();

    for festival in festivals {
        if festival.id.trim().is_empty() {
            bail!("Festival '{}' has an empty id", festival.name);
        }
        if !ids.insert(festival.id.as_str()) {
            bail!("Duplicate festival id '{}'", festival.id);
        }
        if !is_url_safe_slug(&festival.slug) {
            bail!(
                "Festival '{}' has slug '{}' which is not URL-safe",
                festival.id,
                festival.slug
            );
        }
        if !slugs.insert(festival.slug.as_str()) {
            bail!("Duplicate festival slug '{}'", festival.slug);
        }
    }

    Ok(())
}

fn validate_relationships(relationships: &[Relationship]) -> Result<()> {
    let mut ids = HashSet::new();

    for relationship in relationships {
        if relationship.id.trim().is_empty() {
            bail!("Relationship '{}' has an empty id", relationship.name);
        }
        if !ids.insert(relationship.id.as_str()) {
            bail!("Duplicate relationship id '{}'", relationship.id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod loader_tests {
    use super::*;

    #[test]
    fn test_flat_image_url_becomes_nested_image() {
        let festivals = r#"[
            {"id": "f1", "slug": "holi", "name": "Holi", "image_url": "https://img/holi.png"},
            {"id": "f2", "slug": "lohri", "name": "Lohri", "image_url": ""},
            {"id": "f3", "slug": "onam", "name": "Onam"}
        ]"#;

        let catalogs = CatalogLoader::from_json(festivals, "[]", None, None).unwrap();

        let holi = catalogs.festivals.find_by_slug("holi").unwrap();
        assert_eq!(
            holi.image,
            Some(FestivalImage {
                url: "https://img/holi.png".to_string(),
                alt: "Holi".to_string(),
            })
        );
        assert!(catalogs.festivals.find_by_slug("lohri").unwrap().image.is_none());
        assert!(catalogs.festivals.find_by_slug("onam").unwrap().image.is_none());
    }

    #[test]
    fn test_nested_image_with_backend_field_names() {
        let festivals = r#"[
            {"id": "f1", "slug": "eid", "name": "Eid",
             "image": {"image_url": "https://img/eid.png", "alt_text": "Crescent"}}
        ]"#;

        let catalogs = CatalogLoader::from_json(festivals, "[]", None, None).unwrap();
        let image = catalogs.festivals.find_by_id("f1").unwrap().image.clone().unwrap();
        assert_eq!(image.url, "https://img/eid.png");
        assert_eq!(image.alt, "Crescent");
    }

    #[test]
    fn test_null_optional_fields_load() {
        let festivals = r#"[
            {"id": "f1", "slug": "eid", "name": "Eid", "description": null,
             "image": {"image_url": "https://img/eid.png", "alt_text": null}}
        ]"#;
        let messages = r#"{"eid": {"friend": [{"message_text": "Eid Mubarak!", "tone": null}]}}"#;

        let catalogs = CatalogLoader::from_json(festivals, "[]", Some(messages), None).unwrap();

        let eid = catalogs.festivals.find_by_id("f1").unwrap();
        assert_eq!(eid.description, "");
        assert_eq!(eid.image.as_ref().unwrap().alt, "Eid");
        assert_eq!(catalogs.messages.messages_for("eid", "friend")[0].tone, "");
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let festivals = r#"[
            {"id": "f1", "slug": "diwali", "name": "Diwali"},
            {"id": "f2", "slug": "diwali", "name": "Deepavali"}
        ]"#;

        let err = CatalogLoader::from_json(festivals, "[]", None, None).unwrap_err();
        assert!(format!("{err:#}").contains("Duplicate festival slug"));
    }

    #[test]
    fn test_duplicate_festival_id_rejected() {
        let festivals = r#"[
            {"id": "f1", "slug": "diwali", "name": "Diwali"},
            {"id": "f1", "slug": "holi", "name": "Holi"}
        ]"#;

        let err = CatalogLoader::from_json(festivals, "[]", None, None).unwrap_err();
        assert!(format!("{err:#}").contains("Duplicate festival id"));
    }

    #[test]
    fn test_unsafe_slug_rejected() {
        let festivals = r#"[{"id": "f1", "slug": "Chinese New Year", "name": "Chinese New Year"}]"#;
        let err = CatalogLoader::from_json(festivals, "[]", None, None).unwrap_err();
        assert!(format!("{err:#}").contains("not URL-safe"));
    }

    #[test]
    fn test_duplicate_relationship_id_rejected() {
        let relationships = r#"[
            {"id": "r1", "name": "friend", "display_name": "Friend", "category": "friends"},
            {"id": "r1", "name": "mother", "display_name": "Mother", "category": "family"}
        ]"#;

        let err = CatalogLoader::from_json("[]", relationships, None, None).unwrap_err();
        assert!(format!("{err:#}").contains("Duplicate relationship id"));
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_url_safe_slug("diwali"));
        assert!(is_url_safe_slug("chinese-new-year"));
        assert!(is_url_safe_slug("new-year-2025"));
        assert!(!is_url_safe_slug(""));
        assert!(!is_url_safe_slug("-diwali"));
        assert!(!is_url_safe_slug("diwali-"));
        assert!(!is_url_safe_slug("new--year"));
        assert!(!is_url_safe_slug("Diwali"));
        assert!(!is_url_safe_slug("eid/ul-fitr"));
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalogs = CatalogLoader::builtin().unwrap();
        assert!(!catalogs.festivals.is_empty());
        assert!(!catalogs.relationships.is_empty());
        assert!(catalogs.messages.template_count() > 0);
        assert!(catalogs.quotes.quote_count() > 0);
    }
}
