//! FestWish catalogs - read-only reference data
//!
//! Four tables back the content resolution service:
//!
//! ```text
//! festivals.json          ← Festival list (id, slug, name, culture, image)
//! relationships.json      ← Relationship types grouped by category
//! message_templates.json  ← festival slug → relationship name → templates
//! quotes.json             ← festival slug → quotes
//! ```
//!
//! The tables are loaded once (see [`CatalogLoader`]) and shared behind an
//! `Arc<Catalogs>`. Nothing in this crate mutates them after load, and every
//! filter keeps the insertion order of the source file.

mod content;
mod festival;
mod loader;
mod relationship;

pub use content::{MessageCatalog, MessageTemplate, Quote, QuoteCatalog};
pub use festival::{Festival, FestivalCatalog, FestivalFilter, FestivalImage};
pub use loader::{CatalogLoader, FESTIVALS_FILE, MESSAGES_FILE, QUOTES_FILE, RELATIONSHIPS_FILE};
pub use relationship::{Relationship, RelationshipCatalog, RelationshipCategory};

/// All catalogs the resolver consults
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub festivals: FestivalCatalog,
    pub relationships: RelationshipCatalog,
    pub messages: MessageCatalog,
    pub quotes: QuoteCatalog,
}

impl Catalogs {
    /// Built-in demo catalog embedded in the library
    pub fn builtin() -> anyhow::Result<Self> {
        CatalogLoader::builtin()
    }
}
