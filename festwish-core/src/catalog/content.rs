//! Message template and quote tables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Greeting text for a (festival, relationship) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    #[serde(alias = "message_text")]
    pub text: String,

    /// Free-form label such as "formal" or "funny"
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub tone: String,
}

/// A quote attached to a festival
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(alias = "quote_text")]
    pub text: String,

    #[serde(default)]
    pub author: Option<String>,
}

/// Templates keyed by festival slug, then relationship name
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    entries: HashMap<String, HashMap<String, Vec<MessageTemplate>>>,
}

impl MessageCatalog {
    pub fn new(entries: HashMap<String, HashMap<String, Vec<MessageTemplate>>>) -> Self {
        Self { entries }
    }

    /// All templates for the pair; empty when none are registered
    pub fn messages_for(&self, festival_slug: &str, relationship_name: &str) -> &[MessageTemplate] {
        self.entries
            .get(festival_slug)
            .and_then(|by_relationship| by_relationship.get(relationship_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Templates for the pair whose tone equals `tone` exactly
    pub fn messages_by_tone(
        &self,
        festival_slug: &str,
        relationship_name: &str,
        tone: &str,
    ) -> Vec<&MessageTemplate> {
        self.messages_for(festival_slug, relationship_name)
            .iter()
            .filter(|m| m.tone == tone)
            .collect()
    }

    /// Distinct tones for the pair in first-seen order
    pub fn available_tones(&self, festival_slug: &str, relationship_name: &str) -> Vec<&str> {
        let mut tones: Vec<&str> = Vec::new();
        for message in self.messages_for(festival_slug, relationship_name) {
            if !tones.contains(&message.tone.as_str()) {
                tones.push(&message.tone);
            }
        }
        tones
    }

    pub fn has_messages(&self, festival_slug: &str, relationship_name: &str) -> bool {
        !self.messages_for(festival_slug, relationship_name).is_empty()
    }

    /// Total number of templates across all pairs
    pub fn template_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|by_relationship| by_relationship.values())
            .map(Vec::len)
            .sum()
    }
}

/// Quotes keyed by festival slug
#[derive(Debug, Clone, Default)]
pub struct QuoteCatalog {
    entries: HashMap<String, Vec<Quote>>,
}

impl QuoteCatalog {
    pub fn new(entries: HashMap<String, Vec<Quote>>) -> Self {
        Self { entries }
    }

    pub fn quotes_for(&self, festival_slug: &str) -> &[Quote] {
        self.entries
            .get(festival_slug)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_quotes(&self, festival_slug: &str) -> bool {
        !self.quotes_for(festival_slug).is_empty()
    }

    pub fn quote_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
