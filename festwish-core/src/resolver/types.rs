//! Request and bundle types shared by all providers

use serde::{Deserialize, Serialize};

/// What to resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub festival_id: String,

    #[serde(default)]
    pub relationship_id: Option<String>,

    /// Restrict message candidates to this tone
    #[serde(default)]
    pub tone: Option<String>,
}

impl ContentRequest {
    pub fn new(festival_id: impl Into<String>) -> Self {
        Self {
            festival_id: festival_id.into(),
            relationship_id: None,
            tone: None,
        }
    }

    pub fn with_relationship(mut self, relationship_id: impl Into<String>) -> Self {
        self.relationship_id = Some(relationship_id.into());
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(alias = "message_text")]
    pub text: String,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub tone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteContent {
    #[serde(alias = "quote_text")]
    pub text: String,

    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(alias = "image_url")]
    pub url: String,

    #[serde(
        alias = "alt_text",
        default,
        deserialize_with = "crate::serde_util::null_as_default"
    )]
    pub alt: String,
}

/// Result of one resolution call; each part may be absent independently
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    #[serde(default)]
    pub message: Option<MessageContent>,

    #[serde(default)]
    pub quote: Option<QuoteContent>,

    #[serde(default)]
    pub image: Option<ImageContent>,
}

impl ContentBundle {
    /// True when nothing could be resolved
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.quote.is_none() && self.image.is_none()
    }
}
