//! Wish previews
//!
//! Combines catalog names with one resolved bundle so a caller can show
//! what a card would say before the backend stores the wish. A non-blank
//! custom message always wins over the resolved template.
//!
//! Providers expose this through [`ContentResolver::preview`]; the remote
//! provider asks the API's preview endpoint instead of composing locally.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalogs;
use crate::error::{ResolveError, Result};
use crate::resolver::{ContentRequest, ContentResolver};

/// What the sender chose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishDraft {
    pub festival_id: String,
    pub relationship_id: String,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub custom_message: Option<String>,
}

/// Rendered preview; nothing here is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishPreview {
    pub festival_name: String,
    pub relationship_name: String,
    pub recipient_name: Option<String>,
    pub message_text: Option<String>,
    pub quote_text: Option<String>,
    pub quote_author: Option<String>,
    pub image_url: Option<String>,
}

/// Custom text if it has content, else the resolved message
pub fn final_message(custom_message: Option<&str>, resolved: Option<&str>) -> Option<String> {
    custom_message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or(resolved)
        .map(str::to_string)
}

/// Build a preview for `draft` from `catalogs`, drawing content through
/// `resolver`
///
/// Both the festival and the relationship must exist in `catalogs`, so
/// `resolver` should answer from the same catalogs. Callers outside the
/// local provider go through [`ContentResolver::preview`].
pub async fn preview_wish<C: ContentResolver + ?Sized>(
    resolver: &C,
    catalogs: &Catalogs,
    draft: &WishDraft,
) -> Result<WishPreview> {
    let festival = catalogs
        .festivals
        .find_by_id(&draft.festival_id)
        .ok_or_else(|| ResolveError::festival_not_found(&draft.festival_id))?;
    let relationship = catalogs
        .relationships
        .find_by_id(&draft.relationship_id)
        .ok_or_else(|| ResolveError::relationship_not_found(&draft.relationship_id))?;

    let request =
        ContentRequest::new(&draft.festival_id).with_relationship(&draft.relationship_id);
    let bundle = resolver.resolve(&request).await?;

    debug!(
        "Previewing wish for {} / {} via {}",
        festival.slug,
        relationship.name,
        resolver.name()
    );

    let message_text = final_message(
        draft.custom_message.as_deref(),
        bundle.message.as_ref().map(|m| m.text.as_str()),
    );
    let (quote_text, quote_author) = match bundle.quote {
        Some(quote) => (Some(quote.text), quote.author),
        None => (None, None),
    };

    Ok(WishPreview {
        festival_name: festival.name.clone(),
        relationship_name: relationship.display_name.clone(),
        recipient_name: draft.recipient_name.clone(),
        message_text,
        quote_text,
        quote_author,
        image_url: bundle.image.map(|image| image.url),
    })
}
