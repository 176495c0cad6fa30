//! Content resolution - pick a message, quote and image for a festival
//!
//! Two interchangeable providers sit behind [`ContentResolver`]:
//! - [`LocalResolver`] draws from the in-memory catalogs
//! - `RemoteResolver` (feature `remote`) asks the FestWish API
//!
//! Each provider answers from a single source: a local provider never asks
//! the API and a remote provider never consults local catalogs.
//!
//! Every call makes fresh random draws. Nothing is cached by request, so
//! resolving the same festival twice may return different content.

mod local;
mod types;

#[cfg(feature = "remote")]
mod remote;

pub use local::{resolve_local, LocalResolver};
pub use types::{ContentBundle, ContentRequest, ImageContent, MessageContent, QuoteContent};

#[cfg(feature = "remote")]
pub use remote::RemoteResolver;

use async_trait::async_trait;

use crate::error::Result;
use crate::wish::{WishDraft, WishPreview};

/// A source of content bundles
///
/// Implementations must not memoize by request: callers rely on repeated
/// calls to produce new random picks.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Resolve a bundle for the request
    async fn resolve(&self, request: &ContentRequest) -> Result<ContentBundle>;

    /// Preview a wish using this provider's own festival and relationship
    /// records; unknown ids are `NotFound`
    async fn preview(&self, draft: &WishDraft) -> Result<WishPreview>;

    /// Provider identifier for logging
    fn name(&self) -> &'static str;

    /// Resolve a bundle for a festival and optional relationship
    async fn resolve_content(
        &self,
        festival_id: &str,
        relationship_id: Option<&str>,
    ) -> Result<ContentBundle> {
        let mut request = ContentRequest::new(festival_id);
        request.relationship_id = relationship_id.map(str::to_string);
        self.resolve(&request).await
    }

    /// Like [`resolve_content`](Self::resolve_content), but only templates
    /// with exactly this tone are candidates. No match means no message;
    /// there is no fallback to other tones.
    async fn resolve_content_by_tone(
        &self,
        festival_id: &str,
        relationship_id: Option<&str>,
        tone: &str,
    ) -> Result<ContentBundle> {
        let mut request = ContentRequest::new(festival_id).with_tone(tone);
        request.relationship_id = relationship_id.map(str::to_string);
        self.resolve(&request).await
    }
}
