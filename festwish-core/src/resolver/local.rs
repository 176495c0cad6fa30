//! In-memory provider backed by the static catalogs

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

use super::types::{ContentBundle, ContentRequest, ImageContent, MessageContent, QuoteContent};
use super::ContentResolver;
use crate::catalog::{Catalogs, MessageTemplate};
use crate::error::{ResolveError, Result};
use crate::wish::{preview_wish, WishDraft, WishPreview};

/// Resolve a bundle against the catalogs using `rng` for every draw
///
/// Fails with `NotFound` for an unknown festival. An unknown relationship
/// only yields "no message" unless `strict_relationships` is set.
pub fn resolve_local<R: Rng + ?Sized>(
    catalogs: &Catalogs,
    request: &ContentRequest,
    strict_relationships: bool,
    rng: &mut R,
) -> Result<ContentBundle> {
    let festival = catalogs
        .festivals
        .find_by_id(&request.festival_id)
        .ok_or_else(|| ResolveError::festival_not_found(&request.festival_id))?;

    let message = match request.relationship_id.as_deref() {
        Some(relationship_id) => match catalogs.relationships.find_by_id(relationship_id) {
            Some(relationship) => {
                let candidates: Vec<&MessageTemplate> = match request.tone.as_deref() {
                    Some(tone) => {
                        catalogs
                            .messages
                            .messages_by_tone(&festival.slug, &relationship.name, tone)
                    }
                    None => catalogs
                        .messages
                        .messages_for(&festival.slug, &relationship.name)
                        .iter()
                        .collect(),
                };

                if candidates.is_empty()
                    && catalogs
                        .messages
                        .has_messages(&festival.slug, &relationship.name)
                {
                    debug!(
                        "No '{}' templates for ({}, {}); available tones: {:?}",
                        request.tone.as_deref().unwrap_or_default(),
                        festival.slug,
                        relationship.name,
                        catalogs
                            .messages
                            .available_tones(&festival.slug, &relationship.name)
                    );
                }

                trace!(
                    "{} message candidates for ({}, {}) tone={:?}",
                    candidates.len(),
                    festival.slug,
                    relationship.name,
                    request.tone
                );

                candidates.choose(rng).map(|m| MessageContent {
                    text: m.text.clone(),
                    tone: m.tone.clone(),
                })
            }
            None if strict_relationships => {
                return Err(ResolveError::relationship_not_found(relationship_id));
            }
            None => {
                debug!(
                    "Unknown relationship '{}', resolving without a message",
                    relationship_id
                );
                None
            }
        },
        None => None,
    };

    let quote = catalogs
        .quotes
        .quotes_for(&festival.slug)
        .choose(rng)
        .map(|q| QuoteContent {
            text: q.text.clone(),
            author: q.author.clone(),
        });

    let image = festival.image.as_ref().map(|image| ImageContent {
        url: image.url.clone(),
        alt: image.alt.clone(),
    });

    debug!(
        "Resolved content for '{}': message={}, quote={}, image={}",
        festival.slug,
        message.is_some(),
        quote.is_some(),
        image.is_some()
    );

    Ok(ContentBundle {
        message,
        quote,
        image,
    })
}

/// Provider that draws from in-memory catalogs
///
/// The random source is injected and shared across calls; it is never
/// derived from request contents.
pub struct LocalResolver<R = StdRng> {
    catalogs: Arc<Catalogs>,
    rng: Mutex<R>,
    strict_relationships: bool,
}

impl LocalResolver<StdRng> {
    /// Create a resolver seeded from OS entropy
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self::with_rng(catalogs, StdRng::from_entropy())
    }
}

impl<R: RngCore + Send> LocalResolver<R> {
    pub fn with_rng(catalogs: Arc<Catalogs>, rng: R) -> Self {
        Self {
            catalogs,
            rng: Mutex::new(rng),
            strict_relationships: false,
        }
    }

    /// Treat unknown relationship ids as `NotFound` instead of "no message"
    pub fn strict_relationships(mut self, strict: bool) -> Self {
        self.strict_relationships = strict;
        self
    }

    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    /// Synchronous resolution; the async trait method delegates here
    pub fn resolve_now(&self, request: &ContentRequest) -> Result<ContentBundle> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        resolve_local(
            &self.catalogs,
            request,
            self.strict_relationships,
            &mut *rng,
        )
    }
}

#[async_trait]
impl<R: RngCore + Send> ContentResolver for LocalResolver<R> {
    async fn resolve(&self, request: &ContentRequest) -> Result<ContentBundle> {
        self.resolve_now(request)
    }

    async fn preview(&self, draft: &WishDraft) -> Result<WishPreview> {
        preview_wish(self, &self.catalogs, draft).await
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
