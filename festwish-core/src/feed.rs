//! Refreshable content with last-request-wins ordering
//!
//! A "refresh" re-resolves the same request to get new random content.
//! When refreshes overlap, only the most recently started one may publish;
//! older responses that arrive late are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::resolver::{ContentBundle, ContentRequest, ContentResolver};

/// Monotonic sequence number for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and tells whether a ticket is still the newest
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Current content for one request, refreshed on demand
pub struct ContentFeed {
    resolver: Arc<dyn ContentResolver>,
    request: ContentRequest,
    sequencer: RequestSequencer,
    current: RwLock<Option<ContentBundle>>,
}

impl ContentFeed {
    pub fn new(resolver: Arc<dyn ContentResolver>, request: ContentRequest) -> Self {
        Self {
            resolver,
            request,
            sequencer: RequestSequencer::new(),
            current: RwLock::new(None),
        }
    }

    pub fn request(&self) -> &ContentRequest {
        &self.request
    }

    /// Resolve again and publish the result if no newer refresh started
    ///
    /// Returns `Ok(None)` when this refresh was superseded; its result (or
    /// error) is discarded.
    pub async fn refresh(&self) -> Result<Option<ContentBundle>> {
        let ticket = self.sequencer.next();
        let result = self.resolver.resolve(&self.request).await;

        let mut current = self.current.write().await;
        if !self.sequencer.is_latest(ticket) {
            debug!(
                "Discarding stale content response (ticket {})",
                ticket.value()
            );
            return Ok(None);
        }

        let bundle = result?;
        *current = Some(bundle.clone());
        Ok(Some(bundle))
    }

    /// Last published bundle
    pub async fn current(&self) -> Option<ContentBundle> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::resolver::QuoteContent;
    use crate::wish::{WishDraft, WishPreview};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// First call is slow, later calls are fast
    struct SlowFirstResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentResolver for SlowFirstResolver {
        async fn resolve(&self, _request: &ContentRequest) -> Result<ContentBundle> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            Ok(ContentBundle {
                quote: Some(QuoteContent {
                    text: format!("call {call}"),
                    author: None,
                }),
                ..Default::default()
            })
        }

        async fn preview(&self, draft: &WishDraft) -> Result<WishPreview> {
            Err(ResolveError::festival_not_found(&draft.festival_id))
        }

        fn name(&self) -> &'static str {
            "slow-first"
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl ContentResolver for FailingResolver {
        async fn resolve(&self, request: &ContentRequest) -> Result<ContentBundle> {
            Err(ResolveError::festival_not_found(&request.festival_id))
        }

        async fn preview(&self, draft: &WishDraft) -> Result<WishPreview> {
            Err(ResolveError::festival_not_found(&draft.festival_id))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_sequencer_is_monotonic() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.next();
        let second = sequencer.next();

        assert!(second > first);
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer() {
        let feed = ContentFeed::new(
            Arc::new(SlowFirstResolver {
                calls: AtomicUsize::new(0),
            }),
            ContentRequest::new("diwali-id"),
        );

        let (older, newer) = tokio::join!(feed.refresh(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            feed.refresh().await
        });

        assert_eq!(older.unwrap(), None);
        let newer = newer.unwrap().unwrap();
        assert_eq!(newer.quote.as_ref().unwrap().text, "call 1");

        let current = feed.current().await.unwrap();
        assert_eq!(current, newer);
    }

    #[tokio::test]
    async fn test_sequential_refreshes_publish() {
        let feed = ContentFeed::new(
            Arc::new(SlowFirstResolver {
                calls: AtomicUsize::new(1),
            }),
            ContentRequest::new("diwali-id"),
        );

        assert!(feed.current().await.is_none());
        let first = feed.refresh().await.unwrap().unwrap();
        let second = feed.refresh().await.unwrap().unwrap();
        assert_ne!(first, second);
        assert_eq!(feed.current().await, Some(second));
    }

    #[tokio::test]
    async fn test_errors_surface_and_keep_previous_content() {
        let feed = ContentFeed::new(Arc::new(FailingResolver), ContentRequest::new("nope"));
        let err = feed.refresh().await.unwrap_err();
        assert!(err.is_not_found());
        assert!(feed.current().await.is_none());
    }
}
