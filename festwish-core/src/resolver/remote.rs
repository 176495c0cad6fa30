//! Remote provider - delegates resolution to the FestWish API
//!
//! Issues `GET {base_url}/content?festival_id=..&relationship_id=..&tone=..`
//! and `GET {base_url}/wishes/preview` with caching disabled, so every call
//! reaches the backend and gets a fresh random pick.

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{ContentBundle, ContentRequest};
use super::ContentResolver;
use crate::config::RemoteConfig;
use crate::error::{ResolveError, Result};
use crate::session::Session;
use crate::wish::{final_message, WishDraft, WishPreview};

const MIN_TIMEOUT_SECONDS: u64 = 1;

/// Error body returned by the API for 4xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: String,
}

/// Preview as the API returns it; absent text comes back as `""`
#[derive(Debug, Deserialize)]
struct PreviewRecord {
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    message_text: String,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    image_url: String,
    #[serde(default)]
    quote_text: Option<String>,
    #[serde(default)]
    quote_author: Option<String>,
    festival_name: String,
    relationship_name: String,
    #[serde(default)]
    recipient_name: Option<String>,
}

impl From<PreviewRecord> for WishPreview {
    fn from(record: PreviewRecord) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        WishPreview {
            festival_name: record.festival_name,
            relationship_name: record.relationship_name,
            recipient_name: record.recipient_name,
            message_text: non_empty(record.message_text),
            quote_text: record.quote_text,
            quote_author: record.quote_author,
            image_url: non_empty(record.image_url),
        }
    }
}

pub struct RemoteResolver {
    client: reqwest::Client,
    config: RemoteConfig,
    session: Session,
}

impl RemoteResolver {
    pub fn new(config: RemoteConfig, session: Session) -> AnyResult<Self> {
        let timeout_seconds = if config.timeout_seconds < MIN_TIMEOUT_SECONDS {
            warn!(
                "Configured timeout_seconds={} is too low; using minimum of {} second",
                config.timeout_seconds, MIN_TIMEOUT_SECONDS
            );
            MIN_TIMEOUT_SECONDS
        } else {
            config.timeout_seconds
        };

        let client = reqwest::Client::builder()
            .user_agent(concat!("festwish/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn content_url(&self) -> String {
        self.endpoint("content")
    }

    /// Map a 404 body to the entity it names
    fn not_found(festival_id: &str, relationship_id: Option<&str>, body: &str) -> ResolveError {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.detail)
            .unwrap_or_default();

        match relationship_id {
            Some(relationship_id) if detail.starts_with("Relationship") => {
                ResolveError::relationship_not_found(relationship_id)
            }
            _ => ResolveError::festival_not_found(festival_id),
        }
    }

    /// Uncached GET returning JSON; 404 maps to `NotFound`, anything else
    /// that is not a decodable success maps to `Unavailable`
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        festival_id: &str,
        relationship_id: Option<&str>,
    ) -> Result<T> {
        debug!("Requesting {} with {:?}", url, query);

        let mut builder = self
            .client
            .get(url)
            .query(query)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        if let Some(token) = self.session.bearer() {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ResolveError::Unavailable(format!("Failed to reach {url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            debug!("API returned 404: {}", body);
            return Err(Self::not_found(festival_id, relationship_id, &body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error: {} - {}", status, body);
            return Err(ResolveError::Unavailable(format!(
                "HTTP {status} from {url}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            ResolveError::Unavailable(format!("Failed to parse response from {url}: {e}"))
        })
    }
}

#[async_trait]
impl ContentResolver for RemoteResolver {
    async fn resolve(&self, request: &ContentRequest) -> Result<ContentBundle> {
        let mut query: Vec<(&str, &str)> = vec![("festival_id", request.festival_id.as_str())];
        if let Some(relationship_id) = request.relationship_id.as_deref() {
            query.push(("relationship_id", relationship_id));
        }
        if let Some(tone) = request.tone.as_deref() {
            query.push(("tone", tone));
        }

        self.get_json(
            &self.content_url(),
            &query,
            &request.festival_id,
            request.relationship_id.as_deref(),
        )
        .await
    }

    async fn preview(&self, draft: &WishDraft) -> Result<WishPreview> {
        let custom_message = final_message(draft.custom_message.as_deref(), None);

        let mut query: Vec<(&str, &str)> = vec![
            ("festival_id", draft.festival_id.as_str()),
            ("relationship_id", draft.relationship_id.as_str()),
        ];
        if let Some(message) = custom_message.as_deref() {
            query.push(("custom_message", message));
        }
        if let Some(recipient) = draft.recipient_name.as_deref() {
            query.push(("recipient_name", recipient));
        }

        let record: PreviewRecord = self
            .get_json(
                &self.endpoint("wishes/preview"),
                &query,
                &draft.festival_id,
                Some(&draft.relationship_id),
            )
            .await?;
        Ok(record.into())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
