//! Explicit session context for calls to the FestWish API
//!
//! The session is hydrated once at startup and handed to whichever
//! component needs it. Logging out is `clear()`.

use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
}

impl Session {
    /// Session without credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }

    /// Hydrate from an environment variable; unset or blank means anonymous
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => {
                debug!("Loaded access token from {}", var);
                Self::with_token(token.trim())
            }
            _ => {
                debug!("No access token in {}, using anonymous session", var);
                Self::anonymous()
            }
        }
    }

    /// Token for an `Authorization: Bearer` header
    pub fn bearer(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn clear(&mut self) {
        self.access_token = None;
    }
}
