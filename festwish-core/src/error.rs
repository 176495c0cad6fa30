//! Error taxonomy for content resolution
//!
//! Only two conditions are errors: a referenced entity that does not exist,
//! and a remote provider that could not be reached. Missing content for
//! otherwise valid inputs is represented as `None` fields in the bundle.

use std::fmt;
use thiserror::Error;

/// Kind of catalog entity a lookup referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Festival,
    Relationship,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Festival => f.write_str("Festival"),
            EntityKind::Relationship => f.write_str("Relationship"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("Content provider unavailable: {0}")]
    Unavailable(String),
}

impl ResolveError {
    pub fn festival_not_found(id: impl Into<String>) -> Self {
        ResolveError::NotFound {
            kind: EntityKind::Festival,
            id: id.into(),
        }
    }

    pub fn relationship_not_found(id: impl Into<String>) -> Self {
        ResolveError::NotFound {
            kind: EntityKind::Relationship,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ResolveError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
