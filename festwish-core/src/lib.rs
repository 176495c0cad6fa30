//! FestWish core library
//!
//! Festival catalogs and the content resolution service that picks a
//! greeting message, quote and card image for a festival.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod resolver;
pub mod session;
pub mod wish;

mod serde_util;

pub use error::{EntityKind, ResolveError};
