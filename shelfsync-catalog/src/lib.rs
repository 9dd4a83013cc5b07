//! Product catalog data model and slug generation.
//!
//! This crate defines the persisted catalog entities without any database
//! or filesystem dependencies. `shelfsync-db` persists these types and
//! `shelfsync-import` produces them from CSV batches.

pub mod slug;
pub mod types;

pub use slug::{
    SlugAssignment, SlugError, SlugRegistry, base_slug, is_valid_slug, resolve_slug, slugify,
    transliterate,
};
pub use types::*;
