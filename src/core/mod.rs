//! Core types - pure abstractions shared across the codebase.

pub mod url;

pub use url::{UrlPath, build_url, is_external, make_external_url, make_relative_url, resolve_link};
