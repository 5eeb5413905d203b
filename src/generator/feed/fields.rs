//! Per-entry field accessors and stable ids.

use atom_syndication::FixedDateTime;
use chrono::Utc;
use md5::{Digest, Md5};

use super::FeedError;
use crate::build::BuildContext;
use crate::config::ProjectConfig;
use crate::content::{FieldValue, Record};

/// Stable `urn:uuid:` id: the MD5 digest of `s` as a version 3 UUID.
pub fn get_id(s: &str) -> String {
    let digest: [u8; 16] = Md5::digest(s.as_bytes()).into();
    uuid::Builder::from_md5_bytes(digest)
        .into_uuid()
        .urn()
        .to_string()
}

/// Seed of every id in a project: the base URL as written, else the
/// project id.
pub fn project_id(config: &ProjectConfig) -> String {
    match config.project.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => config.project_id(),
    }
}

/// Entry title: the title field, else the record label.
pub fn get_item_title(item: &Record, field: &str) -> String {
    match item.get(field) {
        Some(value) => value.to_string(),
        None => item.record_label(),
    }
}

/// Entry body as HTML, rendered with the item's URL as base.
pub fn get_item_body(ctx: &BuildContext<'_>, item: &Record, field: &str) -> Result<String, FeedError> {
    let value = item.get(field).ok_or_else(|| FeedError::MissingBody {
        field: field.to_string(),
        record: item.path().to_string(),
    })?;
    let _base = ctx.changed_base_url(item.url_path());
    Ok(ctx.render_html(item, value))
}

/// Entry author: the author field when set, else `fallback`.
pub fn get_item_author(item: &Record, field: &str, fallback: &str) -> String {
    item.get(field)
        .filter(|v| v.is_truthy())
        .map(|v| v.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Entry timestamp: the date field, else now. Dates are midnight UTC.
///
/// Untyped text fields are read as datetimes too.
pub fn get_item_updated(item: &Record, field: &str) -> FixedDateTime {
    item.get(field)
        .and_then(FieldValue::as_datetime)
        .unwrap_or_else(|| Utc::now().fixed_offset())
}
