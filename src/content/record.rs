//! Content records: one node of the content tree.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use super::value::FieldValue;
use crate::core::UrlPath;

/// A content node, addressed by its tree path (`/`, `/blog`, `/blog/post1`).
#[derive(Debug, Clone)]
pub struct Record {
    /// Tree path without trailing slash (root is `/`).
    pub(super) path: String,
    /// Model name from `_model` (default `page`).
    pub(super) model: String,
    /// Typed user fields.
    pub(super) fields: FxHashMap<String, FieldValue>,
    /// Explicit `_label`.
    pub(super) label: Option<String>,
    /// Field holding the label, from the model.
    pub(super) label_field: String,
    /// Excluded from child listings (`_hidden`).
    pub(super) hidden: bool,
    /// The `contents.lr` file.
    pub(super) source_file: PathBuf,
    /// Directory holding the record.
    pub(super) source_dir: PathBuf,
    /// Child record paths, ordered by id.
    pub(super) children: Vec<String>,
}

impl Record {
    /// Tree path (`/blog/post1`).
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment (empty for the root).
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// URL of the rendered record (`/blog/post1/`).
    pub fn url_path(&self) -> UrlPath {
        UrlPath::from_page(&self.path)
    }

    /// Look up a field value.
    #[inline]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Human readable label: `_label`, the model's label field, else the id.
    pub fn record_label(&self) -> String {
        if let Some(label) = self.label.as_deref().filter(|l| !l.trim().is_empty()) {
            return label.to_string();
        }
        if let Some(value) = self.get(&self.label_field).filter(|v| v.is_truthy()) {
            return value.to_string();
        }
        match self.id() {
            "" => "Index".to_string(),
            id => id.to_string(),
        }
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The `contents.lr` file backing this record.
    #[inline]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Directory backing this record (its listing defines the children).
    #[inline]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Source files a build reading this record depends on.
    pub fn source_filenames(&self) -> Vec<PathBuf> {
        vec![self.source_file.clone()]
    }

    /// Child record paths, ordered by id.
    #[inline]
    pub fn child_paths(&self) -> &[String] {
        &self.children
    }

    /// Parent tree path (`None` for the root).
    pub fn parent_path(&self) -> Option<String> {
        parent_of(&self.path)
    }
}

/// Normalize a user-supplied tree path: leading `/`, no trailing `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{trimmed}")
}

/// Parent of a normalized tree path.
pub fn parent_of(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) | None => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
    }
}
