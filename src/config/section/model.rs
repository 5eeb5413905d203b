//! `[models.<name>]` configuration.
//!
//! A model tells the content loader how to type the raw text of each field
//! and which field labels a record.
//!
//! ```toml
//! [models.blog-post]
//! label = "title"
//!
//! [models.blog-post.fields]
//! body = "markdown"
//! pub_date = "date"
//! ```

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Storage type of a content field.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single line of plain text (default).
    #[default]
    String,
    /// Multi-line plain text.
    Text,
    /// Markdown source, rendered to HTML on access.
    Markdown,
    /// Raw HTML.
    Html,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// Date and time (`YYYY-MM-DD HH:MM[:SS]` or RFC 3339).
    Datetime,
    /// Signed integer.
    Integer,
    /// `true`/`yes`/`1` or `false`/`no`/`0`.
    Boolean,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Field used as the record label.
    pub label: String,
    /// Field name → storage type. Undeclared fields are `string`.
    pub fields: FxHashMap<String, FieldType>,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            label: "title".into(),
            fields: FxHashMap::default(),
        }
    }
}

impl ModelSection {
    /// Storage type of `field` in this model.
    pub fn field_type(&self, field: &str) -> FieldType {
        self.fields.get(field).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model() {
        let model: ModelSection =
            toml::from_str("label = \"name\"\n[fields]\nbody = \"markdown\"\npub_date = \"date\"")
                .unwrap();
        assert_eq!(model.label, "name");
        assert_eq!(model.field_type("body"), FieldType::Markdown);
        assert_eq!(model.field_type("pub_date"), FieldType::Date);
        assert_eq!(model.field_type("title"), FieldType::String);
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let result: Result<ModelSection, _> = toml::from_str("[fields]\nbody = \"rich\"");
        assert!(result.is_err());
    }
}
