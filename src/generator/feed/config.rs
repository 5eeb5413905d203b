//! Feed settings from `configs/feed.ini`.
//!
//! One INI section per feed; the section name is the feed id:
//!
//! ```ini
//! [blog]
//! name = My Blog
//! source_path = /blog
//! items = site.query('/blog').filter(F._model == 'blog-post')
//! limit = 20
//! ```
//!
//! Keys missing from a section (or left empty) take the value from
//! [`DEFAULTS`].

use ini::{Ini, ParseOption};
use rustc_hash::FxHashMap;
use std::path::Path;

use crate::config::{ConfigDiagnostics, ConfigError};
use crate::content::normalize_path;
use crate::debug;

/// File name of the feed config inside the configs directory.
pub const CONFIG_FILE: &str = "feed.ini";

/// Recognized keys and their defaults.
pub const DEFAULTS: &[(&str, Option<&str>)] = &[
    ("source_path", Some("/")),
    ("name", None),
    ("url_path", None),
    ("filename", Some("feed.xml")),
    ("blog_author_field", Some("author")),
    ("blog_summary_field", Some("summary")),
    ("items", None),
    ("limit", Some("50")),
    ("item_title_field", Some("title")),
    ("item_body_field", Some("body")),
    ("item_author_field", Some("author")),
    ("item_date_field", Some("pub_date")),
    ("item_model", None),
];

/// Raw feed sections, in file order.
#[derive(Debug, Clone, Default)]
pub struct FeedConfig {
    sections: Vec<(String, FxHashMap<String, String>)>,
}

impl FeedConfig {
    /// Load `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            debug!("feed"; "no {} found, no feeds configured", path.display());
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse(path, &source)
    }

    /// Parse INI text; `path` only labels parse errors.
    pub fn parse(path: &Path, source: &str) -> Result<Self, ConfigError> {
        // Item expressions carry quotes and backslashes verbatim.
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(source, opt)
            .map_err(|err| ConfigError::Ini(path.to_path_buf(), err))?;

        let sections = ini
            .iter()
            .filter_map(|(name, props)| {
                let values = props
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                name.map(|name| (name.to_string(), values))
            })
            .collect();

        Ok(Self { sections })
    }

    /// Feed ids in file order.
    pub fn feed_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(id, _)| id.as_str())
    }

    /// Value of `key` for `feed_id`, falling back to [`DEFAULTS`].
    ///
    /// `None` for unknown keys and for unset keys without a default.
    pub fn get_feed_config(&self, feed_id: &str, key: &str) -> Option<String> {
        let default = DEFAULTS.iter().find(|(k, _)| *k == key)?.1;
        self.sections
            .iter()
            .find(|(id, _)| id == feed_id)
            .and_then(|(_, values)| values.get(key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .or(default)
            .map(str::to_string)
    }

    /// Typed settings of every feed.
    ///
    /// All sections are checked before failing so every problem is reported
    /// at once.
    pub fn settings(&self) -> Result<Vec<FeedSettings>, ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        let settings: Vec<FeedSettings> = self
            .feed_ids()
            .filter_map(|id| FeedSettings::resolve(self, id, &mut diag))
            .collect();
        diag.into_result()?;
        Ok(settings)
    }
}

/// Typed view of one feed section.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub id: String,
    /// Normalized tree path of the record the feed hangs off.
    pub source_path: String,
    pub name: Option<String>,
    pub url_path: Option<String>,
    pub filename: String,
    pub blog_author_field: String,
    pub blog_summary_field: String,
    pub items: Option<String>,
    pub limit: usize,
    pub item_title_field: String,
    pub item_body_field: String,
    pub item_author_field: String,
    pub item_date_field: String,
    pub item_model: Option<String>,
}

impl FeedSettings {
    fn resolve(config: &FeedConfig, id: &str, diag: &mut ConfigDiagnostics) -> Option<Self> {
        let get = |key: &str| config.get_feed_config(id, key);
        let field = |key: &str| get(key).unwrap_or_default();

        let mut valid = true;
        let limit = field("limit");
        let limit = match limit.parse::<usize>() {
            Ok(limit) => limit,
            Err(_) => {
                diag.error_with_hint(
                    format!("{id}.limit"),
                    format!("`{limit}` is not a non-negative integer"),
                    "limit = 50",
                );
                valid = false;
                0
            }
        };
        for key in ["url_path", "filename"] {
            if let Some(value) = get(key).filter(|v| v.split('/').any(|s| s == "..")) {
                diag.error(
                    format!("{id}.{key}"),
                    format!("`{value}` climbs out of the output directory"),
                );
                valid = false;
            }
        }
        if !valid {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            source_path: normalize_path(&field("source_path")),
            name: get("name"),
            url_path: get("url_path"),
            filename: field("filename"),
            blog_author_field: field("blog_author_field"),
            blog_summary_field: field("blog_summary_field"),
            items: get("items"),
            limit,
            item_title_field: field("item_title_field"),
            item_body_field: field("item_body_field"),
            item_author_field: field("item_author_field"),
            item_date_field: field("item_date_field"),
            item_model: get("item_model"),
        })
    }

    /// Display name: `name`, else the feed id.
    pub fn feed_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixture::FEED_INI;

    fn parse(source: &str) -> FeedConfig {
        FeedConfig::parse(Path::new("configs/feed.ini"), source).unwrap()
    }

    #[test]
    fn test_lookup_with_defaults() {
        let config = parse(FEED_INI);
        assert_eq!(config.feed_ids().collect::<Vec<_>>(), ["feed-one", "feed-two", "feed-three"]);
        assert_eq!(config.get_feed_config("feed-one", "name").as_deref(), Some("Feed One"));
        assert_eq!(config.get_feed_config("feed-two", "name"), None);
        assert_eq!(config.get_feed_config("feed-two", "filename").as_deref(), Some("feed.xml"));
        assert_eq!(config.get_feed_config("feed-two", "limit").as_deref(), Some("50"));
        assert_eq!(config.get_feed_config("missing", "source_path").as_deref(), Some("/"));
        assert_eq!(config.get_feed_config("feed-one", "colour"), None);
    }

    #[test]
    fn test_items_expression_is_verbatim() {
        let config = parse(FEED_INI);
        assert_eq!(
            config.get_feed_config("feed-three", "items").as_deref(),
            Some("site.query('/custom-blog').filter(F._model == 'custom-blog-post')")
        );
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let config = parse("[a]\nname =\nfilename = \n");
        assert_eq!(config.get_feed_config("a", "name"), None);
        assert_eq!(config.get_feed_config("a", "filename").as_deref(), Some("feed.xml"));
    }

    #[test]
    fn test_settings() {
        let settings = parse(FEED_INI).settings().unwrap();
        assert_eq!(settings.len(), 3);

        let two = &settings[1];
        assert_eq!(two.feed_name(), "feed-two");
        assert_eq!(two.source_path, "/typical-blog2");
        assert_eq!(two.limit, 50);
        assert_eq!(two.item_date_field, "pub_date");

        let three = &settings[2];
        assert_eq!(three.feed_name(), "Feed Three");
        assert_eq!(three.url_path.as_deref(), Some("/custom-blog/atom.xml"));
        assert_eq!(three.item_model.as_deref(), Some("custom-blog-post"));
    }

    #[test]
    fn test_invalid_limits_are_all_reported() {
        let err = parse("[a]\nlimit = many\n[b]\nlimit = -1\n[c]\n")
            .settings()
            .unwrap_err();
        match err {
            ConfigError::Diagnostics(diag) => {
                let fields: Vec<_> = diag.errors().iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, ["a.limit", "b.limit"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_paths_leaving_the_output_are_rejected() {
        let err = parse("[a]\nurl_path = ../escaped.xml\n[b]\nfilename = ../../x.xml\n[c]\nurl_path = /ok/feed.xml\n")
            .settings()
            .unwrap_err();
        let ConfigError::Diagnostics(diag) = err else {
            panic!("unexpected error: {err}");
        };
        let fields: Vec<_> = diag.errors().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["a.url_path", "b.filename"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = FeedConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.feed_ids().count(), 0);
    }

    #[test]
    fn test_malformed_file() {
        let result = FeedConfig::parse(Path::new("feed.ini"), "[unterminated\nname = x\n");
        assert!(matches!(result, Err(ConfigError::Ini(..))));
    }
}
