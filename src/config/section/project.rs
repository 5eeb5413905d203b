//! `[project]` configuration.
//!
//! Project identity: display name, stable id and the public base URL.

use crate::config::ConfigDiagnostics;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Display name of the project.
    pub name: String,

    /// Stable project id. Derived from `name` when omitted.
    pub id: Option<String>,

    /// Public base URL (e.g., "https://example.com/blog/").
    pub url: Option<String>,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: "Website".into(),
            id: None,
            url: None,
        }
    }
}

impl ProjectSection {
    /// Project id: explicit `id`, else a slug of `name`.
    pub fn id(&self) -> String {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => crate::config::util::slugify(&self.name),
        }
    }

    /// Parsed base URL, if one is configured.
    ///
    /// `validate` rejects unparseable values, so `None` here means unset.
    pub fn base_url(&self) -> Option<Url> {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .and_then(|u| Url::parse(u.trim()).ok())
    }

    /// Validate project configuration.
    ///
    /// # Checks
    /// - `url` must be an absolute URL with scheme (e.g., `https://example.com`)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
            return;
        };
        match Url::parse(url) {
            Ok(parsed) if parsed.cannot_be_a_base() => {
                diag.error("project.url", format!("`{url}` cannot be used as a base URL"));
            }
            Ok(_) => {}
            Err(e) => diag.error_with_hint(
                "project.url",
                format!("`{url}` is not a valid URL: {e}"),
                "use an absolute URL such as \"https://example.com/\"",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_defaults_to_slug_of_name() {
        let section = ProjectSection {
            name: "My Blog".into(),
            ..Default::default()
        };
        assert_eq!(section.id(), "my-blog");
    }

    #[test]
    fn test_explicit_id_wins() {
        let section = ProjectSection {
            id: Some("site-42".into()),
            ..Default::default()
        };
        assert_eq!(section.id(), "site-42");
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let section = ProjectSection {
            url: Some("not a url".into()),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        section.validate(&mut diag);
        assert!(!diag.is_empty());
        assert!(section.base_url().is_none());
    }

    #[test]
    fn test_base_url() {
        let section = ProjectSection {
            url: Some("http://x.com/".into()),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        section.validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(section.base_url().unwrap().as_str(), "http://x.com/");
    }
}
