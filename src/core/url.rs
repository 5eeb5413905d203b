//! URL path type and link arithmetic between site resources.
//!
//! Paths stay decoded until they are turned into external URLs.

use std::sync::Arc;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use url::Url;

/// Characters escaped inside a path segment of an external URL.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Site-absolute URL path, kept decoded.
///
/// Always starts with `/`. Record URLs end with `/`, artifact URLs such as
/// `/blog/feed.xml` do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath(Arc<str>);

impl UrlPath {
    /// Create page URL (with trailing slash). Normalizes leading/trailing slashes.
    pub fn from_page(decoded: &str) -> Self {
        let trimmed = decoded.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Self(Arc::from("/"));
        }
        Self(Arc::from(format!("/{trimmed}/")))
    }

    /// Create asset URL (no trailing slash normalization).
    pub fn from_asset(decoded: &str) -> Self {
        let trimmed = decoded.trim();
        if trimmed.is_empty() {
            return Self(Arc::from("/"));
        }
        if trimmed.starts_with('/') {
            Self(Arc::from(trimmed))
        } else {
            Self(Arc::from(format!("/{trimmed}")))
        }
    }

    /// Get the decoded URL path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode for output (percent-encode reserved and non-ASCII characters).
    pub fn to_encoded(&self) -> String {
        self.0
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Check if this is a page URL (ends with `/`).
    #[inline]
    pub fn is_page_url(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Directory part of the URL: the path itself for pages, the
    /// containing directory for files.
    ///
    /// `/blog/post/` -> `/blog/post/`, `/blog/feed.xml` -> `/blog/`
    pub fn dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..=idx],
            None => "/",
        }
    }
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for UrlPath {
    fn default() -> Self {
        Self::from_page("/")
    }
}

impl PartialEq<&str> for UrlPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for UrlPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

// ============================================================================
// URL arithmetic
// ============================================================================

/// Join URL pieces with single slashes.
///
/// A trailing slash is added when the last segment looks like a directory
/// (no `.` in it), so `["/blog/", "feed.xml"]` is `/blog/feed.xml` and
/// `["blog", "archive"]` is `/blog/archive/`.
pub fn build_url<S: AsRef<str>>(parts: &[S]) -> UrlPath {
    let segments: Vec<&str> = parts
        .iter()
        .map(|part| part.as_ref().trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect();

    if segments.is_empty() {
        return UrlPath::default();
    }

    let joined = segments.join("/");
    let last = joined.rsplit('/').next().unwrap_or_default();
    if last.contains('.') {
        UrlPath::from_asset(&joined)
    } else {
        UrlPath::from_page(&joined)
    }
}

/// Express `target` relative to `base`.
///
/// Always climbs from the base's directory to the site root and descends
/// again, so the result stays valid wherever the base document is served:
///
/// ```text
/// /blog/post1/    + /blog/feed.xml -> ../../blog/feed.xml
/// /blog/feed.xml  + /blog/post1/   -> ../blog/post1/
/// /               + /blog/         -> blog/
/// ```
pub fn make_relative_url(base: &UrlPath, target: &UrlPath) -> String {
    let depth = base.dir().split('/').filter(|s| !s.is_empty()).count();
    let rv = format!("{}{}", "../".repeat(depth), target.as_str().trim_start_matches('/'));
    if rv.is_empty() { "./".to_string() } else { rv }
}

/// Absolute URL of a site path under the configured base URL.
///
/// Without a base URL the site-absolute path is returned unchanged.
pub fn make_external_url(base_url: Option<&Url>, path: &UrlPath) -> String {
    let Some(base) = base_url else {
        return path.to_encoded();
    };

    // `join` replaces the last segment of a base without trailing slash.
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    let relative = path.to_encoded();
    match base.join(relative.trim_start_matches('/')) {
        Ok(url) => url.to_string(),
        Err(_) => relative,
    }
}

/// Check whether a link target leaves the site (`https:`, `mailto:`, `//host`).
pub fn is_external(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }
    let Some(colon) = link.find(':') else {
        return false;
    };
    let scheme = &link[..colon];
    !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve a link written inside a document at `owner` into a site path.
///
/// Query strings and fragments are carried over untouched.
pub fn resolve_link(owner: &UrlPath, link: &str) -> String {
    // Dummy host: only the path arithmetic of `join` is needed.
    let Ok(base) = Url::parse("http://site.invalid") else {
        return link.to_string();
    };
    let Ok(owner_url) = base.join(&owner.to_encoded()) else {
        return link.to_string();
    };
    match owner_url.join(link) {
        Ok(joined) => {
            let mut rv = percent_encoding::percent_decode_str(joined.path())
                .decode_utf8()
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| joined.path().to_string());
            if let Some(query) = joined.query() {
                rv.push('?');
                rv.push_str(query);
            }
            if let Some(fragment) = joined.fragment() {
                rv.push('#');
                rv.push_str(fragment);
            }
            rv
        }
        Err(_) => link.to_string(),
    }
}
