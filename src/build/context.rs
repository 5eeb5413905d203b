//! Per-artifact build state.

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

use super::Pad;
use crate::content::{FieldValue, Record, markdown};
use crate::core::{UrlPath, make_external_url, make_relative_url};
use crate::debug;
use crate::utils::html::escape;

/// State shared by everything that runs while one artifact is built.
///
/// Holds the base URL relative links are expressed against and the set of
/// files the artifact turned out to depend on.
#[derive(Debug)]
pub struct BuildContext<'a> {
    pad: &'a Pad,
    base_url: Mutex<UrlPath>,
    dependencies: Mutex<FxHashSet<PathBuf>>,
}

impl<'a> BuildContext<'a> {
    /// Context for the artifact served at `url`.
    pub fn new(pad: &'a Pad, url: UrlPath) -> Self {
        Self {
            pad,
            base_url: Mutex::new(url),
            dependencies: Mutex::new(FxHashSet::default()),
        }
    }

    #[inline]
    pub fn pad(&self) -> &'a Pad {
        self.pad
    }

    /// URL relative links are currently resolved against.
    pub fn base_url(&self) -> UrlPath {
        self.base_url.lock().clone()
    }

    /// Switch the base URL until the returned guard is dropped.
    pub fn changed_base_url(&self, url: UrlPath) -> BaseUrlGuard<'_> {
        let previous = std::mem::replace(&mut *self.base_url.lock(), url);
        BaseUrlGuard {
            ctx: self,
            previous: Some(previous),
        }
    }

    /// Note that the artifact depends on `path`.
    pub fn record_dependency(&self, path: impl AsRef<Path>) {
        self.dependencies.lock().insert(path.as_ref().to_path_buf());
    }

    pub fn record_dependencies<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut deps = self.dependencies.lock();
        deps.extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
    }

    /// Recorded dependencies, consuming the context.
    pub fn into_dependencies(self) -> FxHashSet<PathBuf> {
        self.dependencies.into_inner()
    }

    /// URL of `target` as seen from the current base URL, or as an absolute
    /// URL under the project's base URL when `external` is set.
    pub fn url_to(&self, target: &UrlPath, external: bool) -> String {
        if external {
            let base = self.pad.config().base_url();
            if base.is_none() {
                debug!("url"; "no project url configured, using site path for {}", target);
            }
            make_external_url(base.as_ref(), target)
        } else {
            make_relative_url(&self.base_url.lock(), target)
        }
    }

    /// HTML for a field of `owner`: markup is rendered, text is escaped.
    ///
    /// Markdown links are rebased from the owner's URL onto the current
    /// base URL.
    pub fn render_html(&self, owner: &Record, value: &FieldValue) -> String {
        match value {
            FieldValue::Markdown(source) => {
                markdown::render(source, &owner.url_path(), &self.base_url())
            }
            FieldValue::Html(html) => html.clone(),
            other => escape(&other.to_string()).into_owned(),
        }
    }
}

/// Restores the previous base URL on drop.
#[must_use = "the base URL is restored as soon as the guard is dropped"]
pub struct BaseUrlGuard<'c> {
    ctx: &'c BuildContext<'c>,
    previous: Option<UrlPath>,
}

impl Drop for BaseUrlGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.ctx.base_url.lock() = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Environment;
    use crate::content::ContentTree;
    use crate::content::record::fixture::record;

    fn pad(config: &str) -> Pad {
        let env = Environment::new(crate::config::test_parse_config(config));
        let tree = ContentTree::from_records(vec![record("/", "page", &[]), record("/blog", "blog", &[])]);
        Pad::new(env, tree)
    }

    #[test]
    fn test_changed_base_url_is_scoped() {
        let pad = pad("");
        let feed = UrlPath::from_asset("/blog/feed.xml");
        let ctx = BuildContext::new(&pad, feed.clone());
        {
            let _guard = ctx.changed_base_url(UrlPath::from_page("/blog/post1/"));
            assert_eq!(ctx.base_url(), "/blog/post1/");
            assert_eq!(ctx.url_to(&feed, false), "../../blog/feed.xml");
        }
        assert_eq!(ctx.base_url(), feed);
    }

    #[test]
    fn test_url_to_external() {
        let pad = pad("[project]\nurl = \"http://x.com/\"\n");
        let ctx = BuildContext::new(&pad, UrlPath::from_asset("/blog/feed.xml"));
        assert_eq!(
            ctx.url_to(&UrlPath::from_page("/blog/"), true),
            "http://x.com/blog/"
        );

        let pad = self::pad("");
        let ctx = BuildContext::new(&pad, UrlPath::default());
        assert_eq!(ctx.url_to(&UrlPath::from_page("/blog/"), true), "/blog/");
    }

    #[test]
    fn test_dependencies_are_deduplicated() {
        let pad = pad("");
        let ctx = BuildContext::new(&pad, UrlPath::default());
        ctx.record_dependency("a.lr");
        ctx.record_dependencies(["a.lr", "b.lr"]);
        let deps = ctx.into_dependencies();
        assert_eq!(deps.len(), 2);
        assert!(deps.contains(Path::new("b.lr")));
    }

    #[test]
    fn test_render_html() {
        let pad = pad("");
        let ctx = BuildContext::new(&pad, UrlPath::from_asset("/blog/feed.xml"));
        let owner = record("/blog/post1", "blog-post", &[]);

        let text = FieldValue::Text("a < b".into());
        assert_eq!(ctx.render_html(&owner, &text), "a &lt; b");

        let md = FieldValue::Markdown("[x](img.png)".into());
        let _guard = ctx.changed_base_url(owner.url_path());
        assert_eq!(
            ctx.render_html(&owner, &md),
            "<p><a href=\"../../blog/post1/img.png\">x</a></p>\n"
        );
    }
}
