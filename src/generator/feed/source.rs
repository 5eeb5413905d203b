//! The feed as a virtual source below its blog record.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::atom::AtomFeedProgram;
use super::config::FeedSettings;
use crate::build::{BuildProgram, VirtualSource};
use crate::content::Record;
use crate::core::{UrlPath, build_url};

/// Virtual path prefix of feeds (`/blog@atom/<feed id>`).
pub const PREFIX: &str = "atom";

/// One configured feed attached to its parent record.
#[derive(Debug, Clone)]
pub struct AtomFeedSource {
    parent: String,
    parent_url: UrlPath,
    parent_sources: Vec<PathBuf>,
    settings: Arc<FeedSettings>,
    config_file: Arc<PathBuf>,
}

impl AtomFeedSource {
    pub fn new(parent: &Record, settings: Arc<FeedSettings>, config_file: Arc<PathBuf>) -> Self {
        Self {
            parent: parent.path().to_string(),
            parent_url: parent.url_path(),
            parent_sources: parent.source_filenames(),
            settings,
            config_file,
        }
    }

    #[inline]
    pub fn feed_id(&self) -> &str {
        &self.settings.id
    }

    /// Configured `name`, else the feed id.
    pub fn feed_name(&self) -> &str {
        self.settings.feed_name()
    }

    #[inline]
    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// The `feed.ini` the settings came from.
    pub fn config_file(&self) -> &Path {
        self.config_file.as_path()
    }
}

impl VirtualSource for AtomFeedSource {
    fn path(&self) -> String {
        format!("{}@{}/{}", self.parent, PREFIX, self.feed_id())
    }

    fn parent(&self) -> &str {
        &self.parent
    }

    /// Configured `url_path`, else `filename` inside the parent's URL.
    fn url_path(&self) -> UrlPath {
        match &self.settings.url_path {
            Some(url) => UrlPath::from_asset(url),
            None => build_url(&[self.parent_url.as_str(), self.settings.filename.as_str()]),
        }
    }

    fn label(&self) -> String {
        self.feed_name().to_string()
    }

    fn source_filenames(&self) -> Vec<PathBuf> {
        self.parent_sources.clone()
    }

    fn program(&self) -> Box<dyn BuildProgram + '_> {
        Box::new(AtomFeedProgram::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixture::FEED_INI;
    use crate::content::record::fixture::record;
    use crate::generator::feed::FeedConfig;

    fn sources() -> Vec<AtomFeedSource> {
        let path = Path::new("configs/feed.ini");
        let config = FeedConfig::parse(path, FEED_INI).unwrap();
        let file = Arc::new(path.to_path_buf());
        config
            .settings()
            .unwrap()
            .into_iter()
            .map(|settings| {
                let parent = record(&settings.source_path, "blog", &[]);
                AtomFeedSource::new(&parent, Arc::new(settings), file.clone())
            })
            .collect()
    }

    #[test]
    fn test_paths_and_urls() {
        let sources = sources();
        let one = &sources[0];
        assert_eq!(one.path(), "/typical-blog@atom/feed-one");
        assert_eq!(one.parent(), "/typical-blog");
        assert_eq!(one.url_path(), "/typical-blog/feed.xml");
        assert_eq!(one.label(), "Feed One");

        let three = &sources[2];
        assert_eq!(three.url_path(), "/custom-blog/atom.xml");
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let sources = sources();
        assert_eq!(sources[1].feed_name(), "feed-two");
    }

    #[test]
    fn test_sources_are_the_parent_file() {
        let sources = sources();
        assert_eq!(
            sources[0].source_filenames(),
            [PathBuf::from("content/typical-blog/contents.lr")]
        );
    }
}
