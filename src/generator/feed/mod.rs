//! Atom feeds for blog-like records.
//!
//! # Module Structure
//!
//! ```text
//! feed/
//! ├── config.rs   # configs/feed.ini -> FeedSettings
//! ├── source.rs   # AtomFeedSource (virtual source `<blog>@atom/<id>`)
//! ├── fields.rs   # entry accessors, get_id
//! └── atom.rs     # build program writing the Atom document
//! ```
//!
//! The plugin registers an `atom` virtual path resolver and a generator
//! that attaches every configured feed to the record at its `source_path`.

mod atom;
mod config;
mod fields;
mod source;

use config::{CONFIG_FILE, FeedConfig, FeedSettings};
use source::{AtomFeedSource, PREFIX};

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::build::{Environment, Plugin, VirtualSource};
use crate::content::Record;
use crate::content::expr::ExprError;
use crate::debug;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("body field `{field}` not found in `{record}`")]
    MissingBody { field: String, record: String },

    #[error(transparent)]
    Items(#[from] ExprError),
}

/// Feeds configured for a project, shared by the resolver and the generator.
#[derive(Debug)]
struct Feeds {
    config_file: Arc<PathBuf>,
    settings: Vec<Arc<FeedSettings>>,
}

impl Feeds {
    fn source(&self, parent: &Record, settings: &Arc<FeedSettings>) -> Box<dyn VirtualSource> {
        Box::new(AtomFeedSource::new(
            parent,
            settings.clone(),
            self.config_file.clone(),
        ))
    }

    /// Feed `id` when it is configured for `parent`.
    fn resolve(&self, parent: &Record, pieces: &[&str]) -> Option<Box<dyn VirtualSource>> {
        let [id] = pieces else {
            return None;
        };
        self.settings
            .iter()
            .find(|s| s.id == *id && s.source_path == parent.path())
            .map(|s| self.source(parent, s))
    }

    /// Every feed whose `source_path` is `parent`.
    fn generate(&self, parent: &Record) -> Vec<Box<dyn VirtualSource>> {
        self.settings
            .iter()
            .filter(|s| s.source_path == parent.path())
            .map(|s| self.source(parent, s))
            .collect()
    }
}

/// Atom feed plugin.
#[derive(Debug, Default)]
pub struct FeedPlugin;

impl Plugin for FeedPlugin {
    fn name(&self) -> &str {
        "feed"
    }

    fn setup_env(&self, env: &mut Environment) -> Result<()> {
        let path = env.config().paths.configs.join(CONFIG_FILE);
        let config = FeedConfig::load(&path)?;
        let feeds = Arc::new(Feeds {
            config_file: Arc::new(path),
            settings: config.settings()?.into_iter().map(Arc::new).collect(),
        });
        debug!("feed"; "{} feed(s) configured", feeds.settings.len());

        let resolver = feeds.clone();
        env.add_virtual_path_resolver(PREFIX, move |record, pieces| resolver.resolve(record, pieces));
        env.add_generator(move |record| feeds.generate(record));
        Ok(())
    }
}
