//! The content tree: records loaded from `contents.lr` files.
//!
//! | Module     | Purpose                                           |
//! |------------|---------------------------------------------------|
//! | `record`   | One content node and tree path helpers            |
//! | `value`    | Typed field values                                |
//! | `lr`       | `contents.lr` parser                              |
//! | `load`     | Filesystem loader                                 |
//! | `query`    | Child queries: filter, order, limit               |
//! | `expr`     | `site.query('/blog')` style item expressions      |
//! | `markdown` | Markdown rendering with link rebasing             |

pub mod expr;
mod load;
pub mod lr;
pub mod markdown;
pub mod query;
pub mod record;
pub mod value;

pub use load::load;
pub use query::Query;
pub use record::{Record, normalize_path};
pub use value::FieldValue;

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Content loading and lookup errors.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to scan content directory `{0}`: {1}")]
    Walk(PathBuf, String),

    #[error("no record at `{0}`")]
    NotFound(String),
}

/// All records of a site, keyed by tree path.
#[derive(Debug, Default)]
pub struct ContentTree {
    records: BTreeMap<String, Record>,
}

impl ContentTree {
    /// Build a tree from records; child lists are derived from the paths.
    pub(crate) fn from_records(records: Vec<Record>) -> Self {
        let mut records: BTreeMap<String, Record> = records
            .into_iter()
            .map(|record| (record.path.clone(), record))
            .collect();

        // BTreeMap order is path order, so children end up sorted by id
        let links: Vec<(String, String)> = records
            .keys()
            .filter_map(|path| record::parent_of(path).map(|parent| (parent, path.clone())))
            .collect();
        for (parent, child) in links {
            if let Some(parent) = records.get_mut(&parent) {
                parent.children.push(child);
            }
        }

        Self { records }
    }

    /// Record at `path` (`blog`, `/blog` and `/blog/` are the same record).
    pub fn get(&self, path: &str) -> Option<&Record> {
        self.records.get(&normalize_path(path))
    }

    /// Like [`get`](Self::get) but failing with [`ContentError::NotFound`].
    pub fn require(&self, path: &str) -> Result<&Record, ContentError> {
        self.get(path)
            .ok_or_else(|| ContentError::NotFound(normalize_path(path)))
    }

    /// Every record in path order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Query over the visible children of `record`.
    pub fn children<'a>(&'a self, record: &'a Record) -> Query<'a> {
        Query::children(self, record)
    }

    /// Query over the visible children of the record at `path`.
    pub fn query(&self, path: &str) -> Result<Query<'_>, ContentError> {
        let record = self.require(path)?;
        Ok(Query::children(self, record))
    }
}
