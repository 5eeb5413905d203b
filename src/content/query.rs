//! Queries over the children of a record.
//!
//! A query starts from a parent's visible children and narrows them with
//! `filter`, `order_by` and `limit`:
//!
//! ```ignore
//! let items = tree
//!     .query("/blog")?
//!     .filter_model("blog-post")
//!     .order_by("-pub_date")
//!     .limit(10);
//! ```

use std::cmp::Ordering;
use std::path::PathBuf;

use super::record::Record;
use super::value::{FieldValue, compare};
use super::ContentTree;

/// Ordered selection of records below one parent.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    items: Vec<&'a Record>,
    /// Every file read while listing the children, before any filtering.
    sources: Vec<PathBuf>,
}

impl<'a> Query<'a> {
    /// Visible children of `parent`, in id order.
    pub fn children(tree: &'a ContentTree, parent: &'a Record) -> Self {
        let candidates: Vec<&'a Record> = parent
            .child_paths()
            .iter()
            .filter_map(|path| tree.get(path))
            .collect();

        let mut sources = Vec::with_capacity(candidates.len() + 1);
        sources.push(parent.source_dir().to_path_buf());
        sources.extend(candidates.iter().map(|r| r.source_file().to_path_buf()));

        Self {
            items: candidates.into_iter().filter(|r| !r.is_hidden()).collect(),
            sources,
        }
    }

    /// Keep records matching `predicate`.
    pub fn filter(mut self, predicate: impl Fn(&Record) -> bool) -> Self {
        self.items.retain(|r| predicate(r));
        self
    }

    /// Keep records of the given model.
    pub fn filter_model(self, model: &str) -> Self {
        self.filter(|r| r.model() == model)
    }

    /// Keep records whose `field` renders to `value`.
    pub fn filter_field(self, field: &str, value: &str) -> Self {
        self.filter(|r| sort_key(r, field).is_some_and(|v| v.to_string() == value))
    }

    /// Sort by comma separated keys; a leading `-` sorts that key descending.
    ///
    /// Records without the field sort before all others (after them when
    /// descending). The sort is stable.
    pub fn order_by(mut self, spec: &str) -> Self {
        let keys: Vec<(&str, bool)> = spec
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| match k.strip_prefix('-') {
                Some(field) => (field, true),
                None => (k.strip_prefix('+').unwrap_or(k), false),
            })
            .collect();

        self.items.sort_by(|a, b| {
            for (field, descending) in &keys {
                let ord = compare(sort_key(a, field).as_ref(), sort_key(b, field).as_ref());
                let ord = if *descending { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        self
    }

    /// Keep at most `n` records.
    pub fn limit(mut self, n: usize) -> Self {
        self.items.truncate(n);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.items.iter().copied()
    }

    /// Files a build must depend on after running this query: the parent
    /// directory (its listing) and every candidate record file.
    pub fn source_files(&self) -> &[PathBuf] {
        &self.sources
    }
}

impl<'a> IntoIterator for Query<'a> {
    type Item = &'a Record;
    type IntoIter = std::vec::IntoIter<&'a Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Field value used for ordering; `_id`, `_path` and `_model` are built in.
fn sort_key(record: &Record, field: &str) -> Option<FieldValue> {
    match field {
        "_id" => Some(FieldValue::Text(record.id().to_string())),
        "_path" => Some(FieldValue::Text(record.path().to_string())),
        "_model" => Some(FieldValue::Text(record.model().to_string())),
        _ => record.get(field).cloned(),
    }
}
