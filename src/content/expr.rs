//! Item expressions: the `items` setting of a feed.
//!
//! Supported forms (single or double quotes):
//!
//! | Expression                       | Items                          |
//! |----------------------------------|--------------------------------|
//! | `site.query('/blog')`            | children of `/blog`            |
//! | `site.get('/blog').children`     | children of `/blog`            |
//! | `this.children`                  | children of the feed's parent  |
//!
//! Each form may be followed by any number of
//! `.filter(F.<field> == '<value>')` clauses.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::record::Record;
use super::{ContentTree, Query};

#[derive(Debug, Error)]
pub enum ExprError {
    #[error("unsupported items expression `{0}`")]
    Unsupported(String),

    #[error("items expression `{expr}` refers to missing record `{path}`")]
    NotFound { expr: String, path: String },
}

static SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:site\.query\([ \t]*(?:'([^']*)'|"([^"]*)")[ \t]*\)|site\.get\([ \t]*(?:'([^']*)'|"([^"]*)")[ \t]*\)\.children|(this)\.children)"#,
    )
    .expect("valid regex")
});

static FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\.filter\([ \t]*F\.([A-Za-z_][A-Za-z0-9_]*)[ \t]*==[ \t]*(?:'([^']*)'|"([^"]*)")[ \t]*\)"#,
    )
    .expect("valid regex")
});

/// Evaluate `expr` against the tree; `this` is the record owning the setting.
pub fn evaluate<'a>(
    expr: &str,
    tree: &'a ContentTree,
    this: &'a Record,
) -> Result<Query<'a>, ExprError> {
    let unsupported = || ExprError::Unsupported(expr.to_string());
    let trimmed = expr.trim();

    let caps = SOURCE.captures(trimmed).ok_or_else(unsupported)?;
    let mut query = if caps.get(5).is_some() {
        tree.children(this)
    } else {
        let path = [1, 2, 3, 4]
            .into_iter()
            .find_map(|i| caps.get(i))
            .map(|m| m.as_str())
            .ok_or_else(unsupported)?;
        tree.query(path).map_err(|_| ExprError::NotFound {
            expr: expr.to_string(),
            path: path.to_string(),
        })?
    };

    let mut rest = trimmed[caps.get(0).map_or(0, |m| m.end())..].trim_start();
    while !rest.is_empty() {
        let filter = FILTER.captures(rest).ok_or_else(unsupported)?;
        let field = filter.get(1).map_or("", |m| m.as_str());
        let value = filter
            .get(2)
            .or_else(|| filter.get(3))
            .map_or("", |m| m.as_str());
        query = query.filter_field(field, value);
        rest = rest[filter.get(0).map_or(rest.len(), |m| m.end())..].trim_start();
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::record::fixture::record;

    fn tree() -> ContentTree {
        ContentTree::from_records(vec![
            record("/", "page", &[]),
            record("/blog", "blog", &[]),
            record("/blog/post1", "blog-post", &[]),
            record("/blog/about", "page", &[]),
            record("/news", "blog", &[]),
            record("/news/n1", "blog-post", &[]),
        ])
    }

    fn ids(query: Query<'_>) -> Vec<String> {
        query.into_iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_site_query() {
        let tree = tree();
        let this = tree.get("/news").unwrap();
        let query = evaluate("site.query('/blog')", &tree, this).unwrap();
        assert_eq!(ids(query), ["about", "post1"]);

        let query = evaluate(r#"site.query("/blog")"#, &tree, this).unwrap();
        assert_eq!(ids(query), ["about", "post1"]);
    }

    #[test]
    fn test_site_get_children() {
        let tree = tree();
        let this = tree.get("/blog").unwrap();
        let query = evaluate("  site.get('news').children ", &tree, this).unwrap();
        assert_eq!(ids(query), ["n1"]);
    }

    #[test]
    fn test_this_children() {
        let tree = tree();
        let this = tree.get("/news").unwrap();
        let query = evaluate("this.children", &tree, this).unwrap();
        assert_eq!(ids(query), ["n1"]);
    }

    #[test]
    fn test_filter_clauses() {
        let tree = tree();
        let this = tree.get("/").unwrap();
        let query = evaluate(
            "site.query('/blog').filter(F._model == 'blog-post')",
            &tree,
            this,
        )
        .unwrap();
        assert_eq!(ids(query), ["post1"]);

        let query = evaluate(
            "site.query('/blog').filter(F._model == \"page\").filter(F._id == 'nope')",
            &tree,
            this,
        )
        .unwrap();
        assert!(ids(query).is_empty());
    }

    #[test]
    fn test_missing_record() {
        let tree = tree();
        let this = tree.get("/").unwrap();
        let err = evaluate("site.query('/gone')", &tree, this).unwrap_err();
        assert!(matches!(err, ExprError::NotFound { ref path, .. } if path == "/gone"));
    }

    #[test]
    fn test_unsupported_expressions() {
        let tree = tree();
        let this = tree.get("/").unwrap();
        for expr in [
            "",
            "site.query('/blog'",
            "site.query('/blog').order_by('-pub_date')",
            "this.parent.children",
            "site.query('/blog') and more",
        ] {
            assert!(
                matches!(evaluate(expr, &tree, this), Err(ExprError::Unsupported(_))),
                "{expr} should be rejected"
            );
        }
    }
}
