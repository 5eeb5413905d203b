//! `feeds` command: list the virtual feed sources of a project.

use anyhow::Result;
use owo_colors::{Stream, Style};
use serde::Serialize;

use crate::build::Pad;
use crate::core::UrlPath;
use crate::logger::paint;

/// One generated feed as shown by `feeds`.
#[derive(Debug, Serialize)]
pub struct FeedInfo {
    pub path: String,
    pub name: String,
    pub parent: String,
    pub url_path: UrlPath,
    pub url: String,
}

/// Every feed the generators attach to the tree, in record order.
pub fn collect_feeds(pad: &Pad) -> Vec<FeedInfo> {
    let base = pad.config().base_url();
    pad.generate_sources()
        .into_iter()
        .map(|source| {
            let url_path = source.url_path();
            FeedInfo {
                path: source.path(),
                name: source.label(),
                parent: source.parent().to_string(),
                url: crate::core::make_external_url(base.as_ref(), &url_path),
                url_path,
            }
        })
        .collect()
}

/// Print the feed list as a table or as JSON.
pub fn list_feeds(pad: &Pad, json: bool) -> Result<()> {
    let feeds = collect_feeds(pad);
    if json {
        println!("{}", serde_json::to_string_pretty(&feeds)?);
        return Ok(());
    }

    if feeds.is_empty() {
        println!("no feeds configured");
        return Ok(());
    }
    for feed in &feeds {
        println!(
            "{}  {}",
            paint(&feed.path, Style::new().cyan(), Stream::Stdout),
            paint(&feed.name, Style::new().bold(), Stream::Stdout)
        );
        println!("    {}", paint(&feed.url, Style::new().dimmed(), Stream::Stdout));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::feed::fixture::site;

    #[test]
    fn test_collect_feeds() {
        let (_dir, pad) = site();
        let feeds = collect_feeds(&pad);
        let paths: Vec<&str> = feeds.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "/custom-blog@atom/feed-three",
                "/typical-blog@atom/feed-one",
                "/typical-blog2@atom/feed-two",
            ]
        );
        assert_eq!(feeds[1].url, "http://x.com/typical-blog/feed.xml");
        assert_eq!(feeds[2].name, "feed-two");
    }

    #[test]
    fn test_json_shape() {
        let (_dir, pad) = site();
        let json = serde_json::to_value(collect_feeds(&pad)).unwrap();
        assert_eq!(json[0]["url_path"], "/custom-blog/atom.xml");
        assert_eq!(json[0]["parent"], "/custom-blog");
    }
}
