//! Markdown rendering with link rebasing.
//!
//! Links in a record body are written relative to the record's own URL.
//! When the HTML is embedded in another document (an Atom entry, say) the
//! links are rewritten to be relative to that document instead.

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, html};

use crate::core::{UrlPath, is_external, make_relative_url, resolve_link};

fn options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

/// Render `source` written at `owner` for a document served at `base`.
pub fn render(source: &str, owner: &UrlPath, base: &UrlPath) -> String {
    let parser = Parser::new_ext(source, options()).map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            dest_url: rebase(link_type, dest_url, owner, base),
            link_type,
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            dest_url: rebase(link_type, dest_url, owner, base),
            link_type,
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn rebase<'a>(
    link_type: LinkType,
    dest: CowStr<'a>,
    owner: &UrlPath,
    base: &UrlPath,
) -> CowStr<'a> {
    if dest.is_empty()
        || dest.starts_with('#')
        || matches!(link_type, LinkType::Email)
        || is_external(&dest)
    {
        return dest;
    }

    let resolved = resolve_link(owner, &dest);
    let (path, suffix) = match resolved.find(['?', '#']) {
        Some(idx) => resolved.split_at(idx),
        None => (resolved.as_str(), ""),
    };
    let target = UrlPath::from_asset(path);
    CowStr::from(format!("{}{suffix}", make_relative_url(base, &target)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> UrlPath {
        UrlPath::from_page(path)
    }

    #[test]
    fn test_plain_paragraph() {
        let url = page("/blog/post1/");
        assert_eq!(render("foo", &url, &url), "<p>foo</p>\n");
    }

    #[test]
    fn test_link_rebased_onto_feed() {
        let owner = page("/blog/post1/");
        let feed = UrlPath::from_asset("/blog/feed.xml");
        assert_eq!(
            render("[next](../post2/)", &owner, &feed),
            "<p><a href=\"../blog/post2/\">next</a></p>\n"
        );
    }

    #[test]
    fn test_image_and_fragment() {
        let owner = page("/blog/post1/");
        assert_eq!(
            render("![x](img.png)", &owner, &owner),
            "<p><img src=\"../../blog/post1/img.png\" alt=\"x\" /></p>\n"
        );
        assert_eq!(
            render("[s](/about/#team)", &owner, &page("/")),
            "<p><a href=\"about/#team\">s</a></p>\n"
        );
    }

    #[test]
    fn test_untouched_links() {
        let owner = page("/blog/post1/");
        let base = UrlPath::from_asset("/blog/feed.xml");
        let html = render(
            "[a](https://example.com/) [b](#top) <me@example.com>",
            &owner,
            &base,
        );
        assert!(html.contains("href=\"https://example.com/\""));
        assert!(html.contains("href=\"#top\""));
        assert!(html.contains("href=\"mailto:me@example.com\""));
    }
}
