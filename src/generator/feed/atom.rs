//! Atom 1.0 document for one feed source.

use anyhow::Result;
use atom_syndication::{
    ContentBuilder, Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime, GeneratorBuilder, Link,
    LinkBuilder, PersonBuilder, Text,
};
use chrono::Utc;

use super::fields::{get_id, get_item_author, get_item_body, get_item_title, get_item_updated, project_id};
use super::FeedError;
use super::source::AtomFeedSource;
use crate::build::{Artifact, BuildContext, BuildProgram, VirtualSource};
use crate::content::{Query, Record, expr};
use crate::debug;

const GENERATOR: &str = "Tola Feed Plugin";
const GENERATOR_URI: &str = env!("CARGO_PKG_REPOSITORY");

/// Build program of [`AtomFeedSource`].
pub struct AtomFeedProgram<'a> {
    source: &'a AtomFeedSource,
}

impl<'a> AtomFeedProgram<'a> {
    pub fn new(source: &'a AtomFeedSource) -> Self {
        Self { source }
    }

    /// Items of the feed, newest first, capped at `limit`.
    fn items<'t>(&self, ctx: &BuildContext<'t>, blog: &'t Record) -> Result<Query<'t>, FeedError> {
        let settings = self.source.settings();
        let tree = ctx.pad().tree();

        let query = match &settings.items {
            Some(items) => expr::evaluate(items, tree, blog)?,
            None => tree.children(blog),
        };
        ctx.record_dependencies(query.source_files());

        let query = match &settings.item_model {
            Some(model) => query.filter_model(model),
            None => query,
        };
        Ok(query
            .order_by(&format!("-{}", settings.item_date_field))
            .limit(settings.limit))
    }

    fn entry(&self, ctx: &BuildContext<'_>, item: &Record, seed: &str, blog_author: &str) -> Result<Entry> {
        let settings = self.source.settings();
        let url = ctx.url_to(&item.url_path(), true);
        let body = get_item_body(ctx, item, &settings.item_body_field)?;
        let author = get_item_author(item, &settings.item_author_field, blog_author);

        let mut entry = EntryBuilder::default();
        entry
            .title(Text::plain(get_item_title(item, &settings.item_title_field)))
            .id(get_id(&format!("{seed}/{}", item.path())))
            .updated(get_item_updated(item, &settings.item_date_field))
            .links(vec![alternate(url.clone())])
            .content(Some(
                ContentBuilder::default()
                    .base(Some(url))
                    .value(Some(body))
                    .content_type(Some("html".to_string()))
                    .build(),
            ));
        if !author.is_empty() {
            entry.authors(vec![PersonBuilder::default().name(author).build()]);
        }
        Ok(entry.build())
    }
}

impl BuildProgram for AtomFeedProgram<'_> {
    fn produce_artifacts(&self) -> Vec<Artifact> {
        vec![Artifact::new(
            self.source.url_path(),
            self.source.source_filenames(),
        )]
    }

    fn build_artifact(&self, ctx: &BuildContext<'_>, artifact: &mut Artifact) -> Result<()> {
        let pad = ctx.pad();
        let settings = self.source.settings();
        ctx.record_dependency(self.source.config_file());

        let blog = pad.tree().require(self.source.parent())?;
        let seed = project_id(pad.config());

        let subtitle = match blog.get(&settings.blog_summary_field) {
            Some(summary) if summary.is_markup() => Text::html(ctx.render_html(blog, summary)),
            Some(summary) => Text::plain(summary.to_string()),
            None => Text::plain(String::new()),
        };
        let blog_author = blog
            .get(&settings.blog_author_field)
            .map(|v| v.to_string())
            .unwrap_or_default();

        let entries = self
            .items(ctx, blog)?
            .iter()
            .map(|item| self.entry(ctx, item, &seed, &blog_author))
            .collect::<Result<Vec<_>>>()?;

        let updated: FixedDateTime = entries
            .iter()
            .map(|e| *e.updated())
            .max()
            .unwrap_or_else(|| Utc::now().fixed_offset());

        let mut feed = FeedBuilder::default();
        feed.title(Text::plain(self.source.feed_name().to_string()))
            .id(get_id(&seed))
            .updated(updated)
            .subtitle(Some(subtitle))
            .links(vec![
                alternate(ctx.url_to(&blog.url_path(), true)),
                LinkBuilder::default()
                    .href(ctx.url_to(artifact.name(), true))
                    .rel("self".to_string())
                    .build(),
            ])
            .generator(Some(
                GeneratorBuilder::default()
                    .value(GENERATOR)
                    .uri(Some(GENERATOR_URI.to_string()))
                    .version(Some(env!("CARGO_PKG_VERSION").to_string()))
                    .build(),
            ))
            .entries(entries);
        if !blog_author.is_empty() {
            feed.authors(vec![PersonBuilder::default().name(blog_author).build()]);
        }
        let feed: Feed = feed.build();

        debug!("atom"; "{} with {} entries", artifact.name(), feed.entries().len());
        artifact.write(feed.to_string().as_bytes());
        Ok(())
    }
}

fn alternate(href: String) -> Link {
    LinkBuilder::default()
        .href(href)
        .rel("alternate".to_string())
        .build()
}
