//! Plugins generating artifacts from the content tree.
//!
//! - **Feed**: Atom feeds for blog-like records (`feed.xml`)

pub mod feed;

use crate::build::Plugin;

/// Every built-in plugin, in setup order.
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    vec![Box::new(feed::FeedPlugin)]
}
