//! Command-line interface module.

mod args;
pub mod build;
pub mod feeds;
pub mod resolve;

pub use args::{Cli, Commands};
