//! Tola Feed - Atom feeds for static content trees.

mod build;
mod cli;
mod config;
mod content;
mod core;
mod generator;
mod logger;
mod utils;

use anyhow::{Context, Result};
use build::{Environment, Pad};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.site().verbose);

    let pad = open_pad(&cli)?;

    match &cli.command {
        Commands::Build { clean, .. } => cli::build::build_feeds(&pad, *clean).map(|_| ()),
        Commands::Feeds { json, .. } => cli::feeds::list_feeds(&pad, *json),
        Commands::Resolve { path, from, .. } => cli::resolve::run_resolve(&pad, path, from.as_deref()),
    }
}

/// Load config, content and plugins into a pad.
fn open_pad(cli: &Cli) -> Result<Pad> {
    let config = ProjectConfig::load(cli)?;
    let tree = content::load(&config).with_context(|| {
        format!("failed to load content from `{}`", config.paths.content.display())
    })?;

    let mut env = Environment::new(config);
    env.load_plugins(&generator::plugins())?;
    Ok(Pad::new(env, tree))
}
