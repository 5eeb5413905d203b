//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Tola feed generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file path (default: project.toml)
    #[arg(short = 'C', long, global = true, default_value = "project.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build every configured feed
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        site: SiteArgs,

        /// Remove the output directory before building
        #[arg(long)]
        clean: bool,
    },

    /// List configured feeds
    #[command(visible_alias = "f")]
    Feeds {
        #[command(flatten)]
        site: SiteArgs,

        /// Print JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Resolve a record or virtual path (e.g. `/blog@atom/feed-one`)
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        site: SiteArgs,

        /// Record path or `<record>@<prefix>/<id>` path
        path: String,

        /// Print the URL relative to this record instead of the absolute one
        #[arg(short, long, value_name = "RECORD")]
        from: Option<String>,
    },
}

/// Arguments shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct SiteArgs {
    /// Override the project URL feeds link to.
    ///
    /// Useful for CI/CD deployments where the production URL differs from local development.
    ///
    /// Example:
    ///   tola-feed build --site-url "https://example.github.io/blog/"
    #[arg(short = 'U', long = "site-url", value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Shared arguments of the chosen subcommand.
    pub fn site(&self) -> &SiteArgs {
        match &self.command {
            Commands::Build { site, .. }
            | Commands::Feeds { site, .. }
            | Commands::Resolve { site, .. } => site,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["tola-feed", "build", "--clean", "-U", "http://x.com/"]);
        assert!(matches!(cli.command, Commands::Build { clean: true, .. }));
        assert_eq!(cli.site().site_url.as_deref(), Some("http://x.com/"));
        assert_eq!(cli.config, PathBuf::from("project.toml"));
    }

    #[test]
    fn test_parse_resolve_with_alias() {
        let cli = Cli::parse_from(["tola-feed", "r", "-V", "/blog@atom/feed-one", "--from", "/blog/post1"]);
        assert!(cli.site().verbose);
        match cli.command {
            Commands::Resolve { path, from, .. } => {
                assert_eq!(path, "/blog@atom/feed-one");
                assert_eq!(from.as_deref(), Some("/blog/post1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_version_flag_is_not_verbose() {
        let err = Cli::try_parse_from(["tola-feed", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::parse_from(["tola-feed", "feeds", "--verbose"]);
        assert!(cli.site().verbose);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
