//! Project configuration management for `project.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── model      # [models.<name>]
//! │   ├── paths      # [paths]
//! │   └── project    # [project]
//! ├── types/         # Utility types
//! │   └── error      # ConfigError, ConfigDiagnostics
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section             | Purpose                                   |
//! |---------------------|-------------------------------------------|
//! | `[project]`         | Project name, id and public base URL      |
//! | `[paths]`           | Content, output and plugin config dirs    |
//! | `[models.<name>]`   | Field types and label field of a model    |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{FieldType, ModelSection, PathsSection, ProjectSection};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::{cli::Cli, warn};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use url::Url;

/// Model used for records that declare none.
static DEFAULT_MODEL: LazyLock<ModelSection> = LazyLock::new(ModelSection::default);

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing project.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Project identity
    #[serde(default)]
    pub project: ProjectSection,

    /// Project directories
    #[serde(default)]
    pub paths: PathsSection,

    /// Content models keyed by name
    #[serde(default)]
    pub models: FxHashMap<String, ModelSection>,
}

impl ProjectConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config).with_context(|| {
            format!(
                "Config file '{}' not found in this directory or any parent",
                cli.config.display()
            )
        })?;

        let mut config = Self::open(&config_path)?;
        config.apply_cli_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and finalize the config file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let mut config = Self::from_path(path)?;
        let config_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Failed to get current working directory")?
                .join(path)
        };
        config.finalize(config_path);
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        warn!("config"; "unknown fields in {} are ignored: {}", display_path, fields.join(", "));
    }

    /// Set root from the config location and make all paths absolute.
    fn finalize(&mut self, config_path: PathBuf) {
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.config_path = config_path;
        self.paths.normalize(&root);
        self.root = root;
    }

    /// Apply global CLI overrides.
    fn apply_cli_options(&mut self, cli: &Cli) {
        if let Some(url) = &cli.site().site_url {
            self.project.url = Some(url.clone());
        }
        if let Some(output) = &cli.output {
            self.paths.output = self.root_join(output);
        }
        if let Some(content) = &cli.content {
            self.paths.content = self.root_join(content);
        }
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.project.validate(&mut diag);

        if !self.root.as_os_str().is_empty() && !self.paths.content.is_dir() {
            diag.error_with_hint(
                "paths.content",
                format!("content directory `{}` does not exist", self.paths.content.display()),
                "create it or point `paths.content` at your content tree",
            );
        }

        for (name, model) in &self.models {
            if model.label.trim().is_empty() {
                diag.error(format!("models.{name}.label"), "label field name is empty");
            }
        }

        diag.into_result()
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Model definition by name, falling back to an empty model.
    pub fn model(&self, name: &str) -> &ModelSection {
        self.models.get(name).unwrap_or(&DEFAULT_MODEL)
    }

    /// Parsed public base URL.
    pub fn base_url(&self) -> Option<Url> {
        self.project.base_url()
    }

    /// Stable project id.
    pub fn project_id(&self) -> String {
        self.project.id()
    }
}

/// Parse a config string for tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    toml::from_str(content).expect("test config should parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.project.name, "Website");
        assert_eq!(config.project_id(), "website");
        assert!(config.base_url().is_none());
        assert_eq!(config.paths.content, PathBuf::from("content"));
        assert_eq!(config.paths.output, PathBuf::from("build"));
        assert_eq!(config.model("page").label, "title");
    }

    #[test]
    fn test_full_config() {
        let config = test_parse_config(
            r#"
[project]
name = "Blog"
url = "http://x.com/"

[paths]
output = "public"

[models.blog-post]
label = "headline"

[models.blog-post.fields]
body = "markdown"
pub_date = "date"
"#,
        );
        assert_eq!(config.project_id(), "blog");
        assert_eq!(config.base_url().unwrap().as_str(), "http://x.com/");
        assert_eq!(config.paths.output, PathBuf::from("public"));
        let model = config.model("blog-post");
        assert_eq!(model.label, "headline");
        assert_eq!(model.field_type("body"), FieldType::Markdown);
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (config, ignored) =
            ProjectConfig::parse_with_ignored("[project]\nname = \"A\"\ntheme = \"dark\"").unwrap();
        assert_eq!(config.project.name, "A");
        assert_eq!(ignored, vec!["project.theme".to_string()]);
    }

    #[test]
    fn test_open_normalizes_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("content")).unwrap();
        let path = dir.path().join("project.toml");
        std::fs::write(&path, "[project]\nname = \"Site\"\n").unwrap();

        let config = ProjectConfig::open(&path).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.paths.content, dir.path().join("content"));
        assert_eq!(config.paths.configs, dir.path().join("configs"));
        assert!(config.validate().is_ok());
        assert_eq!(
            config.root_relative(dir.path().join("content/blog")),
            PathBuf::from("content/blog")
        );
    }

    #[test]
    fn test_validate_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.toml");
        std::fs::write(&path, "").unwrap();

        let config = ProjectConfig::open(&path).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Diagnostics(_))));
    }
}
