//! Build host: plugin registries, virtual sources and the artifact builder.
//!
//! ```text
//! Plugin::setup_env ──► Environment { resolvers, generators }
//!                              │
//!          Pad { tree, env } ◄─┘
//!            │  get("/blog@atom/feed-one")  ──► resolver("atom")
//!            ▼
//!         Builder ── generators over every record ──► VirtualSource
//!            │                                            │
//!            └── rayon ──► BuildProgram::build_artifact(BuildContext, Artifact)
//! ```

pub mod artifact;
mod builder;
pub mod context;

pub use artifact::Artifact;
pub use builder::{BuildReport, Builder};
pub use context::BuildContext;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ProjectConfig;
use crate::content::{ContentTree, Record, normalize_path};
use crate::core::UrlPath;
use crate::debug;

// ============================================================================
// extension points
// ============================================================================

/// A plugin hooks into the environment once, before anything is built.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Register resolvers and generators.
    fn setup_env(&self, env: &mut Environment) -> Result<()>;
}

/// A build artifact with no content file of its own.
pub trait VirtualSource: fmt::Debug + Send + Sync {
    /// Addressable path, `<record>@<prefix>/<pieces>`.
    fn path(&self) -> String;

    /// Path of the record the source hangs off.
    fn parent(&self) -> &str;

    /// URL the artifact is served at.
    fn url_path(&self) -> UrlPath;

    /// Human readable name.
    fn label(&self) -> String;

    /// Files the artifact is declared to depend on.
    fn source_filenames(&self) -> Vec<PathBuf>;

    /// Program building this source.
    fn program(&self) -> Box<dyn BuildProgram + '_>;
}

/// Turns one source into artifacts.
pub trait BuildProgram {
    /// Declare the artifacts this source produces.
    fn produce_artifacts(&self) -> Vec<Artifact>;

    /// Fill one declared artifact.
    fn build_artifact(&self, ctx: &BuildContext<'_>, artifact: &mut Artifact) -> Result<()>;
}

/// Resolves the pieces after `@<prefix>/` below a record.
pub type Resolver = Arc<dyn Fn(&Record, &[&str]) -> Option<Box<dyn VirtualSource>> + Send + Sync>;

/// Yields virtual sources for a record.
pub type Generator = Arc<dyn Fn(&Record) -> Vec<Box<dyn VirtualSource>> + Send + Sync>;

// ============================================================================
// environment
// ============================================================================

/// Project configuration plus everything plugins registered.
pub struct Environment {
    config: ProjectConfig,
    plugins: Vec<String>,
    resolvers: FxHashMap<String, Resolver>,
    generators: Vec<Generator>,
}

impl Environment {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            plugins: Vec::new(),
            resolvers: FxHashMap::default(),
            generators: Vec::new(),
        }
    }

    /// Run `setup_env` of every plugin, in order.
    pub fn load_plugins(&mut self, plugins: &[Box<dyn Plugin>]) -> Result<()> {
        for plugin in plugins {
            plugin
                .setup_env(self)
                .with_context(|| format!("failed to set up plugin `{}`", plugin.name()))?;
            debug!("plugin"; "loaded {}", plugin.name());
            self.plugins.push(plugin.name().to_string());
        }
        Ok(())
    }

    /// Register the resolver for `record@<prefix>/...` paths.
    pub fn add_virtual_path_resolver<F>(&mut self, prefix: &str, resolver: F)
    where
        F: Fn(&Record, &[&str]) -> Option<Box<dyn VirtualSource>> + Send + Sync + 'static,
    {
        self.resolvers.insert(prefix.to_string(), Arc::new(resolver));
    }

    /// Register a generator run over every record.
    pub fn add_generator<F>(&mut self, generator: F)
    where
        F: Fn(&Record) -> Vec<Box<dyn VirtualSource>> + Send + Sync + 'static,
    {
        self.generators.push(Arc::new(generator));
    }

    #[inline]
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("plugins", &self.plugins)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .field("generators", &self.generators.len())
            .finish()
    }
}

// ============================================================================
// pad
// ============================================================================

/// Something addressable through the pad.
#[derive(Debug)]
pub enum Node<'a> {
    Record(&'a Record),
    Virtual(Box<dyn VirtualSource>),
}

impl Node<'_> {
    pub fn path(&self) -> String {
        match self {
            Self::Record(record) => record.path().to_string(),
            Self::Virtual(source) => source.path(),
        }
    }

    pub fn url_path(&self) -> UrlPath {
        match self {
            Self::Record(record) => record.url_path(),
            Self::Virtual(source) => source.url_path(),
        }
    }
}

/// Lookup over the content tree and plugin-provided virtual paths.
#[derive(Debug)]
pub struct Pad {
    tree: ContentTree,
    env: Environment,
}

impl Pad {
    pub fn new(env: Environment, tree: ContentTree) -> Self {
        Self { tree, env }
    }

    #[inline]
    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    #[inline]
    pub fn config(&self) -> &ProjectConfig {
        self.env.config()
    }

    /// Record or virtual source at `path`.
    pub fn get(&self, path: &str) -> Option<Node<'_>> {
        if path.contains('@') {
            self.get_virtual(path).map(Node::Virtual)
        } else {
            self.tree.get(path).map(Node::Record)
        }
    }

    /// Virtual source at `record@prefix/piece/...`.
    ///
    /// `None` when the record, the prefix or the resolver's answer is missing.
    pub fn get_virtual(&self, path: &str) -> Option<Box<dyn VirtualSource>> {
        let (record_path, virtual_path) = path.split_once('@')?;
        let record = self.tree.get(&normalize_path(record_path))?;

        let mut pieces = virtual_path.trim_matches('/').split('/');
        let prefix = pieces.next()?;
        let pieces: Vec<&str> = pieces.collect();

        let resolver = self.env.resolvers.get(prefix)?;
        resolver(record, &pieces)
    }

    /// Every virtual source the generators produce, in record order.
    pub fn generate_sources(&self) -> Vec<Box<dyn VirtualSource>> {
        self.tree
            .records()
            .flat_map(|record| self.env.generators.iter().flat_map(move |g| g(record)))
            .collect()
    }
}
