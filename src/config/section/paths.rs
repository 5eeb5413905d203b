//! `[paths]` configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Project directories, relative to the project root until normalized.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Content tree (`contents.lr` files).
    pub content: PathBuf,
    /// Where built artifacts are written.
    pub output: PathBuf,
    /// Plugin configuration files (`feed.ini`).
    pub configs: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            content: "content".into(),
            output: "build".into(),
            configs: "configs".into(),
        }
    }
}

impl PathsSection {
    /// Make every path absolute against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for path in [&mut self.content, &mut self.output, &mut self.configs] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_absolute_paths() {
        let mut paths = PathsSection {
            output: PathBuf::from("/tmp/out"),
            ..Default::default()
        };
        paths.normalize(Path::new("/site"));
        assert_eq!(paths.content, PathBuf::from("/site/content"));
        assert_eq!(paths.output, PathBuf::from("/tmp/out"));
        assert_eq!(paths.configs, PathBuf::from("/site/configs"));
    }
}
