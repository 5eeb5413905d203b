//! Build artifacts: one output file each.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::UrlPath;

/// Output file declared by a build program.
#[derive(Debug, Clone)]
pub struct Artifact {
    name: UrlPath,
    sources: Vec<PathBuf>,
    buffer: Vec<u8>,
}

impl Artifact {
    /// Artifact served at `name`, built from `sources`.
    pub fn new(name: UrlPath, sources: Vec<PathBuf>) -> Self {
        Self {
            name,
            sources,
            buffer: Vec::new(),
        }
    }

    /// URL the artifact is served at.
    #[inline]
    pub fn name(&self) -> &UrlPath {
        &self.name
    }

    /// Files declared when the artifact was produced.
    #[inline]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Destination below `output_dir`; directory URLs get an `index.html`.
    pub fn dst_path(&self, output_dir: &Path) -> PathBuf {
        let rel = self.name.as_str().trim_start_matches('/');
        let mut dst = output_dir.join(rel);
        if self.name.is_page_url() {
            dst.push("index.html");
        }
        dst
    }

    /// Write the buffer to its destination, creating parent directories.
    ///
    /// Names with `..` segments are refused so nothing lands outside
    /// `output_dir`.
    pub fn save(&self, output_dir: &Path) -> io::Result<PathBuf> {
        if self.name.as_str().split('/').any(|segment| segment == "..") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("`{}` points outside the output directory", self.name),
            ));
        }
        let dst = self.dst_path(output_dir);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dst, &self.buffer)?;
        Ok(dst)
    }
}
