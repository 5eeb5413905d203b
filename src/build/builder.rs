//! Builds virtual sources into files under the output directory.

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::{Artifact, BuildContext, Pad, VirtualSource};
use crate::core::UrlPath;
use crate::{debug, log};

/// An artifact written to disk.
#[derive(Debug, Clone)]
pub struct BuiltArtifact {
    /// Path of the source that produced it.
    pub source: String,
    pub artifact: UrlPath,
    /// Absolute destination file.
    pub dst: PathBuf,
    /// Files the artifact depends on, relative to the project root.
    pub dependencies: BTreeSet<PathBuf>,
}

/// An artifact that could not be built.
#[derive(Debug, Clone)]
pub struct BuildFailure {
    pub source: String,
    pub artifact: UrlPath,
    pub message: String,
}

/// Outcome of a build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub built: Vec<BuiltArtifact>,
    pub failures: Vec<BuildFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(mut self, other: Self) -> Self {
        self.built.extend(other.built);
        self.failures.extend(other.failures);
        self
    }
}

/// Drives build programs for the sources of a pad.
pub struct Builder<'a> {
    pad: &'a Pad,
}

impl<'a> Builder<'a> {
    pub fn new(pad: &'a Pad) -> Self {
        Self { pad }
    }

    /// Build every source the generators produce, in parallel.
    pub fn build_all(&self) -> BuildReport {
        let sources = self.pad.generate_sources();
        debug!("build"; "{} virtual source(s)", sources.len());

        let mut report = sources
            .par_iter()
            .map(|source| self.build(source.as_ref()))
            .reduce(BuildReport::default, BuildReport::merge);

        report.built.sort_by(|a, b| a.artifact.cmp(&b.artifact));
        report.failures.sort_by(|a, b| a.artifact.cmp(&b.artifact));
        report
    }

    /// Build every artifact of one source.
    pub fn build(&self, source: &dyn VirtualSource) -> BuildReport {
        let program = source.program();
        let mut report = BuildReport::default();

        for mut artifact in program.produce_artifacts() {
            let ctx = BuildContext::new(self.pad, artifact.name().clone());
            ctx.record_dependency(&self.pad.config().config_path);
            ctx.record_dependencies(artifact.sources());

            let result = program
                .build_artifact(&ctx, &mut artifact)
                .and_then(|()| self.write(&artifact));

            match result {
                Ok(dst) => {
                    log!("build"; "{}", artifact.name());
                    report.built.push(BuiltArtifact {
                        source: source.path(),
                        artifact: artifact.name().clone(),
                        dst,
                        dependencies: self.relative_dependencies(ctx),
                    });
                }
                Err(err) => {
                    log!("error"; "{}: {:#}", artifact.name(), err);
                    report.failures.push(BuildFailure {
                        source: source.path(),
                        artifact: artifact.name().clone(),
                        message: format!("{err:#}"),
                    });
                }
            }
        }

        report
    }

    fn write(&self, artifact: &Artifact) -> anyhow::Result<PathBuf> {
        let output = &self.pad.config().paths.output;
        artifact.save(output).map_err(|err| {
            anyhow::anyhow!(
                "failed to write {}: {}",
                artifact.dst_path(output).display(),
                err
            )
        })
    }

    fn relative_dependencies(&self, ctx: BuildContext<'_>) -> BTreeSet<PathBuf> {
        let config = self.pad.config();
        ctx.into_dependencies()
            .into_iter()
            .map(|path| config.root_relative(path))
            .collect()
    }
}
