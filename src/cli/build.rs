//! `build` command: write every configured feed.

use anyhow::{Context, Result, bail};
use std::fs;

use crate::build::{BuildReport, Builder, Pad};
use crate::{debug, log};

/// Build all feeds of `pad`, failing when any artifact failed.
pub fn build_feeds(pad: &Pad, clean: bool) -> Result<BuildReport> {
    let output = &pad.config().paths.output;
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clean `{}`", output.display()))?;
        debug!("build"; "cleaned {}", output.display());
    }

    let report = Builder::new(pad).build_all();
    for built in &report.built {
        debug!(
            "deps"; "{} -> {} ({} dependencies)",
            built.source, built.dst.display(), built.dependencies.len()
        );
    }
    for failure in &report.failures {
        debug!("failed"; "{} ({}): {}", failure.artifact, failure.source, failure.message);
    }

    if !report.is_success() {
        bail!(
            "{} of {} feed(s) failed to build",
            report.failures.len(),
            report.failures.len() + report.built.len()
        );
    }

    log!("build"; "{} feed(s) written to {}", report.built.len(), output.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixture;
    use crate::generator::feed::fixture::open;

    #[test]
    fn test_clean_build() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write_project(dir.path());
        let stale = dir.path().join("build/stale.xml");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let report = build_feeds(&open(dir.path()), true).unwrap();
        assert_eq!(report.built.len(), 3);
        assert!(!stale.exists());
    }

    #[test]
    fn test_failures_fail_the_command() {
        let dir = tempfile::tempdir().unwrap();
        fixture::write_project(dir.path());
        fs::write(
            dir.path().join("configs/feed.ini"),
            "[broken]\nsource_path = /typical-blog\nitem_body_field = missing\n",
        )
        .unwrap();

        let err = build_feeds(&open(dir.path()), false).unwrap_err();
        assert!(err.to_string().contains("1 of 1"));
    }
}
