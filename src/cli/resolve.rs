//! `resolve` command: look up a record or virtual path.

use anyhow::{Result, anyhow};

use crate::build::Pad;
use crate::core::make_relative_url;
use crate::debug;

/// URL of `path`, absolute under the project URL, or relative to the
/// record at `from`.
pub fn resolve_url(pad: &Pad, path: &str, from: Option<&str>) -> Result<String> {
    let node = pad
        .get(path)
        .ok_or_else(|| anyhow!("nothing found at `{path}`"))?;
    debug!("resolve"; "`{}` is {}", path, node.path());

    match from {
        Some(from) => {
            let base = pad.tree().require(from)?;
            Ok(make_relative_url(&base.url_path(), &node.url_path()))
        }
        None => Ok(crate::core::make_external_url(
            pad.config().base_url().as_ref(),
            &node.url_path(),
        )),
    }
}

/// Print what `path` resolves to.
pub fn run_resolve(pad: &Pad, path: &str, from: Option<&str>) -> Result<()> {
    let url = resolve_url(pad, path, from)?;
    println!("{url}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::feed::fixture::site;

    #[test]
    fn test_resolve_virtual_path() {
        let (_dir, pad) = site();
        assert_eq!(
            resolve_url(&pad, "/typical-blog@atom/feed-one", None).unwrap(),
            "http://x.com/typical-blog/feed.xml"
        );
        assert_eq!(
            resolve_url(&pad, "/typical-blog@atom/feed-one", Some("/typical-blog/post1")).unwrap(),
            "../../typical-blog/feed.xml"
        );
    }

    #[test]
    fn test_resolve_record() {
        let (_dir, pad) = site();
        assert_eq!(
            resolve_url(&pad, "custom-blog/post2", Some("/")).unwrap(),
            "custom-blog/post2/"
        );
    }

    #[test]
    fn test_resolve_missing() {
        let (_dir, pad) = site();
        assert!(resolve_url(&pad, "/typical-blog@atom/nope", None).is_err());
        assert!(resolve_url(&pad, "/typical-blog", Some("/nope")).is_err());
    }
}
