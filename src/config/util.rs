//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/content/blog/   ← cwd
/// /home/user/site/project.toml    ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Same as [`find_config_file`] with an explicit starting directory.
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    // First check if config_name is an absolute path
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Turn a display name into an id: ASCII-folded, lowercase, `-` separated.
///
/// `"Björn's Blog"` -> `"bjorn-s-blog"`
pub fn slugify(name: &str) -> String {
    let ascii = deunicode::deunicode(name).to_lowercase();
    ascii
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Website"), "website");
        assert_eq!(slugify("My  Blog!"), "my-blog");
        assert_eq!(slugify("Björn's Blog"), "bjorn-s-blog");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_find_config_file_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("content/blog");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("project.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("project.toml")).unwrap();
        assert_eq!(found, dir.path().join("project.toml"));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file_from(dir.path(), Path::new("nope-project.toml")).is_none());
    }
}
