//! Filesystem loader: `content/**/contents.lr` → [`ContentTree`].

use jwalk::WalkDir;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

use super::record::{Record, normalize_path};
use super::value::{FieldValue, parse_bool};
use super::{ContentError, ContentTree, lr};
use crate::config::ProjectConfig;
use crate::{debug, warn};

const CONTENTS_FILE: &str = "contents.lr";
const DEFAULT_MODEL: &str = "page";

/// Load every record below the configured content directory.
///
/// Directories without a `contents.lr` are not records; records below
/// them stay addressable by path but are nobody's children. A missing root
/// gets an empty record so top-level sections stay reachable.
pub fn load(config: &ProjectConfig) -> Result<ContentTree, ContentError> {
    let content_dir = &config.paths.content;
    let mut records = Vec::new();

    for entry in WalkDir::new(content_dir).sort(true) {
        let entry = entry.map_err(|e| ContentError::Walk(content_dir.clone(), e.to_string()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        let file = dir.join(CONTENTS_FILE);
        if !file.is_file() {
            continue;
        }
        let path = tree_path(content_dir, &dir);
        records.push(read_record(config, &path, &dir, &file)?);
    }

    if !records.iter().any(|r| r.path == "/") {
        debug!("content"; "no root {} in {}, using an empty root", CONTENTS_FILE, content_dir.display());
        records.push(empty_record("/", content_dir));
    }

    let tree = ContentTree::from_records(records);
    let orphans = tree
        .records()
        .filter(|r| {
            r.parent_path()
                .is_some_and(|parent| tree.get(&parent).is_none())
        })
        .count();
    if orphans > 0 {
        warn!("content"; "{} record(s) sit below directories without {} and are not listed as children", orphans, CONTENTS_FILE);
    }

    debug!("content"; "loaded {} records from {}", tree.len(), content_dir.display());
    Ok(tree)
}

/// Tree path of a record directory (`content/blog/post1` -> `/blog/post1`).
fn tree_path(content_dir: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(content_dir).unwrap_or(dir);
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    normalize_path(&joined)
}

/// Read and type one record file.
fn read_record(
    config: &ProjectConfig,
    path: &str,
    dir: &Path,
    file: &Path,
) -> Result<Record, ContentError> {
    let source = fs::read_to_string(file).map_err(|e| ContentError::Io(file.to_path_buf(), e))?;
    Ok(build_record(config, path, dir, file, &source))
}

/// Build a record from `contents.lr` source text.
pub(crate) fn build_record(
    config: &ProjectConfig,
    path: &str,
    dir: &Path,
    file: &Path,
    source: &str,
) -> Record {
    let raw = lr::parse(source);

    let system = |key: &str| {
        raw.iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let model = system("_model").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let label = system("_label");
    let hidden = system("_hidden")
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false);

    let model_config = config.model(&model);
    let mut fields = FxHashMap::default();
    for (key, value) in raw.iter().filter(|(k, _)| !k.starts_with('_')) {
        let ty = model_config.field_type(key);
        match FieldValue::parse(value, ty) {
            Some(parsed) => {
                fields.insert(key.clone(), parsed);
            }
            None => {
                warn!("content"; "{}: field `{}` is not a valid {:?}, ignoring it", path, key, ty);
            }
        }
    }

    Record {
        path: path.to_string(),
        model,
        fields,
        label,
        label_field: model_config.label.clone(),
        hidden,
        source_file: file.to_path_buf(),
        source_dir: dir.to_path_buf(),
        children: Vec::new(),
    }
}

fn empty_record(path: &str, dir: &Path) -> Record {
    Record {
        path: path.to_string(),
        model: DEFAULT_MODEL.to_string(),
        fields: FxHashMap::default(),
        label: None,
        label_field: "title".to_string(),
        hidden: false,
        source_file: dir.join(CONTENTS_FILE),
        source_dir: dir.to_path_buf(),
        children: Vec::new(),
    }
}
