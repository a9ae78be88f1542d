//! Template binding and layered template context.
//!
//! ## Template resolution
//!
//! A content file binds to the first template that exists, in order:
//!
//! 1. the template matching the file's own source-relative path
//!    (`docs/setup.md` → `docs/setup.html`)
//! 2. the template matching the containing directory (`docs.html`)
//! 3. the configured default (`post.html` for posts, `page.html` otherwise)
//!
//! "Not found" is an expected outcome during the search, so lookups go through
//! [`try_resolve_template`], which returns an absence value instead of an
//! error. Only when every candidate misses is it a build-configuration defect,
//! reported fatally with the offending source path.
//!
//! ## Context layering
//!
//! Context files are JSON objects merged key-by-key, later layers overriding
//! earlier ones:
//!
//! 1. `index.json` at each directory level, root to leaf
//! 2. a sibling `{stem}.json` for the page itself
//!
//! A missing context file is an empty layer, not an error. A malformed one
//! fails the run — swallowing it would silently corrupt every page below it.

use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("cannot read context file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in context file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("context file {0} must contain a JSON object")]
    NotObject(PathBuf),
    #[error("no template found for {path} (tried {tried:?})")]
    TemplateNotFound { path: PathBuf, tried: Vec<String> },
}

/// Key-value context exposed to templates, merged across layers.
pub type ContextMap = serde_json::Map<String, serde_json::Value>;

/// Look a template up by name, as an absence value rather than an error.
pub fn try_resolve_template(tera: &Tera, name: &str) -> Option<String> {
    tera.get_template_names()
        .any(|n| n == name)
        .then(|| name.to_string())
}

/// Resolve the template for a content file: first candidate that exists wins.
///
/// An empty search result is fatal — a discovered content file with no
/// template to render it means the template tree is misconfigured.
pub fn resolve_template(
    tera: &Tera,
    candidates: &[String],
    source_path: &Path,
) -> Result<String, ContextError> {
    candidates
        .iter()
        .find_map(|name| try_resolve_template(tera, name))
        .ok_or_else(|| ContextError::TemplateNotFound {
            path: source_path.to_path_buf(),
            tried: candidates.to_vec(),
        })
}

/// Load an optional JSON context file.
///
/// Returns `Ok(None)` when the file does not exist. Anything present must
/// parse as a JSON object.
pub fn load_context_file(path: &Path) -> Result<Option<ContextMap>, ContextError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ContextError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| ContextError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    match value {
        serde_json::Value::Object(map) => Ok(Some(map)),
        _ => Err(ContextError::NotObject(path.to_path_buf())),
    }
}

/// Merge an overlay into a base context. Overlay keys override base keys.
pub fn merge(base: &mut ContextMap, overlay: ContextMap) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}
