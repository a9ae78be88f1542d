//! The content model: one loaded source file and all derived rendering data.
//!
//! A [`ContentItem`] is a plain immutable value object. Every derived field —
//! draft/listed flags, kind, URL — is computed once when the loader constructs
//! the item; nothing is recomputed lazily and nothing mutates after the
//! context layering in [`crate::scan`] completes.
//!
//! ## Naming conventions
//!
//! The filename stem carries visibility, the same convention for posts and
//! tree pages:
//!
//! - `hello.md` — published and listed
//! - `_unlisted.md` — published (rendered to disk) but omitted from listings
//! - `__draft.md` — draft: never rendered anywhere
//!
//! ## URL rules
//!
//! - Posts: `{yyyy}/{mm}/{dd}/{stem}.html` from the posted time, zero-padded
//!   so generated trees sort lexically.
//! - Tree pages: `/` + source-relative path with the extension swapped to
//!   `.html`.
//! - Directory indexes: the directory's own URL (`/docs/`), written to
//!   `docs/index.html` so the directory path serves the index.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Filename stem prefix marking a draft (never rendered).
pub const DRAFT_PREFIX: &str = "__";
/// Filename stem prefix marking hidden-from-listings content.
pub const HIDDEN_PREFIX: &str = "_";

/// What a content file is, which decides its URL shape and default template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Flat posts-directory entry with a dated URL.
    Post,
    /// Tree page, output mirrors the source tree.
    Page,
    /// Directory index page, served at the directory's own URL.
    Index,
}

/// One discovered source file with all derived rendering metadata.
///
/// Constructed once per run by the loader, never mutated afterwards. The
/// `template` and `context` fields are render-side wiring and stay out of the
/// serialized form templates see.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    /// First line of the source file.
    pub title: String,
    /// Remaining content, converted to HTML.
    pub body: String,
    /// Authoritative first-published time, from the persisted marker.
    pub posted_at: DateTime<Utc>,
    /// Location of the source file.
    pub source_path: PathBuf,
    /// Resolved template name, ready for lookup by the renderer.
    #[serde(skip)]
    pub template: String,
    /// Never rendered when true.
    pub is_draft: bool,
    /// Omitted from listings when false (drafts are always unlisted).
    pub is_listed: bool,
    pub kind: Kind,
    /// Site-relative URL, see the module docs for the per-kind rules.
    pub url: String,
    /// Layered key-value context exposed to the template at top level.
    #[serde(skip)]
    pub context: serde_json::Map<String, serde_json::Value>,
}

/// Lightweight serializable view of an item, used in navigation entries and
/// the index page's `pages` variable.
#[derive(Debug, Clone, Serialize)]
pub struct PageRef {
    pub title: String,
    pub url: String,
    pub posted_at: DateTime<Utc>,
}

impl ContentItem {
    /// Derive draft/listed flags from a filename stem.
    pub fn stem_flags(stem: &str) -> (bool, bool) {
        let is_draft = stem.starts_with(DRAFT_PREFIX);
        let is_listed = !stem.starts_with(HIDDEN_PREFIX);
        (is_draft, is_listed)
    }

    /// Template variable name the item is bound under.
    pub fn binding(&self) -> &'static str {
        match self.kind {
            Kind::Post => "post",
            Kind::Page | Kind::Index => "page",
        }
    }

    /// Where the rendered file lands under the output root.
    ///
    /// Pure function of the URL: directory URLs (trailing slash) get an
    /// `index.html` appended.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        let rel = self.url.trim_start_matches('/');
        if rel.is_empty() || rel.ends_with('/') {
            output_root.join(rel).join("index.html")
        } else {
            output_root.join(rel)
        }
    }

    pub fn summary(&self) -> PageRef {
        PageRef {
            title: self.title.clone(),
            url: self.url.clone(),
            posted_at: self.posted_at,
        }
    }
}

/// Dated post URL: `{yyyy}/{mm}/{dd}/{stem}.html`.
pub fn post_url(posted_at: DateTime<Utc>, stem: &str) -> String {
    format!(
        "{:04}/{:02}/{:02}/{stem}.html",
        posted_at.year(),
        posted_at.month(),
        posted_at.day()
    )
}

/// Tree page URL: `/` + relative path with the extension swapped to `.html`.
pub fn page_url(rel: &Path) -> String {
    format!("/{}", slashed(&rel.with_extension("html")))
}

/// Directory index URL: the directory's own relative path, `/` for the root.
pub fn index_url(rel_dir: &Path) -> String {
    if rel_dir.as_os_str().is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", slashed(rel_dir))
    }
}

/// Join path components with forward slashes regardless of platform.
fn slashed(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
