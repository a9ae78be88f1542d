//! Content discovery: walks the source tree and builds the site snapshot.
//!
//! Pass 1 of the build pipeline. Produces a [`Site`] — every content item plus
//! the navigation map — which is handed to [`crate::generate`] as an immutable
//! snapshot. Nothing here writes to the output tree; the only side effect is
//! the one-time posted-marker append performed by [`crate::metadata`].
//!
//! ## Source layout
//!
//! ```text
//! site/
//! ├── site.toml             # optional config
//! ├── _posts/               # flat posts directory (non-recursive)
//! │   ├── hello.md
//! │   ├── _unlisted.md      # rendered but kept out of listings
//! │   └── __draft.md        # never rendered
//! ├── _templates/           # tera templates
//! ├── index.json            # root directory context
//! ├── about.md              # tree page → /about.html
//! ├── about.json            # page-local context overrides
//! └── docs/
//!     ├── index.md          # directory index → /docs/
//!     ├── index.json        # directory context, merged over the root's
//!     └── setup.md          # tree page → /docs/setup.html
//! ```
//!
//! ## Discovery rules
//!
//! - Content files are `.md`/`.markdown`. Entries are visited in sorted name
//!   order, so discovery order is deterministic.
//! - Directories whose name starts with `_` or `.` are not walked — that
//!   keeps `_posts`, `_templates`, and editor droppings out of the page tree.
//!   The output directory and the configured posts/templates directories are
//!   excluded by path as well, so renaming them to something without the
//!   underscore (or building into `<source>/dist`) cannot leak build
//!   artifacts or posts into the page tree.
//! - A directory with exactly one file whose stem is `index` gets that file
//!   as its index page; the rest are regular pages.
//! - Per-directory `index.json` context accumulates root → leaf; a page's
//!   sibling `{stem}.json` overrides inherited keys; an index page instead
//!   receives its listed siblings under the reserved `pages` key.
//!
//! After the walk, all items are sorted by posted time descending (stable on
//! ties, so discovery order breaks them) — the order the listing builder and
//! renderer consume.

use crate::config::SiteConfig;
use crate::content::{self, ContentItem, Kind, PageRef};
use crate::context::{self, ContextMap};
use crate::metadata::{self, ContentError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source root does not exist: {0}")]
    MissingSourceRoot(PathBuf),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Context error: {0}")]
    Context(#[from] context::ContextError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable snapshot handed from the load pass to the render pass.
#[derive(Debug)]
pub struct Site {
    /// Every discovered item, sorted by posted time descending.
    pub items: Vec<ContentItem>,
    /// Directory-keyed navigation, shared read-only across all renders.
    pub nav: NavMap,
}

/// The full navigation map, keyed by directory URL prefix (`/`, `/docs/`).
pub type NavMap = BTreeMap<String, NavEntry>;

/// One directory level: its index page (if any) and its listed pages in
/// discovery order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavEntry {
    pub index: Option<PageRef>,
    pub pages: Vec<PageRef>,
}

const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Walk the source tree and build the site snapshot.
///
/// Posts come from the flat posts directory; everything else comes from the
/// recursive tree walk. A missing source root is fatal; a missing posts
/// directory just means a site without a blog. The output root is needed here
/// so a build directory living inside the source tree is never walked as
/// content.
pub fn scan(
    source_root: &Path,
    config: &SiteConfig,
    tera: &Tera,
    output_root: &Path,
) -> Result<Site, ScanError> {
    if !source_root.is_dir() {
        return Err(ScanError::MissingSourceRoot(source_root.to_path_buf()));
    }

    // Directories the page-tree walk must never enter, by path rather than by
    // naming convention: the rendered output (a second build would otherwise
    // index its own artifacts) and the special directories under whatever
    // names they are configured with. Canonicalized so relative and absolute
    // spellings of the same directory compare equal; a path that doesn't
    // exist yet needs no exclusion.
    let mut excluded = Vec::new();
    for dir in [
        output_root.to_path_buf(),
        source_root.join(&config.posts_dir),
        source_root.join(&config.templates_dir),
    ] {
        if let Ok(canonical) = fs::canonicalize(&dir) {
            excluded.push(canonical);
        }
    }

    let mut items = Vec::new();
    let mut nav = NavMap::new();

    let posts_dir = source_root.join(&config.posts_dir);
    if posts_dir.is_dir() {
        load_posts(&posts_dir, config, tera, &mut items)?;
    } else {
        log::info!("no posts directory at {}", posts_dir.display());
    }

    scan_dir(
        source_root,
        source_root,
        config,
        tera,
        &excluded,
        &ContextMap::new(),
        &mut items,
        &mut nav,
    )?;

    items.sort_by_key(|item| std::cmp::Reverse(item.posted_at));
    log::info!("loaded {} content items", items.len());

    Ok(Site { items, nav })
}

/// Load the flat posts directory, non-recursively.
fn load_posts(
    posts_dir: &Path,
    config: &SiteConfig,
    tera: &Tera,
    items: &mut Vec<ContentItem>,
) -> Result<(), ScanError> {
    let dir_name = dir_name(posts_dir);
    for path in content_files(posts_dir)? {
        let doc = metadata::extract(&path)?;
        let stem = stem_of(&path);
        let (is_draft, is_listed) = ContentItem::stem_flags(&stem);

        let candidates = candidates(&format!("{stem}.html"), &dir_name, &config.post_template);
        let template = context::resolve_template(tera, &candidates, &path)?;

        let mut item_context = ContextMap::new();
        if let Some(local) = context::load_context_file(&path.with_extension("json"))? {
            context::merge(&mut item_context, local);
        }

        items.push(ContentItem {
            title: doc.title,
            body: doc.body_html,
            url: content::post_url(doc.posted_at, &stem),
            posted_at: doc.posted_at,
            source_path: path,
            template,
            is_draft,
            is_listed,
            kind: Kind::Post,
            context: item_context,
        });
    }
    Ok(())
}

/// Walk one directory level of the page tree, then recurse into subdirectories.
///
/// `inherited` is the merged context of all ancestor directories; each level
/// clones it, layers its own `index.json` on top, and passes the result down.
fn scan_dir(
    dir: &Path,
    root: &Path,
    config: &SiteConfig,
    tera: &Tera,
    excluded: &[PathBuf],
    inherited: &ContextMap,
    items: &mut Vec<ContentItem>,
    nav: &mut NavMap,
) -> Result<(), ScanError> {
    let rel_dir = dir.strip_prefix(root).unwrap_or(Path::new(""));
    // The source root has no containing-directory template candidate.
    let dir_name = if rel_dir.as_os_str().is_empty() {
        String::new()
    } else {
        dir_name(dir)
    };

    let mut dir_context = inherited.clone();
    if let Some(extra) = context::load_context_file(&dir.join("index.json"))? {
        context::merge(&mut dir_context, extra);
    }

    let files = content_files(dir)?;
    let (index_files, mut page_files): (Vec<_>, Vec<_>) =
        files.into_iter().partition(|p| stem_of(p) == "index");
    // Exactly one candidate makes an index page. With several (index.md and
    // index.markdown side by side) none is authoritative, so all of them
    // render as regular pages.
    let index_file = if index_files.len() == 1 {
        index_files.into_iter().next()
    } else {
        page_files.extend(index_files);
        page_files.sort();
        None
    };

    let mut page_items = Vec::new();
    for path in page_files {
        let doc = metadata::extract(&path)?;
        let stem = stem_of(&path);
        let (is_draft, is_listed) = ContentItem::stem_flags(&stem);
        let rel = path.strip_prefix(root).unwrap_or(&path);

        let candidates = candidates(&template_name(rel), &dir_name, &config.page_template);
        let template = context::resolve_template(tera, &candidates, &path)?;

        let mut item_context = dir_context.clone();
        if let Some(local) = context::load_context_file(&path.with_extension("json"))? {
            context::merge(&mut item_context, local);
        }

        page_items.push(ContentItem {
            title: doc.title,
            body: doc.body_html,
            url: content::page_url(rel),
            posted_at: doc.posted_at,
            source_path: path,
            template,
            is_draft,
            is_listed,
            kind: Kind::Page,
            context: item_context,
        });
    }

    let url_prefix = content::index_url(rel_dir);
    let page_refs: Vec<PageRef> = page_items
        .iter()
        .filter(|item| item.is_listed)
        .map(ContentItem::summary)
        .collect();

    let mut index_ref = None;
    if let Some(path) = index_file {
        let doc = metadata::extract(&path)?;
        let rel = path.strip_prefix(root).unwrap_or(&path);

        let candidates = candidates(&template_name(rel), &dir_name, &config.page_template);
        let template = context::resolve_template(tera, &candidates, &path)?;

        // The index page sees its listed siblings instead of a local context
        // file - `pages` is a reserved key.
        let mut item_context = dir_context.clone();
        item_context.insert("pages".to_string(), serde_json::to_value(&page_refs)?);

        let item = ContentItem {
            title: doc.title,
            body: doc.body_html,
            url: url_prefix.clone(),
            posted_at: doc.posted_at,
            source_path: path,
            template,
            is_draft: false,
            is_listed: true,
            kind: Kind::Index,
            context: item_context,
        };
        index_ref = Some(item.summary());
        items.push(item);
    }

    nav.insert(
        url_prefix,
        NavEntry {
            index: index_ref,
            pages: page_refs,
        },
    );
    items.append(&mut page_items);

    for sub in subdirectories(dir, excluded)? {
        scan_dir(&sub, root, config, tera, excluded, &dir_context, items, nav)?;
    }
    Ok(())
}

/// Content files in a directory, sorted by name for deterministic discovery.
fn content_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| {
                        CONTENT_EXTENSIONS
                            .iter()
                            .any(|known| ext.eq_ignore_ascii_case(known))
                    })
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Walkable subdirectories: skips `_`-prefixed and hidden directories, plus
/// anything in the excluded path list (output and special directories).
fn subdirectories(dir: &Path, excluded: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .map(|n| {
                        let name = n.to_string_lossy();
                        !name.starts_with('_') && !name.starts_with('.')
                    })
                    .unwrap_or(false)
                && fs::canonicalize(p)
                    .map(|canonical| !excluded.contains(&canonical))
                    .unwrap_or(true)
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Template search order: own path, containing directory, configured default.
fn candidates(own: &str, dir_name: &str, default: &str) -> Vec<String> {
    let mut list = vec![own.to_string()];
    if !dir_name.is_empty() {
        list.push(format!("{dir_name}.html"));
    }
    list.push(default.to_string());
    list.dedup();
    list
}

/// Path-derived template name: relative path with the extension swapped.
fn template_name(rel: &Path) -> String {
    rel.with_extension("html")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
