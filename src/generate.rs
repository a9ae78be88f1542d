//! HTML site generation.
//!
//! Pass 2 of the build pipeline. Takes the immutable [`Site`] snapshot from
//! [`crate::scan`] and writes the rendered tree:
//!
//! ```text
//! _site/
//! ├── index.html             # Generated front page (latest posts + pages)
//! ├── 2020/09/13/hello.html  # Posts at dated URLs
//! ├── about.html             # Tree pages mirror the source tree
//! └── docs/
//!     ├── index.html         # Directory index, served at /docs/
//!     └── setup.html
//! ```
//!
//! ## Template variables
//!
//! Every render sees:
//!
//! - the item's merged context keys at top level
//! - `post` or `page` — the content item itself
//! - `site` — the configured site title
//! - `nav` — the full navigation map, identical for every page
//!
//! The front page additionally gets `latest` and `pages` from
//! [`crate::listing`].
//!
//! Drafts are skipped entirely (logged, never written). Existing output files
//! are overwritten; parent directories are created as needed. The front page
//! is rendered last, so a root `index.md` colliding with it is
//! deterministically overwritten.

use crate::config::SiteConfig;
use crate::content::ContentItem;
use crate::context;
use crate::listing;
use crate::scan::{NavMap, Site};
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render failed for {path}: {source}")]
    Render {
        path: PathBuf,
        source: tera::Error,
    },
    #[error("front page template not found: {0}")]
    MissingIndexTemplate(String),
}

/// Counters reported after a generate pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub rendered: usize,
    pub skipped_drafts: usize,
}

/// Render every item and the front page into the output root.
pub fn generate(
    tera: &Tera,
    site: &Site,
    config: &SiteConfig,
    output_root: &Path,
) -> Result<GenerateSummary, GenerateError> {
    fs::create_dir_all(output_root)?;

    let mut summary = GenerateSummary::default();
    for item in &site.items {
        match render_item(tera, item, &site.nav, config, output_root)? {
            Some(path) => {
                summary.rendered += 1;
                log::info!("rendered {}", path.display());
            }
            None => summary.skipped_drafts += 1,
        }
    }

    render_front_page(tera, site, config, output_root)?;
    summary.rendered += 1;

    Ok(summary)
}

/// Render one content item to its output path.
///
/// Returns `Ok(None)` for drafts, which are skipped without touching the
/// filesystem.
pub fn render_item(
    tera: &Tera,
    item: &ContentItem,
    nav: &NavMap,
    config: &SiteConfig,
    output_root: &Path,
) -> Result<Option<PathBuf>, GenerateError> {
    if item.is_draft {
        log::info!("skipped draft {}", item.source_path.display());
        return Ok(None);
    }

    let out = item.output_path(output_root);
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut ctx = tera::Context::new();
    for (key, value) in &item.context {
        ctx.insert(key, value);
    }
    ctx.insert("site", &config.title);
    ctx.insert("nav", nav);
    ctx.insert(item.binding(), item);

    let html = tera
        .render(&item.template, &ctx)
        .map_err(|source| GenerateError::Render {
            path: item.source_path.clone(),
            source,
        })?;
    fs::write(&out, html)?;
    Ok(Some(out))
}

/// Render the generated front page to the root `index.html`.
fn render_front_page(
    tera: &Tera,
    site: &Site,
    config: &SiteConfig,
    output_root: &Path,
) -> Result<(), GenerateError> {
    let template = context::try_resolve_template(tera, &config.index_template)
        .ok_or_else(|| GenerateError::MissingIndexTemplate(config.index_template.clone()))?;

    let lists = listing::front_page_lists(&site.items, config.latest_posts, config.latest_pages);

    let mut ctx = tera::Context::new();
    ctx.insert("site", &config.title);
    ctx.insert("nav", &site.nav);
    ctx.insert("latest", &lists.latest);
    ctx.insert("pages", &lists.pages);

    let out = output_root.join("index.html");
    let html = tera
        .render(&template, &ctx)
        .map_err(|source| GenerateError::Render {
            path: out.clone(),
            source,
        })?;
    fs::write(&out, html)?;
    log::info!("rendered {}", out.display());
    Ok(())
}
