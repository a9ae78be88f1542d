//! # inkpress
//!
//! A minimal static site generator for markdown blogs. Your filesystem is the
//! data source: a flat `_posts/` directory becomes a reverse-chronological
//! blog, nested directories become pages with layered context, and the first
//! line of every file is its title — no front matter, no database.
//!
//! # Architecture: Two-Pass Pipeline
//!
//! inkpress builds a site in two passes with an immutable snapshot between
//! them:
//!
//! ```text
//! 1. Scan      source/  →  Site        (discover, parse, resolve context)
//! 2. Generate  Site     →  _site/     (render every page + the front page)
//! ```
//!
//! The boundary exists because the navigation map isn't complete until the
//! whole tree has been walked — every page renders site-wide nav links, so
//! nothing can render before everything has loaded. The `Site` snapshot is
//! never mutated after the scan, which keeps the phase boundary honest and
//! makes each pass independently testable.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Pass 1 — walks the source tree, builds all content items and the navigation map |
//! | [`generate`] | Pass 2 — renders every item and the front page through Tera templates |
//! | [`metadata`] | Source file parsing: title/body split, markdown conversion, the posted marker |
//! | [`content`] | The content model: derived flags, kinds, URL and output path rules |
//! | [`context`] | Template resolution and layered JSON context merging |
//! | [`listing`] | Front page selection: capped latest-posts and listed-pages lists |
//! | [`config`] | `site.toml` loading, validation, and the documented stock config |
//!
//! # Design Decisions
//!
//! ## The Posted Marker
//!
//! A post's publication date must survive copies, touches, and checkouts, so
//! it cannot come from filesystem timestamps. On first load inkpress appends
//! an HTML comment (`<!-- posted: 1600000000 -->`) to the source file and
//! parses it back on every later load. The comment is invisible in rendered
//! output, travels with the file, and never changes once written. See
//! [`metadata`] for the two-phase parse/persist protocol.
//!
//! ## Filename Conventions Over Configuration
//!
//! Visibility lives in the filename stem: `__name.md` is a draft (never
//! rendered), `_name.md` is unlisted (rendered, but absent from every
//! listing), anything else is published and listed. No per-file config, no
//! front matter to parse.
//!
//! ## Templates Are Data
//!
//! HTML generation goes through [Tera](https://keats.github.io/tera/)
//! templates looked up by name, so a site's look is entirely in its
//! `_templates/` directory. A content file can ship its own template (matching
//! its path), a directory can ship one for all its pages, and everything else
//! falls back to `post.html`/`page.html`. Template-not-found during that
//! search is an expected absence, not an error — only a fully failed search
//! aborts the build.
//!
//! ## Fail Fast
//!
//! A missing template, an unreadable content file, or a malformed context
//! JSON aborts the whole run at the point of detection. Partial output that
//! silently dropped pages is worse than no output; the only tolerated gaps
//! are intentional ones (drafts, missing optional context files).

pub mod config;
pub mod content;
pub mod context;
pub mod generate;
pub mod listing;
pub mod metadata;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
