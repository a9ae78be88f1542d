//! Front page selection: the capped "latest" lists.
//!
//! Pure selection over the already-sorted item list — no I/O, no rendering.
//! The renderer feeds the result to the front page template as the `latest`
//! and `pages` variables.

use crate::content::{ContentItem, Kind};

/// The two capped lists shown on the front page, in reverse-chronological
/// order.
#[derive(Debug)]
pub struct FrontPageLists<'a> {
    /// Latest listed posts, at most the configured post cap.
    pub latest: Vec<&'a ContentItem>,
    /// Latest listed pages and indexes, at most the configured page cap.
    pub pages: Vec<&'a ContentItem>,
}

/// Select the front page lists from the full reverse-chronological item list.
///
/// Unlisted items (and therefore drafts) are skipped regardless of recency.
/// Iteration stops as soon as both caps are reached, preserving relative
/// order within each list.
pub fn front_page_lists(
    items: &[ContentItem],
    post_cap: usize,
    page_cap: usize,
) -> FrontPageLists<'_> {
    let mut latest = Vec::new();
    let mut pages = Vec::new();

    for item in items {
        if latest.len() >= post_cap && pages.len() >= page_cap {
            break;
        }
        if !item.is_listed {
            continue;
        }
        match item.kind {
            Kind::Post if latest.len() < post_cap => latest.push(item),
            Kind::Page | Kind::Index if pages.len() < page_cap => pages.push(item),
            _ => {}
        }
    }

    FrontPageLists { latest, pages }
}
