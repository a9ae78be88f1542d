//! Shared test utilities for the inkpress test suite.
//!
//! Provides an inline site fixture (templates, posts, a nested page tree with
//! context files) plus small lookup helpers over the scanned [`Site`].
//!
//! All fixture content carries explicit posted markers so tests never depend
//! on the wall clock.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tera::Tera;

use crate::content::ContentItem;
use crate::scan::Site;

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Build a complete source tree in a temp directory:
///
/// ```text
/// <tmp>/
/// ├── _templates/{post,page,about,index}.html
/// ├── _posts/
/// │   ├── hello.md       posted 1600000000 (2020-09-13)
/// │   ├── older.md       posted 1500000000 (2017-07-14)
/// │   ├── _unlisted.md   posted 1550000000
/// │   └── __draft.md     posted 1650000000
/// ├── index.json         {"site_name": ..., "tagline": "root"}
/// ├── about.md           posted 1400000000, own about.json overriding tagline
/// └── docs/
///     ├── index.md       posted 1300000000
///     ├── index.json     {"tagline": "docs"}
///     ├── setup.md       posted 1200000000
///     ├── _notes.md      posted 1250000000, unlisted tree page
///     └── __wip.md       posted 1100000000, draft tree page
/// ```
pub fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_file(
        &root.join("_templates/post.html"),
        "<article><h1>{{ post.title }}</h1>\n{{ post.body | safe }}</article>\n",
    );
    write_file(
        &root.join("_templates/page.html"),
        "{{ page.title }}|{% if tagline is defined %}{{ tagline }}{% endif %}|\
         {% if pages is defined %}{% for p in pages %}{{ p.url | safe }},{% endfor %}{% endif %}\n\
         {{ page.body | safe }}",
    );
    write_file(
        &root.join("_templates/about.html"),
        "ABOUT:{{ page.title }}:{{ site }}\n",
    );
    write_file(
        &root.join("_templates/index.html"),
        "{% for p in latest %}{{ p.url | safe }};{% endfor %}|{% for p in pages %}{{ p.url | safe }};{% endfor %}",
    );

    write_file(
        &root.join("_posts/hello.md"),
        "Hello World\n**hi**\n\n<!-- posted: 1600000000 -->\n",
    );
    write_file(
        &root.join("_posts/older.md"),
        "Older Post\nolder body\n\n<!-- posted: 1500000000 -->\n",
    );
    write_file(
        &root.join("_posts/_unlisted.md"),
        "Unlisted\nquiet\n\n<!-- posted: 1550000000 -->\n",
    );
    write_file(
        &root.join("_posts/__draft.md"),
        "Draft\nwip\n\n<!-- posted: 1650000000 -->\n",
    );

    write_file(
        &root.join("index.json"),
        r#"{"site_name": "Fixture Site", "tagline": "root"}"#,
    );
    write_file(
        &root.join("about.md"),
        "About\nabout body\n\n<!-- posted: 1400000000 -->\n",
    );
    write_file(&root.join("about.json"), r#"{"tagline": "about-page"}"#);

    write_file(
        &root.join("docs/index.md"),
        "Docs\ndocs home\n\n<!-- posted: 1300000000 -->\n",
    );
    write_file(&root.join("docs/index.json"), r#"{"tagline": "docs"}"#);
    write_file(
        &root.join("docs/setup.md"),
        "Setup\nsetup body\n\n<!-- posted: 1200000000 -->\n",
    );
    write_file(
        &root.join("docs/_notes.md"),
        "Notes\nscratch\n\n<!-- posted: 1250000000 -->\n",
    );
    write_file(
        &root.join("docs/__wip.md"),
        "Wip Page\nhalf done\n\n<!-- posted: 1100000000 -->\n",
    );

    tmp
}

/// Load the fixture's templates directory into a Tera instance.
pub fn fixture_tera(root: &Path) -> Tera {
    Tera::new(&format!("{}/_templates/**/*.html", root.display())).unwrap()
}

/// Find an item by URL. Panics with the available URLs on a miss.
pub fn find_item<'a>(site: &'a Site, url: &str) -> &'a ContentItem {
    site.items.iter().find(|i| i.url == url).unwrap_or_else(|| {
        let urls: Vec<&str> = site.items.iter().map(|i| i.url.as_str()).collect();
        panic!("item '{url}' not found. Available: {urls:?}")
    })
}

/// All item URLs in site order (reverse-chronological).
pub fn item_urls(site: &Site) -> Vec<&str> {
    site.items.iter().map(|i| i.url.as_str()).collect()
}
