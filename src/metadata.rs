//! Source file parsing and posted-time extraction.
//!
//! A content file is plain markdown with one convention: the first line is the
//! title, everything after it is the body. No front matter, no headers — the
//! file itself carries its metadata.
//!
//! ## The posted marker
//!
//! A post's "first published" time must survive file copies and touches, so it
//! cannot come from filesystem timestamps. Instead it lives inside the file as
//! an HTML comment:
//!
//! ```text
//! <!-- posted: 1600000000 -->
//! ```
//!
//! On first load the marker is absent: the current time is captured and the
//! marker is appended to the source file. Every later load parses the marker
//! back out of the converted body. The comment is invisible in rendered HTML.
//!
//! The marker protocol is split into two independent operations:
//!
//! - [`parse_posted_marker`] — pure scan of the converted body
//! - [`persist_marker`] — append-only write to the source file
//!
//! [`extract_at`] composes them, re-reading the file after a persist so the
//! first build produces the same bytes as every subsequent one.

use chrono::{DateTime, Utc};
use pulldown_cmark::{Parser, html};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write posted marker to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("missing title line in {0}")]
    Malformed(PathBuf),
    #[error("posted marker in {path} is out of range: {ts}")]
    InvalidMarker { path: PathBuf, ts: i64 },
}

/// A parsed source file: title, converted body, and its authoritative
/// posted time.
#[derive(Debug, Clone)]
pub struct SourceDoc {
    pub title: String,
    pub body_html: String,
    pub posted_at: DateTime<Utc>,
}

const MARKER_OPEN: &str = "<!-- posted: ";
const MARKER_CLOSE: &str = " -->";

/// Split raw file contents into title (first line) and raw body (remainder).
///
/// Returns `None` if there is no line break to split on, or if the title
/// line is blank — both mean the file is not a content file.
pub fn split_source(raw: &str) -> Option<(&str, &str)> {
    let pos = raw.find('\n')?;
    let title = raw[..pos].trim_end_matches('\r').trim();
    if title.is_empty() {
        return None;
    }
    Some((title, &raw[pos + 1..]))
}

/// Convert a markdown body to HTML. Fenced code blocks are supported.
pub fn markdown_to_html(raw: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(raw));
    out
}

/// Find the posted marker in a converted body and parse its timestamp.
///
/// Pure function: never touches the filesystem. The first well-formed
/// marker wins.
pub fn parse_posted_marker(body_html: &str) -> Option<i64> {
    let mut rest = body_html;
    while let Some(start) = rest.find(MARKER_OPEN) {
        let after = &rest[start + MARKER_OPEN.len()..];
        if let Some(end) = after.find(MARKER_CLOSE)
            && let Ok(ts) = after[..end].trim().parse::<i64>()
        {
            return Some(ts);
        }
        rest = after;
    }
    None
}

/// Append the posted marker to a source file.
///
/// Append-only: never rewrites existing content. The leading blank line keeps
/// the comment out of any trailing markdown paragraph.
pub fn persist_marker(path: &Path, ts: i64) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new().append(true).open(path)?;
    write!(file, "\n{MARKER_OPEN}{ts}{MARKER_CLOSE}\n")
}

/// Load and parse a source file using the current wall-clock time for a
/// missing marker.
pub fn extract(path: &Path) -> Result<SourceDoc, ContentError> {
    extract_at(path, Utc::now())
}

/// Load and parse a source file, assigning `now` as the posted time when no
/// marker exists yet.
///
/// When the marker is absent it is persisted to the source file and the file
/// is re-read, so the converted body already contains the marker comment —
/// the first build and all later builds emit identical bytes.
pub fn extract_at(path: &Path, now: DateTime<Utc>) -> Result<SourceDoc, ContentError> {
    let (title, body_html) = read_and_convert(path)?;
    if let Some(ts) = parse_posted_marker(&body_html) {
        // A marker that parses but doesn't fit a DateTime is a corrupt file,
        // not a missing marker - persisting a fresh one would grow the file
        // on every build while the broken marker keeps winning the parse.
        let posted_at = timestamp(ts).ok_or(ContentError::InvalidMarker {
            path: path.to_path_buf(),
            ts,
        })?;
        return Ok(SourceDoc {
            title,
            body_html,
            posted_at,
        });
    }

    persist_marker(path, now.timestamp()).map_err(|source| ContentError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let (title, body_html) = read_and_convert(path)?;
    let posted_at = parse_posted_marker(&body_html)
        .and_then(timestamp)
        .unwrap_or(now);
    Ok(SourceDoc {
        title,
        body_html,
        posted_at,
    })
}

fn timestamp(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn read_and_convert(path: &Path) -> Result<(String, String), ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (title, raw_body) = split_source(&raw).ok_or_else(|| ContentError::Malformed(path.to_path_buf()))?;
    Ok((title.to_string(), markdown_to_html(raw_body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // =========================================================================
    // split_source() tests
    // =========================================================================

    #[test]
    fn split_title_from_body() {
        let (title, body) = split_source("Hello World\n**hi**\n").unwrap();
        assert_eq!(title, "Hello World");
        assert_eq!(body, "**hi**\n");
    }

    #[test]
    fn split_handles_crlf() {
        let (title, body) = split_source("Hello\r\nbody\r\n").unwrap();
        assert_eq!(title, "Hello");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn split_rejects_empty_file() {
        assert!(split_source("").is_none());
    }

    #[test]
    fn split_rejects_missing_line_break() {
        assert!(split_source("just one line without a break").is_none());
    }

    #[test]
    fn split_rejects_blank_title() {
        assert!(split_source("\nbody here\n").is_none());
    }

    #[test]
    fn split_allows_empty_body() {
        let (title, body) = split_source("Title Only\n").unwrap();
        assert_eq!(title, "Title Only");
        assert_eq!(body, "");
    }

    // =========================================================================
    // markdown conversion tests
    // =========================================================================

    #[test]
    fn markdown_converts_emphasis() {
        let html = markdown_to_html("**hi**");
        assert!(html.contains("<strong>hi</strong>"));
    }

    #[test]
    fn markdown_supports_fenced_code_blocks() {
        let html = markdown_to_html("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre><code"));
        assert!(html.contains("fn main()"));
    }

    #[test]
    fn markdown_passes_html_comments_through() {
        let html = markdown_to_html("text\n\n<!-- posted: 123 -->\n");
        assert!(html.contains("<!-- posted: 123 -->"));
    }

    // =========================================================================
    // marker parsing tests
    // =========================================================================

    #[test]
    fn marker_parsed_from_body() {
        assert_eq!(
            parse_posted_marker("<p>hi</p>\n<!-- posted: 1600000000 -->\n"),
            Some(1600000000)
        );
    }

    #[test]
    fn marker_absent_returns_none() {
        assert_eq!(parse_posted_marker("<p>no marker here</p>"), None);
    }

    #[test]
    fn marker_with_garbage_timestamp_ignored() {
        assert_eq!(parse_posted_marker("<!-- posted: soon -->"), None);
    }

    #[test]
    fn first_well_formed_marker_wins() {
        let body = "<!-- posted: nope -->\n<!-- posted: 42 -->\n<!-- posted: 43 -->";
        assert_eq!(parse_posted_marker(body), Some(42));
    }

    // =========================================================================
    // extract_at() tests
    // =========================================================================

    fn fixed_time(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn first_extract_assigns_now_and_persists_marker() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hello.md");
        fs::write(&path, "Hello World\n**hi**\n").unwrap();

        let now = fixed_time(1600000000);
        let doc = extract_at(&path, now).unwrap();

        assert_eq!(doc.title, "Hello World");
        assert!(doc.body_html.contains("<strong>hi</strong>"));
        assert_eq!(doc.posted_at, now);

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.ends_with("<!-- posted: 1600000000 -->\n"));
    }

    #[test]
    fn second_extract_reuses_marker_and_leaves_file_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hello.md");
        fs::write(&path, "Hello\nbody\n").unwrap();

        let first = extract_at(&path, fixed_time(1600000000)).unwrap();
        let snapshot = fs::read(&path).unwrap();

        // Later load at a different time must not re-derive or duplicate.
        let second = extract_at(&path, fixed_time(1700000000)).unwrap();
        assert_eq!(second.posted_at, first.posted_at);
        assert_eq!(fs::read(&path).unwrap(), snapshot);
        let text = String::from_utf8(snapshot).unwrap();
        assert_eq!(text.matches("posted:").count(), 1);
    }

    #[test]
    fn first_and_second_extract_produce_identical_bodies() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hello.md");
        fs::write(&path, "Hello\nsome *body*\n").unwrap();

        let first = extract_at(&path, fixed_time(1600000000)).unwrap();
        let second = extract_at(&path, fixed_time(1700000000)).unwrap();
        assert_eq!(first.body_html, second.body_html);
    }

    #[test]
    fn existing_marker_survives_touch() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("old.md");
        fs::write(&path, "Old Post\nbody\n\n<!-- posted: 1500000000 -->\n").unwrap();

        let doc = extract_at(&path, fixed_time(1700000000)).unwrap();
        assert_eq!(doc.posted_at, fixed_time(1500000000));
    }

    #[test]
    fn unreadable_file_names_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.md");
        let err = extract_at(&path, fixed_time(0)).unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn out_of_range_marker_is_an_error_not_a_rewrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("far.md");
        fs::write(&path, "Far Future\nbody\n\n<!-- posted: 99999999999999999 -->\n").unwrap();
        let before = fs::read(&path).unwrap();

        let err = extract_at(&path, fixed_time(1600000000)).unwrap_err();
        assert!(matches!(err, ContentError::InvalidMarker { .. }));
        // The broken file must not grow a second marker.
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn empty_file_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.md");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            extract_at(&path, fixed_time(0)),
            Err(ContentError::Malformed(_))
        ));
    }
}
