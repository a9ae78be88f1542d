//! Site configuration module.
//!
//! Handles loading and validating the optional `site.toml` at the source root.
//! All options have stock defaults, so a site with no config file at all builds
//! fine — the config exists for renaming the special directories, changing the
//! default templates, and adjusting the front-page caps.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = ""                 # Site title, exposed to every template as `site`
//! posts_dir = "_posts"       # Flat posts directory (reverse-chronological)
//! templates_dir = "_templates"
//!
//! post_template = "post.html"   # Default template for posts
//! page_template = "page.html"   # Default template for pages and indexes
//! index_template = "index.html" # Front page template
//!
//! latest_posts = 5           # Front page cap for latest posts
//! latest_pages = 5           # Front page cap for listed pages
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have sensible defaults. A config file need only specify the
/// values it wants to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, available in every template as `site`.
    pub title: String,
    /// Name of the flat posts directory under the source root.
    pub posts_dir: String,
    /// Name of the templates directory under the source root.
    pub templates_dir: String,
    /// Default template for posts when no specific one matches.
    pub post_template: String,
    /// Default template for pages and directory indexes.
    pub page_template: String,
    /// Template for the generated front page.
    pub index_template: String,
    /// Maximum number of posts on the front page.
    pub latest_posts: usize,
    /// Maximum number of listed pages on the front page.
    pub latest_pages: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            posts_dir: "_posts".to_string(),
            templates_dir: "_templates".to_string(),
            post_template: "post.html".to_string(),
            page_template: "page.html".to_string(),
            index_template: "index.html".to_string(),
            latest_posts: 5,
            latest_pages: 5,
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("posts_dir", &self.posts_dir),
            ("templates_dir", &self.templates_dir),
            ("post_template", &self.post_template),
            ("page_template", &self.page_template),
            ("index_template", &self.index_template),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{field} must not be empty")));
            }
            if value.contains("..") {
                return Err(ConfigError::Validation(format!(
                    "{field} must not contain '..'"
                )));
            }
        }
        if self.latest_posts == 0 && self.latest_pages == 0 {
            return Err(ConfigError::Validation(
                "latest_posts and latest_pages cannot both be zero".into(),
            ));
        }
        Ok(())
    }
}

/// Load `site.toml` from the source root. Uses defaults if the file is absent.
pub fn load_config(source_root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = source_root.join("site.toml");
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let contents = fs::read_to_string(&path)?;
    let config: SiteConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// A stock `site.toml` with every option documented, for `inkpress gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = SiteConfig::default();
    format!(
        r#"# inkpress site configuration
# All options are optional - the values below are the defaults.

# Site title, available in every template as `site`.
title = "{title}"

# Flat posts directory under the source root. Posts get dated URLs
# (yyyy/mm/dd/name.html) and appear in the front page's latest list.
posts_dir = "{posts_dir}"

# Templates directory under the source root.
templates_dir = "{templates_dir}"

# Default templates. A content file first looks for a template matching its
# own path, then one matching its directory, then falls back to these.
post_template = "{post_template}"
page_template = "{page_template}"
index_template = "{index_template}"

# Front page caps.
latest_posts = {latest_posts}
latest_pages = {latest_pages}
"#,
        title = defaults.title,
        posts_dir = defaults.posts_dir,
        templates_dir = defaults.templates_dir,
        post_template = defaults.post_template,
        page_template = defaults.page_template,
        index_template = defaults.index_template,
        latest_posts = defaults.latest_posts,
        latest_pages = defaults.latest_pages,
    )
}
