//! Site configuration shared by both build tools.
//!
//! Every field has a default, so an absent `site.toml` reproduces the
//! production site exactly. Tests build configs with fixture domains and
//! temporary roots instead.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SiteError};

pub const CONFIG_FILE: &str = "site.toml";

const DOMAIN: &str = "https://q-theo-me.vercel.app";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Project root every relative path below is resolved against.
    pub root: PathBuf,
    /// Absolute origin, without a trailing slash.
    pub domain: String,
    /// Only posts whose `lang` equals this tag reach the feeds.
    pub language: String,
    pub author: Author,
    pub feed: FeedConfig,
    pub posts: PostsConfig,
    pub redirects: RedirectConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub link: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub copyright: String,
    pub image: String,
    pub favicon: String,
    pub output_dir: PathBuf,
    /// Output base name; files are `<name>.xml`, `<name>.atom`, `<name>.json`.
    pub name: String,
    pub links: FeedLinks,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeedLinks {
    pub rss: String,
    pub atom: String,
    pub json: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PostsConfig {
    pub pattern: String,
    /// Prefix stripped from a post path when computing its link.
    pub pages_root: PathBuf,
    /// Files whose name contains this marker are never posts.
    pub exclude_marker: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RedirectConfig {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            domain: DOMAIN.to_string(),
            language: "en".to_string(),
            author: Author::default(),
            feed: FeedConfig::default(),
            posts: PostsConfig::default(),
            redirects: RedirectConfig::default(),
        }
    }
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "Theo".to_string(),
            email: "hi@antfu.me".to_string(),
            link: DOMAIN.to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Theo".to_string(),
            description: "Theo' Blog".to_string(),
            id: format!("{DOMAIN}/"),
            link: format!("{DOMAIN}/"),
            copyright: "CC BY-NC-SA 4.0 2021 © Theo".to_string(),
            image: format!("{DOMAIN}/avatar.png"),
            favicon: format!("{DOMAIN}/logo.png"),
            output_dir: PathBuf::from("dist"),
            name: "feed".to_string(),
            links: FeedLinks::default(),
        }
    }
}

impl Default for FeedLinks {
    fn default() -> Self {
        Self {
            rss: format!("{DOMAIN}/feed.xml"),
            atom: format!("{DOMAIN}/feed.atom"),
            json: format!("{DOMAIN}/feed.json"),
        }
    }
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            pattern: "pages/posts/*.md".to_string(),
            pages_root: PathBuf::from("pages"),
            exclude_marker: "index".to_string(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("_dist_redirects"),
            target: PathBuf::from("dist/_redirects"),
        }
    }
}

impl SiteConfig {
    pub fn from_toml(path: &Path, raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|source| SiteError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
        Self::from_toml(path, &raw)
    }

    /// Loads `path` when it exists, otherwise falls back to the built-in site.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            debug!(path = %path.display(), "loading site config");
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no site config, using defaults");
            Ok(Self::default())
        }
    }

    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Prefixes a root-relative path with the domain.
    pub fn absolute_url(&self, root_relative: &str) -> String {
        format!("{}{}", self.domain, root_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_site() {
        let config = SiteConfig::default();
        assert_eq!(config.domain, "https://q-theo-me.vercel.app");
        assert_eq!(config.language, "en");
        assert_eq!(config.feed.links.atom, "https://q-theo-me.vercel.app/feed.atom");
        assert_eq!(config.redirects.target, PathBuf::from("dist/_redirects"));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let raw = r#"
domain = "https://example.com"

[feed]
title = "Fixture"
"#;
        let config = SiteConfig::from_toml(Path::new("site.toml"), raw).unwrap();
        assert_eq!(config.domain, "https://example.com");
        assert_eq!(config.feed.title, "Fixture");
        assert_eq!(config.feed.name, "feed");
        assert_eq!(config.posts.pattern, "pages/posts/*.md");
        assert_eq!(config.absolute_url("/a.png"), "https://example.com/a.png");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = SiteConfig::from_toml(Path::new("site.toml"), "domain = [").unwrap_err();
        assert!(matches!(err, SiteError::Config { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SiteConfig::load_or_default("definitely/not/here/site.toml").unwrap();
        assert_eq!(config, SiteConfig::default());
    }
}
