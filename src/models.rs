use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::{Author, SiteConfig};

/// The YAML block at the top of a post, kept as an open mapping.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct FrontMatter(pub Map<String, Value>);

impl FrontMatter {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn lang(&self) -> Option<&str> {
        self.get_str("lang")
    }

    pub fn date(&self) -> Option<&str> {
        self.get_str("date")
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn image(&self) -> Option<&str> {
        self.get_str("image")
    }

    /// `tags` may be a YAML list or a single comma separated string.
    pub fn tags(&self) -> Vec<String> {
        match self.0.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// One English post, ready to become a feed item.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub front_matter: FrontMatter,
    pub title: String,
    pub description: Option<String>,
    /// Rendered body with absolute `src` attributes.
    pub content: String,
    pub link: String,
    pub image: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub author: Author,
    pub tags: Vec<String>,
}

/// Channel-level metadata handed to the serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOptions {
    pub title: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub language: String,
    pub copyright: String,
    pub rss_link: String,
    pub atom_link: String,
    pub json_link: String,
    pub author: Author,
    pub image: String,
    pub favicon: String,
}

impl FeedOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        let feed = &config.feed;
        Self {
            title: feed.title.clone(),
            description: feed.description.clone(),
            id: feed.id.clone(),
            link: feed.link.clone(),
            language: config.language.clone(),
            copyright: feed.copyright.clone(),
            rss_link: feed.links.rss.clone(),
            atom_link: feed.links.atom.clone(),
            json_link: feed.links.json.clone(),
            author: config.author.clone(),
            image: feed.image.clone(),
            favicon: feed.favicon.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOutputs {
    pub rss: String,
    pub atom: String,
    pub json: String,
}

/// Parses a front-matter date. Offset-less forms are taken as UTC.
pub fn parse_post_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
