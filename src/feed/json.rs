//! JSON Feed 1 serialization.

use serde::Serialize;

use crate::config::Author;
use crate::error::Result;
use crate::models::{FeedOptions, Post};

const VERSION: &str = "https://jsonfeed.org/version/1";

#[derive(Serialize)]
struct JsonFeed<'a> {
    version: &'static str,
    title: &'a str,
    home_page_url: &'a str,
    feed_url: &'a str,
    description: &'a str,
    icon: &'a str,
    favicon: &'a str,
    author: JsonAuthor<'a>,
    items: Vec<JsonItem<'a>>,
}

#[derive(Serialize)]
struct JsonAuthor<'a> {
    name: &'a str,
    url: &'a str,
}

#[derive(Serialize)]
struct JsonItem<'a> {
    id: &'a str,
    content_html: &'a str,
    url: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    date_modified: String,
    date_published: String,
    author: JsonAuthor<'a>,
    #[serde(skip_serializing_if = "no_tags")]
    tags: &'a [String],
}

fn no_tags(tags: &&[String]) -> bool {
    tags.is_empty()
}

impl<'a> From<&'a Author> for JsonAuthor<'a> {
    fn from(author: &'a Author) -> Self {
        Self {
            name: &author.name,
            url: &author.link,
        }
    }
}

impl<'a> From<&'a Post> for JsonItem<'a> {
    fn from(post: &'a Post) -> Self {
        let date = post.date.to_rfc3339();
        Self {
            id: &post.link,
            content_html: &post.content,
            url: &post.link,
            title: &post.title,
            summary: post.description.as_deref(),
            image: post.image.as_deref(),
            date_modified: date.clone(),
            date_published: date,
            author: JsonAuthor::from(&post.author),
            tags: &post.tags,
        }
    }
}

pub fn to_json(options: &FeedOptions, posts: &[Post]) -> Result<String> {
    let feed = JsonFeed {
        version: VERSION,
        title: &options.title,
        home_page_url: &options.link,
        feed_url: &options.json_link,
        description: &options.description,
        icon: &options.image,
        favicon: &options.favicon,
        author: JsonAuthor::from(&options.author),
        items: posts.iter().map(JsonItem::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&feed)?)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::feed::tests::{fixture_options, fixture_post};

    #[test]
    fn feed_level_fields() {
        let json: Value = serde_json::from_str(&to_json(&fixture_options(), &[]).unwrap()).unwrap();
        assert_eq!(json["version"], VERSION);
        assert_eq!(json["feed_url"], "https://example.com/feed.json");
        assert_eq!(json["items"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn item_fields() {
        let mut post = fixture_post("hello", "2024-01-01T00:00:00Z");
        post.image = Some("https://example.com/cover.png".to_string());
        let json: Value = serde_json::from_str(&to_json(&fixture_options(), &[post]).unwrap()).unwrap();

        let item = &json["items"][0];
        assert_eq!(item["id"], "https://example.com/posts/hello");
        assert_eq!(item["image"], "https://example.com/cover.png");
        assert_eq!(item["date_published"], "2024-01-01T00:00:00+00:00");
        assert_eq!(item["tags"][0], "rust");
        assert!(item.get("summary").is_none());
    }
}
