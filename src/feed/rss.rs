//! RSS 2.0 serialization.

use std::collections::BTreeMap;

use rss::{Category, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder};

use super::{image_mime_type, GENERATOR};
use crate::models::{FeedOptions, Post};

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

pub fn to_rss(options: &FeedOptions, posts: &[Post]) -> String {
    let items: Vec<Item> = posts.iter().map(post_to_item).collect();

    let mut namespaces = BTreeMap::new();
    namespaces.insert("content".to_string(), CONTENT_NAMESPACE.to_string());

    let image = ImageBuilder::default()
        .url(&options.image)
        .title(&options.title)
        .link(&options.link)
        .build();

    // Posts arrive newest first; the newest date keeps reruns byte-identical.
    let last_build_date = posts.first().map(|post| post.date.to_rfc2822());

    let channel = ChannelBuilder::default()
        .title(&options.title)
        .link(&options.link)
        .description(&options.description)
        .language(Some(options.language.clone()))
        .copyright(Some(options.copyright.clone()))
        .generator(Some(GENERATOR.to_string()))
        .last_build_date(last_build_date)
        .image(Some(image))
        .namespaces(namespaces)
        .items(items)
        .build();

    channel.to_string()
}

fn post_to_item(post: &Post) -> Item {
    let guid = GuidBuilder::default().value(&post.link).permalink(true).build();

    let mut builder = ItemBuilder::default();
    builder.title(Some(post.title.clone()));
    builder.link(Some(post.link.clone()));
    builder.guid(Some(guid));
    builder.pub_date(Some(post.date.to_rfc2822()));
    builder.description(post.description.clone());
    builder.content(Some(post.content.clone()));
    builder.author(Some(format!("{} ({})", post.author.email, post.author.name)));

    if let Some(image) = &post.image {
        let enclosure = EnclosureBuilder::default()
            .url(image)
            .length("0")
            .mime_type(image_mime_type(image))
            .build();
        builder.enclosure(Some(enclosure));
    }

    let categories: Vec<_> = post
        .tags
        .iter()
        .map(|tag| Category {
            name: tag.clone(),
            domain: None,
        })
        .collect();
    if !categories.is_empty() {
        builder.categories(categories);
    }

    builder.build()
}
