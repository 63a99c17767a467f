//! Atom 1.0 serialization.

use atom_syndication::{
    CategoryBuilder, ContentBuilder, Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime,
    GeneratorBuilder, Link, LinkBuilder, Person, PersonBuilder, Text,
};

use super::GENERATOR;
use crate::config::Author;
use crate::models::{FeedOptions, Post};

pub fn to_atom(options: &FeedOptions, posts: &[Post]) -> String {
    let entries: Vec<Entry> = posts.iter().map(post_to_entry).collect();

    // Newest post, or the epoch for an empty feed. Never the wall clock.
    let updated: FixedDateTime = posts.first().map(|post| post.date).unwrap_or_default();

    let self_link: Link = LinkBuilder::default()
        .href(options.atom_link.clone())
        .rel("self".to_string())
        .mime_type(Some("application/atom+xml".to_string()))
        .build();

    let alternate_link: Link = LinkBuilder::default()
        .href(options.link.clone())
        .rel("alternate".to_string())
        .build();

    let feed: Feed = FeedBuilder::default()
        .title(Text::plain(options.title.clone()))
        .id(options.id.clone())
        .updated(updated)
        .authors(vec![person(&options.author)])
        .links(vec![self_link, alternate_link])
        .subtitle(Some(Text::plain(options.description.clone())))
        .rights(Some(Text::plain(options.copyright.clone())))
        .icon(Some(options.favicon.clone()))
        .logo(Some(options.image.clone()))
        .generator(Some(GeneratorBuilder::default().value(GENERATOR).build()))
        .lang(Some(options.language.clone()))
        .entries(entries)
        .build();

    feed.to_string()
}

fn person(author: &Author) -> Person {
    PersonBuilder::default()
        .name(author.name.clone())
        .email(Some(author.email.clone()))
        .uri(Some(author.link.clone()))
        .build()
}

fn post_to_entry(post: &Post) -> Entry {
    let link: Link = LinkBuilder::default()
        .href(post.link.clone())
        .rel("alternate".to_string())
        .build();

    let content = ContentBuilder::default()
        .value(Some(post.content.clone()))
        .content_type(Some("html".to_string()))
        .build();

    let categories = post
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().term(tag.clone()).build())
        .collect::<Vec<_>>();

    EntryBuilder::default()
        .title(Text::plain(post.title.clone()))
        .id(post.link.clone())
        .updated(post.date)
        .published(Some(post.date))
        .links(vec![link])
        .summary(post.description.clone().map(Text::plain))
        .content(Some(content))
        .authors(vec![person(&post.author)])
        .categories(categories)
        .build()
}
