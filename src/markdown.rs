use std::sync::LazyLock;

use linkify::{LinkFinder, LinkKind};
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};

static LINK_FINDER: LazyLock<LinkFinder> = LazyLock::new(|| {
    let mut finder = LinkFinder::new();
    finder.url_must_have_scheme(false);
    finder.kinds(&[LinkKind::Url, LinkKind::Email]);
    finder
});

/// Turns post markup into HTML.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, markup: &str) -> String;
}

/// CommonMark with raw HTML passthrough, soft breaks as `<br />` and
/// bare URLs turned into links.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkupRenderer for MarkdownRenderer {
    fn render(&self, markup: &str) -> String {
        render_markdown_to_html(markup)
    }
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options
}

pub fn render_markdown_to_html(markdown: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(markdown, markdown_options())).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let events = linkify(parser);

    let mut html_out = String::new();
    html::push_html(&mut html_out, events.into_iter());
    html_out
}

/// Wraps bare URLs, hosts and emails found in plain text in links. Text inside links,
/// images, code blocks and raw `<a>` elements is left alone.
fn linkify<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut inside_link = 0usize;
    let mut inside_code = 0usize;
    let mut inside_html_anchor = 0usize;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => inside_link += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => inside_link = inside_link.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => inside_code += 1,
            Event::End(TagEnd::CodeBlock) => inside_code = inside_code.saturating_sub(1),
            Event::InlineHtml(raw) | Event::Html(raw) => {
                let raw = raw.trim_start().to_ascii_lowercase();
                if raw.starts_with("</a") {
                    inside_html_anchor = inside_html_anchor.saturating_sub(1);
                } else if raw.starts_with("<a ") || raw.starts_with("<a>") {
                    inside_html_anchor += 1;
                }
            }
            Event::Text(text) if inside_link == 0 && inside_code == 0 && inside_html_anchor == 0 => {
                if LINK_FINDER.links(text).next().is_some() {
                    push_linkified(&mut out, text);
                    continue;
                }
            }
            _ => {}
        }
        out.push(event);
    }

    out
}

fn push_linkified<'a>(out: &mut Vec<Event<'a>>, text: &str) {
    let mut last = 0;
    for link in LINK_FINDER.links(text) {
        let found = link.as_str();
        let (href, link_type) = match (link.kind(), scheme_rest(found)) {
            // pulldown-cmark adds the `mailto:` prefix for email links.
            (LinkKind::Email, _) => (found.to_string(), LinkType::Email),
            // A scheme with nothing after it is not a link.
            (_, Some(rest)) if rest.trim_start_matches('/').is_empty() => continue,
            (_, Some(_)) => (found.to_string(), LinkType::Autolink),
            (_, None) => (format!("http://{found}"), LinkType::Autolink),
        };

        if link.start() > last {
            out.push(Event::Text(CowStr::from(text[last..link.start()].to_string())));
        }
        out.push(Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::from(href),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        out.push(Event::Text(CowStr::from(found.to_string())));
        out.push(Event::End(TagEnd::Link));
        last = link.end();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// The part after `scheme:` when the link starts with a URL scheme.
fn scheme_rest(link: &str) -> Option<&str> {
    let (scheme, rest) = link.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-'));
    valid.then_some(rest)
}

/// Rewrites every root-relative `src="/..."` against `domain`.
pub fn absolutize_sources(html: &str, domain: &str) -> String {
    const NEEDLE: &str = "src=\"/";

    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(at) = rest.find(NEEDLE) {
        let after = at + NEEDLE.len();
        out.push_str(&rest[..at]);
        out.push_str("src=\"");
        out.push_str(domain);
        out.push('/');
        rest = &rest[after..];
    }
    out.push_str(rest);
    out
}
