use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use glob::{MatchOptions, Pattern};
use gray_matter::{engine::YAML, Matter};
use tokio::fs;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::markdown::{absolutize_sources, MarkupRenderer};
use crate::models::{parse_post_date, FrontMatter, Post};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Post files matching the configured pattern, sorted by path, without
/// dotfiles or any whose file name carries the exclude marker.
pub fn discover_posts(config: &SiteConfig) -> Result<Vec<PathBuf>> {
    // The root is a literal path; only the configured pattern may glob.
    let root = Pattern::escape(&config.root.to_string_lossy());
    let pattern = Path::new(&root).join(&config.posts.pattern);
    let pattern = pattern.to_string_lossy().into_owned();
    let entries = glob::glob_with(&pattern, MATCH_OPTIONS).map_err(|source| SiteError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        let excluded = path
            .file_name()
            .map_or(false, |name| name.to_string_lossy().contains(&config.posts.exclude_marker));
        if excluded {
            debug!(path = %path.display(), "skipping excluded file");
            continue;
        }
        files.push(path);
    }
    Ok(files)
}

/// Reads every file concurrently and returns the contents in input order.
pub async fn read_all(paths: &[PathBuf]) -> Result<Vec<String>> {
    try_join_all(paths.iter().map(|path| async move {
        fs::read_to_string(path).await.map_err(|e| SiteError::io(path, e))
    }))
    .await
}

/// Splits a post into its front matter and Markdown body.
pub fn split_front_matter(path: &Path, raw: &str) -> Result<(FrontMatter, String)> {
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse::<FrontMatter>(raw)
        .map_err(|e| SiteError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok((parsed.data.unwrap_or_default(), parsed.content))
}

/// `<domain>` + the path below the pages root, minus the `.md` extension.
pub fn post_link(config: &SiteConfig, path: &Path) -> String {
    let pages_root = config.resolve(&config.posts.pages_root);
    let relative = path
        .strip_prefix(&pages_root)
        .or_else(|_| path.strip_prefix(&config.posts.pages_root))
        .unwrap_or(path);
    let relative = relative.with_extension("");
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    config.absolute_url(&format!("/{}", segments.join("/")))
}

/// Turns one post file into a feed item, or `None` when its language
/// is not the feed language.
pub fn build_post(
    config: &SiteConfig,
    renderer: &dyn MarkupRenderer,
    path: &Path,
    raw: &str,
) -> Result<Option<Post>> {
    let (front_matter, body) = split_front_matter(path, raw)?;

    if front_matter.lang() != Some(config.language.as_str()) {
        debug!(path = %path.display(), lang = ?front_matter.lang(), "skipping post in another language");
        return Ok(None);
    }

    let raw_date = front_matter.date().ok_or_else(|| SiteError::MissingDate {
        path: path.to_path_buf(),
    })?;
    let date = parse_post_date(raw_date).ok_or_else(|| SiteError::InvalidDate {
        path: path.to_path_buf(),
        value: raw_date.to_string(),
    })?;

    let content = absolutize_sources(&renderer.render(&body), &config.domain);

    let image = front_matter.image().map(|image| {
        if image.starts_with('/') {
            config.absolute_url(image)
        } else {
            image.to_string()
        }
    });

    let title = match front_matter.title() {
        Some(title) => title.to_string(),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    Ok(Some(Post {
        title,
        description: front_matter.description().map(str::to_string),
        content,
        link: post_link(config, path),
        image,
        date,
        author: config.author.clone(),
        tags: front_matter.tags(),
        front_matter,
    }))
}

/// Loads every feed-eligible post, newest first.
pub async fn load_posts(config: &SiteConfig, renderer: &dyn MarkupRenderer) -> Result<Vec<Post>> {
    let files = discover_posts(config)?;
    let contents = read_all(&files).await?;

    let mut posts = Vec::new();
    for (path, raw) in files.iter().zip(&contents) {
        if let Some(post) = build_post(config, renderer, path, raw)? {
            posts.push(post);
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    info!(discovered = files.len(), included = posts.len(), "loaded posts");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::MarkdownRenderer;

    fn fixture_config() -> SiteConfig {
        SiteConfig {
            domain: "https://example.com".to_string(),
            ..SiteConfig::default()
        }
    }

    fn write_post(dir: &Path, name: &str) {
        let posts = dir.join("pages/posts");
        std::fs::create_dir_all(&posts).unwrap();
        std::fs::write(posts.join(name), "---\nlang: en\ndate: 2024-01-01\n---\nbody").unwrap();
    }

    #[test]
    fn discovery_treats_root_literally() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site [draft] *");
        write_post(&root, "hello.md");

        let config = SiteConfig {
            root: root.clone(),
            ..fixture_config()
        };
        let files = discover_posts(&config).unwrap();
        assert_eq!(files, vec![root.join("pages/posts/hello.md")]);
        assert_eq!(post_link(&config, &files[0]), "https://example.com/posts/hello");
    }

    #[test]
    fn discovery_skips_dotfiles_and_index_files() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), ".draft.md");
        write_post(dir.path(), "index.md");
        write_post(dir.path(), "b.md");
        write_post(dir.path(), "a.md");

        let config = SiteConfig {
            root: dir.path().to_path_buf(),
            ..fixture_config()
        };
        let names: Vec<_> = discover_posts(&config)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn link_strips_pages_root_and_extension() {
        let config = fixture_config();
        let link = post_link(&config, Path::new("./pages/posts/hello-world.md"));
        assert_eq!(link, "https://example.com/posts/hello-world");
    }

    #[test]
    fn non_matching_language_yields_nothing() {
        let config = fixture_config();
        let raw = "---\nlang: zh\ndate: 2024-02-01\n---\n你好";
        let post = build_post(&config, &MarkdownRenderer, Path::new("pages/posts/zh.md"), raw).unwrap();
        assert!(post.is_none());
    }

    #[test]
    fn missing_lang_or_front_matter_yields_nothing() {
        let config = fixture_config();
        let renderer = MarkdownRenderer;
        let no_lang = "---\ndate: 2024-02-01\n---\nbody";
        let bare = "just a body";
        assert!(build_post(&config, &renderer, Path::new("a.md"), no_lang).unwrap().is_none());
        assert!(build_post(&config, &renderer, Path::new("b.md"), bare).unwrap().is_none());
    }

    #[test]
    fn english_post_is_transformed() {
        let config = fixture_config();
        let raw = "---\nlang: en\ntitle: Hello\ndate: 2024-01-01\nimage: /covers/hello.png\ntags:\n  - rust\n---\n![x](/img/a.png)\n";
        let post = build_post(&config, &MarkdownRenderer, Path::new("./pages/posts/hello.md"), raw)
            .unwrap()
            .unwrap();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.link, "https://example.com/posts/hello");
        assert_eq!(post.image.as_deref(), Some("https://example.com/covers/hello.png"));
        assert!(post.content.contains("src=\"https://example.com/img/a.png\""));
        assert_eq!(post.date.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(post.author.name, "Theo");
        assert_eq!(post.tags, vec!["rust"]);
    }

    #[test]
    fn absolute_images_are_untouched_and_title_falls_back_to_stem() {
        let config = fixture_config();
        let raw = "---\nlang: en\ndate: 2024-01-01\nimage: https://cdn.dev/x.png\n---\nbody";
        let post = build_post(&config, &MarkdownRenderer, Path::new("pages/posts/no-title.md"), raw)
            .unwrap()
            .unwrap();
        assert_eq!(post.image.as_deref(), Some("https://cdn.dev/x.png"));
        assert_eq!(post.title, "no-title");
    }

    #[test]
    fn english_post_without_date_is_an_error() {
        let config = fixture_config();
        let raw = "---\nlang: en\n---\nbody";
        let err = build_post(&config, &MarkdownRenderer, Path::new("a.md"), raw).unwrap_err();
        assert!(matches!(err, SiteError::MissingDate { .. }));

        let raw = "---\nlang: en\ndate: soon\n---\nbody";
        let err = build_post(&config, &MarkdownRenderer, Path::new("a.md"), raw).unwrap_err();
        assert!(matches!(err, SiteError::InvalidDate { .. }));
    }
}
