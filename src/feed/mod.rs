//! Feed generation (RSS, Atom, JSON Feed).
//!
//! Loads the English posts, hands them to a [`FeedSerializer`] and
//! writes the three documents into the build output:
//!
//! - **RSS 2.0**: `<name>.xml`
//! - **Atom 1.0**: `<name>.atom`
//! - **JSON Feed 1**: `<name>.json`

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::config::SiteConfig;
use crate::content_loader::load_posts;
use crate::error::{Result, SiteError};
use crate::markdown::{MarkdownRenderer, MarkupRenderer};
use crate::models::{FeedOptions, FeedOutputs, Post};

pub mod atom;
pub mod json;
pub mod rss;

pub(crate) const GENERATOR: &str = "theo-blog-tools";

/// Turns channel metadata plus items into the three feed documents.
pub trait FeedSerializer: Send + Sync {
    fn serialize(&self, options: &FeedOptions, posts: &[Post]) -> Result<FeedOutputs>;
}

/// Serializer backed by the `rss`, `atom_syndication` and `serde_json` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyndicationSerializer;

impl FeedSerializer for SyndicationSerializer {
    fn serialize(&self, options: &FeedOptions, posts: &[Post]) -> Result<FeedOutputs> {
        Ok(FeedOutputs {
            rss: rss::to_rss(options, posts),
            atom: atom::to_atom(options, posts),
            json: json::to_json(options, posts)?,
        })
    }
}

/// Best-effort image MIME type from the file extension.
pub(crate) fn image_mime_type(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "svg" => "image/svg+xml".to_string(),
        "png" | "gif" | "webp" | "avif" | "bmp" => format!("image/{ext}"),
        _ => "image/png".to_string(),
    }
}

/// Writes `<name>.xml`, `<name>.atom` and `<name>.json` into `dir`,
/// creating it first. Writes are sequential and not rolled back.
pub async fn write_feed(dir: &Path, name: &str, outputs: &FeedOutputs) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| SiteError::io(dir, e))?;

    let mut written = Vec::with_capacity(3);
    for (ext, body) in [("xml", &outputs.rss), ("atom", &outputs.atom), ("json", &outputs.json)] {
        let path = dir.join(format!("{name}.{ext}"));
        fs::write(&path, body.as_bytes())
            .await
            .map_err(|e| SiteError::io(&path, e))?;
        info!(path = %path.display(), "wrote feed");
        written.push(path);
    }
    Ok(written)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedReport {
    pub items: usize,
    pub files: Vec<PathBuf>,
}

/// One full feed rebuild: discover, filter, render, sort, serialize, write.
pub struct FeedBuilder {
    config: SiteConfig,
    renderer: Box<dyn MarkupRenderer>,
    serializer: Box<dyn FeedSerializer>,
}

impl FeedBuilder {
    pub fn new(config: SiteConfig) -> Self {
        Self::with_collaborators(config, MarkdownRenderer, SyndicationSerializer)
    }

    pub fn with_collaborators(
        config: SiteConfig,
        renderer: impl MarkupRenderer + 'static,
        serializer: impl FeedSerializer + 'static,
    ) -> Self {
        Self {
            config,
            renderer: Box::new(renderer),
            serializer: Box::new(serializer),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub async fn build(&self) -> Result<FeedReport> {
        let posts = load_posts(&self.config, self.renderer.as_ref()).await?;
        let options = FeedOptions::from_config(&self.config);
        let outputs = self.serializer.serialize(&options, &posts)?;

        let dir = self.config.resolve(&self.config.feed.output_dir);
        let files = write_feed(&dir, &self.config.feed.name, &outputs).await?;
        info!(items = posts.len(), "feed build complete");

        Ok(FeedReport {
            items: posts.len(),
            files,
        })
    }
}
