//! Build-time tools for the blog: feed generation and redirect copying.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod content_loader;
pub mod error;
pub mod feed;
pub mod markdown;
pub mod models;
pub mod redirects;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use feed::{FeedBuilder, FeedReport, FeedSerializer, SyndicationSerializer};
pub use markdown::{MarkdownRenderer, MarkupRenderer};
pub use models::{FeedOptions, FeedOutputs, FrontMatter, Post};
pub use redirects::{copy_redirects, CopyOutcome};

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
