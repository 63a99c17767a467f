use std::process::ExitCode;

use blog_tools::{config::CONFIG_FILE, init_tracing, FeedBuilder, SiteConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match SiteConfig::load_or_default(CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load site config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let builder = FeedBuilder::new(config);
    info!(pattern = %builder.config().posts.pattern, "building feeds");

    match builder.build().await {
        Ok(report) => {
            info!(items = report.items, files = report.files.len(), "feeds written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to build feeds: {}", e);
            ExitCode::FAILURE
        }
    }
}
