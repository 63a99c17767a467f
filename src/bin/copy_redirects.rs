use std::process::ExitCode;

use blog_tools::{config::CONFIG_FILE, copy_redirects, init_tracing, SiteConfig};
use tracing::error;

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

    // Copied and Skipped both succeed; only a failed copy is fatal.
    match copy_redirects(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to copy redirects file: {}", e);
            ExitCode::FAILURE
        }
    }
}
