use tokio::fs;
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::error::{Result, SiteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { bytes: u64 },
    /// The source file does not exist; nothing was touched.
    Skipped,
}

/// Copies the hosting redirect file into the build output, overwriting
/// any previous copy. A source that is missing, or whose existence
/// cannot be checked, is skipped. The target's parent directory must
/// already exist.
pub async fn copy_redirects(config: &SiteConfig) -> Result<CopyOutcome> {
    let source = config.resolve(&config.redirects.source);
    let target = config.resolve(&config.redirects.target);

    let exists = match fs::try_exists(&source).await {
        Ok(exists) => exists,
        Err(e) => {
            warn!(source = %source.display(), error = %e, "cannot check source redirects file");
            false
        }
    };
    if !exists {
        warn!(source = %source.display(), "source redirects file not found, skipping copy");
        return Ok(CopyOutcome::Skipped);
    }

    let bytes = fs::copy(&source, &target)
        .await
        .map_err(|e| SiteError::Copy {
            from: source.clone(),
            to: target.clone(),
            source: e,
        })?;
    info!(source = %source.display(), target = %target.display(), bytes, "redirects file copied");
    Ok(CopyOutcome::Copied { bytes })
}
