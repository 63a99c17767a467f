use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

/// Every failure the build tools can hit. All of them end the run.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid post pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to discover posts: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("front matter error in {path}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("post {path} has no date")]
    MissingDate { path: PathBuf },

    #[error("post {path} has an unparseable date {value:?}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("config error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON feed error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiteError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
