//! Error types for ossmirror
//!
//! All modules use `MirrorResult<T>` as their return type. Every variant is
//! terminal for the invocation; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mirror operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// All errors that can occur while mirroring a URL
#[derive(Error, Debug)]
pub enum MirrorError {
    // Configuration errors
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("failed to initialize object store for bucket {bucket}: {source}")]
    StoreInit {
        bucket: String,
        #[source]
        source: opendal::Error,
    },

    // Input errors
    #[error("invalid url: empty")]
    EmptyUrl,

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported url scheme {scheme:?} in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("url has no file name in its path: {0}")]
    MissingFileName(String),

    // Filesystem errors
    #[error("io error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Fetch errors
    #[error("failed to fetch {url}: {reason}")]
    FetchTransport { url: String, reason: String },

    #[error("bad code: {code} fetching {url}")]
    FetchStatus { url: String, code: u16 },

    #[error("failed to stream {url} into {path}: {source}")]
    FetchStream {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Publish errors
    #[error("failed to publish {key}: {source}")]
    Publish {
        key: String,
        #[source]
        source: opendal::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl MirrorError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Name of the pipeline stage that produced this error
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ConfigNotFound(_)
            | Self::ConfigRead { .. }
            | Self::ConfigInvalid { .. }
            | Self::StoreInit { .. } => "config",
            Self::EmptyUrl
            | Self::InvalidUrl { .. }
            | Self::UnsupportedScheme { .. }
            | Self::MissingFileName(_) => "input",
            Self::Io { .. } => "filesystem",
            Self::FetchTransport { .. } | Self::FetchStatus { .. } | Self::FetchStream { .. } => {
                "fetch"
            }
            Self::Publish { .. } => "publish",
            Self::Internal(_) => "internal",
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound(_) => Some("Pass the configuration path with -c <PATH>"),
            Self::EmptyUrl => Some("Pass the resource to mirror with -l <URL>"),
            Self::MissingFileName(_) => {
                Some("The url path must end in a file name, e.g. http://host/dir/file.tar.gz")
            }
            _ => None,
        }
    }
}
