//! Mirror requests and object key derivation
//!
//! A request is validated once, before any configuration is read or any
//! filesystem or network access happens. Path segments keep the
//! percent-encoding produced by URL parsing, so an encoded `%2F` can never
//! introduce an extra separator into the cache path or the object key.

use crate::error::{MirrorError, MirrorResult};
use std::fmt;
use url::Url;

/// A validated URL to mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRequest {
    url: Url,
    file_name: String,
}

impl MirrorRequest {
    /// Validate and parse raw user input
    pub fn parse(raw: &str) -> MirrorResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(MirrorError::EmptyUrl);
        }

        let url = Url::parse(raw).map_err(|source| MirrorError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(MirrorError::UnsupportedScheme {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let file_name = segments(&url)
            .last()
            .map(str::to_string)
            .ok_or_else(|| MirrorError::MissingFileName(raw.to_string()))?;

        Ok(Self { url, file_name })
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Final path segment, used as the cache file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Object key this request is published under
    pub fn object_key(&self) -> ObjectKey {
        derive_key(&self.url)
    }
}

impl fmt::Display for MirrorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Object store key, `host[:port]/path` without leading or trailing separators
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the object key for a URL.
///
/// Host (with an explicit non-default port) followed by the non-empty path
/// segments, joined by `/`. Query and fragment are ignored.
pub fn derive_key(url: &Url) -> ObjectKey {
    let mut parts = Vec::new();

    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => parts.push(format!("{}:{}", host, port)),
            None => parts.push(host.to_string()),
        }
    }
    parts.extend(segments(url).map(str::to_string));

    ObjectKey(parts.join("/"))
}

/// Public URL of a published key, for logging
pub fn public_url(prefix: &str, key: &ObjectKey) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        key.as_str().trim_start_matches('/')
    )
}

fn segments(url: &Url) -> impl Iterator<Item = &str> {
    url.path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
}
