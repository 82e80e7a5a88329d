//! Configuration schema for ossmirror
//!
//! Configuration is stored as JSON, by default at `/etc/ossmirror/config.json`:
//!
//! ```json
//! {
//!   "workspace": "/var/mirror",
//!   "oss_public_url": "https://mirror.example.com",
//!   "oss_endpoint": "oss-cn-hangzhou.aliyuncs.com",
//!   "oss_access_key_id": "...",
//!   "oss_access_key_secret": "...",
//!   "oss_bucket": "mirror"
//! }
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Local directory used as the download cache
    pub workspace: PathBuf,

    /// Public URL prefix of the bucket, only used for logging
    pub oss_public_url: String,

    /// OSS endpoint, e.g. `oss-cn-hangzhou.aliyuncs.com`
    pub oss_endpoint: String,

    /// Access key id
    pub oss_access_key_id: String,

    /// Access key secret
    pub oss_access_key_secret: String,

    /// Target bucket
    pub oss_bucket: String,
}

impl Config {
    /// Check that every field needed to mirror is present.
    ///
    /// Returns the name of the first empty field.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.workspace.as_os_str().is_empty() {
            return Some("workspace");
        }

        let required = [
            ("oss_endpoint", &self.oss_endpoint),
            ("oss_access_key_id", &self.oss_access_key_id),
            ("oss_access_key_secret", &self.oss_access_key_secret),
            ("oss_bucket", &self.oss_bucket),
        ];

        required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workspace", &self.workspace)
            .field("oss_public_url", &self.oss_public_url)
            .field("oss_endpoint", &self.oss_endpoint)
            .field("oss_access_key_id", &self.oss_access_key_id)
            .field("oss_access_key_secret", &"<redacted>")
            .field("oss_bucket", &self.oss_bucket)
            .finish()
    }
}
