//! Mirror orchestration
//!
//! Resolve the cache path, fetch on a miss, derive the object key and
//! publish. A file fetched by this run is removed again if anything after
//! its creation fails; a file that was already cached is never removed.

use crate::cache::{CacheGuard, LocalCache};
use crate::error::MirrorResult;
use crate::fetch::Fetcher;
use crate::publish::Publisher;
use crate::request::{public_url, MirrorRequest, ObjectKey};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Where the published bytes came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Reused an existing file in the workspace
    CacheHit,
    /// Downloaded during this run
    Fetched { bytes: u64 },
}

/// Result of a successful mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOutcome {
    pub key: ObjectKey,
    pub local_path: PathBuf,
    pub source: Source,
    pub public_url: String,
}

/// Sequences cache lookup, fetch and publish for one URL
pub struct Mirror<F, P> {
    cache: LocalCache,
    fetcher: F,
    publisher: P,
    public_url_prefix: String,
}

impl<F: Fetcher, P: Publisher> Mirror<F, P> {
    pub fn new(
        cache: LocalCache,
        fetcher: F,
        publisher: P,
        public_url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            publisher,
            public_url_prefix: public_url_prefix.into(),
        }
    }

    /// Mirror a single request
    #[instrument(skip_all, fields(url = %request))]
    pub async fn run(&self, request: &MirrorRequest) -> MirrorResult<MirrorOutcome> {
        let local_path = self.cache.resolve(request);
        info!("local file: {}", local_path.display());

        // A stat failure aborts before anything is created or removed
        let (guard, source) = if self.cache.exists(&local_path).await? {
            info!("cache hit, skipping download");
            (None, Source::CacheHit)
        } else {
            let guard = CacheGuard::new(&local_path);
            let bytes = self.fetcher.fetch(request.url(), guard.path()).await?;
            info!("downloaded {} bytes", bytes);
            (Some(guard), Source::Fetched { bytes })
        };

        let key = request.object_key();
        let public_url = public_url(&self.public_url_prefix, &key);
        info!("remote file: {}", public_url);

        let sent = self.publisher.publish(&key, &local_path).await?;
        debug!("published {} bytes as {}", sent, key);

        if let Some(guard) = guard {
            guard.commit();
        }

        Ok(MirrorOutcome {
            key,
            local_path,
            source,
            public_url,
        })
    }
}
