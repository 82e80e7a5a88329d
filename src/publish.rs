//! Publishing cached files to object storage
//!
//! Thin wrapper over an OpenDAL operator. Credentials, request signing and
//! transport retries are the operator's business; a failed upload is
//! reported once and never retried here.

use crate::config::Config;
use crate::error::{MirrorError, MirrorResult};
use crate::request::ObjectKey;
use async_trait::async_trait;
use opendal::layers::TracingLayer;
use opendal::{services, Operator};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Uploads a local file under an object key
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload `local` as `key`, returning the number of bytes sent
    async fn publish(&self, key: &ObjectKey, local: &Path) -> MirrorResult<u64>;
}

/// Publisher backed by an OpenDAL operator
#[derive(Clone)]
pub struct ObjectStorePublisher {
    op: Operator,
}

impl ObjectStorePublisher {
    /// Build an Aliyun OSS operator from configuration
    pub fn from_config(config: &Config) -> MirrorResult<Self> {
        let builder = services::Oss::default()
            .root("/")
            .bucket(&config.oss_bucket)
            .endpoint(&config.oss_endpoint)
            .access_key_id(&config.oss_access_key_id)
            .access_key_secret(&config.oss_access_key_secret);

        let op = Operator::new(builder)
            .map_err(|source| MirrorError::StoreInit {
                bucket: config.oss_bucket.clone(),
                source,
            })?
            .layer(TracingLayer)
            .finish();

        Ok(Self::from_operator(op))
    }

    /// Wrap an already configured operator
    pub fn from_operator(op: Operator) -> Self {
        Self { op }
    }
}

#[async_trait]
impl Publisher for ObjectStorePublisher {
    async fn publish(&self, key: &ObjectKey, local: &Path) -> MirrorResult<u64> {
        let body = fs::read(local)
            .await
            .map_err(|e| MirrorError::io(format!("reading {}", local.display()), e))?;
        let sent = body.len() as u64;

        // One write call; how the body is split on the wire is up to the operator
        self.op
            .write(key.as_str(), body)
            .await
            .map_err(|source| publish_error(key, source))?;

        debug!("uploaded {} bytes to {}", sent, key);
        Ok(sent)
    }
}

fn publish_error(key: &ObjectKey, source: opendal::Error) -> MirrorError {
    MirrorError::Publish {
        key: key.to_string(),
        source,
    }
}
