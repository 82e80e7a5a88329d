//! ossmirror - mirror a remote file into object storage
//!
//! Downloads a URL into a local workspace cache (skipping the download when
//! the file is already there) and uploads it to an OSS bucket under a key
//! derived from the URL's host and path.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod mirror;
pub mod publish;
pub mod request;
pub mod ui;

pub use error::{MirrorError, MirrorResult};
pub use mirror::{Mirror, MirrorOutcome, Source};
pub use request::{derive_key, MirrorRequest, ObjectKey};
