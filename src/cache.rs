//! Local file cache under the workspace directory
//!
//! A URL maps to `workspace/<final path segment>`. Existence on disk is the
//! whole index: an existing file is trusted and reused as-is. Different URLs
//! sharing a file name map to the same entry.

use crate::error::{MirrorError, MirrorResult};
use crate::request::MirrorRequest;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Workspace-backed cache of downloaded files
#[derive(Debug, Clone)]
pub struct LocalCache {
    workspace: PathBuf,
}

impl LocalCache {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    /// Local path a request is cached at
    pub fn resolve(&self, request: &MirrorRequest) -> PathBuf {
        self.workspace.join(request.file_name())
    }

    /// Whether a cache entry exists.
    ///
    /// "Not found" is a miss; any other stat failure is an error, since it is
    /// unknown whether the entry exists.
    pub async fn exists(&self, path: &Path) -> MirrorResult<bool> {
        match fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MirrorError::io(format!("checking {}", path.display()), e)),
        }
    }
}

/// Removes a freshly created cache entry unless committed.
///
/// Armed only for files created by the current invocation, so a
/// pre-existing entry is never removed.
#[derive(Debug)]
pub struct CacheGuard {
    path: PathBuf,
    committed: bool,
}

impl CacheGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the entry on disk
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for CacheGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
