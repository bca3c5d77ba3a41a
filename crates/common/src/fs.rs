//! Filesystem capability used by the reconciler.
//!
//! Only the handful of operations provisioning needs are modelled, so any
//! client (WebHDFS, a native HDFS binding, the in-memory testkit) can sit
//! behind it.

use bytes::Bytes;

use crate::error::FilesystemError;
use crate::layout::ResourcePath;
use crate::permission::{Ownership, Permission};

/// An open handle on the distributed filesystem.
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync {
    /// Whether anything (file or directory) exists at `path`.
    async fn exists(&self, path: &ResourcePath) -> Result<bool, FilesystemError>;

    /// Create `path` and any missing parents.
    async fn mkdirs(&self, path: &ResourcePath) -> Result<(), FilesystemError>;

    /// Create a new file holding exactly `content`.
    ///
    /// Must fail rather than overwrite if `path` already exists.
    async fn create(&self, path: &ResourcePath, content: Bytes) -> Result<(), FilesystemError>;

    async fn set_owner(
        &self,
        path: &ResourcePath,
        ownership: &Ownership,
    ) -> Result<(), FilesystemError>;

    async fn set_permission(
        &self,
        path: &ResourcePath,
        permission: Permission,
    ) -> Result<(), FilesystemError>;

    /// Release the handle. Consumes it, so it can only happen once.
    async fn close(self) -> Result<(), FilesystemError>
    where
        Self: Sized;
}

/// Acquires [`FileSystem`] handles.
#[async_trait::async_trait]
pub trait Connect: Send + Sync {
    type Handle: FileSystem;

    async fn connect(&self) -> Result<Self::Handle, FilesystemError>;
}
