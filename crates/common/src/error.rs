//! Error types for the directory and filesystem phases.

use std::fmt;

use crate::layout::ResourcePath;

/// Type-erased cause coming from a concrete client library
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Any failure reaching or querying the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to connect to directory at {url}: {source}")]
    Connect { url: String, source: BoxError },

    #[error("directory bind as {principal} rejected: {source}")]
    Bind { principal: String, source: BoxError },

    #[error("directory search under {base} failed: {source}")]
    Search { base: String, source: BoxError },
}

/// Filesystem operation that failed, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Exists,
    Mkdirs,
    Create,
    SetOwner,
    SetPermission,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsOp::Exists => "exists",
            FsOp::Mkdirs => "mkdirs",
            FsOp::Create => "create",
            FsOp::SetOwner => "set owner",
            FsOp::SetPermission => "set permission",
        };
        f.write_str(name)
    }
}

/// Any failure reaching, reading or writing the filesystem.
#[derive(Debug, thiserror::Error)]
pub enum FilesystemError {
    #[error("failed to connect to filesystem: {source}")]
    Connect { source: BoxError },

    #[error("{op} on {path} failed: {source}")]
    Operation {
        op: FsOp,
        path: ResourcePath,
        source: BoxError,
    },

    #[error("failed to close filesystem handle: {source}")]
    Close { source: BoxError },
}

impl FilesystemError {
    pub fn connect(source: impl Into<BoxError>) -> Self {
        Self::Connect {
            source: source.into(),
        }
    }

    pub fn operation(op: FsOp, path: &ResourcePath, source: impl Into<BoxError>) -> Self {
        Self::Operation {
            op,
            path: path.clone(),
            source: source.into(),
        }
    }

    pub fn close(source: impl Into<BoxError>) -> Self {
        Self::Close {
            source: source.into(),
        }
    }
}

/// Failure of a provisioning run, tagged with the phase that failed.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("directory phase failed: {0}")]
    Directory(#[from] DirectoryError),

    #[error("filesystem phase failed: {0}")]
    Filesystem(#[from] FilesystemError),
}

impl ProvisionError {
    pub fn phase(&self) -> &'static str {
        match self {
            ProvisionError::Directory(_) => "directory",
            ProvisionError::Filesystem(_) => "filesystem",
        }
    }
}
