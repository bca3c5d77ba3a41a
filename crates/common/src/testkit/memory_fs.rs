//! In-memory filesystem for exercising the reconciler without a cluster.
//!
//! Every call is journaled, failures can be injected per operation and path,
//! and connects/closes are counted so handle lifecycle can be asserted.

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::{FilesystemError, FsOp};
use crate::fs::{Connect, FileSystem};
use crate::layout::ResourcePath;
use crate::permission::{Ownership, Permission};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File(Bytes),
}

/// A stored path with whatever ownership and permission were applied to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub owner: Option<Ownership>,
    pub permission: Option<Permission>,
}

impl Node {
    fn directory() -> Self {
        Self {
            kind: NodeKind::Directory,
            owner: None,
            permission: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    pub fn content(&self) -> Option<&Bytes> {
        match &self.kind {
            NodeKind::File(content) => Some(content),
            NodeKind::Directory => None,
        }
    }
}

/// One recorded filesystem call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsCall {
    pub op: FsOp,
    pub path: String,
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<String, Node>,
    journal: Vec<FsCall>,
    failures: Vec<(FsOp, String)>,
    fail_close: bool,
    connects: usize,
    closes: usize,
}

/// Shared in-memory filesystem. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    state: Arc<Mutex<State>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `op` on `path` fail with an I/O error
    pub fn fail_on(&self, op: FsOp, path: &ResourcePath) {
        self.state
            .lock()
            .failures
            .push((op, path.as_str().to_string()));
    }

    /// Make every future `close` fail after counting the close
    pub fn fail_on_close(&self) {
        self.state.lock().fail_close = true;
    }

    /// Insert a directory as if it had been created out of band
    pub fn seed_directory(
        &self,
        path: &ResourcePath,
        owner: Option<Ownership>,
        permission: Option<Permission>,
    ) {
        let mut state = self.state.lock();
        insert_parents(&mut state.nodes, path.as_str());
        state.nodes.insert(
            path.as_str().to_string(),
            Node {
                kind: NodeKind::Directory,
                owner,
                permission,
            },
        );
    }

    /// Insert a file as if it had been created out of band
    pub fn seed_file(&self, path: &ResourcePath, content: impl Into<Bytes>) {
        let mut state = self.state.lock();
        insert_parents(&mut state.nodes, path.as_str());
        state.nodes.insert(
            path.as_str().to_string(),
            Node {
                kind: NodeKind::File(content.into()),
                owner: None,
                permission: None,
            },
        );
    }

    pub fn node(&self, path: &ResourcePath) -> Option<Node> {
        self.state.lock().nodes.get(path.as_str()).cloned()
    }

    pub fn content(&self, path: &ResourcePath) -> Option<Bytes> {
        self.node(path).and_then(|node| node.content().cloned())
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.lock().nodes.keys().cloned().collect()
    }

    pub fn journal(&self) -> Vec<FsCall> {
        self.state.lock().journal.clone()
    }

    /// Journal entries that changed something (everything but `exists`)
    pub fn mutations(&self) -> Vec<FsCall> {
        self.journal()
            .into_iter()
            .filter(|call| call.op != FsOp::Exists)
            .collect()
    }

    pub fn clear_journal(&self) {
        self.state.lock().journal.clear();
    }

    pub fn connects(&self) -> usize {
        self.state.lock().connects
    }

    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }

    fn record(&self, op: FsOp, path: &ResourcePath) -> Result<(), FilesystemError> {
        let mut state = self.state.lock();
        state.journal.push(FsCall {
            op,
            path: path.as_str().to_string(),
        });
        let injected = state
            .failures
            .iter()
            .any(|(failing_op, failing_path)| *failing_op == op && failing_path == path.as_str());
        if injected {
            return Err(FilesystemError::operation(
                op,
                path,
                io::Error::other("injected failure"),
            ));
        }
        Ok(())
    }

    fn update<T>(
        &self,
        op: FsOp,
        path: &ResourcePath,
        f: impl FnOnce(&mut Node) -> T,
    ) -> Result<T, FilesystemError> {
        let mut state = self.state.lock();
        match state.nodes.get_mut(path.as_str()) {
            Some(node) => Ok(f(node)),
            None => Err(FilesystemError::operation(
                op,
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            )),
        }
    }
}

fn insert_parents(nodes: &mut BTreeMap<String, Node>, path: &str) {
    let mut current = String::new();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        current.push('/');
        current.push_str(segment);
        nodes.entry(current.clone()).or_insert_with(Node::directory);
    }
}

#[async_trait::async_trait]
impl FileSystem for MemoryFs {
    async fn exists(&self, path: &ResourcePath) -> Result<bool, FilesystemError> {
        self.record(FsOp::Exists, path)?;
        Ok(self.state.lock().nodes.contains_key(path.as_str()))
    }

    async fn mkdirs(&self, path: &ResourcePath) -> Result<(), FilesystemError> {
        self.record(FsOp::Mkdirs, path)?;
        let mut state = self.state.lock();
        if let Some(existing) = state.nodes.get(path.as_str()) {
            if existing.is_directory() {
                return Ok(());
            }
            return Err(FilesystemError::operation(
                FsOp::Mkdirs,
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "path is a file"),
            ));
        }
        insert_parents(&mut state.nodes, path.as_str());
        state
            .nodes
            .insert(path.as_str().to_string(), Node::directory());
        Ok(())
    }

    async fn create(&self, path: &ResourcePath, content: Bytes) -> Result<(), FilesystemError> {
        self.record(FsOp::Create, path)?;
        let mut state = self.state.lock();
        if state.nodes.contains_key(path.as_str()) {
            return Err(FilesystemError::operation(
                FsOp::Create,
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "file already exists"),
            ));
        }
        insert_parents(&mut state.nodes, path.as_str());
        state.nodes.insert(
            path.as_str().to_string(),
            Node {
                kind: NodeKind::File(content),
                owner: None,
                permission: None,
            },
        );
        Ok(())
    }

    async fn set_owner(
        &self,
        path: &ResourcePath,
        ownership: &Ownership,
    ) -> Result<(), FilesystemError> {
        self.record(FsOp::SetOwner, path)?;
        self.update(FsOp::SetOwner, path, |node| {
            node.owner = Some(ownership.clone())
        })
    }

    async fn set_permission(
        &self,
        path: &ResourcePath,
        permission: Permission,
    ) -> Result<(), FilesystemError> {
        self.record(FsOp::SetPermission, path)?;
        self.update(FsOp::SetPermission, path, |node| {
            node.permission = Some(permission)
        })
    }

    async fn close(self) -> Result<(), FilesystemError> {
        let mut state = self.state.lock();
        state.closes += 1;
        if state.fail_close {
            return Err(FilesystemError::close(io::Error::other("injected close failure")));
        }
        Ok(())
    }
}

/// Hands out handles onto one shared [`MemoryFs`].
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    fs: MemoryFs,
    refuse: bool,
}

impl MemoryConnector {
    pub fn new(fs: MemoryFs) -> Self {
        Self { fs, refuse: false }
    }

    /// A connector whose every connect attempt fails
    pub fn refusing(fs: MemoryFs) -> Self {
        Self { fs, refuse: true }
    }
}

#[async_trait::async_trait]
impl Connect for MemoryConnector {
    type Handle = MemoryFs;

    async fn connect(&self) -> Result<Self::Handle, FilesystemError> {
        self.fs.state.lock().connects += 1;
        if self.refuse {
            return Err(FilesystemError::connect(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(self.fs.clone())
    }
}
