//! Brings the filesystem up to one home and one secret per user.
//!
//! Existence is the only signal: anything already present is left exactly as
//! it is, including its permissions and ownership. Ownership and permissions
//! are applied right after each individual creation, so an aborted run leaves
//! every created resource configured (bar a kill between the two calls).

use std::fmt;

use bytes::Bytes;

use crate::error::FilesystemError;
use crate::fs::FileSystem;
use crate::layout::ResourcePath;
use crate::permission::{Ownership, Permission};
use crate::secret::SecretGenerator;
use crate::user::UserId;

/// What a reconciliation pass created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub users: usize,
    pub root_created: bool,
    pub homes_created: usize,
    pub secrets_created: usize,
}

impl ReconcileReport {
    /// True if the pass changed nothing
    pub fn is_noop(&self) -> bool {
        !self.root_created && self.homes_created == 0 && self.secrets_created == 0
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reconciled {} users: root {}, {} homes created, {} secrets created",
            self.users,
            if self.root_created {
                "created"
            } else {
                "present"
            },
            self.homes_created,
            self.secrets_created
        )
    }
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    /// Owner of the shared root; its group also owns every user resource
    service: Ownership,
    generator: SecretGenerator,
}

impl Reconciler {
    pub fn new(service_user: impl Into<String>, service_group: impl Into<String>) -> Self {
        Self {
            service: Ownership::new(service_user, service_group),
            generator: SecretGenerator::new(),
        }
    }

    pub fn service(&self) -> &Ownership {
        &self.service
    }

    /// Ensure the shared root, then each user's home and secret, in order.
    ///
    /// The first filesystem error aborts the pass; users handled before it
    /// stay provisioned and later users are not attempted.
    pub async fn reconcile<F>(
        &self,
        fs: &F,
        users: &[UserId],
    ) -> Result<ReconcileReport, FilesystemError>
    where
        F: FileSystem + ?Sized,
    {
        let mut report = ReconcileReport {
            users: users.len(),
            ..Default::default()
        };

        report.root_created = self.ensure_root(fs).await?;

        for user in users {
            if self.ensure_home(fs, user).await? {
                report.homes_created += 1;
            }
            if self.ensure_secret(fs, user).await? {
                report.secrets_created += 1;
            }
        }

        tracing::info!(
            users = report.users,
            root_created = report.root_created,
            homes_created = report.homes_created,
            secrets_created = report.secrets_created,
            "reconciliation complete"
        );

        Ok(report)
    }

    async fn ensure_root<F>(&self, fs: &F) -> Result<bool, FilesystemError>
    where
        F: FileSystem + ?Sized,
    {
        let root = ResourcePath::root();
        self.ensure_directory(fs, &root, Permission::SHARED_ROOT, &self.service)
            .await
    }

    async fn ensure_home<F>(&self, fs: &F, user: &UserId) -> Result<bool, FilesystemError>
    where
        F: FileSystem + ?Sized,
    {
        let home = ResourcePath::home(user);
        let owner = self.user_ownership(user);
        self.ensure_directory(fs, &home, Permission::OWNER_READ_ONLY, &owner)
            .await
    }

    async fn ensure_directory<F>(
        &self,
        fs: &F,
        path: &ResourcePath,
        permission: Permission,
        owner: &Ownership,
    ) -> Result<bool, FilesystemError>
    where
        F: FileSystem + ?Sized,
    {
        tracing::info!(%path, "checking if path exists");
        if fs.exists(path).await? {
            return Ok(false);
        }

        tracing::info!(%path, %permission, %owner, "creating directory");
        fs.mkdirs(path).await?;
        fs.set_permission(path, permission).await?;
        fs.set_owner(path, owner).await?;
        Ok(true)
    }

    async fn ensure_secret<F>(&self, fs: &F, user: &UserId) -> Result<bool, FilesystemError>
    where
        F: FileSystem + ?Sized,
    {
        let path = ResourcePath::secret(user);
        tracing::info!(%path, "checking if path exists");
        if fs.exists(&path).await? {
            return Ok(false);
        }

        tracing::info!(%path, %user, "creating secret");
        let content = Bytes::copy_from_slice(self.generator.generate().as_bytes());
        fs.create(&path, content).await?;

        fs.set_owner(&path, &self.user_ownership(user)).await?;
        fs.set_permission(&path, Permission::OWNER_READ_ONLY).await?;
        Ok(true)
    }

    fn user_ownership(&self, user: &UserId) -> Ownership {
        Ownership::new(user.as_str(), self.service.group.clone())
    }
}
