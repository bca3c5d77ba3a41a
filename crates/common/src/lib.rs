/**
 * Capability trait for the directory service
 *  that supplies authorized user identifiers.
 */
pub mod directory;
pub mod error;
/**
 * Capability traits for the distributed
 *  filesystem: an open handle and the
 *  connector that acquires one.
 */
pub mod fs;
/**
 * Where things live: the shared home root,
 *  per-user homes and secret files.
 */
pub mod layout;
/**
 * Drives one provisioning pass from
 *  directory lookup to reconciled filesystem.
 */
pub mod orchestrator;
pub mod permission;
/**
 * The reconciliation algorithm: create what
 *  is missing, never touch what exists.
 */
pub mod reconcile;
pub mod secret;
/**
 * In-memory fakes for tests.
 */
pub mod testkit;
pub mod user;

pub mod prelude {
    pub use crate::directory::DirectorySource;
    pub use crate::error::{BoxError, DirectoryError, FilesystemError, FsOp, ProvisionError};
    pub use crate::fs::{Connect, FileSystem};
    pub use crate::layout::{ResourcePath, HOME_ROOT, SECRET_FILE_NAME};
    pub use crate::orchestrator::run;
    pub use crate::permission::{Access, Ownership, Permission};
    pub use crate::reconcile::{ReconcileReport, Reconciler};
    pub use crate::secret::{Secret, SecretGenerator, SECRET_LENGTH};
    pub use crate::user::{InvalidUserId, UserId};
}
