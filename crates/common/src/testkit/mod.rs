/// In-process stand-ins for the directory service and the filesystem
///
/// These let reconciliation and orchestration be tested without an LDAP
/// server or a cluster.
///
/// # Example
///
/// ```rust,ignore
/// use common::prelude::*;
/// use common::testkit::{MemoryConnector, MemoryFs, StaticDirectory};
///
/// #[tokio::test]
/// async fn test_provisions_alice() {
///     let fs = MemoryFs::new();
///     let directory = StaticDirectory::with_users(["alice"]);
///     let connector = MemoryConnector::new(fs.clone());
///
///     run(&directory, &connector, &Reconciler::new("hdfs", "hadoop"))
///         .await
///         .unwrap();
///
///     assert!(fs.node(&ResourcePath::secret(&"alice".parse().unwrap())).is_some());
/// }
/// ```
mod memory_fs;
mod static_directory;

pub use memory_fs::{FsCall, MemoryConnector, MemoryFs, Node, NodeKind};
pub use static_directory::StaticDirectory;
