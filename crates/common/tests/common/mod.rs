//! Shared test utilities for reconciliation integration tests
#![allow(dead_code)]

use ::common::prelude::*;
use ::common::testkit::MemoryFs;

pub const SERVICE_USER: &str = "hdfs";
pub const SERVICE_GROUP: &str = "hadoop";

/// Set up an empty in-memory filesystem and a reconciler for it
pub fn setup_test_env() -> (MemoryFs, Reconciler) {
    (MemoryFs::new(), Reconciler::new(SERVICE_USER, SERVICE_GROUP))
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

pub fn users(names: &[&str]) -> Vec<UserId> {
    names.iter().map(|name| user(name)).collect()
}

/// Assert that `name` has a fully configured home and secret
pub fn assert_provisioned(fs: &MemoryFs, name: &str) {
    let id = user(name);
    let owner = Ownership::new(name, SERVICE_GROUP);

    let home = fs
        .node(&ResourcePath::home(&id))
        .unwrap_or_else(|| panic!("home of {} missing", name));
    assert!(home.is_directory());
    assert_eq!(home.owner.as_ref(), Some(&owner));
    assert_eq!(home.permission, Some(Permission::OWNER_READ_ONLY));

    let secret = fs
        .node(&ResourcePath::secret(&id))
        .unwrap_or_else(|| panic!("secret of {} missing", name));
    let content = secret.content().expect("secret must be a file");
    assert_eq!(content.len(), SECRET_LENGTH);
    assert!(content.iter().all(|b| b.is_ascii_alphanumeric()));
    assert_eq!(secret.owner.as_ref(), Some(&owner));
    assert_eq!(secret.permission, Some(Permission::OWNER_READ_ONLY));
}
