//! Integration tests for the reconciliation pass against the in-memory filesystem

mod common;

use ::common::prelude::*;

use crate::common::{assert_provisioned, setup_test_env, user, users, SERVICE_GROUP, SERVICE_USER};

#[tokio::test]
async fn test_provisions_root_homes_and_secrets() {
    let (fs, reconciler) = setup_test_env();

    let report = reconciler
        .reconcile(&fs, &users(&["alice", "bob"]))
        .await
        .unwrap();

    assert_eq!(
        report,
        ReconcileReport {
            users: 2,
            root_created: true,
            homes_created: 2,
            secrets_created: 2,
        }
    );

    let root = fs.node(&ResourcePath::root()).unwrap();
    assert!(root.is_directory());
    assert_eq!(
        root.owner,
        Some(Ownership::new(SERVICE_USER, SERVICE_GROUP))
    );
    assert_eq!(root.permission, Some(Permission::SHARED_ROOT));

    assert_provisioned(&fs, "alice");
    assert_provisioned(&fs, "bob");
}

#[tokio::test]
async fn test_second_run_changes_nothing() {
    let (fs, reconciler) = setup_test_env();
    let users = users(&["alice", "bob", "carol"]);

    reconciler.reconcile(&fs, &users).await.unwrap();
    let first_secret = fs.content(&ResourcePath::secret(&user("bob"))).unwrap();
    fs.clear_journal();

    let report = reconciler.reconcile(&fs, &users).await.unwrap();

    assert!(report.is_noop());
    assert!(fs.mutations().is_empty());
    assert_eq!(
        fs.content(&ResourcePath::secret(&user("bob"))).unwrap(),
        first_secret
    );
}

#[tokio::test]
async fn test_existing_secret_is_never_regenerated() {
    let (fs, reconciler) = setup_test_env();
    let alice = user("alice");
    fs.seed_file(&ResourcePath::secret(&alice), "issued-long-ago");

    for _ in 0..3 {
        reconciler
            .reconcile(&fs, std::slice::from_ref(&alice))
            .await
            .unwrap();
    }

    assert_eq!(
        fs.content(&ResourcePath::secret(&alice)).unwrap(),
        "issued-long-ago"
    );
    assert!(fs
        .mutations()
        .iter()
        .all(|call| call.path != ResourcePath::secret(&alice).as_str()));
}

#[tokio::test]
async fn test_fresh_secret_grants_nothing_to_group_or_other() {
    let (fs, reconciler) = setup_test_env();

    reconciler.reconcile(&fs, &users(&["dave"])).await.unwrap();

    let secret = fs.node(&ResourcePath::secret(&user("dave"))).unwrap();
    let permission = secret.permission.unwrap();
    assert_eq!(permission.group, Access::NONE);
    assert_eq!(permission.other, Access::NONE);
    assert_eq!(permission.owner, Access::READ);
    assert!(permission.sticky);
}

#[tokio::test]
async fn test_failure_stops_at_failing_user() {
    let (fs, reconciler) = setup_test_env();
    let b_home = ResourcePath::home(&user("b"));
    fs.fail_on(FsOp::Mkdirs, &b_home);

    let err = reconciler
        .reconcile(&fs, &users(&["a", "b", "c"]))
        .await
        .unwrap_err();

    match err {
        FilesystemError::Operation { op, path, .. } => {
            assert_eq!(op, FsOp::Mkdirs);
            assert_eq!(path, b_home);
        }
        other => panic!("unexpected error: {}", other),
    }

    assert_provisioned(&fs, "a");
    assert!(fs.node(&b_home).is_none());
    assert!(fs
        .journal()
        .iter()
        .all(|call| !call.path.starts_with("/user/c")));
}

#[tokio::test]
async fn test_failed_secret_write_leaves_earlier_users_intact() {
    let (fs, reconciler) = setup_test_env();
    fs.fail_on(FsOp::Create, &ResourcePath::secret(&user("b")));

    let result = reconciler.reconcile(&fs, &users(&["a", "b", "c"])).await;

    assert!(result.is_err());
    assert_provisioned(&fs, "a");
    assert!(fs.node(&ResourcePath::home(&user("b"))).is_some());
    assert!(fs.node(&ResourcePath::secret(&user("b"))).is_none());
    assert!(fs.node(&ResourcePath::home(&user("c"))).is_none());
}

#[tokio::test]
async fn test_empty_user_list_creates_only_root() {
    let (fs, reconciler) = setup_test_env();

    let report = reconciler.reconcile(&fs, &[]).await.unwrap();

    assert!(report.root_created);
    assert_eq!(report.users, 0);
    assert_eq!(fs.paths(), vec!["/user".to_string()]);
    let ops: Vec<FsOp> = fs.mutations().into_iter().map(|call| call.op).collect();
    assert_eq!(
        ops,
        vec![FsOp::Mkdirs, FsOp::SetPermission, FsOp::SetOwner]
    );
}

#[tokio::test]
async fn test_existing_root_is_left_alone() {
    let (fs, reconciler) = setup_test_env();
    let odd_owner = Ownership::new("root", "root");
    let odd_permission = Permission {
        owner: Access::ALL,
        group: Access::ALL,
        other: Access::ALL,
        sticky: false,
    };
    fs.seed_directory(
        &ResourcePath::root(),
        Some(odd_owner.clone()),
        Some(odd_permission),
    );

    let report = reconciler.reconcile(&fs, &users(&["erin"])).await.unwrap();

    assert!(!report.root_created);
    let root = fs.node(&ResourcePath::root()).unwrap();
    assert_eq!(root.owner, Some(odd_owner));
    assert_eq!(root.permission, Some(odd_permission));
    assert!(fs.mutations().iter().all(|call| call.path != "/user"));
    assert_provisioned(&fs, "erin");
}

#[tokio::test]
async fn test_secret_is_owned_before_it_is_locked_down() {
    let (fs, reconciler) = setup_test_env();
    let secret = ResourcePath::secret(&user("frank"));

    reconciler.reconcile(&fs, &users(&["frank"])).await.unwrap();

    let ops: Vec<FsOp> = fs
        .mutations()
        .into_iter()
        .filter(|call| call.path == secret.as_str())
        .map(|call| call.op)
        .collect();
    assert_eq!(
        ops,
        vec![FsOp::Create, FsOp::SetOwner, FsOp::SetPermission]
    );
}

#[tokio::test]
async fn test_each_user_gets_a_distinct_secret() {
    let (fs, reconciler) = setup_test_env();
    let names = ["u1", "u2", "u3", "u4", "u5"];

    reconciler.reconcile(&fs, &users(&names)).await.unwrap();

    let mut secrets: Vec<_> = names
        .iter()
        .map(|name| fs.content(&ResourcePath::secret(&user(name))).unwrap())
        .collect();
    secrets.sort();
    secrets.dedup();
    assert_eq!(secrets.len(), names.len());
}
