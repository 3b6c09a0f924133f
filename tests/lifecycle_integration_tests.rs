// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end lifecycle scenarios driven through the public surface:
//! bundles are laid out as directories on disk, resolved through the local
//! directory resolver, and traffic is checked through the dispatcher glue
//! the way a front door would.

use appmount::application::dispatcher::MountDispatcher;
use appmount::application::lifecycle::{
    LifecycleError, LifecycleService, StandardLifecycleService,
};
use appmount::domain::mount::{MountPath, Namespace};
use appmount::domain::registry::MountRegistry;
use appmount::domain::source::{BundleLocator, SourceResolver};
use appmount::domain::store::PersistentStore as _;
use appmount::infrastructure::event_bus::EventBus;
use appmount::infrastructure::executor::StandardScriptExecutor;
use appmount::infrastructure::registry::InMemoryMountRegistry;
use appmount::infrastructure::resolvers::LocalDirectoryResolver;
use appmount::infrastructure::store::InMemoryStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn namespace(name: &str) -> Namespace {
    let registry: Arc<dyn MountRegistry> = Arc::new(InMemoryMountRegistry::new());
    Namespace::new(name, registry, Arc::new(InMemoryStore::new()))
}

fn service() -> StandardLifecycleService {
    StandardLifecycleService::new(
        Arc::new(LocalDirectoryResolver::new()) as Arc<dyn SourceResolver>,
        Arc::new(StandardScriptExecutor::new()),
        Arc::new(EventBus::with_default_capacity()),
    )
}

fn mount(path: &str) -> MountPath {
    MountPath::parse(path).unwrap()
}

/// GET through the dispatcher, returning the status a front door would send.
fn get(ns: &Namespace, mp: &MountPath, path: &str) -> u16 {
    MountDispatcher::new().dispatch(ns, mp, path).status()
}

/// Write an app directory: routes plus optional setup/teardown collections.
fn write_app(
    dir: &Path,
    name: &str,
    routes: &str,
    setup_collection: Option<&str>,
    teardown_collection: Option<&str>,
) -> BundleLocator {
    let mut scripts = Vec::new();
    if setup_collection.is_some() {
        scripts.push(r#""setup": "scripts/setup.json""#.to_string());
    }
    if teardown_collection.is_some() {
        scripts.push(r#""teardown": "scripts/teardown.json""#.to_string());
    }
    let manifest = format!(
        r#"{{"name": "{name}", "version": "1.0.0", "main": "index.json", "scripts": {{{}}}}}"#,
        scripts.join(", ")
    );
    fs::create_dir_all(dir.join("scripts")).unwrap();
    fs::write(dir.join("manifest.json"), manifest).unwrap();
    fs::write(dir.join("index.json"), routes).unwrap();
    if let Some(collection) = setup_collection {
        fs::write(
            dir.join("scripts/setup.json"),
            format!(r#"[{{"op": "create-collection", "collection": "{collection}"}}]"#),
        )
        .unwrap();
    }
    if let Some(collection) = teardown_collection {
        fs::write(
            dir.join("scripts/teardown.json"),
            format!(r#"[{{"op": "drop-collection", "collection": "{collection}"}}]"#),
        )
        .unwrap();
    }
    BundleLocator::Local {
        path: dir.to_path_buf(),
    }
}

fn write_broken_app(dir: &Path) -> BundleLocator {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("manifest.json"),
        r#"{"name": "broken-controller-file", "version": "1.0.0", "main": "index.json"}"#,
    )
    .unwrap();
    fs::write(dir.join("index.json"), "{ this is not json }").unwrap();
    BundleLocator::Local {
        path: dir.to_path_buf(),
    }
}

const TEST_ROUTES: &str = r#"{"routes": {"/test": {"status": 200, "body": "ok"}}}"#;

#[tokio::test]
async fn same_mount_point_in_different_namespaces_stays_isolated() {
    let base = TempDir::new().unwrap();
    let service = service();
    let ns1 = namespace("tmpFMDB");
    let ns2 = namespace("tmpFMDB2");
    let app = write_app(&base.path().join("itzpapalotl"), "itzpapalotl", TEST_ROUTES, None, None);

    service.install(&ns1, &app, &mount("/unittest")).await.unwrap();

    assert_eq!(get(&ns1, &mount("/unittest"), "/test"), 200);
    assert_eq!(get(&ns2, &mount("/unittest"), "/test"), 404);
}

#[tokio::test]
async fn install_then_force_uninstall_from_local_directory() {
    let base = TempDir::new().unwrap();
    let service = service();
    let ns = namespace("tmpFMDB");
    let app = write_app(&base.path().join("itzpapalotl"), "itzpapalotl", TEST_ROUTES, None, None);
    let mp = mount("/itz");

    service.install(&ns, &app, &mp).await.unwrap();
    assert_eq!(get(&ns, &mp, "/test"), 200);

    service.uninstall(&ns, &mp, true).await.unwrap();
    assert_eq!(get(&ns, &mp, "/test"), 404);

    // Forced uninstall of the now-absent mount is a clean no-op.
    assert!(service.uninstall(&ns, &mp, true).await.unwrap().is_none());
}

#[tokio::test]
async fn upgrade_runs_setup_but_not_teardown_and_survives_broken_candidates() {
    let base = TempDir::new().unwrap();
    let service = service();
    let ns = namespace("tmpFMDB");
    let mp = mount("/unittest/upgrade");

    let initial = write_app(
        &base.path().join("minimal-working-setup-teardown"),
        "minimal-working-setup-teardown",
        TEST_ROUTES,
        Some("unittest_upgrade_setup_teardown"),
        Some("unittest_upgrade_setup_teardown"),
    );
    let upgraded = write_app(
        &base.path().join("minimal-working-setup"),
        "minimal-working-setup",
        TEST_ROUTES,
        Some("unittest_upgrade_setup"),
        None,
    );
    let broken = write_broken_app(&base.path().join("broken-controller-file"));

    service.install(&ns, &initial, &mp).await.unwrap();
    assert!(ns.store().collection_exists("unittest_upgrade_setup_teardown").await);
    assert_eq!(get(&ns, &mp, "/test"), 200);

    // A broken candidate leaves the old app reachable and its state alone.
    let err = service.upgrade(&ns, &broken, &mp).await.unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidBundle(_)));
    assert_eq!(get(&ns, &mp, "/test"), 200);
    assert!(ns.store().collection_exists("unittest_upgrade_setup_teardown").await);

    // A valid upgrade runs the new setup and never the old teardown.
    service.upgrade(&ns, &upgraded, &mp).await.unwrap();
    assert!(ns.store().collection_exists("unittest_upgrade_setup").await);
    assert!(ns.store().collection_exists("unittest_upgrade_setup_teardown").await);
    assert_eq!(get(&ns, &mp, "/test"), 200);
}

#[tokio::test]
async fn replace_tears_down_swaps_and_reruns_setup() {
    let base = TempDir::new().unwrap();
    let service = service();
    let ns = namespace("tmpFMDB");
    let mp = mount("/unittest/replace");

    let initial = write_app(
        &base.path().join("minimal-working-setup-teardown"),
        "minimal-working-setup-teardown",
        r#"{"routes": {"/test": {"status": 200, "body": "ok"}, "/old-only": {"status": 200, "body": "old"}}}"#,
        Some("unittest_replace_setup_teardown"),
        Some("unittest_replace_setup_teardown"),
    );
    let replacement = write_app(
        &base.path().join("minimal-working-setup"),
        "minimal-working-setup",
        TEST_ROUTES,
        Some("unittest_replace_setup"),
        None,
    );
    let broken = write_broken_app(&base.path().join("broken-controller-file"));

    service.install(&ns, &initial, &mp).await.unwrap();
    assert_eq!(get(&ns, &mp, "/old-only"), 200);

    // With a broken candidate nothing is destroyed and nothing swaps.
    let err = service.replace(&ns, &broken, &mp).await.unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidBundle(_)));
    assert_eq!(get(&ns, &mp, "/old-only"), 200);
    assert!(ns.store().collection_exists("unittest_replace_setup_teardown").await);

    // A valid replacement tears down the old state, swaps, and sets up.
    service.replace(&ns, &replacement, &mp).await.unwrap();
    assert!(!ns.store().collection_exists("unittest_replace_setup_teardown").await);
    assert!(ns.store().collection_exists("unittest_replace_setup").await);
    // The original app is gone: its private route no longer answers.
    assert_eq!(get(&ns, &mp, "/old-only"), 404);
    assert_eq!(get(&ns, &mp, "/test"), 200);
}

#[tokio::test]
async fn replace_setup_recreates_the_collection_old_teardown_drops() {
    let base = TempDir::new().unwrap();
    let service = service();
    let ns = namespace("tmpFMDB");
    let mp = mount("/unittest/replace-shared");

    // Both apps claim the same collection. The replacement's setup can only
    // create it after the old teardown has dropped it, and only once; any
    // other order or a repeated setup would collide and surface SetupFailed.
    let initial = write_app(
        &base.path().join("minimal-working-setup-teardown"),
        "minimal-working-setup-teardown",
        TEST_ROUTES,
        Some("unittest_shared"),
        Some("unittest_shared"),
    );
    let replacement = write_app(
        &base.path().join("minimal-working-setup"),
        "minimal-working-setup",
        TEST_ROUTES,
        Some("unittest_shared"),
        None,
    );

    service.install(&ns, &initial, &mp).await.unwrap();
    assert!(ns.store().collection_exists("unittest_shared").await);

    service.replace(&ns, &replacement, &mp).await.unwrap();
    assert!(ns.store().collection_exists("unittest_shared").await);
    assert_eq!(get(&ns, &mp, "/test"), 200);
}

#[tokio::test]
async fn registry_swap_is_observable_as_exactly_one_active_bundle() {
    let base = TempDir::new().unwrap();
    let service = Arc::new(service());
    let ns = namespace("tmpFMDB");
    let mp = mount("/swap");

    let a = write_app(&base.path().join("a"), "a", TEST_ROUTES, None, None);
    let b = write_app(&base.path().join("b"), "b", TEST_ROUTES, None, None);
    service.install(&ns, &a, &mp).await.unwrap();

    let reader = {
        let ns = ns.clone();
        let mp = mp.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let entry = ns.registry().lookup(&mp).expect("mount never absent mid-swap");
                let name = entry.descriptor.name();
                assert!(name == "a" || name == "b", "torn entry: {name}");
                tokio::task::yield_now().await;
            }
        })
    };

    for _ in 0..10 {
        service.replace(&ns, &b, &mp).await.unwrap();
        service.replace(&ns, &a, &mp).await.unwrap();
    }
    reader.await.unwrap();
}
