use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::sync::{mpsc, oneshot};

use super::debouncer::{ChangeKind, DEBOUNCE_MS, Debouncer, is_temp_file};
use super::router::Router;
use super::{FsActor, dispatch};
use crate::actor::messages::SyncOp;
use crate::utils::path::normalize_path;

fn make_theme() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path()).join("theme");
    std::fs::create_dir_all(root.join("snippets")).unwrap();
    std::fs::create_dir_all(root.join("sections")).unwrap();
    (temp, root)
}

fn make_event<P: AsRef<Path>>(paths: Vec<P>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn rename_kind(mode: notify::event::RenameMode) -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Name(mode))
}

fn after_window() -> Instant {
    Instant::now() + Duration::from_millis(DEBOUNCE_MS)
}

fn kinds(changes: &[(PathBuf, ChangeKind)]) -> Vec<ChangeKind> {
    changes.iter().map(|(_, kind)| *kind).collect()
}

// ----------------------------------------------------------------------------
// Debouncer
// ----------------------------------------------------------------------------

#[test]
fn test_debouncer_empty() {
    let mut debouncer = Debouncer::new();
    assert!(debouncer.take_ready_at(after_window()).is_empty());
    assert!(debouncer.sleep_duration() >= Duration::from_secs(60));
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec![Path::new("/tmp/a.liquid")], create_kind()));
    debouncer.add_event(&make_event(vec![Path::new("/tmp/b.liquid")], modify_kind()));
    debouncer.add_event(&make_event(vec![Path::new("/tmp/c.liquid")], remove_kind()));

    let changes = debouncer.take_ready_at(after_window());
    assert_eq!(
        changes,
        vec![
            (PathBuf::from("/tmp/a.liquid"), ChangeKind::Upsert),
            (PathBuf::from("/tmp/b.liquid"), ChangeKind::Upsert),
            (PathBuf::from("/tmp/c.liquid"), ChangeKind::Remove),
        ]
    );
}

#[test]
fn test_not_ready_within_window() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec![Path::new("/tmp/a.liquid")], modify_kind()));

    assert!(debouncer.take_ready_at(Instant::now()).is_empty());
    assert_eq!(debouncer.changes.len(), 1);
    assert!(debouncer.sleep_duration() <= Duration::from_millis(DEBOUNCE_MS));
}

#[test]
fn test_rapid_edits_coalesce() {
    let mut debouncer = Debouncer::new();
    let path = Path::new("/tmp/a.liquid");

    for _ in 0..5 {
        debouncer.add_event(&make_event(vec![path], modify_kind()));
    }

    let changes = debouncer.take_ready_at(after_window());
    assert_eq!(changes, vec![(path.to_path_buf(), ChangeKind::Upsert)]);
}

#[test]
fn test_latest_intent_wins() {
    let mut debouncer = Debouncer::new();
    let path = Path::new("/tmp/a.liquid");

    debouncer.add_event(&make_event(vec![path], create_kind()));
    debouncer.add_event(&make_event(vec![path], remove_kind()));
    assert_eq!(kinds(&debouncer.take_ready_at(after_window())), vec![ChangeKind::Remove]);

    debouncer.add_event(&make_event(vec![path], remove_kind()));
    debouncer.add_event(&make_event(vec![path], create_kind()));
    assert_eq!(kinds(&debouncer.take_ready_at(after_window())), vec![ChangeKind::Upsert]);
}

#[test]
fn test_per_path_windows() {
    let mut debouncer = Debouncer::new();
    let start = Instant::now();
    let window = Duration::from_millis(DEBOUNCE_MS);

    debouncer.record_at(Path::new("/tmp/old.liquid"), ChangeKind::Upsert, start);
    debouncer.record_at(
        Path::new("/tmp/new.liquid"),
        ChangeKind::Upsert,
        start + window / 2,
    );

    let first = debouncer.take_ready_at(start + window);
    assert_eq!(first, vec![(PathBuf::from("/tmp/old.liquid"), ChangeKind::Upsert)]);

    let second = debouncer.take_ready_at(start + window * 2);
    assert_eq!(second, vec![(PathBuf::from("/tmp/new.liquid"), ChangeKind::Upsert)]);
}

#[test]
fn test_first_receipt_order_preserved() {
    let mut debouncer = Debouncer::new();
    let now = Instant::now();

    debouncer.record_at(Path::new("/tmp/z.liquid"), ChangeKind::Upsert, now);
    debouncer.record_at(Path::new("/tmp/a.liquid"), ChangeKind::Remove, now);
    debouncer.record_at(Path::new("/tmp/m.liquid"), ChangeKind::Upsert, now);
    // a later event on the first path does not move it back in line
    debouncer.record_at(Path::new("/tmp/z.liquid"), ChangeKind::Remove, now);

    let paths: Vec<_> = debouncer
        .take_all()
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/tmp/z.liquid"),
            PathBuf::from("/tmp/a.liquid"),
            PathBuf::from("/tmp/m.liquid"),
        ]
    );
}

#[test]
fn test_metadata_and_access_ignored() {
    let mut debouncer = Debouncer::new();
    let path = Path::new("/tmp/a.liquid");

    debouncer.add_event(&make_event(
        vec![path],
        notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
            notify::event::MetadataKind::WriteTime,
        )),
    ));
    debouncer.add_event(&make_event(
        vec![path],
        notify::EventKind::Access(notify::event::AccessKind::Close(
            notify::event::AccessMode::Write,
        )),
    ));

    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_temp_files_ignored() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(
        vec![
            Path::new("/tmp/.hero.liquid.swp"),
            Path::new("/tmp/hero.liquid~"),
            Path::new("/tmp/4913.tmp"),
        ],
        create_kind(),
    ));

    assert!(debouncer.changes.is_empty());
    assert!(is_temp_file(Path::new("/tmp/.DS_Store")));
    assert!(!is_temp_file(Path::new("/tmp/hero.liquid")));
}

#[test]
fn test_folder_events_ignored() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(
        vec![Path::new("/tmp/blocks")],
        notify::EventKind::Create(notify::event::CreateKind::Folder),
    ));
    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_rename_halves() {
    use notify::event::RenameMode;

    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(
        vec![Path::new("/tmp/old.liquid")],
        rename_kind(RenameMode::From),
    ));
    debouncer.add_event(&make_event(
        vec![Path::new("/tmp/new.liquid")],
        rename_kind(RenameMode::To),
    ));

    assert_eq!(
        debouncer.take_all(),
        vec![
            (PathBuf::from("/tmp/old.liquid"), ChangeKind::Remove),
            (PathBuf::from("/tmp/new.liquid"), ChangeKind::Upsert),
        ]
    );
}

#[test]
fn test_rename_both() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(
        vec![Path::new("/tmp/old.liquid"), Path::new("/tmp/new.liquid")],
        rename_kind(notify::event::RenameMode::Both),
    ));

    assert_eq!(
        debouncer.take_all(),
        vec![
            (PathBuf::from("/tmp/old.liquid"), ChangeKind::Remove),
            (PathBuf::from("/tmp/new.liquid"), ChangeKind::Upsert),
        ]
    );
}

#[test]
fn test_rename_any_resolved_by_existence() {
    let (_temp, root) = make_theme();
    let present = root.join("snippets/present.liquid");
    std::fs::write(&present, "x").unwrap();
    let gone = root.join("snippets/gone.liquid");

    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(
        vec![&present, &gone],
        rename_kind(notify::event::RenameMode::Any),
    ));

    assert_eq!(
        debouncer.take_all(),
        vec![(present, ChangeKind::Upsert), (gone, ChangeKind::Remove)]
    );
}

// ----------------------------------------------------------------------------
// Router
// ----------------------------------------------------------------------------

#[test]
fn test_route_upload_and_delete() {
    let (_temp, root) = make_theme();
    let file = root.join("sections/hero.liquid");
    std::fs::write(&file, "hello").unwrap();
    let mut router = Router::new(root);

    assert_eq!(
        router.route(&file, ChangeKind::Upsert),
        vec![SyncOp::Upload {
            key: "sections/hero.liquid".into(),
            path: file.clone(),
        }]
    );
    assert_eq!(
        router.route(&file, ChangeKind::Remove),
        vec![SyncOp::Delete {
            key: "sections/hero.liquid".into()
        }]
    );
}

#[test]
fn test_route_ignores_outside_theme() {
    let (temp, root) = make_theme();
    let outside = normalize_path(temp.path()).join("framework.toml");
    let mut router = Router::new(root);
    assert!(router.route(&outside, ChangeKind::Upsert).is_empty());
    assert!(router.route(&outside, ChangeKind::Remove).is_empty());
}

#[test]
fn test_route_ignores_directories() {
    let (_temp, root) = make_theme();
    let mut router = Router::new(root.clone());
    assert!(router.route(&root.join("snippets"), ChangeKind::Upsert).is_empty());
    assert!(router.route(&root, ChangeKind::Remove).is_empty());
}

#[test]
fn test_removed_directory_deletes_each_asset() {
    let (_temp, root) = make_theme();
    std::fs::create_dir_all(root.join("snippets/cards")).unwrap();
    std::fs::write(root.join("snippets/a.liquid"), "a").unwrap();
    std::fs::write(root.join("snippets/cards/b.liquid"), "b").unwrap();
    std::fs::write(root.join("sections/hero.liquid"), "h").unwrap();
    let mut router = Router::new(root.clone());

    // Renamed away: the directory is gone by the time it is routed
    std::fs::rename(root.join("snippets"), root.join("old-snippets")).unwrap();
    let keys: Vec<String> = router
        .route(&root.join("snippets"), ChangeKind::Remove)
        .iter()
        .map(|op| op.key().to_string())
        .collect();
    assert_eq!(keys, vec!["snippets/a.liquid", "snippets/cards/b.liquid"]);

    // Already forgotten; a second removal is a plain delete
    assert_eq!(
        router.route(&root.join("snippets"), ChangeKind::Remove),
        vec![SyncOp::Delete {
            key: "snippets".into()
        }]
    );
}

#[test]
fn test_removed_directory_learns_new_files() {
    let (_temp, root) = make_theme();
    let mut router = Router::new(root.clone());
    let file = root.join("snippets/new.liquid");
    std::fs::write(&file, "n").unwrap();

    router.route(&file, ChangeKind::Upsert);
    assert_eq!(
        router.route(&root.join("snippets"), ChangeKind::Remove),
        vec![SyncOp::Delete {
            key: "snippets/new.liquid".into()
        }]
    );
}

// ----------------------------------------------------------------------------
// Pipeline: notify event -> SyncOp
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_event_sends_single_delete() {
    let (_temp, root) = make_theme();
    let file = root.join("snippets/x.liquid");

    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec![&file], remove_kind()));

    let (tx, mut rx) = mpsc::channel(8);
    dispatch(debouncer.take_ready_at(after_window()), &mut Router::new(root.clone()), &tx)
        .await
        .unwrap();
    drop(tx);

    let mut ops = Vec::new();
    while let Some(op) = rx.recv().await {
        ops.push(op);
    }
    assert_eq!(
        ops,
        vec![SyncOp::Delete {
            key: "snippets/x.liquid".into()
        }]
    );
}

#[tokio::test]
async fn test_rename_sends_delete_then_upload() {
    let (_temp, root) = make_theme();
    let old = root.join("snippets/old.liquid");
    let new = root.join("snippets/new.liquid");
    std::fs::write(&new, "{{ x }}").unwrap();

    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(
        vec![&old, &new],
        rename_kind(notify::event::RenameMode::Both),
    ));

    let (tx, mut rx) = mpsc::channel(8);
    dispatch(debouncer.take_all(), &mut Router::new(root.clone()), &tx)
        .await
        .unwrap();

    assert_eq!(
        rx.recv().await,
        Some(SyncOp::Delete {
            key: "snippets/old.liquid".into()
        })
    );
    assert_eq!(
        rx.recv().await,
        Some(SyncOp::Upload {
            key: "snippets/new.liquid".into(),
            path: new,
        })
    );
}

#[tokio::test]
async fn test_dispatch_reports_closed_receiver() {
    let (_temp, root) = make_theme();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let changes = vec![(root.join("snippets/x.liquid"), ChangeKind::Remove)];
    assert!(
        dispatch(changes, &mut Router::new(root.clone()), &tx)
            .await
            .is_err()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_flushes_changes_inside_debounce_window() {
    let (_temp, root) = make_theme();
    let (tx, mut rx) = mpsc::channel(16);
    let actor = FsActor::new(root.clone(), tx).unwrap();
    let (stop_tx, stop_rx) = oneshot::channel();
    let handle = tokio::spawn(actor.run(stop_rx));

    std::fs::write(root.join("snippets/fresh.liquid"), "x").unwrap();
    tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS / 4)).await;
    stop_tx.send(()).unwrap();
    handle.await.unwrap();

    let mut ops = Vec::new();
    while let Some(op) = rx.recv().await {
        ops.push(op);
    }
    assert_eq!(
        ops,
        vec![SyncOp::Upload {
            key: "snippets/fresh.liquid".into(),
            path: root.join("snippets/fresh.liquid"),
        }]
    );
}
