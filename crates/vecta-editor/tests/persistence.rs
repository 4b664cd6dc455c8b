//! Integration tests: scene store persistence through a live session.
//!
//! Edits made by gestures must reach storage once activity pauses, survive a
//! reload into a fresh session, and never be lost to a failing backend.

use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use vecta_core::model::PathPoint;
use vecta_core::record::NodeRecord;
use vecta_core::{EditorConfig, NodeId};
use vecta_editor::{
    EditorSession, InputEvent, ManualClock, MemoryStore, PersistError, Persistence, SceneChange,
    TargetTags,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config() -> EditorConfig {
    EditorConfig::from_json(r#"{ "saveDebounceMs": 500 }"#).unwrap()
}

fn seeded<P: Persistence>(persistence: P, clock: &ManualClock) -> EditorSession<P> {
    init_logging();
    let mut session = EditorSession::new(config(), persistence, clock.clone());
    let blob = NodeRecord::object(
        Some("blob"),
        vec![PathPoint::corner(0.0, 0.0), PathPoint::corner(20.0, 20.0)],
    )
    .with_offset(10.0, 10.0);
    session
        .scene_mut()
        .add(NodeRecord::group(Some("layer"), vec![blob]))
        .unwrap();
    session
}

fn drag_blob<P: Persistence>(session: &mut EditorSession<P>, dx: f64) {
    session.handle_input(&InputEvent::down(1, 15.0, 15.0, TargetTags::node("blob")));
    session.handle_input(&InputEvent::moved(1, 15.0 + dx, 15.0));
    session.handle_input(&InputEvent::up(1, 15.0 + dx, 15.0));
}

// ─── Debounce ────────────────────────────────────────────────────────────

#[test]
fn drags_are_saved_once_activity_pauses() {
    let clock = ManualClock::default();
    let mut session = seeded(MemoryStore::new(), &clock);
    session.force_save();

    for _ in 0..5 {
        drag_blob(&mut session, 2.0);
        clock.advance(Duration::from_millis(300));
        assert!(!session.tick());
    }
    assert_eq!(session.scene().persistence().save_count(), 1);

    clock.advance(Duration::from_millis(200));
    assert!(session.tick());
    assert_eq!(session.scene().persistence().save_count(), 2);
    assert!(!session.scene().has_pending_save());
}

#[test]
fn camera_moves_do_not_schedule_saves() {
    let clock = ManualClock::default();
    let mut session = seeded(MemoryStore::new(), &clock);
    session.force_save();

    session.camera_mut().set_zoom(100.0);
    session.handle_input(&InputEvent::down(1, 500.0, 500.0, TargetTags::canvas()));
    session.handle_input(&InputEvent::moved(1, 400.0, 400.0));
    session.handle_input(&InputEvent::up(1, 400.0, 400.0));
    assert!(!session.scene().has_pending_save());
}

// ─── Reload ──────────────────────────────────────────────────────────────

#[test]
fn reload_restores_edited_scene() {
    let clock = ManualClock::default();
    let mut first = seeded(MemoryStore::new(), &clock);
    drag_blob(&mut first, 30.0);
    assert!(first.scene_mut().remove_from_group("blob"));
    first.force_save();

    let mut store = MemoryStore::new();
    store.set_raw(first.scene().persistence().raw().unwrap());
    let mut second = EditorSession::new(config(), store, clock.clone());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    second.scene_mut().subscribe(move |change| sink.borrow_mut().push(*change));

    assert_eq!(second.load().unwrap(), 2);
    assert_eq!(*seen.borrow(), vec![SceneChange::Loaded { count: 2 }]);
    assert_eq!(second.scene().graph().to_records(), first.scene().graph().to_records());
    let blob = second.scene().graph().find_in_groups("blob").unwrap();
    assert_eq!(blob.offset.x, 40.0);
    assert!(second.scene().graph().parent_of("blob").is_none());
}

#[test]
fn corrupt_storage_keeps_current_scene() {
    let clock = ManualClock::default();
    let mut store = MemoryStore::new();
    store.set_raw(r#"[{"id":"x","kind":"group","children":[{"id":"x","kind":"object"}]}]"#);
    let mut session = seeded(store, &clock);

    assert!(matches!(session.load(), Err(PersistError::Scene(_))));
    assert!(session.scene().graph().contains("blob"));
    assert!(!session.scene().graph().contains("x"));
}

// ─── Failing backend ─────────────────────────────────────────────────────

/// Accepts nothing; counts attempts.
#[derive(Clone, Default)]
struct FullDisk {
    attempts: Rc<RefCell<usize>>,
}

impl Persistence for FullDisk {
    fn save(&mut self, _nodes: &[NodeRecord]) -> Result<(), PersistError> {
        *self.attempts.borrow_mut() += 1;
        Err(PersistError::Unavailable("disk full".into()))
    }

    fn load(&mut self) -> Result<Vec<NodeRecord>, PersistError> {
        Ok(Vec::new())
    }
}

#[test]
fn write_failures_do_not_disturb_editing() {
    let clock = ManualClock::default();
    let disk = FullDisk::default();
    let mut session = seeded(disk.clone(), &clock);

    drag_blob(&mut session, 5.0);
    clock.advance(Duration::from_secs(1));
    assert!(!session.tick());
    assert!(!session.force_save());
    assert_eq!(*disk.attempts.borrow(), 2);
    // Still unsaved, so a retry stays queued.
    assert!(session.scene().has_pending_save());
    clock.advance(Duration::from_secs(1));
    assert!(!session.tick());
    assert_eq!(*disk.attempts.borrow(), 3);

    drag_blob(&mut session, 5.0);
    let blob = session.scene().graph().find_in_groups("blob").unwrap();
    assert_eq!(blob.offset.x, 20.0);
    assert_eq!(session.selection(), Some(NodeId::intern("blob")));
}
