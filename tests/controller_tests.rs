//! Active-selection and editing behaviour of the controller.

mod common;

use common::{note_with, RecordingView, ViewEvent};
use notecat::{
    Controller, MemoryMedium, NoteError, NoteStore, StorageMedium, TerminalView,
    DEFAULT_CAPACITY_BYTES,
};
use pretty_assertions::assert_eq;

fn seeded_store(notes: &[(&str, i64)]) -> NoteStore<MemoryMedium> {
    let mut store = NoteStore::new(MemoryMedium::new());
    for (id, updated_at) in notes {
        store.save(&note_with(id, id, *updated_at)).unwrap();
    }
    store
}

fn load(store: NoteStore<MemoryMedium>) -> (Controller<MemoryMedium, RecordingView>, RecordingView) {
    let view = RecordingView::default();
    let controller = Controller::load(store, view.clone()).unwrap();
    (controller, view)
}

mod load_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_store_has_no_active_note() {
        let (controller, view) = load(NoteStore::new(MemoryMedium::new()));

        assert_eq!(controller.active_note_id(), None);
        assert_eq!(controller.store().get_active_id().unwrap(), None);
        let events = view.events();
        assert!(events.contains(&ViewEvent::HideEditor));
        assert_eq!(view.last_list(), Some((vec![], None)));
    }

    #[test]
    fn restores_persisted_active_note() {
        let mut store = seeded_store(&[("old", 10), ("new", 20)]);
        store.set_active_id("old").unwrap();

        let (controller, view) = load(store);
        assert_eq!(controller.active_note_id(), Some("old"));
        assert!(view.events().contains(&ViewEvent::Editor("old".to_string())));
    }

    #[test]
    fn stale_active_id_falls_back_to_most_recent() {
        let mut store = seeded_store(&[("old", 10), ("new", 20)]);
        store.set_active_id("gone").unwrap();

        let (controller, _) = load(store);
        assert_eq!(controller.active_note_id(), Some("new"));
        assert_eq!(
            controller.store().get_active_id().unwrap().as_deref(),
            Some("new")
        );
    }

    #[test]
    fn missing_active_id_selects_most_recent_and_persists_it() {
        let (controller, _) = load(seeded_store(&[("a", 5), ("b", 50), ("c", 7)]));
        assert_eq!(controller.active_note_id(), Some("b"));
        assert_eq!(
            controller.store().get_active_id().unwrap().as_deref(),
            Some("b")
        );
    }

    #[test]
    fn stale_active_id_is_cleared_when_no_notes_remain() {
        let mut store = NoteStore::new(MemoryMedium::new());
        store.set_active_id("gone").unwrap();

        let (controller, _) = load(store);
        assert_eq!(controller.active_note_id(), None);
        assert_eq!(controller.store().get_active_id().unwrap(), None);
    }

    #[test]
    fn extreme_timestamps_render_in_the_terminal() {
        let mut store = NoteStore::new(MemoryMedium::new());
        let mut note = note_with("old", "Ancient", i64::MIN);
        note.created_at = i64::MIN;
        store.save(&note).unwrap();

        let controller =
            Controller::load(store, TerminalView::new(Vec::new(), DEFAULT_CAPACITY_BYTES))
                .unwrap();
        assert_eq!(controller.active_note_id(), Some("old"));
    }

    #[test]
    fn corrupt_record_fails_load() {
        let mut medium = MemoryMedium::new();
        medium
            .set_item("note:x", r#"{"id":"x","title":"T","content":""}"#)
            .unwrap();

        let result = Controller::load(NoteStore::new(medium), RecordingView::default());
        assert!(matches!(result, Err(NoteError::CorruptData { .. })));
    }
}

mod selection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_saves_and_activates() {
        let (mut controller, view) = load(NoteStore::new(MemoryMedium::new()));
        let note = controller.new_note(None).unwrap();

        assert_eq!(note.title, "Untitled");
        assert_eq!(controller.active_note_id(), Some(note.id.as_str()));
        assert_eq!(controller.store().get(&note.id).unwrap(), Some(note.clone()));
        assert_eq!(
            view.last_list(),
            Some((vec![note.id.clone()], Some(note.id.clone())))
        );
    }

    #[test]
    fn create_a_then_b_lists_b_first_and_deleting_b_activates_a() {
        let (mut controller, _) = load(NoteStore::new(MemoryMedium::new()));
        let a = controller.new_note(None).unwrap();
        // Make sure B is strictly newer even on coarse clocks.
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = controller.new_note(None).unwrap();

        let listed: Vec<String> = controller
            .store()
            .list_all()
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(listed, vec![b.id.clone(), a.id.clone()]);
        assert_eq!(controller.active_note_id(), Some(b.id.as_str()));

        controller.delete_note(&b.id).unwrap();
        assert_eq!(controller.active_note_id(), Some(a.id.as_str()));
        assert_eq!(
            controller.store().get_active_id().unwrap(),
            Some(a.id.clone())
        );
    }

    #[test]
    fn deleting_active_note_picks_most_recent_remaining() {
        let mut store = seeded_store(&[("a", 10), ("b", 30), ("c", 20)]);
        store.set_active_id("b").unwrap();
        let (mut controller, _) = load(store);

        controller.delete_note("b").unwrap();
        assert_eq!(controller.active_note_id(), Some("c"));
    }

    #[test]
    fn deleting_last_note_clears_selection() {
        let (mut controller, view) = load(seeded_store(&[("only", 1)]));
        view.clear();

        controller.delete_note("only").unwrap();
        assert_eq!(controller.active_note_id(), None);
        assert_eq!(controller.store().get_active_id().unwrap(), None);
        assert!(controller.notes().is_empty());
        let events = view.events();
        assert!(events.contains(&ViewEvent::HideEditor));
        assert!(events.contains(&ViewEvent::ClearStatus));
    }

    #[test]
    fn deleting_inactive_note_keeps_selection() {
        let mut store = seeded_store(&[("a", 10), ("b", 30)]);
        store.set_active_id("a").unwrap();
        let (mut controller, view) = load(store);

        controller.delete_note("b").unwrap();
        assert_eq!(controller.active_note_id(), Some("a"));
        assert_eq!(
            view.last_list(),
            Some((vec!["a".to_string()], Some("a".to_string())))
        );
    }

    #[test]
    fn deleting_unknown_note_fails_loudly() {
        let (mut controller, _) = load(seeded_store(&[("a", 10)]));
        match controller.delete_note("nope") {
            Err(NoteError::NotFound { id }) => assert_eq!(id, "nope"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(controller.active_note_id(), Some("a"));
    }

    #[test]
    fn selecting_unknown_note_is_a_silent_no_op() {
        let (mut controller, view) = load(seeded_store(&[("a", 10), ("b", 5)]));
        view.clear();

        assert!(!controller.select_note("ghost").unwrap());
        assert_eq!(controller.active_note_id(), Some("a"));
        assert_eq!(
            controller.store().get_active_id().unwrap().as_deref(),
            Some("a")
        );
        assert!(view.events().is_empty());
    }

    #[test]
    fn selecting_existing_note_persists_selection() {
        let (mut controller, _) = load(seeded_store(&[("a", 10), ("b", 5)]));
        assert!(controller.select_note("b").unwrap());
        assert_eq!(controller.active_note_id(), Some("b"));
        assert_eq!(
            controller.store().get_active_id().unwrap().as_deref(),
            Some("b")
        );
    }
}

mod editing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn edits_stay_in_memory_until_saved() {
        let (mut controller, view) = load(seeded_store(&[("a", 10)]));
        view.clear();

        assert!(controller.on_content_changed("hello world"));
        assert!(controller.state().dirty);
        assert_eq!(controller.active_note().unwrap().content, "hello world");
        assert!(controller.active_note().unwrap().updated_at > 10);
        assert_eq!(controller.store().get("a").unwrap().unwrap().content, "");
        assert!(view.events().iter().any(|e| matches!(
            e,
            ViewEvent::Status(stats) if stats.word_count == 2
        )));

        assert!(controller.save_active().unwrap());
        assert!(!controller.state().dirty);
        assert_eq!(
            controller.store().get("a").unwrap().unwrap().content,
            "hello world"
        );
        assert!(!controller.save_active().unwrap());
    }

    #[test]
    fn edit_moves_note_to_front() {
        let mut store = seeded_store(&[("a", 10), ("b", 30)]);
        store.set_active_id("a").unwrap();
        let (mut controller, view) = load(store);

        controller.on_title_changed("Renamed");
        assert_eq!(controller.notes()[0].id, "a");
        assert_eq!(
            view.last_list().unwrap().0,
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn edits_without_active_note_are_ignored() {
        let (mut controller, _) = load(NoteStore::new(MemoryMedium::new()));
        assert!(!controller.on_title_changed("nothing"));
        assert!(!controller.state().dirty);
    }

    #[test]
    fn storage_full_keeps_edit_dirty_and_medium_unchanged() {
        let mut store = NoteStore::new(MemoryMedium::with_capacity(300));
        store.save(&note_with("a", "a", 10)).unwrap();
        let (mut controller, _) = load(store);
        let before = controller.store().get("a").unwrap().unwrap();

        controller.on_content_changed(&"x".repeat(1_000));
        let err = controller.save_active().unwrap_err();
        assert!(err.is_storage_full());
        assert!(controller.state().dirty);
        assert_eq!(controller.store().get("a").unwrap().unwrap(), before);

        // Shrinking the edit lets the next save through.
        controller.on_content_changed("short");
        assert!(controller.save_active().unwrap());
        assert_eq!(controller.store().get("a").unwrap().unwrap().content, "short");
    }

    #[test]
    fn failed_flush_prevents_creating_a_note() {
        let mut store = NoteStore::new(MemoryMedium::with_capacity(300));
        store.save(&note_with("a", "a", 10)).unwrap();
        let (mut controller, _) = load(store);

        controller.on_content_changed(&"x".repeat(1_000));
        let err = controller.new_note(None).unwrap_err();
        assert!(err.is_storage_full());

        assert_eq!(controller.store().note_count().unwrap(), 1);
        assert_eq!(controller.notes().len(), 1);
        assert_eq!(controller.active_note_id(), Some("a"));
        assert_eq!(
            controller.store().get_active_id().unwrap().as_deref(),
            Some("a")
        );
        assert!(controller.state().dirty);
    }

    #[test]
    fn switching_notes_flushes_pending_edit() {
        let (mut controller, _) = load(seeded_store(&[("a", 10), ("b", 5)]));
        controller.on_content_changed("draft");

        assert!(controller.select_note("b").unwrap());
        assert!(!controller.state().dirty);
        assert_eq!(controller.store().get("a").unwrap().unwrap().content, "draft");
    }

    #[test]
    fn unsaved_edit_survives_deleting_another_note() {
        let mut store = seeded_store(&[("a", 10), ("b", 5)]);
        store.set_active_id("a").unwrap();
        let (mut controller, _) = load(store);

        controller.on_content_changed("draft");
        controller.delete_note("b").unwrap();
        assert!(controller.state().dirty);
        assert_eq!(controller.active_note().unwrap().content, "draft");
    }

    #[test]
    fn refresh_dates_only_reemits_status() {
        let (mut controller, view) = load(seeded_store(&[("a", 10)]));
        view.clear();

        controller.refresh_dates();
        assert_eq!(view.status_count(), 1);
        assert_eq!(view.events().len(), 1);
    }
}
