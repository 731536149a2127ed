use notetmp_core::{
    KeyValueStore, ManualClock, MemoryKvStore, NoteState, ScratchpadConfig, ScratchpadSession,
    SettingsPatch, SqliteKvStore, Theme,
};
use std::time::Duration;

const START: i64 = 1_700_000_000_000;

#[test]
fn session_state_survives_reopening_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notetmp.db");
    let clock = ManualClock::new(START);

    {
        let store = SqliteKvStore::open(&path).unwrap();
        let mut session =
            ScratchpadSession::open(store, clock.clone(), ScratchpadConfig::default(), false)
                .unwrap();
        session.notes.update_content("durable text");
        session
            .settings
            .update_settings(&SettingsPatch::font_size(20));
        session.theme.toggle();
        session.close();
    }

    clock.advance(Duration::from_secs(3600));
    let store = SqliteKvStore::open(&path).unwrap();
    let session =
        ScratchpadSession::open(store, clock.clone(), ScratchpadConfig::default(), false).unwrap();
    assert_eq!(session.notes.state(), NoteState::Saved);
    assert_eq!(session.notes.content(), "durable text");
    assert_eq!(session.notes.time_remaining(), "5h 0m");
    assert_eq!(session.settings.settings().font_size, 20);
    assert_eq!(session.theme.theme(), Theme::Dark);
    assert!(session.storage_notice().is_none());
}

#[test]
fn reopening_after_ttl_purges_note_but_keeps_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notetmp.db");
    let clock = ManualClock::new(START);

    {
        let store = SqliteKvStore::open(&path).unwrap();
        let mut session =
            ScratchpadSession::open(store, clock.clone(), ScratchpadConfig::default(), true)
                .unwrap();
        session.notes.update_content("gone soon");
        session.settings.update_settings(&SettingsPatch::tab_size(2));
        session.close();
    }

    clock.advance(Duration::from_secs(7 * 3600));
    {
        let store = SqliteKvStore::open(&path).unwrap();
        let session =
            ScratchpadSession::open(store, clock.clone(), ScratchpadConfig::default(), true)
                .unwrap();
        assert_eq!(session.notes.state(), NoteState::Expired);
        assert_eq!(session.notes.content(), "");
        assert_eq!(session.settings.settings().tab_size, 2);
    }

    let store = SqliteKvStore::open(&path).unwrap();
    let key = ScratchpadConfig::default().note_key;
    assert_eq!(store.read(&key).unwrap(), None);
}

#[test]
fn close_persists_text_whose_commit_failed_earlier() {
    let clock = ManualClock::new(START);
    let mut session = ScratchpadSession::open(
        MemoryKvStore::new(),
        clock.clone(),
        ScratchpadConfig::default(),
        false,
    )
    .unwrap();
    let store = session.notes.store().clone();

    store.set_unavailable(true);
    session.notes.update_content("last keystrokes");
    clock.advance(Duration::from_millis(400));
    session.notes.tick();
    assert!(session.storage_notice().is_some());

    store.set_unavailable(false);
    session.close();
    assert_eq!(session.notes.state(), NoteState::Saved);
    let raw = store.read(&ScratchpadConfig::default().note_key).unwrap();
    assert!(raw.unwrap().contains("last keystrokes"));
}

#[test]
fn theme_write_failure_surfaces_as_session_notice() {
    let mut session = ScratchpadSession::open(
        MemoryKvStore::new(),
        ManualClock::new(START),
        ScratchpadConfig::default(),
        false,
    )
    .unwrap();
    let store = session.notes.store().clone();

    store.set_unavailable(true);
    assert_eq!(session.theme.toggle(), Theme::Dark);
    assert!(session
        .storage_notice()
        .unwrap()
        .contains("Theme could not be saved"));

    store.set_unavailable(false);
    session.theme.toggle();
    assert!(session.storage_notice().is_none());
}
