mod common;

use common::{prefs, shared_memory_db};
use nextstep_core::repo::prefs_repo::SharedConnection;
use nextstep_core::store::accessibility_store::{
    ACCESSIBILITY_NAMESPACE, TEXT_SIZE_KEY, TEXT_SIZE_MAX, TEXT_SIZE_MIN,
};
use nextstep_core::{
    AccessibilityPreferences, AccessibilityStore, AccessibilityToggle, EncryptedPrefs,
    KeyValueStore,
};
use std::sync::{Arc, Mutex};

fn open_store(conn: &SharedConnection) -> AccessibilityStore<EncryptedPrefs> {
    AccessibilityStore::open(prefs(conn, ACCESSIBILITY_NAMESPACE)).unwrap()
}

#[test]
fn fresh_store_uses_defaults() {
    let conn = shared_memory_db();
    let store = open_store(&conn);
    assert_eq!(store.preferences(), AccessibilityPreferences::default());
    assert_eq!(store.text_size_multiplier(), 1.0);
}

#[test]
fn text_size_boundaries_survive_restart() {
    let conn = shared_memory_db();
    for value in [TEXT_SIZE_MIN, TEXT_SIZE_MAX] {
        let mut store = open_store(&conn);
        store.set_text_size_multiplier(value).unwrap();
        drop(store);

        assert_eq!(open_store(&conn).text_size_multiplier(), value);
    }
}

#[test]
fn every_toggle_survives_restart_independently() {
    let conn = shared_memory_db();
    for toggle in AccessibilityToggle::ALL {
        let mut store = open_store(&conn);
        store.set_enabled(toggle, true).unwrap();
        drop(store);

        let reopened = open_store(&conn);
        assert!(reopened.is_enabled(toggle), "{toggle:?} should persist");
    }

    let mut store = open_store(&conn);
    store.set_dyslexic_font(false).unwrap();
    drop(store);

    let reopened = open_store(&conn);
    assert_eq!(
        reopened.preferences(),
        AccessibilityPreferences {
            text_size_multiplier: 1.0,
            high_contrast: true,
            reduced_motion: true,
            screen_reader: true,
            dyslexic_font: false,
            color_blind_mode: true,
        }
    );
}

#[test]
fn named_setters_write_their_own_key() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    store.set_high_contrast(true).unwrap();
    store.set_reduced_motion(true).unwrap();
    store.set_screen_reader(true).unwrap();
    store.set_color_blind_mode(true).unwrap();

    let raw = prefs(&conn, ACCESSIBILITY_NAMESPACE);
    assert!(raw.get_bool("high_contrast_enabled", false).unwrap());
    assert!(raw.get_bool("reduced_motion_enabled", false).unwrap());
    assert!(raw.get_bool("screen_reader_enabled", false).unwrap());
    assert!(raw.get_bool("color_blind_mode_enabled", false).unwrap());
    assert!(!raw.contains("dyslexic_font_enabled").unwrap());
    assert!(!raw.contains(TEXT_SIZE_KEY).unwrap());
}

#[test]
fn subscribers_are_notified_per_setting() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let contrast = Arc::new(Mutex::new(Vec::new()));

    let size_sink = sizes.clone();
    store.subscribe_text_size(move |value| size_sink.lock().unwrap().push(*value));
    let contrast_sink = contrast.clone();
    let id = store.subscribe_toggle(AccessibilityToggle::HighContrast, move |value| {
        contrast_sink.lock().unwrap().push(*value)
    });

    store.set_text_size_multiplier(1.28).unwrap();
    store.set_high_contrast(true).unwrap();
    store.set_reduced_motion(true).unwrap();
    assert!(store.unsubscribe_toggle(AccessibilityToggle::HighContrast, id));
    store.set_high_contrast(false).unwrap();

    assert_eq!(*sizes.lock().unwrap(), vec![1.28]);
    assert_eq!(*contrast.lock().unwrap(), vec![true]);
}
