use nextstep_core::{
    AccessibilityToggle, AppSession, CoreConfig, Route, SessionError, Task, VaultKey,
};

#[test]
fn file_session_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("data"));

    {
        let mut session = AppSession::open(&config).unwrap();
        session.credentials().save("admin", "password").unwrap();
        session
            .accessibility_mut()
            .set_enabled(AccessibilityToggle::DyslexicFont, true)
            .unwrap();
        session
            .accessibility_mut()
            .set_text_size_multiplier(2.0)
            .unwrap();
        session
            .tasks_mut()
            .add(Task::new("t-1", "Call mentor", "Weekly check-in"))
            .unwrap();
        session.tasks_mut().complete("1").unwrap();
    }

    assert!(config.key_path().exists());
    assert!(config.db_path().exists());

    let mut session = AppSession::open(&config).unwrap();
    assert!(session.credentials().exists().unwrap());
    assert!(session
        .accessibility()
        .is_enabled(AccessibilityToggle::DyslexicFont));
    assert_eq!(session.accessibility().text_size_multiplier(), 2.0);
    assert_eq!(session.tasks().tasks().len(), 4);
    assert!(session.tasks().get("1").unwrap().is_completed);
    assert!(session.login("admin", "password").unwrap());
}

#[test]
fn replaced_key_file_cannot_read_existing_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path());
    {
        let session = AppSession::open(&config).unwrap();
        session.credentials().save("admin", "password").unwrap();
    }
    std::fs::write(config.key_path(), [5u8; 32]).unwrap();

    let session = AppSession::open(&config).unwrap();
    assert!(!session.credentials().exists().unwrap());
    assert!(!session.credentials().check("admin", "password").unwrap());
}

#[test]
fn truncated_key_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path());
    std::fs::write(config.key_path(), [1u8; 10]).unwrap();

    let err = AppSession::open(&config).err().unwrap();
    assert!(matches!(err, SessionError::Prefs(_)));
}

#[test]
fn login_flow_drives_navigation() {
    let mut session = AppSession::open_in_memory(&VaultKey::from_bytes([3; 32])).unwrap();
    assert_eq!(*session.nav().current(), Route::Loading);
    session.nav_mut().finish_splash();
    assert_eq!(*session.nav().current(), Route::Login);

    assert!(!session.login("admin", "password").unwrap());
    assert_eq!(*session.nav().current(), Route::Login);

    session.credentials().save("admin", "password").unwrap();
    assert!(!session.login("admin", "wrong").unwrap());
    assert!(session.login("admin", "password").unwrap());
    assert_eq!(session.nav().routes(), [Route::home("admin")]);

    session.nav_mut().push(Route::Progress);
    assert!(session.nav_mut().back());
    assert!(!session.nav_mut().back());
}

#[test]
fn progress_summary_reflects_tasks_and_modules() {
    let mut session = AppSession::open_in_memory(&VaultKey::from_bytes([4; 32])).unwrap();
    session.tasks_mut().complete("2").unwrap();

    let summary = session.progress_summary();
    assert_eq!(summary.total_tasks, 3);
    assert_eq!(summary.completed_tasks, 1);
    assert_eq!(summary.total_modules, 7);
    assert_eq!(summary.completed_modules, 1);
    assert_eq!(summary.recent_tasks.len(), 1);
    assert_eq!(summary.recent_tasks[0].id, "2");
    assert_eq!(summary.recent_modules.len(), 7);
    assert_eq!(summary.recent_modules[0].progress, 1.0);
}

#[test]
fn chat_replies_arrive_after_polling() {
    let mut session = AppSession::open_in_memory(&VaultKey::from_bytes([6; 32])).unwrap();
    session.chat_mut().send("Hi", 1_000).unwrap();
    assert_eq!(session.chat_mut().deliver_due(1_500), 0);
    assert_eq!(session.chat_mut().deliver_due(2_000), 1);
    assert_eq!(session.chat().messages().len(), 2);
}
