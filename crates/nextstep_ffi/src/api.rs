//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the single process-wide [`AppSession`] the screens share.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The session is opened lazily on first use and lives for the process.
//! - Errors cross the boundary as human-readable strings, never as codes
//!   that leak credentials or preference values.

use log::{info, warn};
use nextstep_core::model::task::DAY_MS;
use nextstep_core::stats::pending_label;
use nextstep_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    ping as ping_inner, AccessibilityPreferences, AccessibilityToggle, AppSession, CoreConfig, LearningModule,
    ProgressSummary, Task, TaskCategory, TaskPriority,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use uuid::Uuid;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<AppSession>> = Mutex::new(None);

/// Login failure text shown under the form.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); blank
///   picks the build default (`debug` in debug builds, `info` in release).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.trim() {
        "" => default_log_level(),
        trimmed => trimmed,
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the directory holding the encrypted database and its key file.
///
/// Must be called before the first store call; otherwise the directory comes
/// from `NEXTSTEP_DATA_DIR` or the system temp dir.
///
/// # FFI contract
/// - Repeating the same directory is a no-op.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_data_dir(dir: String) -> String {
    let trimmed = dir.trim();
    if trimmed.is_empty() {
        return "data dir must not be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DATA_DIR.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "data dir already set to `{}`; cannot switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation ran and matched its target.
    pub ok: bool,
    /// Optional id of the record created or touched.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Saves the single username/password pair.
#[flutter_rust_bridge::frb(sync)]
pub fn credentials_save(username: String, password: String) -> ActionResponse {
    match with_session(|session| {
        session
            .credentials()
            .save(&username, &password)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Credentials saved.", None),
        Err(err) => ActionResponse::failure(format!("credentials_save failed: {err}")),
    }
}

/// Whether a username has been saved. Storage failures read as `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn credentials_exist() -> bool {
    with_session(|session| session.credentials().exists().map_err(|err| err.to_string()))
        .unwrap_or_else(|err| {
            warn!("event=credentials_exist module=ffi status=error error={err}");
            false
        })
}

/// Login screen submit. On success the session navigates to `home/{username}`.
///
/// # FFI contract
/// - `ok=false` with `Invalid username or password` for a mismatch.
/// - `id` carries the route path on success.
#[flutter_rust_bridge::frb(sync)]
pub fn login(username: String, password: String) -> ActionResponse {
    match with_session(|session| {
        let matched = session
            .login(&username, &password)
            .map_err(|err| err.to_string())?;
        Ok(matched.then(|| session.nav().current().path()))
    }) {
        Ok(Some(route)) => ActionResponse::success("Logged in.", Some(route)),
        Ok(None) => ActionResponse::failure(INVALID_LOGIN_MESSAGE),
        Err(err) => ActionResponse::failure(format!("login failed: {err}")),
    }
}

/// Task row for list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub in_progress: bool,
    pub start_date: i64,
    pub end_date: i64,
    /// `PERSONAL|WORK|HEALTH|LEARNING`.
    pub category: String,
    /// `HIGH|MEDIUM|LOW`.
    pub priority: String,
    pub icon: String,
    pub color_argb: u32,
}

/// Task list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Display-sorted tasks (empty on failure).
    pub items: Vec<TaskItem>,
    /// `"N tasks pending"` on success, error text on failure.
    pub message: String,
}

/// Lists tasks in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list() -> TaskListResponse {
    match with_session(|session| {
        let tasks = session.tasks();
        Ok((tasks.sorted_for_display(), tasks.pending_count()))
    }) {
        Ok((tasks, pending)) => TaskListResponse {
            items: tasks.into_iter().map(to_task_item).collect(),
            message: pending_label(pending),
        },
        Err(err) => TaskListResponse {
            items: Vec::new(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

/// Number of tasks not yet completed; `0` when the session cannot open.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_pending_count() -> u32 {
    with_session(|session| Ok(session.tasks().pending_count()))
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Adds a task with a fresh UUID id.
///
/// # FFI contract
/// - Blank titles are rejected.
/// - Unknown `category`/`priority` strings fall back to `PERSONAL`/`MEDIUM`.
/// - `start_date` defaults to now and `end_date` to 24h later.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    description: String,
    category: Option<String>,
    priority: Option<String>,
    start_date: Option<i64>,
    end_date: Option<i64>,
) -> ActionResponse {
    let title = title.trim().to_string();
    if title.is_empty() {
        return ActionResponse::failure("task_add failed: title must not be empty");
    }

    let id = Uuid::new_v4().to_string();
    let mut task = Task::new(id.clone(), title, description.trim())
        .with_category(parse_category(category.as_deref()))
        .with_priority(parse_priority(priority.as_deref()));
    if let Some(start) = start_date {
        task = task.with_window(start, end_date.unwrap_or(start + DAY_MS));
    } else if let Some(end) = end_date {
        task.end_date = end;
    }

    match with_session(|session| session.tasks_mut().add(task).map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Task added.", Some(id)),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_complete(id: String) -> ActionResponse {
    task_action("task_complete", &id, |session, id| {
        session.tasks_mut().complete(id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_start(id: String) -> ActionResponse {
    task_action("task_start", &id, |session, id| session.tasks_mut().start(id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_reset(id: String) -> ActionResponse {
    task_action("task_reset", &id, |session, id| session.tasks_mut().reset(id))
}

/// Tap on a task row: pending -> in progress -> completed -> pending.
#[flutter_rust_bridge::frb(sync)]
pub fn task_advance(id: String) -> ActionResponse {
    task_action("task_advance", &id, |session, id| {
        session.tasks_mut().advance(id)
    })
}

/// Deletes every task with `id`; succeeds even when nothing matched.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> ActionResponse {
    match with_session(|session| session.tasks_mut().delete(&id).map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Task deleted.", Some(id)),
        Err(err) => ActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Accessibility settings snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilitySettings {
    pub text_size_multiplier: f32,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub screen_reader: bool,
    pub dyslexic_font: bool,
    pub color_blind_mode: bool,
}

/// Current accessibility settings; defaults when the session cannot open.
#[flutter_rust_bridge::frb(sync)]
pub fn accessibility_get() -> AccessibilitySettings {
    let preferences = with_session(|session| Ok(session.accessibility().preferences()))
        .unwrap_or_else(|err| {
            warn!("event=accessibility_get module=ffi status=error error={err}");
            AccessibilityPreferences::default()
        });
    to_accessibility_settings(preferences)
}

/// Stores the multiplier as given; the slider snaps before calling.
#[flutter_rust_bridge::frb(sync)]
pub fn accessibility_set_text_size(multiplier: f32) -> String {
    with_session(|session| {
        session
            .accessibility_mut()
            .set_text_size_multiplier(multiplier)
            .map_err(|err| err.to_string())
    })
    .err()
    .unwrap_or_default()
}

/// Sets one boolean setting by name
/// (`high_contrast|reduced_motion|screen_reader|dyslexic_font|color_blind_mode`).
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn accessibility_set_toggle(name: String, enabled: bool) -> String {
    let Some(toggle) = AccessibilityToggle::parse(&name) else {
        return format!("unknown accessibility setting `{}`", name.trim());
    };
    with_session(|session| {
        session
            .accessibility_mut()
            .set_enabled(toggle, enabled)
            .map_err(|err| err.to_string())
    })
    .err()
    .unwrap_or_default()
}

/// Learning module card.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningModuleItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub category_index: i32,
    /// Category name, or empty when the index is out of range.
    pub category_name: String,
    pub progress: f32,
    pub percent_complete: i32,
}

/// Modules matching the selected category (all when none is selected).
#[flutter_rust_bridge::frb(sync)]
pub fn learning_modules() -> Vec<LearningModuleItem> {
    with_session(|session| {
        let catalog = session.learning();
        Ok(catalog
            .filtered_modules()
            .iter()
            .map(|module| {
                let category_name = catalog.category_for(module).map(|c| c.name.clone());
                to_learning_item(module, category_name)
            })
            .collect())
    })
    .unwrap_or_default()
}

/// Selects a category by id (`jobs|life|social`); `None` or blank clears it.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn learning_select_category(category_id: Option<String>) -> String {
    let requested = category_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    with_session(|session| {
        let learning = session.learning_mut();
        let category = match requested.as_deref() {
            None => None,
            Some(id) => Some(
                learning
                    .category_by_id(id)
                    .cloned()
                    .ok_or_else(|| format!("unknown learning category `{id}`"))?,
            ),
        };
        learning.set_selected_category(category);
        Ok(())
    })
    .err()
    .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn learning_update_progress(module_id: String, progress: f32) -> ActionResponse {
    match with_session(|session| Ok(session.learning_mut().update_progress(&module_id, progress)))
    {
        Ok(true) => ActionResponse::success("Progress updated.", Some(module_id)),
        Ok(false) => ActionResponse::failure("Module not found."),
        Err(err) => ActionResponse::failure(format!("learning_update_progress failed: {err}")),
    }
}

/// Progress screen numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummaryResponse {
    pub completed_modules: u32,
    pub total_modules: u32,
    pub learning_progress: f32,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub task_progress: f32,
    pub recent_module_titles: Vec<String>,
    pub recent_task_titles: Vec<String>,
    /// Empty on success, error text on failure.
    pub message: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn progress_summary() -> ProgressSummaryResponse {
    match with_session(|session| Ok(session.progress_summary())) {
        Ok(summary) => to_summary_response(summary),
        Err(err) => {
            let mut empty = to_summary_response(ProgressSummary::compute(&[], &[]));
            empty.message = format!("progress_summary failed: {err}");
            empty
        }
    }
}

fn resolve_config() -> CoreConfig {
    match DATA_DIR.get() {
        Some(dir) => CoreConfig::new(dir.clone()),
        None => {
            let config = CoreConfig::from_env();
            // Pin the resolved directory so later configure calls see it.
            let _ = DATA_DIR.set(config.data_dir.clone());
            config
        }
    }
}

fn lock_session() -> Result<MutexGuard<'static, Option<AppSession>>, String> {
    SESSION
        .lock()
        .map_err(|_| "session lock poisoned".to_string())
}

fn with_session<T>(f: impl FnOnce(&mut AppSession) -> Result<T, String>) -> Result<T, String> {
    let mut guard = lock_session()?;
    if guard.is_none() {
        let config = resolve_config();
        let session = AppSession::open(&config).map_err(|err| {
            warn!("event=session_open module=ffi status=error error={err}");
            format!("session open failed: {err}")
        })?;
        info!("event=session_open module=ffi status=ok");
        *guard = Some(session);
    }
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err("session unavailable".to_string()),
    }
}

fn task_action(
    event: &'static str,
    id: &str,
    f: impl FnOnce(&mut AppSession, &str) -> nextstep_core::StoreResult<bool>,
) -> ActionResponse {
    match with_session(|session| f(session, id).map_err(|err| err.to_string())) {
        Ok(true) => ActionResponse::success("Task updated.", Some(id.to_string())),
        Ok(false) => ActionResponse::failure("Task not found."),
        Err(err) => ActionResponse::failure(format!("{event} failed: {err}")),
    }
}

fn parse_category(value: Option<&str>) -> TaskCategory {
    match value.map(|raw| raw.trim().to_ascii_uppercase()).as_deref() {
        Some("WORK") => TaskCategory::Work,
        Some("HEALTH") => TaskCategory::Health,
        Some("LEARNING") => TaskCategory::Learning,
        _ => TaskCategory::Personal,
    }
}

fn parse_priority(value: Option<&str>) -> TaskPriority {
    match value.map(|raw| raw.trim().to_ascii_uppercase()).as_deref() {
        Some("HIGH") => TaskPriority::High,
        Some("LOW") => TaskPriority::Low,
        _ => TaskPriority::Medium,
    }
}

fn category_label(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Personal => "PERSONAL",
        TaskCategory::Work => "WORK",
        TaskCategory::Health => "HEALTH",
        TaskCategory::Learning => "LEARNING",
    }
}

fn priority_label(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::High => "HIGH",
        TaskPriority::Medium => "MEDIUM",
        TaskPriority::Low => "LOW",
    }
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        icon: task.category.icon().to_string(),
        color_argb: task.category.color_argb(),
        category: category_label(task.category).to_string(),
        priority: priority_label(task.priority).to_string(),
        id: task.id,
        title: task.title,
        description: task.description,
        is_completed: task.is_completed,
        in_progress: task.in_progress,
        start_date: task.start_date,
        end_date: task.end_date,
    }
}

fn to_accessibility_settings(preferences: AccessibilityPreferences) -> AccessibilitySettings {
    AccessibilitySettings {
        text_size_multiplier: preferences.text_size_multiplier,
        high_contrast: preferences.high_contrast,
        reduced_motion: preferences.reduced_motion,
        screen_reader: preferences.screen_reader,
        dyslexic_font: preferences.dyslexic_font,
        color_blind_mode: preferences.color_blind_mode,
    }
}

fn to_learning_item(module: &LearningModule, category_name: Option<String>) -> LearningModuleItem {
    LearningModuleItem {
        id: module.id.clone(),
        title: module.title.clone(),
        description: module.description.clone(),
        duration: module.duration.clone(),
        category_index: module.category_index,
        category_name: category_name.unwrap_or_default(),
        progress: module.progress,
        percent_complete: module.percent_complete(),
    }
}

fn to_summary_response(summary: ProgressSummary) -> ProgressSummaryResponse {
    let count = |value: usize| u32::try_from(value).unwrap_or(u32::MAX);
    ProgressSummaryResponse {
        completed_modules: count(summary.completed_modules),
        total_modules: count(summary.total_modules),
        learning_progress: summary.learning_progress,
        completed_tasks: count(summary.completed_tasks),
        total_tasks: count(summary.total_tasks),
        task_progress: summary.task_progress,
        recent_module_titles: summary
            .recent_modules
            .into_iter()
            .map(|module| module.title)
            .collect(),
        recent_task_titles: summary
            .recent_tasks
            .into_iter()
            .map(|task| task.title)
            .collect(),
        message: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, ping, task_add};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"), "{error}");
    }

    #[test]
    fn init_logging_blank_level_uses_build_default() {
        let error = init_logging("  ".to_string(), "tmp/logs".to_string());
        assert!(!error.contains("unsupported log level"), "{error}");
        assert!(error.contains("absolute"), "{error}");
    }

    #[test]
    fn task_add_rejects_blank_title() {
        let response = task_add("  ".to_string(), String::new(), None, None, None, None);
        assert!(!response.ok);
        assert!(response.message.contains("title"));
    }
}
