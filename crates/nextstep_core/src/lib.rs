//! Core state and persistence for the NextStep app.
//! Every business invariant lives here; UI and FFI layers only call in.

pub mod chat;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod observable;
pub mod repo;
pub mod session;
pub mod stats;
pub mod store;

pub use chat::{ChatMessage, MentorChat};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::learning::{LearningCategory, LearningModule};
pub use model::task::{Task, TaskCategory, TaskPriority, TaskState};
pub use navigation::{NavStack, Route};
pub use observable::{Observable, SubscriptionId};
pub use repo::prefs_repo::{EncryptedPrefs, KeyValueStore, PrefValue, PrefsError, PrefsResult};
pub use repo::vault::{VaultCipher, VaultKey};
pub use session::{AppSession, SessionError};
pub use stats::ProgressSummary;
pub use store::accessibility_store::{
    AccessibilityPreferences, AccessibilityStore, AccessibilityToggle,
};
pub use store::credential_store::CredentialStore;
pub use store::learning_catalog::LearningCatalog;
pub use store::task_store::TaskStore;
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
