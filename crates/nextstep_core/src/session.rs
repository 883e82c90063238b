//! Composition root wiring storage, stores and navigation together.
//!
//! # Responsibility
//! - Open the database and master key for one data directory.
//! - Construct every store explicitly and hand out references.
//! - Drive login and the navigation stack.
//!
//! # Invariants
//! - All stores of a session share one connection and one cipher.
//! - Learning, chat and navigation state live only as long as the session.

use crate::chat::MentorChat;
use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::navigation::{NavStack, Route};
use crate::repo::prefs_repo::{EncryptedPrefs, PrefsError, SharedConnection};
use crate::repo::vault::{VaultCipher, VaultKey};
use crate::stats::ProgressSummary;
use crate::store::accessibility_store::{AccessibilityStore, ACCESSIBILITY_NAMESPACE};
use crate::store::credential_store::{CredentialStore, CREDENTIALS_NAMESPACE};
use crate::store::learning_catalog::LearningCatalog;
use crate::store::task_store::{TaskStore, TASKS_NAMESPACE};
use crate::store::{StoreError, StoreResult};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub enum SessionError {
    DataDir { path: PathBuf, message: String },
    Db(DbError),
    Prefs(PrefsError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataDir { path, message } => {
                write!(f, "data directory `{}` unusable: {message}", path.display())
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::Prefs(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DataDir { .. } => None,
            Self::Db(err) => Some(err),
            Self::Prefs(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<DbError> for SessionError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<PrefsError> for SessionError {
    fn from(value: PrefsError) -> Self {
        Self::Prefs(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub struct AppSession {
    credentials: CredentialStore<EncryptedPrefs>,
    accessibility: AccessibilityStore<EncryptedPrefs>,
    tasks: TaskStore<EncryptedPrefs>,
    learning: LearningCatalog,
    chat: MentorChat,
    nav: NavStack,
}

impl AppSession {
    /// Opens (creating on first run) the key file and database under
    /// `config.data_dir`.
    pub fn open(config: &CoreConfig) -> Result<Self, SessionError> {
        std::fs::create_dir_all(config.data_dir()).map_err(|err| SessionError::DataDir {
            path: config.data_dir().to_path_buf(),
            message: err.to_string(),
        })?;
        let key = VaultKey::load_or_create(&config.key_path())?;
        let conn = open_db(config.db_path())?;
        let session = Self::from_connection(conn, &key)?;
        info!("event=session_open module=session status=ok mode=file");
        Ok(session)
    }

    /// Session over a private in-memory database.
    pub fn open_in_memory(key: &VaultKey) -> Result<Self, SessionError> {
        Self::from_connection(open_db_in_memory()?, key)
    }

    /// Builds every store over an already migrated connection.
    pub fn from_connection(conn: Connection, key: &VaultKey) -> Result<Self, SessionError> {
        let conn: SharedConnection = Arc::new(Mutex::new(conn));
        let cipher = Arc::new(VaultCipher::new(key)?);
        let prefs = |namespace: &str| EncryptedPrefs::new(conn.clone(), cipher.clone(), namespace);

        Ok(Self {
            credentials: CredentialStore::new(prefs(CREDENTIALS_NAMESPACE)?),
            accessibility: AccessibilityStore::open(prefs(ACCESSIBILITY_NAMESPACE)?)?,
            tasks: TaskStore::open(prefs(TASKS_NAMESPACE)?)?,
            learning: LearningCatalog::new(),
            chat: MentorChat::new(),
            nav: NavStack::new(),
        })
    }

    pub fn credentials(&self) -> &CredentialStore<EncryptedPrefs> {
        &self.credentials
    }

    pub fn accessibility(&self) -> &AccessibilityStore<EncryptedPrefs> {
        &self.accessibility
    }

    pub fn accessibility_mut(&mut self) -> &mut AccessibilityStore<EncryptedPrefs> {
        &mut self.accessibility
    }

    pub fn tasks(&self) -> &TaskStore<EncryptedPrefs> {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskStore<EncryptedPrefs> {
        &mut self.tasks
    }

    pub fn learning(&self) -> &LearningCatalog {
        &self.learning
    }

    pub fn learning_mut(&mut self) -> &mut LearningCatalog {
        &mut self.learning
    }

    pub fn chat(&self) -> &MentorChat {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut MentorChat {
        &mut self.chat
    }

    pub fn nav(&self) -> &NavStack {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut NavStack {
        &mut self.nav
    }

    /// Checks credentials; on success `home/{username}` becomes the only route.
    pub fn login(&mut self, username: &str, password: &str) -> StoreResult<bool> {
        let matched = self.credentials.check(username, password)?;
        if matched {
            self.nav.replace_all(Route::home(username));
        }
        info!("event=login module=session status=ok matched={matched}");
        Ok(matched)
    }

    pub fn progress_summary(&self) -> ProgressSummary {
        ProgressSummary::compute(self.learning.modules(), self.tasks.tasks())
    }
}
