//! Filesystem configuration for the core.
//!
//! # Responsibility
//! - Resolve where the preference database and its master key live.
//!
//! # Invariants
//! - The key file sits next to the database inside `data_dir`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "NEXTSTEP_DATA_DIR";

const DEFAULT_DB_FILE_NAME: &str = "nextstep_prefs.sqlite3";
const DEFAULT_KEY_FILE_NAME: &str = "nextstep_master.key";
const DEFAULT_DATA_SUBDIR: &str = "nextstep";

/// Storage locations used by [`crate::AppSession::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub key_file_name: String,
}

impl CoreConfig {
    /// Config rooted at `data_dir` with default file names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            key_file_name: DEFAULT_KEY_FILE_NAME.to_string(),
        }
    }

    /// Reads `NEXTSTEP_DATA_DIR`; blank or unset falls back to
    /// `<temp>/nextstep`.
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DATA_SUBDIR));
        Self::new(data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn key_path(&self) -> PathBuf {
        self.data_dir.join(&self.key_file_name)
    }
}
