//! Namespaced key-value contract and its encrypted SQLite implementation.
//!
//! # Responsibility
//! - Provide typed get/set of string, bool and float scalars per namespace.
//! - Keep SQL and encryption details inside the persistence boundary.
//!
//! # Invariants
//! - Neither keys nor values are stored in plaintext.
//! - A put is a single-row upsert; other keys are never touched.
//! - `put_many` writes all of its entries or none of them.
//! - Reading a value as another scalar type is an error, not a coercion.

use crate::db::DbError;
use crate::repo::vault::VaultCipher;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

pub type PrefsResult<T> = Result<T, PrefsError>;

/// Connection handle shared by every namespace of one database.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Errors from the preference store.
#[derive(Debug)]
pub enum PrefsError {
    Db(DbError),
    Crypto(&'static str),
    Encoding(String),
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    KeyFile {
        path: PathBuf,
        message: String,
    },
    LockPoisoned,
}

impl Display for PrefsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Crypto(message) => write!(f, "preference crypto failure: {message}"),
            Self::Encoding(message) => write!(f, "invalid preference encoding: {message}"),
            Self::TypeMismatch {
                key,
                expected,
                found,
            } => write!(f, "preference `{key}` holds a {found}, expected {expected}"),
            Self::KeyFile { path, message } => {
                write!(f, "master key file `{}`: {message}", path.display())
            }
            Self::LockPoisoned => write!(f, "preference connection lock poisoned"),
        }
    }
}

impl Error for PrefsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for PrefsError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PrefsError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Scalar stored under one preference key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PrefValue {
    String(String),
    Bool(bool),
    Float(f32),
}

impl PrefValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
        }
    }
}

/// Key-value access scoped to one namespace.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PrefsResult<Option<PrefValue>>;

    /// Writes every entry in one atomic step.
    fn put_many(&self, entries: &[(&str, PrefValue)]) -> PrefsResult<()>;

    fn put(&self, key: &str, value: &PrefValue) -> PrefsResult<()> {
        self.put_many(&[(key, value.clone())])
    }

    fn contains(&self, key: &str) -> PrefsResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn get_string(&self, key: &str) -> PrefsResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(mismatch(key, "string", &other)),
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> PrefsResult<bool> {
        match self.get(key)? {
            None => Ok(default),
            Some(PrefValue::Bool(value)) => Ok(value),
            Some(other) => Err(mismatch(key, "bool", &other)),
        }
    }

    fn get_float(&self, key: &str, default: f32) -> PrefsResult<f32> {
        match self.get(key)? {
            None => Ok(default),
            Some(PrefValue::Float(value)) => Ok(value),
            Some(other) => Err(mismatch(key, "float", &other)),
        }
    }

    fn put_string(&self, key: &str, value: &str) -> PrefsResult<()> {
        self.put(key, &PrefValue::String(value.to_string()))
    }

    fn put_bool(&self, key: &str, value: bool) -> PrefsResult<()> {
        self.put(key, &PrefValue::Bool(value))
    }

    fn put_float(&self, key: &str, value: f32) -> PrefsResult<()> {
        self.put(key, &PrefValue::Float(value))
    }
}

fn mismatch(key: &str, expected: &'static str, found: &PrefValue) -> PrefsError {
    PrefsError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

/// AES-GCM encrypted, SQLite-backed namespace.
pub struct EncryptedPrefs {
    conn: SharedConnection,
    cipher: Arc<VaultCipher>,
    namespace: String,
    namespace_hash: String,
}

impl EncryptedPrefs {
    pub fn new(
        conn: SharedConnection,
        cipher: Arc<VaultCipher>,
        namespace: impl Into<String>,
    ) -> PrefsResult<Self> {
        let namespace = namespace.into();
        let namespace_hash = cipher.namespace_hash(&namespace)?;
        Ok(Self {
            conn,
            cipher,
            namespace,
            namespace_hash,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn lock(&self) -> PrefsResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| PrefsError::LockPoisoned)
    }
}

impl KeyValueStore for EncryptedPrefs {
    fn get(&self, key: &str) -> PrefsResult<Option<PrefValue>> {
        let key_hash = self.cipher.entry_key_hash(&self.namespace, key)?;
        let sealed: Option<Vec<u8>> = self
            .lock()?
            .query_row(
                "SELECT value FROM prefs_entries
                 WHERE namespace_hash = ?1 AND entry_key_hash = ?2;",
                params![self.namespace_hash, key_hash],
                |row| row.get(0),
            )
            .optional()?;

        let Some(sealed) = sealed else {
            return Ok(None);
        };
        let plaintext = self.cipher.open(&self.namespace, key, &sealed)?;
        let value = serde_json::from_slice(&plaintext)
            .map_err(|err| PrefsError::Encoding(err.to_string()))?;
        Ok(Some(value))
    }

    fn put_many(&self, entries: &[(&str, PrefValue)]) -> PrefsResult<()> {
        let mut rows = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key_hash = self.cipher.entry_key_hash(&self.namespace, key)?;
            let plaintext =
                serde_json::to_vec(value).map_err(|err| PrefsError::Encoding(err.to_string()))?;
            rows.push((key_hash, self.cipher.seal(&self.namespace, key, &plaintext)?));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        for (key_hash, sealed) in &rows {
            tx.execute(
                "INSERT INTO prefs_entries (namespace_hash, entry_key_hash, value, updated_at)
                 VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
                 ON CONFLICT (namespace_hash, entry_key_hash) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![self.namespace_hash, key_hash, sealed],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EncryptedPrefs, KeyValueStore, PrefValue, PrefsError, SharedConnection};
    use crate::db::open_db_in_memory;
    use crate::repo::vault::{VaultCipher, VaultKey};
    use std::sync::{Arc, Mutex};

    fn prefs(conn: &SharedConnection, namespace: &str) -> EncryptedPrefs {
        let cipher = VaultCipher::new(&VaultKey::from_bytes([9; 32])).unwrap();
        EncryptedPrefs::new(conn.clone(), Arc::new(cipher), namespace).unwrap()
    }

    fn shared() -> SharedConnection {
        Arc::new(Mutex::new(open_db_in_memory().unwrap()))
    }

    #[test]
    fn typed_values_roundtrip_and_defaults_apply() {
        let conn = shared();
        let store = prefs(&conn, "accessibility_prefs");

        assert_eq!(store.get_float("text_size_multiplier", 1.0).unwrap(), 1.0);
        assert!(!store.get_bool("high_contrast_enabled", false).unwrap());
        assert_eq!(store.get_string("missing").unwrap(), None);

        store.put_float("text_size_multiplier", 1.52).unwrap();
        store.put_bool("high_contrast_enabled", true).unwrap();
        store.put_string("label", "hello").unwrap();

        assert_eq!(store.get_float("text_size_multiplier", 1.0).unwrap(), 1.52);
        assert!(store.get_bool("high_contrast_enabled", false).unwrap());
        assert_eq!(store.get_string("label").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn put_overwrites_single_slot() {
        let conn = shared();
        let store = prefs(&conn, "secret_user_prefs");
        store.put_string("username", "first").unwrap();
        store.put_string("username", "second").unwrap();

        let rows: i64 = conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM prefs_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(
            store.get_string("username").unwrap().as_deref(),
            Some("second")
        );
    }

    #[test]
    fn namespaces_are_isolated() {
        let conn = shared();
        let a = prefs(&conn, "a");
        let b = prefs(&conn, "b");
        a.put_bool("flag", true).unwrap();
        assert!(a.contains("flag").unwrap());
        assert!(!b.contains("flag").unwrap());
    }

    #[test]
    fn reading_wrong_type_is_an_error() {
        let conn = shared();
        let store = prefs(&conn, "ns");
        store.put("k", &PrefValue::Bool(true)).unwrap();
        let err = store.get_float("k", 1.0).unwrap_err();
        assert!(matches!(
            err,
            PrefsError::TypeMismatch {
                expected: "float",
                found: "bool",
                ..
            }
        ));
    }

    #[test]
    fn put_many_is_all_or_nothing() {
        let conn = shared();
        let store = prefs(&conn, "secret_user_prefs");
        store
            .put_many(&[
                ("username", PrefValue::String("admin".to_string())),
                ("password", PrefValue::String("password".to_string())),
            ])
            .unwrap();

        let cipher = VaultCipher::new(&VaultKey::from_bytes([9; 32])).unwrap();
        let blocked = cipher
            .entry_key_hash("secret_user_prefs", "password")
            .unwrap();
        conn.lock()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TRIGGER block_password BEFORE INSERT ON prefs_entries
                 WHEN NEW.entry_key_hash = '{blocked}'
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;"
            ))
            .unwrap();

        let err = store
            .put_many(&[
                ("username", PrefValue::String("maya".to_string())),
                ("password", PrefValue::String("s3cret".to_string())),
            ])
            .unwrap_err();
        assert!(matches!(err, PrefsError::Db(_)));
        assert_eq!(
            store.get_string("username").unwrap().as_deref(),
            Some("admin")
        );
        assert_eq!(
            store.get_string("password").unwrap().as_deref(),
            Some("password")
        );
    }

    #[test]
    fn stored_rows_do_not_contain_plaintext() {
        let conn = shared();
        let store = prefs(&conn, "secret_user_prefs");
        store.put_string("password", "hunter2-plaintext").unwrap();

        let guard = conn.lock().unwrap();
        let (key_hash, value): (String, Vec<u8>) = guard
            .query_row(
                "SELECT entry_key_hash, value FROM prefs_entries;",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!(!key_hash.contains("password"));
        let needle = b"hunter2";
        assert!(!value.windows(needle.len()).any(|window| window == needle));
    }
}
