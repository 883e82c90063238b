//! Single-slot login credentials.
//!
//! # Invariants
//! - At most one username/password pair exists; `save` overwrites both
//!   fields in one atomic write or leaves the old pair in place.
//! - Comparison is exact and case-sensitive.
//! - Credential values never reach the log.

use crate::repo::prefs_repo::{KeyValueStore, PrefValue};
use crate::store::StoreResult;
use log::{debug, info};

pub const CREDENTIALS_NAMESPACE: &str = "secret_user_prefs";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";

pub struct CredentialStore<S: KeyValueStore> {
    prefs: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(prefs: S) -> Self {
        Self { prefs }
    }

    pub fn save(&self, username: &str, password: &str) -> StoreResult<()> {
        self.prefs.put_many(&[
            (USERNAME_KEY, PrefValue::String(username.to_string())),
            (PASSWORD_KEY, PrefValue::String(password.to_string())),
        ])?;
        info!("event=credentials_save module=credential_store status=ok");
        Ok(())
    }

    /// True once a username has been saved.
    pub fn exists(&self) -> StoreResult<bool> {
        Ok(self.prefs.contains(USERNAME_KEY)?)
    }

    /// True only when both fields equal the stored pair.
    pub fn check(&self, username: &str, password: &str) -> StoreResult<bool> {
        let stored_username = self.prefs.get_string(USERNAME_KEY)?;
        let stored_password = self.prefs.get_string(PASSWORD_KEY)?;
        let matched = stored_username.as_deref() == Some(username)
            && stored_password.as_deref() == Some(password);
        debug!("event=credentials_check module=credential_store status=ok matched={matched}");
        Ok(matched)
    }
}
