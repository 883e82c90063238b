//! Stateful stores behind the app screens.
//!
//! # Responsibility
//! - Own in-memory state as observables and write it through to prefs.
//! - Keep every mutation a full read-modify-persist-publish step.
//!
//! # Invariants
//! - Persistence happens before observers are notified.
//! - Unknown ids are silent no-ops, never errors.

use crate::repo::prefs_repo::PrefsError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod accessibility_store;
pub mod credential_store;
pub mod learning_catalog;
pub mod task_store;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Durable storage failed; not retried.
    Storage(PrefsError),
    /// In-memory state could not be encoded for persistence.
    Serialize(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialize(message) => write!(f, "failed to encode store state: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(_) => None,
        }
    }
}

impl From<PrefsError> for StoreError {
    fn from(value: PrefsError) -> Self {
        Self::Storage(value)
    }
}
