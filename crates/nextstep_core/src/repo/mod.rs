//! Persistence layer: encrypted, namespaced key-value storage.
//!
//! # Responsibility
//! - Define the key-value contract stores are written against.
//! - Isolate SQLite and AES-GCM details from store logic.

pub mod prefs_repo;
pub mod vault;
