#![allow(dead_code)]

use nextstep_core::db::open_db_in_memory;
use nextstep_core::repo::prefs_repo::SharedConnection;
use nextstep_core::{EncryptedPrefs, VaultCipher, VaultKey};
use std::sync::{Arc, Mutex};

pub fn shared_memory_db() -> SharedConnection {
    Arc::new(Mutex::new(open_db_in_memory().unwrap()))
}

pub fn prefs(conn: &SharedConnection, namespace: &str) -> EncryptedPrefs {
    prefs_with_key(conn, namespace, [42; 32])
}

pub fn prefs_with_key(conn: &SharedConnection, namespace: &str, key: [u8; 32]) -> EncryptedPrefs {
    let cipher = VaultCipher::new(&VaultKey::from_bytes(key)).unwrap();
    EncryptedPrefs::new(conn.clone(), Arc::new(cipher), namespace).unwrap()
}
