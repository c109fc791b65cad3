//! Browser LocalStorage backend

use web_sys::Storage;

use super::{KeyValueStore, StorageError, validate_key};

pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Grab `window.localStorage`; fails if storage is disabled
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn js_error(key: &str, e: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        message: format!("{:?}", e),
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        self.storage.get_item(key).map_err(|e| js_error(key, e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.storage.set_item(key, value).map_err(|e| js_error(key, e))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.storage.remove_item(key).map_err(|e| js_error(key, e))
    }
}
