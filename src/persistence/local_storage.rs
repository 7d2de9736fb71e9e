//! Browser LocalStorage store (wasm32 only)

use super::{PersistenceGateway, StoreError};

/// Looks up `window.localStorage` on every call, so it holds no JS handles
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    /// Fails if the page has no usable LocalStorage (private mode, sandboxed iframe)
    pub fn open() -> Result<Self, StoreError> {
        storage()?;
        Ok(Self)
    }
}

fn storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StoreError::Unavailable)
}

impl PersistenceGateway for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        storage()?
            .get_item(key)
            .map_err(|_| StoreError::Unavailable)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::Unavailable)
    }
}
