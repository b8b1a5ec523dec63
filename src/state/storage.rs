//! Key-value persistence for the session record.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store only talks to `KeyValueStore`, so the browser's
//! `sessionStorage` can be swapped for `MemoryStorage` in tests or non-browser
//! hosts. The helpers below own the two storage keys and their encoding.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::net::types::PersistedSession;

/// Holds `"true"` while a session is persisted.
pub const AUTHENTICATED_KEY: &str = "authenticated";
/// Holds the JSON-encoded [`PersistedSession`].
pub const SESSION_KEY: &str = "session";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage access failed: {0}")]
    Access(String),
    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
    #[error("session could not be serialized: {0}")]
    Serialize(String),
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached or rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// The browser tab's `window.sessionStorage`. Unavailable outside `hydrate`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStorage;

#[cfg(feature = "hydrate")]
fn session_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.session_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(feature = "hydrate")]
fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Access(format!("{err:?}"))
}

impl KeyValueStore for BrowserSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            session_storage()?.get_item(key).map_err(js_error)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            session_storage()?.set_item(key, value).map_err(js_error)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            session_storage()?.remove_item(key).map_err(js_error)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

/// Whether the `authenticated` flag is set to `"true"`.
///
/// # Errors
///
/// Propagates storage access failures.
pub fn read_authenticated_flag<S: KeyValueStore + ?Sized>(store: &S) -> Result<bool, StorageError> {
    Ok(store.get(AUTHENTICATED_KEY)?.as_deref() == Some("true"))
}

/// Set the `authenticated` flag without touching the session record.
///
/// # Errors
///
/// Propagates storage access failures.
pub fn write_authenticated_flag<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StorageError> {
    store.set(AUTHENTICATED_KEY, "true")
}

/// Load the persisted session record, if one exists.
///
/// # Errors
///
/// Returns `Corrupt` when the stored JSON does not decode, or propagates
/// storage access failures.
pub fn read_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<PersistedSession>, StorageError> {
    let Some(raw) = store.get(SESSION_KEY)? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Corrupt(e.to_string()))
}

/// Persist `session` and raise the `authenticated` flag.
///
/// # Errors
///
/// Returns `Serialize` if the record cannot be encoded, or propagates storage
/// access failures.
pub fn write_session<S: KeyValueStore + ?Sized>(store: &S, session: &PersistedSession) -> Result<(), StorageError> {
    let raw = serde_json::to_string(session).map_err(|e| StorageError::Serialize(e.to_string()))?;
    store.set(AUTHENTICATED_KEY, "true")?;
    store.set(SESSION_KEY, &raw)
}

/// Remove both session keys. Both removals are attempted; the first error wins.
///
/// # Errors
///
/// Propagates storage access failures.
pub fn clear_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StorageError> {
    let flag = store.remove(AUTHENTICATED_KEY);
    let session = store.remove(SESSION_KEY);
    flag.and(session)
}
