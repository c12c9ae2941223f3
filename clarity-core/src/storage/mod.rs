pub mod local;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// The fixed keys the app persists under. Each one holds a single JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AppData,
    UserSettings,
    HasOnboarded,
    LastBackup,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::AppData,
        StorageKey::UserSettings,
        StorageKey::HasOnboarded,
        StorageKey::LastBackup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AppData => "clarity-app-data",
            StorageKey::UserSettings => "clarity-user-settings",
            StorageKey::HasOnboarded => "clarity-has-onboarded",
            StorageKey::LastBackup => "clarity-last-backup",
        }
    }
}

/// Key-value persistence for whole documents.
/// Implementations: LocalStorage (one file per key), MemoryStorage (tests).
pub trait DocumentStorage: Send + Sync {
    /// Raw stored value, or `None` if the key was never written.
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Replace the stored value.
    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Forget a key. Removing a missing key is not an error.
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

impl<T: DocumentStorage + ?Sized> DocumentStorage for Box<T> {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON under {key}: {source}")]
    Json {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and decode a key. Missing keys decode to `None`.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn DocumentStorage,
    key: StorageKey,
) -> Result<Option<T>, StorageError> {
    match storage.read(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json { key: key.as_str(), source }),
        None => Ok(None),
    }
}

/// Load a key, falling back to `default()` when it is missing or does not
/// parse. A corrupt value is logged and left on disk untouched.
pub fn load_or_default<T: DeserializeOwned>(
    storage: &dyn DocumentStorage,
    key: StorageKey,
    default: impl FnOnce() -> T,
) -> T {
    match load_json(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => default(),
        Err(e) => {
            log::warn!("[clarity.storage] Using defaults for {}: {}", key.as_str(), e);
            default()
        }
    }
}

/// Encode a value the way it is stored under `key`.
pub fn to_json<T: Serialize + ?Sized>(key: StorageKey, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Json { key: key.as_str(), source })
}

pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn DocumentStorage,
    key: StorageKey,
    value: &T,
) -> Result<(), StorageError> {
    storage.write(key, &to_json(key, value)?)
}
