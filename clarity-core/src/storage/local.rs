/// Local filesystem storage backend.
///
/// Every key is one `<key>.json` file inside a data directory:
/// - Atomic writes (write to .tmp, fsync, rename, fsync directory)
/// - Refuses to replace a non-empty file with empty content
/// - Mutex-guarded writes so concurrent saves never interleave

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{DocumentStorage, StorageError, StorageKey};

pub struct LocalStorage {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStorage {
    /// Open (and create if needed) a data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let storage = Self {
            dir,
            write_lock: Mutex::new(()),
        };
        let present = StorageKey::ALL
            .iter()
            .filter(|key| storage.path_for(**key).exists())
            .count();
        log::info!(
            "[clarity.storage] Using data directory {} ({} of {} keys present)",
            storage.dir.display(),
            present,
            StorageKey::ALL.len()
        );
        Ok(storage)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    /// Atomic write: write to .tmp, fsync, rename over the target.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        if content.trim().is_empty() {
            if let Ok(existing) = fs::read_to_string(path) {
                if !existing.trim().is_empty() {
                    return Err(std::io::Error::new(
                        ErrorKind::InvalidInput,
                        "Refusing to overwrite non-empty file with empty content",
                    ));
                }
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl DocumentStorage for LocalStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let path = self.path_for(key);
        Self::atomic_write(&path, value).map_err(|e| {
            log::error!("[clarity.storage] Failed to write {}: {}", path.display(), e);
            StorageError::from(e)
        })?;
        log::debug!("[clarity.storage] Wrote {} ({} bytes)", key.as_str(), value.len());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
