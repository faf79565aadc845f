use std::{
    fs::{self, OpenOptions, rename, write},
    path::PathBuf,
};

use fs2::FileExt;
use log::{error, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::storage::StorageError;

/// One flat JSON document holding a whole collection as an array of objects.
///
/// The unit of durability is the entire collection: every save rewrites the
/// document in full. Loads are best effort and never surface an error to the
/// caller; an empty result is ambiguous between "file absent" and "genuinely
/// empty", which callers accept.
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads every element that reconstructs as `T`. Missing file and
    /// non-array roots yield an empty vec; elements that fail to decode are
    /// skipped with a logged diagnostic.
    pub fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                error!("{}", e);
                Vec::new()
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self) -> Result<Vec<T>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let data: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| StorageError::ParseFailed {
                path: self.path.clone(),
                source: e,
            })?;

        let Some(items) = data.as_array() else {
            warn!(
                "'{}' does not hold an array at the top level, treating as empty",
                self.path.display()
            );
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match serde_json::from_value::<T>(item.clone()) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "skipping element {} of '{}': {}",
                    index,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(records)
    }

    /// Overwrites the document with the full collection, pretty-printed.
    /// Returns false (with a logged diagnostic) on any failure.
    pub fn save<T: Serialize>(&self, records: &[T]) -> bool {
        match self.try_save(records) {
            Ok(()) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    fn try_save<T: Serialize>(&self, records: &[T]) -> Result<(), StorageError> {
        let json =
            to_string_pretty(records).map_err(|e| StorageError::SerializeFailed { source: e })?;

        let unique_temp = format!("{}.tmp.{}", self.path.display(), Uuid::new_v4());
        let temp_path = PathBuf::from(&unique_temp);
        write(&temp_path, json).map_err(|e| StorageError::WriteFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        let lock_file_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&lock_file_path)
            .map_err(|e| StorageError::WriteFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::WriteFailed {
                path: lock_file_path,
                source: e,
            })?;

        rename(&temp_path, &self.path).map_err(|e| StorageError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        lock_file.unlock().map_err(|e| StorageError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }
}
