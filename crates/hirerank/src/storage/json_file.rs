use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::workflows::scoring::RepositoryError;

/// A JSON object of records on disk, keyed by string.
///
/// Read-modify-write cycles are serialized by an in-process mutex and every
/// write goes through a sibling temp file followed by a rename.
#[derive(Debug)]
pub(crate) struct JsonFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Snapshot of the current records.
    pub(crate) fn read(&self) -> Result<Records, RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| RepositoryError::Poisoned)?;
        self.load()
    }

    /// Apply `change` to the records and persist them.
    pub(crate) fn modify<T>(
        &self,
        change: impl FnOnce(&mut Records) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| RepositoryError::Poisoned)?;
        let mut records = self.load()?;
        let outcome = change(&mut records)?;
        self.persist(&records)?;
        Ok(outcome)
    }

    fn load(&self) -> Result<Records, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Records::new(self.path.clone()))
            }
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Records::new(self.path.clone()));
        }

        let entries: BTreeMap<String, Value> = serde_json::from_str(&raw).map_err(|err| {
            RepositoryError::Serialization(format!("{}: {err}", self.path.display()))
        })?;
        Ok(Records {
            file: self.path.clone(),
            entries,
        })
    }

    fn persist(&self, records: &Records) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        let payload = serde_json::to_vec_pretty(&records.entries)?;
        fs::write(&temp, payload)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// Records loaded from a [`JsonFile`]. Entries that fail to decode are
/// skipped with a warning and left untouched on disk.
#[derive(Debug, Clone)]
pub(crate) struct Records {
    file: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl Records {
    fn new(file: PathBuf) -> Self {
        Self {
            file,
            entries: BTreeMap::new(),
        }
    }

    fn decode_entry<T: DeserializeOwned>(&self, key: &str, value: &Value) -> Option<T> {
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(
                    file = %self.file.display(),
                    key,
                    error = %err,
                    "skipping malformed record"
                );
                None
            }
        }
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|value| self.decode_entry(key, value))
    }

    pub(crate) fn values<T: DeserializeOwned>(&self) -> Vec<T> {
        self.entries
            .iter()
            .filter_map(|(key, value)| self.decode_entry(key, value))
            .collect()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn insert<T: Serialize>(&mut self, key: String, record: &T) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(record)?;
        self.entries.insert(key, value);
        Ok(())
    }

    /// Keep decodable records for which `keep` holds; undecodable ones stay.
    pub(crate) fn retain<T: DeserializeOwned>(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter_map(|(key, value)| {
                let record: T = self.decode_entry(key, value)?;
                (!keep(&record)).then(|| key.clone())
            })
            .collect();
        for key in &doomed {
            self.entries.remove(key);
        }
        doomed.len()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
