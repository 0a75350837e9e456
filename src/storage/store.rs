// src/storage/store.rs
//
// Labeled coefficient snapshots persisted as one JSON document.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::vowel::Vowel;

const STORE_FILE_NAME: &str = "snapshot.json";

/// One labeled MFCC vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub vowel: Vowel,
    pub coefficients: Vec<f32>,
}

impl Snapshot {
    pub fn new(vowel: Vowel, coefficients: Vec<f32>) -> Self {
        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        Self {
            id,
            vowel,
            coefficients,
        }
    }
}

/// File-backed snapshot collection. Every mutation is written through.
pub struct SnapshotStore {
    path: PathBuf,
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    /// Open the store at `path`.
    ///
    /// A missing file gives an empty store; an unreadable one is logged and
    /// also treated as empty (it is replaced on the next write).
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let snapshots = match fs::read(&path) {
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(snapshots) => snapshots,
                Err(e) => {
                    log::warn!("Failed to parse snapshots at {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("Failed to load snapshots from {}: {}", path.display(), e);
                Vec::new()
            }
        };

        log::debug!("Opened snapshot store {} ({} entries)", path.display(), snapshots.len());
        Self { path, snapshots }
    }

    /// `<data dir>/vowel-mfcc/snapshot.json`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join(env!("CARGO_PKG_NAME")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STORE_FILE_NAME)
    }

    pub fn append(&mut self, snapshot: Snapshot) -> Result<()> {
        self.snapshots.push(snapshot);
        self.save()
    }

    /// Remove the snapshot with `id`; returns whether one was found
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        match self.snapshots.iter().position(|s| s.id == id) {
            Some(index) => {
                self.snapshots.remove(index);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_all(&mut self) -> Result<()> {
        self.snapshots.clear();
        self.save()
    }

    pub fn with_vowel(&self, vowel: Vowel) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter().filter(move |s| s.vowel == vowel)
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Write to a sibling temp file, then rename over the store
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(&self.snapshots)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("vowel-mfcc-store-{}", Uuid::new_v4()))
            .join(STORE_FILE_NAME)
    }

    #[test]
    fn test_snapshot_ids_are_short_and_unique() {
        let a = Snapshot::new(Vowel::A, vec![1.0]);
        let b = Snapshot::new(Vowel::A, vec![1.0]);
        assert_eq!(a.id.len(), 8);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_append_persists_and_reloads() {
        let path = temp_store_path();
        let mut store = SnapshotStore::open(&path);
        assert!(store.is_empty());

        store.append(Snapshot::new(Vowel::A, vec![1.0, 2.0])).unwrap();
        store.append(Snapshot::new(Vowel::I, vec![3.0, 4.0])).unwrap();
        store.append(Snapshot::new(Vowel::A, vec![5.0, 6.0])).unwrap();

        let reloaded = SnapshotStore::open(&path);
        assert_eq!(reloaded.snapshots(), store.snapshots());
        assert_eq!(reloaded.with_vowel(Vowel::A).count(), 2);
        assert_eq!(reloaded.with_vowel(Vowel::O).count(), 0);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_remove_and_clear() {
        let path = temp_store_path();
        let mut store = SnapshotStore::open(&path);
        let snapshot = Snapshot::new(Vowel::U, vec![0.5]);
        let id = snapshot.id.clone();
        store.append(snapshot).unwrap();
        store.append(Snapshot::new(Vowel::E, vec![0.25])).unwrap();

        assert!(store.remove(&id).unwrap());
        assert!(!store.remove(&id).unwrap());
        assert_eq!(SnapshotStore::open(&path).len(), 1);

        store.remove_all().unwrap();
        assert!(SnapshotStore::open(&path).is_empty());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let path = temp_store_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{ not json").unwrap();

        let mut store = SnapshotStore::open(&path);
        assert!(store.is_empty());
        store.append(Snapshot::new(Vowel::O, vec![1.0])).unwrap();
        assert_eq!(SnapshotStore::open(&path).len(), 1);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
