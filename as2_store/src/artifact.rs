//! File-artifact sinks.
//!
//! Payload and MDN bytes are written under a per-message path that can be revisited on retry; a
//! crash or concurrent reader must never observe a half-written file, so every write lands in a
//! sibling temp file first and is promoted with a single `rename` (POSIX guarantees this is
//! atomic within one filesystem).

use as2_core::prelude::*;

use std::{
    fs,
    path::{Path, PathBuf},
};

/// A content-addressed byte sink, keyed by an opaque `store` name plus `filename` (
/// `CreateMessage`/... "file-artifact sinks keyed by `{store, filename, bytes, overwrite?}`").
pub trait ArtifactStore: Send + Sync {
    fn write(&self, store: &str, filename: &str, bytes: &[u8], overwrite: bool) -> Outcome<()>;
    fn read(&self, store: &str, filename: &str) -> Outcome<Vec<u8>>;
    fn exists(&self, store: &str, filename: &str) -> bool;
}

/// Writes under `<root>/<store>/<filename>`, using `PathState::Create` semantics (as2_core's
/// directory-bootstrap idiom) to ensure the enclosing directory exists before the temp-write.
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, store: &str, filename: &str) -> PathBuf {
        self.root.join(store).join(filename)
    }
}

impl ArtifactStore for FileArtifactStore {
    fn write(&self, store: &str, filename: &str, bytes: &[u8], overwrite: bool) -> Outcome<()> {
        let path = self.path(store, filename);
        if path.exists() && !overwrite {
            return Err(err!(errmsg!(
                "Artifact '{}' already exists in store '{}' and overwrite was not requested.",
                filename, store,
            ), Exists, Conflict));
        }
        if let Some(parent) = path.parent() {
            res!(fs::create_dir_all(parent), IO, File, Write);
        }
        let tmp_path = tmp_path_for(&path);
        res!(fs::write(&tmp_path, bytes), IO, File, Write);
        res!(fs::rename(&tmp_path, &path), IO, File, Write);
        Ok(())
    }

    fn read(&self, store: &str, filename: &str) -> Outcome<Vec<u8>> {
        let path = self.path(store, filename);
        Ok(res!(fs::read(&path), IO, File, Read))
    }

    fn exists(&self, store: &str, filename: &str) -> bool {
        self.path(store, filename).exists()
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

/// An in-process artifact store for tests and the reference server's ephemeral mode; holds
/// bytes in memory rather than on disk, with the same overwrite semantics as
/// [`FileArtifactStore`].
#[derive(Default)]
pub struct MemoryArtifactStore {
    entries: std::sync::RwLock<std::collections::HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(store: &str, filename: &str) -> String {
        format!("{}/{}", store, filename)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn write(&self, store: &str, filename: &str, bytes: &[u8], overwrite: bool) -> Outcome<()> {
        let key = Self::key(store, filename);
        let mut guard = res!(self.entries.write());
        if guard.contains_key(&key) && !overwrite {
            return Err(err!(errmsg!(
                "Artifact '{}' already exists in store '{}' and overwrite was not requested.",
                filename, store,
            ), Exists, Conflict));
        }
        guard.insert(key, bytes.to_vec());
        Ok(())
    }

    fn read(&self, store: &str, filename: &str) -> Outcome<Vec<u8>> {
        let key = Self::key(store, filename);
        let guard = res!(self.entries.read());
        match guard.get(&key) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(err!(errmsg!(
                "No artifact '{}' in store '{}'.", filename, store,
            ), NotFound, Missing)),
        }
    }

    fn exists(&self, store: &str, filename: &str) -> bool {
        let key = Self::key(store, filename);
        self.entries.read().map(|g| g.contains_key(&key)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_writes_and_reads_back() -> Outcome<()> {
        let dir = std::env::temp_dir().join(format!("as2_store_test_{}", std::process::id()));
        let store = FileArtifactStore::new(&dir);
        res!(store.write("payload/received", "msg1", b"ISA*payload", false));
        let back = res!(store.read("payload/received", "msg1"));
        assert_eq!(back, b"ISA*payload".to_vec());
        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn file_store_refuses_overwrite_unless_requested() -> Outcome<()> {
        let dir = std::env::temp_dir().join(format!("as2_store_test2_{}", std::process::id()));
        let store = FileArtifactStore::new(&dir);
        res!(store.write("payload/received", "msg1", b"v1", false));
        assert!(store.write("payload/received", "msg1", b"v2", false).is_err());
        res!(store.write("payload/received", "msg1", b"v2", true));
        assert_eq!(res!(store.read("payload/received", "msg1")), b"v2".to_vec());
        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn memory_store_round_trips() -> Outcome<()> {
        let store = MemoryArtifactStore::new();
        res!(store.write("mdn/sent", "msg1.mdn", b"mdn bytes", false));
        assert!(store.exists("mdn/sent", "msg1.mdn"));
        assert_eq!(res!(store.read("mdn/sent", "msg1.mdn")), b"mdn bytes".to_vec());
        Ok(())
    }
}
