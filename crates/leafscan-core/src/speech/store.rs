//! Audio asset persistence.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use leafscan_types::{AudioAsset, DiagnosisError, Result};

const AUDIO_EXTENSION: &str = "mp3";
const PARTIAL_SUFFIX: &str = "part";

/// Removes a partially written file on drop unless `release()` is called.
struct PartialFileGuard {
    path: PathBuf,
    released: bool,
}

impl PartialFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, released: false }
    }

    fn release(mut self) {
        self.released = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "Failed to remove partial audio");
                }
            }
        }
    }
}

/// Directory of synthesized speech, addressed by unique file name.
///
/// Names are fresh v4 UUIDs, so concurrent writers never collide and the
/// directory needs no locking.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn next_file_name() -> String {
        format!("{}.{}", Uuid::new_v4(), AUDIO_EXTENSION)
    }

    /// Write `bytes` under a fresh name and return its locator.
    ///
    /// Bytes land in `<name>.part` first and are renamed into place, so a
    /// reader never observes a half-written asset. Dropping the future midway
    /// removes the partial file.
    pub async fn persist(&self, bytes: &[u8]) -> Result<AudioAsset> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| audio_write(&self.dir, &e))?;

        let file_name = Self::next_file_name();
        let final_path = self.dir.join(&file_name);
        let part_path = self.dir.join(format!("{}.{}", file_name, PARTIAL_SUFFIX));

        let guard = PartialFileGuard::new(part_path.clone());
        tokio::fs::write(&part_path, bytes).await.map_err(|e| audio_write(&part_path, &e))?;
        tokio::fs::rename(&part_path, &final_path)
            .await
            .map_err(|e| audio_write(&final_path, &e))?;
        guard.release();

        debug!(file = %file_name, size = bytes.len(), "Persisted audio asset");
        Ok(AudioAsset::from_file_name(&file_name))
    }

    /// Path of a stored asset, or `None` when `file_name` is not a single
    /// plain path component with the audio extension. In-flight `.part`
    /// files are never addressable.
    pub fn path_for(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return None;
        }
        if Path::new(file_name).extension().and_then(|ext| ext.to_str()) != Some(AUDIO_EXTENSION) {
            return None;
        }
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.dir.join(file_name)),
            _ => None,
        }
    }
}

fn audio_write(path: &Path, err: &std::io::Error) -> DiagnosisError {
    DiagnosisError::AudioWrite { message: format!("{}: {}", path.display(), err) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_persist_writes_and_returns_locator() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AudioStore::new(tmp.path().join("audio"));

        let asset = store.persist(b"ID3fake").await.unwrap();
        assert!(asset.locator.starts_with("/audio/"));
        assert!(asset.locator.ends_with(".mp3"));
        assert_eq!(asset.mime, "audio/mpeg");

        let path = store.path_for(asset.file_name()).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"ID3fake");

        let leftovers: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_audio_write_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let store = AudioStore::new(blocker.join("audio"));

        let err = store.persist(b"bytes").await.unwrap_err();
        assert!(matches!(err, DiagnosisError::AudioWrite { .. }));
    }

    #[test]
    fn test_guard_removes_partial_file_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let part = tmp.path().join("x.mp3.part");
        std::fs::write(&part, b"half").unwrap();
        drop(PartialFileGuard::new(part.clone()));
        assert!(!part.exists());

        std::fs::write(&part, b"whole").unwrap();
        PartialFileGuard::new(part.clone()).release();
        assert!(part.exists());
    }

    #[test]
    fn test_ten_thousand_names_are_distinct() {
        let names: HashSet<String> = (0..10_000).map(|_| AudioStore::next_file_name()).collect();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = AudioStore::new("audio");
        assert!(store.path_for("abc.mp3").is_some());
        assert!(store.path_for("").is_none());
        assert!(store.path_for("..").is_none());
        assert!(store.path_for(".").is_none());
        assert!(store.path_for("../secret").is_none());
        assert!(store.path_for("a/b.mp3").is_none());
        assert!(store.path_for("a\\b.mp3").is_none());
    }

    #[test]
    fn test_path_for_only_serves_finished_mp3_assets() {
        let store = AudioStore::new("audio");
        let name = AudioStore::next_file_name();
        assert!(store.path_for(&name).is_some());
        assert!(store.path_for(&format!("{}.{}", name, PARTIAL_SUFFIX)).is_none());
        assert!(store.path_for("notes.txt").is_none());
        assert!(store.path_for("mp3").is_none());
        assert!(store.path_for(".mp3").is_none());
    }
}
