//! Per-session frame directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use snakeshot_protocols::PlayerId;

use super::error::{SessionError, SessionResult};

/// File name of the metadata written next to the frames.
pub const SESSION_METADATA_FILE: &str = "session.json";

/// Write-once store of `<step>.png` frames for one match attempt.
#[derive(Debug)]
pub struct FrameStore {
    dir: PathBuf,
    written: usize,
}

impl FrameStore {
    /// Create `<root>/<a_id>_<b_id>_<self_id>_<yyyymmddHHMMSSmmm>`.
    ///
    /// The root is created if needed; the match directory itself must not
    /// exist yet.
    pub async fn create(
        root: &Path,
        a_id: &PlayerId,
        b_id: &PlayerId,
        self_id: &PlayerId,
        started: DateTime<Local>,
    ) -> SessionResult<Self> {
        fs::create_dir_all(root)
            .await
            .map_err(|e| SessionError::io(root, e))?;

        let name = format!(
            "{}_{}_{}_{}",
            path_safe(a_id.as_str()),
            path_safe(b_id.as_str()),
            path_safe(self_id.as_str()),
            started.format("%Y%m%d%H%M%S%3f"),
        );
        let dir = root.join(name);
        fs::create_dir(&dir)
            .await
            .map_err(|e| SessionError::io(&dir, e))?;
        debug!("Created frame directory {}", dir.display());

        Ok(Self { dir, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, step: usize) -> PathBuf {
        self.dir.join(format!("{}.png", step))
    }

    /// Number of frames written through this store.
    pub fn frames_written(&self) -> usize {
        self.written
    }

    /// Persist the frame for `step`. Fails if it already exists.
    pub async fn write_frame(&mut self, step: usize, png: &[u8]) -> SessionResult<PathBuf> {
        let path = self.frame_path(step);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| SessionError::io(&path, e))?;
        file.write_all(png)
            .await
            .map_err(|e| SessionError::io(&path, e))?;
        file.flush()
            .await
            .map_err(|e| SessionError::io(&path, e))?;
        self.written += 1;
        Ok(path)
    }

    /// Write (or replace) `session.json`.
    pub async fn write_metadata<T: Serialize>(&self, metadata: &T) -> SessionResult<PathBuf> {
        let path = self.dir.join(SESSION_METADATA_FILE);
        let json = serde_json::to_vec_pretty(metadata).map_err(|e| {
            SessionError::io(&path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        fs::write(&path, json)
            .await
            .map_err(|e| SessionError::io(&path, e))?;
        Ok(path)
    }
}

/// Keep ids usable as a single path component.
///
/// Distinct ids may map to the same text; directory uniqueness comes from
/// the timestamp suffix and the `create_dir` collision check.
fn path_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn ts() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[tokio::test]
    async fn test_create_names_directory() {
        let tmp = TempDir::new().unwrap();
        let store = FrameStore::create(
            tmp.path(),
            &PlayerId::new("3"),
            &PlayerId::new("7"),
            &PlayerId::new("3"),
            ts(),
        )
        .await
        .unwrap();

        let name = store.dir().file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, "3_7_3_20240309140507000");
        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let tmp = TempDir::new().unwrap();
        let id = PlayerId::new("1");
        FrameStore::create(tmp.path(), &id, &id, &id, ts()).await.unwrap();
        let err = FrameStore::create(tmp.path(), &id, &id, &id, ts())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
    }

    #[tokio::test]
    async fn test_create_makes_missing_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nested").join("temp");
        let id = PlayerId::new("1");
        let store = FrameStore::create(&root, &id, &id, &id, ts()).await.unwrap();
        assert!(store.dir().starts_with(&root));
    }

    #[tokio::test]
    async fn test_frames_are_write_once() {
        let tmp = TempDir::new().unwrap();
        let id = PlayerId::new("1");
        let mut store = FrameStore::create(tmp.path(), &id, &id, &id, ts()).await.unwrap();

        let path = store.write_frame(0, b"png").await.unwrap();
        assert_eq!(path.file_name().unwrap(), "0.png");
        assert_eq!(std::fs::read(&path).unwrap(), b"png");
        assert_eq!(store.frames_written(), 1);

        assert!(store.write_frame(0, b"other").await.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"png");
        assert_eq!(store.frames_written(), 1);
    }

    #[tokio::test]
    async fn test_unsafe_ids_are_sanitised() {
        let tmp = TempDir::new().unwrap();
        let store = FrameStore::create(
            tmp.path(),
            &PlayerId::new("a/b"),
            &PlayerId::new(".."),
            &PlayerId::new("x y"),
            ts(),
        )
        .await
        .unwrap();
        assert_eq!(store.dir().parent().unwrap(), tmp.path());
        let name = store.dir().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("a_b____x_y_"));
    }

    #[tokio::test]
    async fn test_colliding_sanitised_ids_do_not_overwrite() {
        // "a/b" and "a_b" map to the same component; the second directory
        // for the same instant is refused rather than shared.
        let tmp = TempDir::new().unwrap();
        let id = PlayerId::new("1");
        let first = FrameStore::create(tmp.path(), &PlayerId::new("a/b"), &id, &id, ts())
            .await
            .unwrap();
        let err = FrameStore::create(tmp.path(), &PlayerId::new("a_b"), &id, &id, ts())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
        assert!(first.dir().is_dir());
    }

    #[tokio::test]
    async fn test_write_metadata() {
        let tmp = TempDir::new().unwrap();
        let id = PlayerId::new("1");
        let store = FrameStore::create(tmp.path(), &id, &id, &id, ts()).await.unwrap();
        let path = store
            .write_metadata(&serde_json::json!({"steps": 2}))
            .await
            .unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"steps\": 2"));
    }
}
