/// Cached session profile — the terminal equivalent of the web client's
/// local-storage entry.
///
/// One JSON file under `~/.local/share/mediassist/`. Read once at startup to
/// decide between the auth screen and the chat screen; written after a
/// successful login/register; deleted on logout. Malformed or incomplete
/// contents are treated as "not logged in" and the file is removed so the
/// bad cache cannot resurface.
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionProfile {
    pub user_id: String,
    pub nombre: String,
    pub correo: String,
}

// ── Store ─────────────────────────────────────────────────────────────────────

pub struct SessionStore {
    path: PathBuf,
}

fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(std::env::var("HOME").unwrap_or_default()).join(".local/share")
        })
        .join("mediassist")
}

impl SessionStore {
    pub fn open_default() -> Self {
        Self { path: data_dir().join("profile.json") }
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Load the cached profile. Anything unreadable, unparseable, or missing
    /// a user id counts as absent — and the stale file is deleted.
    pub fn load(&self) -> Option<SessionProfile> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<SessionProfile>(&raw) {
            Ok(profile) if !profile.user_id.trim().is_empty() => Some(profile),
            _ => {
                let _ = std::fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn save(&self, profile: &SessionProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(profile)?)?;
        Ok(())
    }

    /// Remove the cached profile. Ok when no file exists.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::at(dir.path().join("profile.json"))
    }

    fn profile() -> SessionProfile {
        SessionProfile {
            user_id: "u-1".into(),
            nombre: "Ana".into(),
            correo: "ana@example.com".into(),
        }
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_none());

        store.save(&profile()).unwrap();
        assert_eq!(store.load(), Some(profile()));

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn malformed_cache_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("profile.json");

        std::fs::write(&path, "{not json").unwrap();
        assert!(store.load().is_none());
        assert!(!path.exists(), "bad cache file should be removed");
    }

    #[test]
    fn blank_user_id_counts_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("profile.json");

        std::fs::write(&path, r#"{"user_id": "  ", "nombre": "x", "correo": "y"}"#).unwrap();
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn clear_without_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        store_in(&dir).clear().unwrap();
    }
}
