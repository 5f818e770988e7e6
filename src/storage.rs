use anyhow::{Context, Result};
use directories::ProjectDirs;
use rand::{distributions::Alphanumeric, Rng};
use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const STORE_DIR_NAME: &str = ".notekeeper";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("quota exceeded writing {key}: {needed} bytes over a {quota} byte limit")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),
}

/// Synchronous, string-keyed durable medium.
///
/// `get` returns `Ok(None)` for a missing key; `Err` is reserved for a store
/// that cannot be reached at all.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Single-threaded, so `RefCell` is enough for `&self` writes.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes once the total stored bytes would exceed `quota`.
    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            entries: RefCell::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a directory. Writes go through a temp file and a
/// rename so a crash never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        let tmp = self.dir.join(format!(".{}-{}.tmp", key, suffix));
        let written = fs::write(&tmp, value)
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })
            .and_then(|()| {
                fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
            });
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    Project,
    Global,
    Explicit,
}

#[derive(Debug, Clone)]
pub struct StoreLocation {
    pub dir: PathBuf,
    pub scope: StoreScope,
}

impl StoreScope {
    pub fn label(&self) -> &'static str {
        match self {
            StoreScope::Project => "project",
            StoreScope::Global => "global",
            StoreScope::Explicit => "explicit",
        }
    }
}

impl StoreLocation {
    pub fn open(&self) -> FileStore {
        FileStore::new(self.dir.clone())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.join("logs")
    }
}

pub fn init_project_store(start: &Path) -> Result<StoreLocation> {
    let dir = start.join(STORE_DIR_NAME);
    fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;
    Ok(StoreLocation {
        dir,
        scope: StoreScope::Project,
    })
}

pub fn init_store_at(dir: &Path) -> Result<StoreLocation> {
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    Ok(StoreLocation {
        dir: dir.to_path_buf(),
        scope: StoreScope::Explicit,
    })
}

/// An explicit directory wins, then the nearest project store walking up from
/// the working directory, then the per-user data directory.
pub fn locate_store(explicit: Option<&Path>) -> Result<StoreLocation> {
    if let Some(dir) = explicit {
        return Ok(StoreLocation {
            dir: dir.to_path_buf(),
            scope: StoreScope::Explicit,
        });
    }
    let cwd = env::current_dir().context("reading current directory")?;
    if let Some(dir) = find_project_store(&cwd) {
        return Ok(StoreLocation {
            dir,
            scope: StoreScope::Project,
        });
    }
    Ok(StoreLocation {
        dir: global_store_dir()?,
        scope: StoreScope::Global,
    })
}

fn find_project_store(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(STORE_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

fn global_store_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "notekeeper").context("locating data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_reports_missing_keys() {
        let store = MemoryStore::new();
        assert_eq!(store.get("noteKeeperDB").unwrap(), None);
        store.set("noteKeeperDB", "{}").unwrap();
        assert_eq!(store.get("noteKeeperDB").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn memory_store_quota_keeps_previous_value() {
        let store = MemoryStore::with_quota(32);
        store.set("k", "small").unwrap();
        let err = store.set("k", &"x".repeat(64)).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn file_store_round_trips_and_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("data"));
        assert_eq!(store.get("theme").unwrap(), None);
        store.set("theme", "\"dark\"").unwrap();
        store.set("theme", "\"light\"").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"light\""));

        for entry in fs::read_dir(store.dir()).unwrap() {
            let name = entry.unwrap().file_name().into_string().unwrap();
            assert!(!name.ends_with(".tmp"), "leftover temp file {}", name);
        }
        assert!(store.dir().join("theme.json").exists());
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(matches!(
            store.get("../escape"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.set("", "x"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn file_store_surfaces_unwritable_directory() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = FileStore::new(blocker.join("nested"));
        assert!(matches!(store.set("k", "v"), Err(StoreError::Io { .. })));
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        fs::create_dir(tmp.path().join("k.json")).unwrap();
        fs::write(tmp.path().join("k.json").join("inner"), "x").unwrap();
        assert!(matches!(store.set("k", "v"), Err(StoreError::Io { .. })));
        for entry in fs::read_dir(tmp.path()).unwrap() {
            let name = entry.unwrap().file_name().into_string().unwrap();
            assert!(!name.ends_with(".tmp"), "leftover temp file {}", name);
        }
    }

    #[test]
    fn project_store_is_found_from_nested_directory() {
        let tmp = TempDir::new().unwrap();
        let location = init_project_store(tmp.path()).unwrap();
        assert_eq!(location.scope, StoreScope::Project);
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_store(&nested), Some(location.dir));
    }

    #[test]
    fn explicit_directory_wins() {
        let tmp = TempDir::new().unwrap();
        let location = locate_store(Some(tmp.path())).unwrap();
        assert_eq!(location.scope, StoreScope::Explicit);
        assert_eq!(location.dir, tmp.path());
        assert_eq!(location.log_dir(), tmp.path().join("logs"));
    }
}
