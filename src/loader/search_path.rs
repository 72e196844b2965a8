use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Environment variable seeding the global search path
pub const LOAD_PATH_ENV: &str = "COMMONKIT_LOAD_PATH";

static GLOBAL: Lazy<SearchPath> = Lazy::new(|| {
    let entries = std::env::var_os(LOAD_PATH_ENV)
        .map(|value| std::env::split_paths(&value).collect())
        .unwrap_or_default();
    SearchPath::new(entries)
});

/// Ordered list of directories consulted when resolving a unit by name
#[derive(Debug, Default)]
pub struct SearchPath {
    entries: Mutex<Vec<PathBuf>>,
}

impl SearchPath {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// The process-wide search path used by [`import_from`](super::import_from)
    pub fn global() -> &'static SearchPath {
        &GLOBAL
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current entries
    pub fn entries(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.lock().iter().any(|entry| entry == dir)
    }

    pub fn push(&self, dir: impl Into<PathBuf>) {
        self.lock().push(dir.into());
    }

    /// Remove the last entry equal to `dir`; returns whether one was found
    pub fn remove(&self, dir: &Path) -> bool {
        let mut entries = self.lock();
        match entries.iter().rposition(|entry| entry == dir) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Append `dir` until the returned guard is dropped
    pub fn extend_scoped(&self, dir: impl Into<PathBuf>) -> SearchPathGuard<'_> {
        let dir = dir.into();
        trace!("Search path extended with {}", dir.display());
        self.push(dir.clone());
        SearchPathGuard { path: self, dir }
    }
}

/// Removes its entry from the search path when dropped
#[must_use = "the entry is removed as soon as the guard is dropped"]
pub struct SearchPathGuard<'a> {
    path: &'a SearchPath,
    dir: PathBuf,
}

impl SearchPathGuard<'_> {
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for SearchPathGuard<'_> {
    fn drop(&mut self) {
        self.path.remove(&self.dir);
        trace!("Search path entry {} removed", self.dir.display());
    }
}
