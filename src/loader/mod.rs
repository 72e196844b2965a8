//! Dynamic loading of code units.
//!
//! A unit is a platform dynamic library. It is either opened from an explicit
//! file path ([`import_file`]) or resolved by name against the [`SearchPath`]
//! after temporarily adding a directory to it ([`import_from`]).
//!
//! Opening a library runs its initialization routines, so every entry point
//! is `unsafe`: the caller vouches for the library being loaded.

mod search_path;

pub use search_path::{SearchPath, SearchPathGuard, LOAD_PATH_ENV};

use crate::error::{Error, Result};
use libloading::{Library, Symbol};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A loaded unit of code
pub struct Module {
    name: String,
    path: PathBuf,
    library: Library,
}

impl Module {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an exported symbol.
    ///
    /// # Safety
    ///
    /// `T` must match the actual type of the exported symbol.
    pub unsafe fn get<T>(&self, symbol: &str) -> Result<Symbol<'_, T>> {
        // SAFETY: the caller guarantees that `T` is the symbol's type.
        unsafe { self.library.get::<T>(symbol.as_bytes()) }.map_err(|e| {
            Error::load(&self.path, format!("symbol '{symbol}' not found")).with_source(e)
        })
    }

    /// Whether the unit exports `symbol`
    pub fn has_symbol(&self, symbol: &str) -> bool {
        // SAFETY: the symbol is only probed, never called or dereferenced.
        unsafe { self.library.get::<*const ()>(symbol.as_bytes()) }.is_ok()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// Where a unit is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// An explicit file; the name defaults to the file stem
    Path { path: PathBuf, name: Option<String> },
    /// A name resolved on the global search path extended with `dir`
    SearchPath { dir: PathBuf, name: String },
}

impl LoadSource {
    /// Load the unit described by this source.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initializers; the library must be sound to
    /// load into this process.
    pub unsafe fn load(self) -> Result<Module> {
        match self {
            Self::Path { path, name } => {
                let name = name.unwrap_or_else(|| default_name(&path));
                // SAFETY: forwarded to the caller.
                unsafe { open(path, name) }
            }
            Self::SearchPath { dir, name } => {
                let search_path = SearchPath::global();
                let _guard = search_path.extend_scoped(dir);
                let entries = search_path.entries();
                let candidate = resolve(&entries, &name).ok_or_else(|| Error::NotFound {
                    name: name.clone(),
                    searched: entries.clone(),
                })?;
                // SAFETY: forwarded to the caller.
                unsafe { open(candidate, name) }
            }
        }
    }
}

/// Load the unit at `path`, named `name` or after the file stem.
///
/// # Safety
///
/// See [`LoadSource::load`].
pub unsafe fn import_file(path: impl AsRef<Path>, name: Option<&str>) -> Result<Module> {
    let source = LoadSource::Path {
        path: path.as_ref().to_path_buf(),
        name: name.map(str::to_string),
    };
    // SAFETY: forwarded to the caller.
    unsafe { source.load() }
}

/// Resolve `name` on the search path temporarily extended with `dir`.
///
/// The extra entry is removed before this function returns, whether or not
/// the lookup succeeded.
///
/// # Safety
///
/// See [`LoadSource::load`].
pub unsafe fn import_from(dir: impl AsRef<Path>, name: &str) -> Result<Module> {
    let source = LoadSource::SearchPath {
        dir: dir.as_ref().to_path_buf(),
        name: name.to_string(),
    };
    // SAFETY: forwarded to the caller.
    unsafe { source.load() }
}

fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Candidate files for `name` inside `dir`, in preference order
fn candidates(dir: &Path, name: &str) -> [PathBuf; 2] {
    [
        dir.join(name),
        dir.join(libloading::library_filename(name)),
    ]
}

/// First existing candidate for `name` across `entries`
fn resolve(entries: &[PathBuf], name: &str) -> Option<PathBuf> {
    entries
        .iter()
        .flat_map(|dir| candidates(dir, name))
        .find(|candidate| candidate.is_file())
}

unsafe fn open(path: PathBuf, name: String) -> Result<Module> {
    if !path.exists() {
        return Err(Error::load(&path, "file does not exist"));
    }

    debug!("Loading unit '{}' from {}", name, path.display());
    // SAFETY: the caller vouches for the library's initializers.
    let library = unsafe { Library::new(&path) }
        .map_err(|e| Error::load(&path, "platform loader rejected the file").with_source(e))?;
    info!("Loaded unit '{}' from {}", name, path.display());

    Ok(Module {
        name,
        path,
        library,
    })
}
