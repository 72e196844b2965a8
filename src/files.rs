//! File listing helper.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// List the files selected by `path` and `glob`.
///
/// - If `path` is a directory, returns the entries below it whose path
///   relative to `path` matches `glob`. `*` stays within one component and
///   `**` descends recursively. Results are sorted when `sort` is true,
///   otherwise they come in the directory's native enumeration order.
/// - If `path` is an existing file, returns just that path and ignores `glob`.
///
/// # Errors
///
/// [`Error::PathNotFound`] when `path` is neither a directory nor a file,
/// [`Error::Pattern`] for an invalid glob, [`Error::Walk`] if traversal fails.
/// Subdirectories that cannot be read for lack of permission are skipped.
pub fn get_files(path: impl AsRef<Path>, glob: &str, sort: bool) -> Result<Vec<PathBuf>> {
    let root = path.as_ref();

    if root.is_dir() {
        let pattern = Pattern::new(glob)?;
        let mut files = collect_matches(root, &pattern, max_depth(glob))?;
        if sort {
            files.sort();
        }
        debug!(
            "Listed {} entries under {} matching {}",
            files.len(),
            root.display(),
            glob
        );
        Ok(files)
    } else if root.is_file() {
        trace!("{} is a file, glob {} not applied", root.display(), glob);
        Ok(vec![root.to_path_buf()])
    } else {
        Err(Error::PathNotFound {
            path: root.to_path_buf(),
        })
    }
}

/// Number of path components the pattern can span, unbounded for `**`.
fn max_depth(glob: &str) -> usize {
    if glob.split('/').any(|component| component == "**") {
        usize::MAX
    } else {
        glob.split('/').filter(|c| !c.is_empty()).count().max(1)
    }
}

fn collect_matches(root: &Path, pattern: &Pattern, depth: usize) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_unreadable_subdir(&err) => {
                debug!("Skipping unreadable directory: {}", err);
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if pattern.matches_path_with(relative, MATCH_OPTIONS) {
            matches.push(entry.into_path());
        }
    }

    Ok(matches)
}

/// Permission failures below the root are skipped, the root itself still errors.
fn is_unreadable_subdir(err: &walkdir::Error) -> bool {
    err.depth() > 0 && err.io_error().map(io::Error::kind) == Some(io::ErrorKind::PermissionDenied)
}
