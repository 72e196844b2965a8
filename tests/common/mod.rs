//! Common test utilities and helpers

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Test context builder for setting up directory fixtures
pub struct TestContextBuilder {
    temp_dir: TempDir,
    initial_files: Vec<(PathBuf, String)>,
    initial_dirs: Vec<PathBuf>,
}

impl TestContextBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            initial_files: Vec::new(),
            initial_dirs: Vec::new(),
        })
    }

    /// Add an initial file
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.initial_files
            .push((path.as_ref().to_path_buf(), content.to_string()));
        self
    }

    /// Add an empty directory
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.initial_dirs.push(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<TestContext> {
        let root = self.temp_dir.path();

        for dir in self.initial_dirs {
            fs::create_dir_all(root.join(dir))?;
        }

        for (file_path, content) in self.initial_files {
            let full_path = root.join(file_path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full_path, content)?;
        }

        Ok(TestContext {
            temp_dir: self.temp_dir,
        })
    }
}

/// Test context that manages temporary directories and cleanup
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(rel)
    }
}

/// In-memory log sink usable as a `MakeWriter`
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    /// A writer factory appending to this capture
    pub fn make_writer(&self) -> impl Fn() -> LogCapture + Send + Sync + 'static {
        let capture = self.clone();
        move || capture.clone()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Locate the C runtime shared library on glibc systems
pub fn find_libc() -> Option<PathBuf> {
    const DIRS: &[&str] = &[
        "/lib/x86_64-linux-gnu",
        "/usr/lib/x86_64-linux-gnu",
        "/lib/aarch64-linux-gnu",
        "/usr/lib/aarch64-linux-gnu",
        "/lib64",
        "/usr/lib64",
        "/lib",
        "/usr/lib",
    ];
    DIRS.iter()
        .map(|dir| Path::new(dir).join("libc.so.6"))
        .find(|candidate| candidate.is_file())
}
