//! Advisory exclusive file locks with a bounded wait.
//!
//! Locks live in dedicated `.lock` files next to the state they guard and are
//! released when the guard is dropped.
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Poll `try_lock_exclusive` every `poll` until `timeout` has elapsed.
    pub fn acquire(path: &Path, timeout: Duration, poll: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::storage(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::storage(path, e))?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    tracing::trace!(lock = %path.display(), waited_ms = start.elapsed().as_millis() as u64, "lock acquired");
                    return Ok(Self { file, path: path.to_path_buf() });
                }
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    let waited = start.elapsed();
                    if waited >= timeout {
                        return Err(Error::LockTimeout { path: path.to_path_buf(), waited });
                    }
                    std::thread::sleep(poll.min(timeout - waited));
                }
                Err(e) => return Err(Error::storage(path, e)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// `state.json` -> `state.json.lock`
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}
