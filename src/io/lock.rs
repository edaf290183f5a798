use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError { path: PathBuf, source: io::Error },
    #[error("could not acquire lock on {path}: another taskboard process may be writing")]
    Timeout { path: PathBuf },
    #[error("lock error: {0}")]
    IoError(#[from] io::Error),
}

/// Advisory lock serializing mutating commands against one board.
///
/// Held for the lifetime of the value; closing the handle releases the
/// flock. The lock file records the holder's pid for debugging stuck locks.
pub struct BoardLock {
    file: File,
    path: PathBuf,
}

impl BoardLock {
    /// Acquire the board lock, polling until `timeout` elapses.
    pub fn acquire(board_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = board_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateError {
                path: path.clone(),
                source: e,
            })?;

        let deadline = Instant::now() + timeout;
        while !try_exclusive(&file)? {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(POLL_INTERVAL);
        }

        let mut lock = BoardLock { file, path };
        lock.write_holder();
        Ok(lock)
    }

    /// Acquire with the default 5 second timeout.
    pub fn acquire_default(board_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(board_dir, Duration::from_secs(5))
    }

    /// Record the holder's pid in the lock file. Informational only.
    fn write_holder(&mut self) {
        let _ = self.file.set_len(0);
        let _ = writeln!(self.file, "{}", std::process::id());
        let _ = self.file.flush();
    }
}

impl Drop for BoardLock {
    fn drop(&mut self) {
        // Closing the handle releases the flock; the file itself is disposable
        let _ = fs::remove_file(&self.path);
    }
}

/// Non-blocking exclusive flock. `Ok(false)` means another process holds it.
fn try_exclusive(file: &File) -> io::Result<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc == 0 {
            return Ok(true);
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::WouldBlock {
            return Ok(false);
        }
        Err(err)
    }
    #[cfg(not(unix))]
    {
        let _ = file;
        Ok(true)
    }
}
