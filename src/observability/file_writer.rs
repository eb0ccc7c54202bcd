//! Rotating log file writer.
//!
//! Size-capped writer used as the `fmt` layer's output when file logging is
//! configured. When the log exceeds the cap it is renamed to a timestamped
//! backup and a fresh file is started; only the newest backup is retained,
//! so a long-running session cannot grow the log directory without bound.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum log file size before rotation (5 MB).
const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

/// Number of rotated backups to retain.
const BACKUPS_TO_KEEP: usize = 1;

struct WriterInner {
    /// Path of the live log file.
    path: PathBuf,
    /// Rotation threshold in bytes.
    max_bytes: u64,
    /// Handle to the live file, opened lazily on first write.
    file: Mutex<Option<File>>,
}

/// Thread-safe, size-rotating log writer.
///
/// Cloning shares the underlying file handle; the subscriber clones one per
/// event via [`MakeWriter`].
#[derive(Clone)]
pub struct RotatingLogWriter {
    inner: Arc<WriterInner>,
}

impl RotatingLogWriter {
    /// Creates a writer for the given log file path.
    ///
    /// The file is not opened until the first write, so construction cannot
    /// fail; an unwritable path surfaces as per-write errors the subscriber
    /// swallows.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_max_bytes(path, MAX_LOG_BYTES)
    }

    /// Creates a writer with a custom rotation threshold.
    #[must_use]
    pub fn with_max_bytes(path: PathBuf, max_bytes: u64) -> Self {
        Self {
            inner: Arc::new(WriterInner {
                path,
                max_bytes: max_bytes.max(1),
                file: Mutex::new(None),
            }),
        }
    }

    fn write_all_locked(&self, buf: &[u8]) -> io::Result<()> {
        let mut file = self
            .inner
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("log lock poisoned: {e}")))?;

        if self.needs_rotation() {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.inner.path)?,
            );
        }

        let handle = file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        handle.write_all(buf)
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.inner.path).is_ok_and(|m| m.len() > self.inner.max_bytes)
    }

    /// Renames the live file to a timestamped backup and prunes older ones.
    fn rotate(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let backup = self.inner.path.with_extension(format!("{timestamp}.old"));

        if self.inner.path.exists() {
            fs::rename(&self.inner.path, &backup)?;
        }
        self.prune_backups();
        Ok(())
    }

    /// Deletes rotated backups beyond the retention count, oldest first.
    /// Individual deletion failures are ignored.
    fn prune_backups(&self) {
        let Some(parent) = self.inner.path.parent() else {
            return;
        };
        let Some(stem) = self.inner.path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };

        let Ok(entries) = fs::read_dir(parent) else {
            return;
        };
        let mut backups: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(stem) && name.ends_with(".old"))
            })
            .collect();

        backups.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        for stale in backups.iter().skip(BACKUPS_TO_KEEP) {
            let _ = fs::remove_file(stale);
        }
    }
}

impl io::Write for RotatingLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all_locked(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .inner
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("log lock poisoned: {e}")))?;
        if let Some(handle) = file.as_mut() {
            handle.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingLogWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl std::fmt::Debug for RotatingLogWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingLogWriter")
            .field("path", &self.inner.path)
            .field("max_bytes", &self.inner.max_bytes)
            .finish_non_exhaustive()
    }
}
