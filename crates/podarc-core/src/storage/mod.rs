//! Temp-file writer with atomic promotion to the final archive path.
//!
//! Bodies are streamed to `<final>.part` and renamed into place only after
//! the transfer fully succeeds, so the archive's exists-check can never be
//! fooled by a truncated download.

use std::ffi::OsString;
use std::fs::File;
#[cfg(unix)]
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Writer for one in-flight download. Cloneable; writes are positioned
/// (pwrite-style) so a clone can be moved into a transfer callback while the
/// original finalizes afterwards.
#[derive(Clone)]
pub struct StorageWriter {
    file: Arc<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl StorageWriter {
    /// Creates (or truncates) the temp file next to `final_path`.
    ///
    /// A leftover `.part` from an interrupted run is simply overwritten.
    pub fn create(final_path: &Path) -> std::io::Result<Self> {
        let temp_path = part_path(final_path);
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(Self {
            file: Arc::new(file),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Writes `data` at `offset` without moving a shared cursor.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> std::io::Result<()> {
        self.file.write_all_at(data, offset)
    }

    /// Non-Unix fallback: seek + write on a cloned handle.
    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> std::io::Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = self.file.try_clone()?;
        f.seek(SeekFrom::Start(offset))?;
        f.write_all(data)
    }

    /// Flushes file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> std::io::Result<()> {
        self.file.sync_all()
    }

    /// Atomically renames the temp file onto the final path, replacing any
    /// stale file already there. Consumes the writer and closes the file.
    pub fn finalize(self) -> std::io::Result<()> {
        let (temp, final_path) = (self.temp_path, self.final_path);
        drop(self.file);
        std::fs::rename(&temp, &final_path)
    }

    /// Removes the temp file after a failed transfer. Best effort; a remnant
    /// `.part` is harmless and gets truncated by the next attempt.
    pub fn discard(self) {
        let temp = self.temp_path;
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&temp) {
            tracing::debug!("could not remove temp file {}: {}", temp.display(), e);
        }
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }
}

fn part_path(final_path: &Path) -> PathBuf {
    let mut name = OsString::from(final_path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
