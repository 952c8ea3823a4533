//! Lock-guarded positioned writer for the destination file.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Writes byte ranges into the pre-sized destination at their own offsets.
///
/// Each `write_at` opens the file, seeks, writes and closes it while holding
/// one lock shared by every caller, so no two writers ever have the file open
/// at the same time. Share it between tasks with `Arc`.
#[derive(Debug)]
pub struct RangeWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RangeWriter {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Write all of `data` starting at `offset`. The file is never created or
    /// truncated here; it must have been set up by `DestinationBuilder`.
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        // The guard protects no data, so a poisoned lock is still usable.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = File::options().write(true).open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        file.flush()
    }

    /// Path of the destination file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
