//! Builder for creating and pre-sizing the destination file.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

use super::writer::RangeWriter;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Builder for a new destination file. Call `preallocate` then `build` to get
/// a [`RangeWriter`] that can be shared by concurrent fetch tasks.
pub struct DestinationBuilder {
    file: File,
    path: PathBuf,
}

impl DestinationBuilder {
    /// Create the destination at `path`, truncating it if it already exists.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to create destination file: {}", path.display()))?;
        Ok(DestinationBuilder {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Extend the file to `size` bytes. On Unix tries `posix_fallocate` to
    /// reserve real blocks; falls back to `set_len` on failure or non-Unix.
    pub fn preallocate(&mut self, size: u64) -> Result<()> {
        #[cfg(unix)]
        {
            if let Ok(len) = libc::off_t::try_from(size) {
                let fd = self.file.as_raw_fd();
                let r = unsafe { libc::posix_fallocate(fd, 0, len) };
                if r == 0 {
                    return Ok(());
                }
                tracing::debug!(errno = r, "posix_fallocate failed, falling back to set_len");
            }
        }
        self.file
            .set_len(size)
            .with_context(|| format!("failed to preallocate {} bytes", size))?;
        Ok(())
    }

    /// Close the creation handle and return the shared writer.
    pub fn build(self) -> RangeWriter {
        RangeWriter::new(self.path)
    }
}
