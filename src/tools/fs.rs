//! Whole-file reads and writes used by the command line tools and the batch driver.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use log::warn;

use crate::error::{Result, SlyError};

/// Read a file. With `max_bytes == 0` the whole file is returned, otherwise at most
/// `max_bytes` bytes (fewer if the file is shorter).
pub fn read(path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| SlyError::io(path, e))?;

    let mut data = Vec::new();
    if max_bytes == 0 {
        file.read_to_end(&mut data)
            .map_err(|e| SlyError::io(path, e))?;
    } else {
        file.take(max_bytes as u64)
            .read_to_end(&mut data)
            .map_err(|e| SlyError::io(path, e))?;
    }
    Ok(data)
}

/// Write `data` to `path`. When `truncate` is false and the file already exists,
/// nothing is written and the call still succeeds.
pub fn write(path: &Path, data: &[u8], truncate: bool) -> Result<()> {
    if !truncate && path.exists() {
        warn!("Skipping overwriting existing file {}", path.display());
        return Ok(());
    }

    let mut file = File::create(path).map_err(|e| SlyError::io(path, e))?;
    file.write_all(data).map_err(|e| SlyError::io(path, e))
}

/// Create a directory and any missing parents. Existing directories are fine.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| SlyError::io(path, e))
}
