//! Content digests of input snapshots.

use crate::error::TableError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Lowercase hex SHA-256 of a file's bytes.
pub fn file_digest(path: impl AsRef<Path>) -> Result<String, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TableError::io(path.display(), e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = reader
            .read(&mut buf)
            .map_err(|e| TableError::io(path.display(), e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
