//! Persistent companion-key resolution.
//!
//! Each remote participant's companion object is identified across level
//! reloads by a 64-bit key sourced from a user-supplied text file, one key
//! per line as `HEXHALF_HEXHALF`. The halves are stored swapped on disk: the
//! part after the delimiter is recombined in front of the part before it,
//! and the concatenation parsed as a single hexadecimal integer
//! (`AB_CD` yields `0xCDAB`).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ClientError;

/// Read and parse the key file at `path`.
pub fn load_persistent_keys(path: &Path) -> Result<Vec<u64>, ClientError> {
    let file = File::open(path).map_err(|_| ClientError::KeyFileMissing(path.to_path_buf()))?;
    let keys = parse_keys(BufReader::new(file))?;
    info!(count = keys.len(), path = %path.display(), "loaded persistent companion keys");
    Ok(keys)
}

/// Resolve keys with a caller-supplied fallback for a missing file.
///
/// The fallback supplies an alternate path to retry with; `None` gives up and
/// yields an empty key sequence, which skips companion binding for the whole
/// session.
pub fn resolve_persistent_keys(
    path: &Path,
    mut fallback: impl FnMut() -> Option<PathBuf>,
) -> Vec<u64> {
    let mut current = path.to_path_buf();
    loop {
        match load_persistent_keys(&current) {
            Ok(keys) => return keys,
            Err(ClientError::KeyFileMissing(missing)) => {
                warn!(path = %missing.display(), "companion key file not found");
                match fallback() {
                    Some(next) => current = next,
                    None => return Vec::new(),
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to read companion key file");
                return Vec::new();
            }
        }
    }
}

fn parse_keys<R: BufRead>(reader: R) -> Result<Vec<u64>, ClientError> {
    let mut keys = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        // Lines without the delimiter are skipped silently.
        let Some((head, tail)) = trimmed.split_once('_') else {
            continue;
        };
        let combined = format!("{tail}{head}");
        match u64::from_str_radix(&combined, 16) {
            Ok(key) => keys.push(key),
            Err(_) => warn!(line = trimmed, "skipping malformed key line"),
        }
    }
    Ok(keys)
}
