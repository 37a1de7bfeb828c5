//! Knowledge-base snapshots using `MessagePack`.
//!
//! A snapshot stores a compiled knowledge base (fact names, questions and
//! rules in evaluation order) so it can be reloaded without reparsing the
//! JSON document. Snapshots carry a format version; loading a snapshot with
//! a different version fails.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sylloge_engine::KnowledgeBase;
use sylloge_foundation::{Error, ErrorKind, Result};
use tracing::debug;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    kb: &'a KnowledgeBase,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    kb: KnowledgeBase,
}

fn serialization_error(e: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Serialization(e.to_string()))
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} '{}': {e}",
        path.display()
    )))
}

/// Serializes a knowledge base to `MessagePack` bytes.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(kb: &KnowledgeBase) -> Result<Vec<u8>> {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        kb,
    };
    rmp_serde::to_vec_named(&snapshot).map_err(serialization_error)
}

/// Deserializes a knowledge base from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a snapshot, the snapshot version
/// is not [`SNAPSHOT_VERSION`], or the knowledge base fails
/// [`KnowledgeBase::validate`] (duplicate ids, dangling question links,
/// unnamed facts).
pub fn from_bytes(bytes: &[u8]) -> Result<KnowledgeBase> {
    let snapshot: Snapshot = rmp_serde::from_slice(bytes).map_err(serialization_error)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(serialization_error(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }
    snapshot.kb.validate()?;
    Ok(snapshot.kb)
}

/// Saves a knowledge base snapshot to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(kb: &KnowledgeBase, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(kb)?;

    let file = File::create(path).map_err(|e| io_error("create", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write to", path, &e))?;
    writer.flush().map_err(|e| io_error("flush", path, &e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// Loads a knowledge base snapshot from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<KnowledgeBase> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open", path, &e))?;

    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read", path, &e))?;

    from_bytes(&bytes)
}
