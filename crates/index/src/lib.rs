//! Loading, validation and search for documentation search indices.
//!
//! A documentation generator ships its search index as a JavaScript file that
//! assigns one object, `{"docs": [...]}`, to a global variable. This crate
//! reads such files (optionally gzip-compressed), exposes their records
//! unchanged and in their original order, and writes them back out in the
//! generator's exact layout.

pub mod compare;
mod consts;
mod emit;
pub mod error;
pub mod models;
mod reader;
pub mod search;
mod sniff;
mod source;
mod stats;
pub mod validate;

use std::path::Path;

use exn::ResultExt;
use time::UtcDateTime;
use tracing::instrument;

pub use crate::consts::DEFAULT_VARIABLE;
use crate::error::{ErrorKind, Result};
use crate::models::Snapshot;
pub use crate::reader::IndexReader;
pub use crate::sniff::{HEADER_SNIFF_BYTES, looks_like_index, safe_utf8_truncate, split_assignment};
pub use crate::source::Compression;
pub use crate::stats::Stats;

/// Easy, top-level entrypoint for loading a [`Snapshot`] from raw bytes.
///
/// - Transparently decompresses gzip payloads, and
/// - Hashes the decompressed payload so snapshots can be compared cheaply.
///
/// Accepts raw bytes; see [`IndexReader`] for more details.
#[instrument(skip(bytes), fields(payload_size = bytes.as_ref().len()))]
pub fn load(bytes: impl AsRef<[u8]>) -> Result<Snapshot> {
    let bytes = bytes.as_ref();
    let payload = Compression::from_magic_bytes(bytes).decompress(bytes)?;
    Ok(Snapshot {
        hash: blake3::hash(&payload).to_string(),
        crc32: crc32fast::hash(&payload),
        length: payload.len() as u64,
        loaded_at: UtcDateTime::now(),
        index: IndexReader::from_utf8(&payload)?.index()?,
    })
}

/// Reads and loads the index at `path`.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_path(path: impl AsRef<Path>) -> Result<Snapshot> {
    let bytes = std::fs::read(path.as_ref()).or_raise(|| ErrorKind::Io)?;
    load(bytes)
}
