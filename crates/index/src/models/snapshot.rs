use super::SearchIndex;
use time::UtcDateTime;

/// A search index loaded from a specific payload.
///
/// Two snapshots with the same `hash` were loaded from byte-identical
/// (decompressed) payloads, so comparing hashes is the cheap way to tell
/// whether a preview build changed its index at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// BLAKE3 hash of the decompressed payload
    pub hash: String,
    /// Decompressed payload length in bytes (for quick/cheap equality check)
    pub length: u64,
    /// CRC32 of the decompressed payload
    pub crc32: u32,
    pub index: SearchIndex,
    pub loaded_at: UtcDateTime,
}
impl AsRef<SearchIndex> for Snapshot {
    fn as_ref(&self) -> &SearchIndex {
        &self.index
    }
}
impl Snapshot {
    /// Returns `true` if both snapshots were loaded from the same payload.
    pub fn same_payload(&self, other: &Self) -> bool {
        self.length == other.length && self.crc32 == other.crc32 && self.hash == other.hash
    }
}
