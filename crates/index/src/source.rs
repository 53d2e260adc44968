//! Detection and removal of transport compression.
//!
//! Documentation hosts commonly pre-compress static assets, so an index may
//! arrive as `search_index.js.gz`. Only gzip is handled; anything else is
//! passed through untouched and left for the parser to reject.

use std::borrow::Cow;
use std::path::Path;

use crate::error::Result;
#[cfg(feature = "gzip")]
use crate::error::ErrorKind;
#[cfg(feature = "gzip")]
use exn::ResultExt;
#[cfg(feature = "gzip")]
use std::io::Read;
use tracing::instrument;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compression applied to an index payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Gzip compression (.gz)
    Gzip,
}
impl Compression {
    /// Detect compression from a file extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "gz" => Compression::Gzip,
                _ => Compression::None,
            })
            .unwrap_or(Compression::None)
    }

    /// Detect compression format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        match bytes.starts_with(&GZIP_MAGIC) {
            true => Compression::Gzip,
            false => Compression::None,
        }
    }

    /// Decompress a payload in memory, borrowing it when it isn't compressed.
    #[instrument(skip(input), fields(format = ?self, input_size = input.len(), output_size))]
    pub fn decompress<'a>(&self, input: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        let output = match self {
            Compression::None => Cow::Borrowed(input),
            #[cfg(feature = "gzip")]
            Compression::Gzip => {
                let mut output = Vec::new();
                flate2::read::GzDecoder::new(input)
                    .read_to_end(&mut output)
                    .or_raise(|| ErrorKind::Decompress)?;
                Cow::Owned(output)
            },
            #[cfg(not(feature = "gzip"))]
            Compression::Gzip => exn::bail!(crate::error::ErrorKind::MalformedDocument(
                "gzip-compressed payload, but gzip support is disabled".to_string()
            )),
        };
        tracing::Span::current().record("output_size", output.len());
        Ok(output)
    }
}
impl From<&[u8]> for Compression {
    fn from(value: &[u8]) -> Self {
        Compression::from_magic_bytes(value)
    }
}
