//! Command Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration could not be loaded.
    #[display("configuration error")]
    Config,
    /// The index could not be read or parsed.
    #[display("failed to load index: {_0}")]
    Load(#[error(not(source))] String),
    /// No index was named and none is configured.
    #[display("no index given and no default index configured")]
    NoIndex,
    /// A record position outside the index.
    #[display("no record at position {position} (index has {records})")]
    NoRecord { position: usize, records: usize },
    /// Writing results failed.
    #[display("failed to write output")]
    Output,
}
