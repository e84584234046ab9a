use std::io;

use thiserror::Error;

/// Failure reported by the value source underneath a sequence. Combinators
/// pass it through unchanged.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },
    #[error("row at line {line} has {found} fields, expected {expected}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("shared collection is mutably borrowed")]
    Busy,
    #[error("count stepped past the range of its type")]
    Overflow,
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
