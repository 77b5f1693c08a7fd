//! Errors raised while reading or writing cache entries

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while creating the cache directory or touching an entry
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache directory could not be created
    #[error("Failed to create cache directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An existing entry could not be read
    #[error("Failed to read cache entry {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A new entry could not be written
    #[error("Failed to write cache entry {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stored entry could not be decoded into the return type
    #[error("Failed to decode cache entry {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A computed result could not be encoded
    #[error("Failed to encode result for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The text format was asked to store something other than a string
    #[error("Text cache entry {} requires a string result", .path.display())]
    NotText { path: PathBuf },

    /// JSON cannot hold NaN or infinite floats without changing the value
    #[error("Result for {} contains a NaN or infinite float", .path.display())]
    NonFinite { path: PathBuf },

    /// Unusable format name or file extension
    #[error("Invalid cache format: {0:?}")]
    InvalidFormat(String),
}

/// Error returned by a cached call whose underlying function can fail
#[derive(Debug, Error)]
pub enum CachedCallError<E> {
    /// The cache itself failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The wrapped function failed; its error is passed through untouched
    #[error("{0}")]
    Function(E),
}

impl<E> CachedCallError<E> {
    /// Returns the wrapped function's error, if that is what failed
    pub fn into_function_error(self) -> Option<E> {
        match self {
            Self::Function(e) => Some(e),
            Self::Cache(_) => None,
        }
    }
}
