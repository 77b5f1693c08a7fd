//! filememo
//!
//! Persists the results of single-argument function calls to individual files
//! on disk, keyed by the argument, so results survive across process runs.
//!
//! ```no_run
//! use filememo::{FileCache, FileCacheConfig};
//!
//! let cache = FileCache::new(FileCacheConfig::new("./c"))?;
//! let doubled = cache.wrap(|n: i64| n * 2);
//! assert_eq!(doubled.call(3)?, 6); // computed, written to ./c/3.json
//! assert_eq!(doubled.call(3)?, 6); // read back from ./c/3.json
//! # Ok::<(), filememo::CacheError>(())
//! ```

pub mod cache;

pub use cache::{
    derive_key, CacheError, CacheFormat, CachedCallError, CachedFn, FileCache, FileCacheConfig,
    TryCachedFn,
};
