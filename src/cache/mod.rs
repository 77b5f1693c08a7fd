//! Cache module for persisting function results to disk
//!
//! This module provides a file cache that stores the result of each call to a
//! single-argument function in its own file, named after the argument. Later
//! calls with the same argument, in this process or a future one, read the
//! file instead of calling the function again.

mod config;
mod error;
mod finite;
mod format;
mod key;
mod manager;

pub use config::FileCacheConfig;
pub use error::{CacheError, CachedCallError};
pub use format::CacheFormat;
pub use key::derive_key;
pub use manager::{CachedFn, FileCache, TryCachedFn};
