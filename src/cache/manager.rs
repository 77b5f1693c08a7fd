//! File cache for persisting function results to disk
//!
//! Provides a `FileCache` that stores one file per distinct argument and hands
//! out wrapped functions which consult that directory before computing.

use super::{derive_key, CacheError, CacheFormat, CachedCallError, FileCacheConfig};
use serde::de::{self, DeserializeOwned};
use serde::Serialize;
use std::convert::Infallible;
use std::fmt::{self, Display};
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads and writes per-argument cache entries in one directory
///
/// Entries are named `<key>.<extension>`, where the key is derived from the
/// argument (see [`derive_key`]). An existing entry is always returned as-is:
/// there is no expiry, and nothing here ever deletes or rewrites a file that
/// is already present.
#[derive(Debug, Clone)]
pub struct FileCache {
    config: FileCacheConfig,
}

impl FileCache {
    /// Creates a cache from `config`, creating its directory (and parents) if missing
    ///
    /// # Returns
    /// * `Ok(FileCache)` once the directory exists
    /// * `Err(CacheError::InvalidFormat)` if the format's extension cannot name a file
    /// * `Err(CacheError::CreateDir)` if it cannot be created, e.g. a regular
    ///   file is in the way or permissions forbid it
    pub fn new(config: FileCacheConfig) -> Result<Self, CacheError> {
        config.format.validate()?;
        let cache = Self { config };
        cache.ensure_dir()?;
        Ok(cache)
    }

    /// Directory where cache files are stored
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Encoding used for entries
    pub fn format(&self) -> &CacheFormat {
        &self.config.format
    }

    /// Whether entry names are hashed
    pub fn hash_filenames(&self) -> bool {
        self.config.hash_filenames
    }

    /// Returns the path of the entry for `arg`, whether or not it exists
    pub fn entry_path<A: Display + ?Sized>(&self, arg: &A) -> PathBuf {
        let key = derive_key(arg, self.config.hash_filenames);
        self.config
            .directory
            .join(format!("{}.{}", key, self.config.format.extension()))
    }

    /// Whether an entry for `arg` is already on disk
    pub fn contains<A: Display + ?Sized>(&self, arg: &A) -> bool {
        self.entry_path(arg).is_file()
    }

    /// Returns the cached value for `arg`, or computes, stores and returns it
    pub fn get_or_compute<A, R, F>(&self, arg: &A, compute: F) -> Result<R, CacheError>
    where
        A: Display + ?Sized,
        R: Serialize + DeserializeOwned,
        F: FnOnce() -> R,
    {
        let path = self.entry_path(arg);
        self.resolve(path, || Ok::<_, Infallible>(compute())).map_err(cache_error)
    }

    /// Like [`get_or_compute`](Self::get_or_compute) for a computation that can fail
    ///
    /// A failed computation is returned as `CachedCallError::Function` and
    /// leaves no entry behind.
    pub fn try_get_or_compute<A, R, E, F>(
        &self,
        arg: &A,
        compute: F,
    ) -> Result<R, CachedCallError<E>>
    where
        A: Display + ?Sized,
        R: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<R, E>,
    {
        let path = self.entry_path(arg);
        self.resolve(path, compute)
    }

    /// Wraps `func` so every call goes through this cache
    pub fn wrap<A, R, F>(self, func: F) -> CachedFn<A, R, F>
    where
        F: Fn(A) -> R,
    {
        CachedFn {
            cache: self,
            func,
            _call: PhantomData,
        }
    }

    /// Wraps a fallible `func` so every call goes through this cache
    pub fn wrap_fallible<A, R, E, F>(self, func: F) -> TryCachedFn<A, R, E, F>
    where
        F: Fn(A) -> Result<R, E>,
    {
        TryCachedFn {
            cache: self,
            func,
            _call: PhantomData,
        }
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> Result<(), CacheError> {
        let dir = &self.config.directory;
        fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "cache directory ready");
        Ok(())
    }

    /// Hit: decode the stored entry. Miss: compute, encode, then write.
    fn resolve<R, E, F>(&self, path: PathBuf, compute: F) -> Result<R, CachedCallError<E>>
    where
        R: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<R, E>,
    {
        if let Some(value) = self.read(&path)? {
            debug!(path = %path.display(), "cache hit");
            return Ok(value);
        }

        debug!(path = %path.display(), "cache miss");
        let result = compute().map_err(CachedCallError::Function)?;
        self.write(&path, &result)?;
        Ok(result)
    }

    /// Reads an entry, returning `None` if it does not exist
    ///
    /// Contents that are not UTF-8 count as a decode failure, not an I/O one.
    fn read<R: DeserializeOwned>(&self, path: &Path) -> Result<Option<R>, CacheError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let decoded = String::from_utf8(bytes)
            .map_err(|e| CacheError::Decode {
                path: path.to_path_buf(),
                source: de::Error::custom(e),
            })
            .and_then(|contents| self.config.format.decode(contents, path));

        match decoded {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stored cache entry is unreadable");
                Err(e)
            }
        }
    }

    /// Writes an entry; the payload is fully encoded before the file is opened
    fn write<R: Serialize>(&self, path: &Path, value: &R) -> Result<(), CacheError> {
        let payload = self.config.format.encode(value, path)?;
        fs::write(path, payload).map_err(|source| CacheError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn cache_error(err: CachedCallError<Infallible>) -> CacheError {
    match err {
        CachedCallError::Cache(e) => e,
        CachedCallError::Function(never) => match never {},
    }
}

/// A function whose results are persisted by a [`FileCache`]
pub struct CachedFn<A, R, F> {
    cache: FileCache,
    func: F,
    _call: PhantomData<fn(A) -> R>,
}

impl<A, R, F> CachedFn<A, R, F>
where
    A: Display,
    R: Serialize + DeserializeOwned,
    F: Fn(A) -> R,
{
    /// Returns the stored result for `arg`, calling the function only on a miss
    pub fn call(&self, arg: A) -> Result<R, CacheError> {
        let path = self.cache.entry_path(&arg);
        self.cache
            .resolve(path, || Ok::<_, Infallible>((self.func)(arg)))
            .map_err(cache_error)
    }
}

impl<A, R, F> CachedFn<A, R, F> {
    /// The cache backing this function
    pub fn cache(&self) -> &FileCache {
        &self.cache
    }
}

impl<A, R, F> fmt::Debug for CachedFn<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedFn")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// A fallible function whose successful results are persisted by a [`FileCache`]
pub struct TryCachedFn<A, R, E, F> {
    cache: FileCache,
    func: F,
    _call: PhantomData<fn(A) -> Result<R, E>>,
}

impl<A, R, E, F> TryCachedFn<A, R, E, F>
where
    A: Display,
    R: Serialize + DeserializeOwned,
    F: Fn(A) -> Result<R, E>,
{
    /// Returns the stored result for `arg`, calling the function only on a miss
    ///
    /// The function's own error comes back unchanged as `CachedCallError::Function`.
    pub fn call(&self, arg: A) -> Result<R, CachedCallError<E>> {
        let path = self.cache.entry_path(&arg);
        self.cache.resolve(path, || (self.func)(arg))
    }
}

impl<A, R, E, F> TryCachedFn<A, R, E, F> {
    /// The cache backing this function
    pub fn cache(&self) -> &FileCache {
        &self.cache
    }
}

impl<A, R, E, F> fmt::Debug for TryCachedFn<A, R, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryCachedFn")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
