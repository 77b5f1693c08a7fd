//! Configuration for a file cache

use super::CacheFormat;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where and how a `FileCache` stores its entries
///
/// Can be built in code or deserialized from a host application's config file;
/// `hash_filenames` and `format` default to `false` and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCacheConfig {
    /// Directory holding one file per cached argument
    pub directory: PathBuf,
    /// Name entries by the SHA-256 of the argument instead of the argument itself
    #[serde(default)]
    pub hash_filenames: bool,
    /// Encoding used for every entry in the directory
    #[serde(default)]
    pub format: CacheFormat,
}

impl FileCacheConfig {
    /// Creates a config for the given directory with literal filenames and JSON entries
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            hash_filenames: false,
            format: CacheFormat::default(),
        }
    }

    /// Creates a config rooted in the platform cache directory for `project`
    ///
    /// Uses `~/.cache/<project>/` on Linux, or equivalent XDG path on other platforms.
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn for_project(project: &str) -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", project)?;
        Some(Self::new(project_dirs.cache_dir()))
    }

    /// Sets whether filenames are hashed
    pub fn hash_filenames(mut self, hash_filenames: bool) -> Self {
        self.hash_filenames = hash_filenames;
        self
    }

    /// Sets the on-disk format
    pub fn format(mut self, format: CacheFormat) -> Self {
        self.format = format;
        self
    }

    /// Nests the cache directory one level deeper
    pub fn subdirectory(mut self, name: impl AsRef<Path>) -> Self {
        self.directory = self.directory.join(name);
        self
    }
}
