//! Error surface for the mapped-file backing layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`crate::MappedFile`] operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening, stat-ing, truncating or unlinking the backing file failed.
    #[error("filesystem operation on {path} failed: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A reservation mmap, fixed-address install, `mprotect`, `munmap`, `msync` or
    /// `madvise` call failed.
    #[error("mapping operation failed: {source}")]
    Mapping {
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for fallible backing operations.
pub type Result<T> = std::result::Result<T, Error>;
