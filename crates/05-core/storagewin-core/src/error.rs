//! Error surface for the allocation and window facades (spec §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backing(#[from] storagewin_backing::Error),

    #[error(transparent)]
    Hints(#[from] storagewin_hints::Error),

    #[error(transparent)]
    Runtime(#[from] storagewin_runtime::Error),

    /// `free`/`window_detach` received a pointer the registry has no record of.
    #[error("base pointer is not tracked by this allocator")]
    UnknownBase,

    /// `window_sync` found both RAM- and Storage-kind allocations bound to
    /// the same window; no meaningful cross-placement sync is defined.
    #[error("window carries both RAM and storage allocations; sync is undefined")]
    MixedPlacementSync,

    /// Windows carrying library-owned allocations may not be cloned.
    #[error("attribute copy is not supported for library-managed windows")]
    AttributeCopyUnsupported,
}

pub type Result<T> = std::result::Result<T, Error>;
