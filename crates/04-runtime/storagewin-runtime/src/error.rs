//! Error surface for `HostRuntime` implementations.

use thiserror::Error;

/// Failures a `HostRuntime` implementation can surface. These stand in for
/// whatever the real one-sided-communication runtime's own error codes are;
/// the library never inspects them beyond propagating `source()`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("native allocation failed: {0}")]
    Alloc(String),

    #[error("native free failed: {0}")]
    Free(String),

    #[error("window create failed: {0}")]
    WindowCreate(String),

    #[error("window attach failed: {0}")]
    WindowAttach(String),

    #[error("window detach failed: {0}")]
    WindowDetach(String),

    #[error("window free failed: {0}")]
    WindowFree(String),

    #[error("window sync failed: {0}")]
    WindowSync(String),

    #[error("keyval creation failed: {0}")]
    CreateKeyval(String),

    #[error("set_attr failed: {0}")]
    SetAttr(String),

    #[error("delete_attr failed: {0}")]
    DeleteAttr(String),
}

pub type Result<T> = std::result::Result<T, Error>;
