//! Error surface for hint resolution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `alloc_type=storage` was requested without `storage_alloc_filename`.
    #[error("storage_alloc_filename is required when alloc_type=storage")]
    MissingFilename,

    /// A hint value didn't parse, or fell outside its documented range.
    #[error("hint `{key}` has malformed value `{value}`")]
    Malformed { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
