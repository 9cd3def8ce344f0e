//! The hybrid RAM/file virtual-address assembler.
//!
//! A [`MappedFile`] is a single contiguous virtual-memory region whose bytes
//! are split, at a page boundary, between a file-backed sub-range and an
//! anonymous (RAM-only) sub-range. Either sub-range may be empty, giving a
//! pure storage-backed or pure RAM-backed mapping as special cases of the
//! same geometry.

mod error;
mod geometry;
mod mapped_file;
mod types;

pub use error::{Error, Result};
pub use geometry::{align_down, page_size, Geometry};
pub use mapped_file::MappedFile;
pub use types::{AccessPattern, NoStriping, OpenMode, SplitOrder, StripeHint};
