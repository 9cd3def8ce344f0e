//! The resolved output of `resolve` (spec §6): what an allocation facade
//! needs to go build either a raw buffer or a [`storagewin_backing::MappedFile`].

use storagewin_backing::{AccessPattern, OpenMode, SplitOrder};

/// A fully-resolved placement, ready for `storagewin-core`'s allocation
/// facade to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementDescriptor {
    Ram,
    Storage(StorageDescriptor),
}

/// Everything `MappedFile::alloc` needs, plus the optional striping hint
/// consumed once, before the file exists, by `storagewin-core`.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageDescriptor {
    pub filename: String,
    pub offset: usize,
    pub split_factor: f64,
    pub split_order: SplitOrder,
    pub unlink: bool,
    pub access_pattern: AccessPattern,
    pub open_mode: OpenMode,
    pub file_mode: u32,
    pub striping_factor: Option<u32>,
    pub striping_unit: Option<u64>,
}
