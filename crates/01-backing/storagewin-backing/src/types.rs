//! Small value types shared by the placement engine.

use std::path::Path;

use crate::error::Result;

/// Which half of a hybrid region sits at the low addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitOrder {
    /// File-backed bytes occupy low addresses, RAM-only bytes the tail.
    StoragePrefix,
    /// RAM-only bytes occupy low addresses, file-backed bytes the tail (default).
    RamPrefix,
}

impl Default for SplitOrder {
    fn default() -> Self {
        SplitOrder::RamPrefix
    }
}

/// Kernel advice forwarded to the file-backed sub-range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessPattern {
    Normal,
    Sequential,
    Random,
}

impl Default for AccessPattern {
    fn default() -> Self {
        AccessPattern::Normal
    }
}

/// Open-mode for the backing file; stands in for the raw `open(2)` flag word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpenMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Default for OpenMode {
    fn default() -> Self {
        OpenMode::ReadWrite
    }
}

/// Parallel-filesystem stripe pre-allocation hook (spec §4.3 step 2).
///
/// Invoked at most once per allocation, only when the backing file does not
/// yet exist and a striping hint was supplied. The default, [`NoStriping`],
/// does nothing — shelling out to a filesystem-specific stripe-setting tool
/// is exactly the kind of side effect deployments should opt into
/// explicitly rather than get for free.
pub trait StripeHint {
    fn preallocate(&self, path: &Path, factor: u32, unit: u64) -> Result<()>;
}

/// No-op [`StripeHint`]; used whenever no striping hint was supplied.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStriping;

impl StripeHint for NoStriping {
    fn preallocate(&self, _path: &Path, _factor: u32, _unit: u64) -> Result<()> {
        Ok(())
    }
}
