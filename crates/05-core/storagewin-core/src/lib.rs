//! C4 (Allocation Facade) and C5 (Window Facade) — spec §4.3/§4.4.
//!
//! This is the crate a caller actually builds against: it composes the
//! hybrid-mapping assembler (`storagewin-backing`), the hint resolver
//! (`storagewin-hints`), the association registry (`storagewin-registry`)
//! and the host-runtime seam (`storagewin-runtime`) into the placement
//! engine described in spec §4.

mod alloc;
mod context;
mod error;
mod record;
mod runtime_store;
mod window;

pub use context::{Core, RecordHandle};
pub use error::{Error, Result};
pub use record::{AllocationKind, AllocationRecord, Owner};

pub use storagewin_backing::{AccessPattern, NoStriping, OpenMode, SplitOrder, StripeHint};
pub use storagewin_hints::{HintBag, PlacementDescriptor, StorageDescriptor};
pub use storagewin_runtime::HostRuntime;
