//! The allocation record (spec §3): one per user-visible allocation.

use storagewin_backing::MappedFile;
use storagewin_registry::UserPointer;

/// Where one allocation's bytes actually live.
#[derive(Debug)]
pub enum AllocationKind {
    /// A buffer handed back by the host runtime's native allocator.
    ///
    /// Stored as an address rather than a raw pointer so `AllocationRecord`
    /// stays `Send` — the same reasoning `MappedFile` applies to its own
    /// `base_addr` field.
    Ram { addr: usize, len: usize },
    /// A hybrid RAM/file mapping.
    Storage(MappedFile),
}

/// Which party is responsible for tearing the allocation down.
///
/// Replaces the spec's `release_on_window_destroy: bool` field with a proper
/// two-state type per spec §9 ("Ownership hand-off"): transitions happen
/// only through `Core`'s binding methods, never by flipping a bare flag from
/// arbitrary call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    /// The caller allocated this explicitly and may reuse or free it itself.
    User,
    /// Born inside `window_allocate`; the library owns it end-to-end and
    /// destroys it when the owning window is destroyed.
    Library,
}

/// One record per user-visible allocation (spec §3).
#[derive(Debug)]
pub struct AllocationRecord {
    pub kind: AllocationKind,
    pub owner: Owner,
}

impl AllocationRecord {
    pub fn new(kind: AllocationKind, owner: Owner) -> Self {
        Self { kind, owner }
    }

    /// The "user-visible pointer" (spec §3): `data` for a RAM allocation,
    /// `user_addr` for a Storage one.
    pub fn user_ptr(&self) -> usize {
        match &self.kind {
            AllocationKind::Ram { addr, .. } => *addr,
            AllocationKind::Storage(mapped) => mapped.user_ptr() as usize,
        }
    }
}

impl UserPointer for std::sync::Arc<parking_lot::Mutex<AllocationRecord>> {
    fn user_ptr(&self) -> usize {
        self.lock().user_ptr()
    }
}
