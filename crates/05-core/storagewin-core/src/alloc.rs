//! C4 — the Allocation Facade (spec §4.3).

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use storagewin_backing::MappedFile;
use storagewin_hints::{HintBag, PlacementDescriptor};
use storagewin_runtime::HostRuntime;

use crate::context::{Core, RecordHandle};
use crate::error::{Error, Result};
use crate::record::{AllocationKind, AllocationRecord, Owner};

impl<R: HostRuntime<Value = RecordHandle>> Core<R> {
    /// Resolves `hints`, places `size` bytes in RAM or on storage, and
    /// records a fresh, unbound `AllocationRecord`.
    pub fn allocate(&self, size: usize, hints: &HintBag) -> Result<*mut u8> {
        let descriptor = storagewin_hints::resolve(hints)?;
        let (ptr, kind) = match descriptor {
            PlacementDescriptor::Ram => {
                let ptr = self.runtime.native_alloc(size)?;
                (ptr, AllocationKind::Ram { addr: ptr as usize, len: size })
            }
            PlacementDescriptor::Storage(desc) => {
                let factor = desc.striping_factor.unwrap_or(0);
                let unit = desc.striping_unit.unwrap_or(0);
                if factor != 0 || unit != 0 {
                    let path = Path::new(&desc.filename);
                    if !path.exists() {
                        self.stripe_hint.preallocate(path, factor, unit)?;
                    }
                }
                let mapped = MappedFile::alloc(
                    desc.filename,
                    desc.offset,
                    size,
                    desc.split_factor,
                    desc.split_order,
                    desc.unlink,
                    desc.access_pattern,
                    desc.open_mode,
                    desc.file_mode,
                )?;
                let ptr = mapped.user_ptr();
                (ptr, AllocationKind::Storage(mapped))
            }
        };

        let record: RecordHandle = Arc::new(Mutex::new(AllocationRecord::new(kind, Owner::User)));
        self.registry.lock().insert_ptr(record);
        Ok(ptr)
    }

    /// Releases an allocation previously returned by `allocate` (and not
    /// currently bound to a window). Signals `UnknownBase` if `ptr` isn't
    /// tracked.
    pub fn free(&self, ptr: *mut u8) -> Result<()> {
        let record = self
            .registry
            .lock()
            .lookup_by_user_ptr(ptr as usize, true)
            .ok_or(Error::UnknownBase)?;
        self.destroy(record)
    }

    /// Tears down an `AllocationRecord`'s backing, given sole ownership of it.
    pub(crate) fn destroy(&self, record: RecordHandle) -> Result<()> {
        let record = Arc::try_unwrap(record)
            .unwrap_or_else(|_| panic!("allocation record still shared at destroy time"))
            .into_inner();
        match record.kind {
            AllocationKind::Storage(mapped) => {
                mapped.sync()?;
                mapped.free()?;
            }
            AllocationKind::Ram { addr, .. } => {
                self.runtime.native_free(addr as *mut u8)?;
            }
        }
        Ok(())
    }
}
