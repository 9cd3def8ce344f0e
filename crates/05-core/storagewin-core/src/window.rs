//! C5 — the Window Facade (spec §4.4).

use storagewin_hints::HintBag;
use storagewin_runtime::HostRuntime;

use crate::context::{Core, RecordHandle};
use crate::error::{Error, Result};
use crate::record::{AllocationKind, Owner};
use crate::runtime_store::RuntimeStore;

impl<R: HostRuntime<Value = RecordHandle>> Core<R> {
    /// Delegates window creation to the host runtime, then — if `ptr` is a
    /// tracked, unbound allocation — binds it: mints an attribute key,
    /// installs it on the window carrying the record, and moves the record
    /// from the allocation table to the attribute-key table.
    pub fn window_create(&self, ptr: *mut u8, size: usize) -> Result<R::Window> {
        let win = self.runtime.window_create(ptr, size)?;
        self.bind(win, ptr as usize, None)?;
        Ok(win)
    }

    /// Composed allocate + window-create: allocates via the allocation
    /// facade, creates the window on the returned pointer, and marks the
    /// resulting binding library-owned (the window's destruction now tears
    /// the allocation down without an explicit `free`).
    pub fn window_allocate(&self, size: usize, hints: &HintBag) -> Result<(R::Window, *mut u8)> {
        let ptr = self.allocate(size, hints)?;
        let win = self.runtime.window_create(ptr, size)?;
        self.bind(win, ptr as usize, Some(Owner::Library))?;
        Ok((win, ptr))
    }

    /// Same binding step as `window_create`, then delegates to the host
    /// runtime's attach.
    pub fn window_attach(&self, win: R::Window, ptr: *mut u8, size: usize) -> Result<()> {
        self.runtime.window_attach(win, ptr, size)?;
        self.bind(win, ptr as usize, None)?;
        Ok(())
    }

    /// Finds the attribute key for `(window, ptr)`, removes it — returning
    /// the record to the allocation table (spec §3 lifecycle step 4) — then
    /// delegates to the host runtime's detach.
    pub fn window_detach(&self, win: R::Window, ptr: *mut u8) -> Result<()> {
        let store = RuntimeStore(&self.runtime);
        let key = self
            .registry
            .lock()
            .lookup_key_by_window_and_ptr(&store, win, ptr as usize)
            .ok_or(Error::UnknownBase)?;
        let record = self
            .runtime
            .get_attr(win, key)
            .ok_or(Error::UnknownBase)?;
        self.release_bound(win, key, record)?;
        self.runtime.window_detach(win, ptr)?;
        Ok(())
    }

    /// Delegates to the host runtime's sync, then flushes every
    /// Storage-kind allocation bound to `window`. Signals
    /// `MixedPlacementSync` if the window carries both RAM and Storage
    /// allocations at once — spec §4.4 leaves cross-placement sync
    /// undefined.
    pub fn window_sync(&self, win: R::Window) -> Result<()> {
        self.runtime.window_sync(win)?;

        let store = RuntimeStore(&self.runtime);
        let records = self.registry.lock().collect_all_attrs_on_window(&store, win);

        let has_ram = records.iter().any(|r| matches!(r.lock().kind, AllocationKind::Ram { .. }));
        let has_storage = records
            .iter()
            .any(|r| matches!(r.lock().kind, AllocationKind::Storage(_)));
        if has_ram && has_storage {
            return Err(Error::MixedPlacementSync);
        }

        for record in &records {
            if let AllocationKind::Storage(mapped) = &record.lock().kind {
                mapped.sync()?;
            }
        }
        Ok(())
    }

    /// Destroys `window`: every allocation still bound to it is released —
    /// library-owned ones torn down, user-owned ones returned to the
    /// allocation table — before the host runtime frees the window itself.
    pub fn window_free(&self, win: R::Window) -> Result<()> {
        let store = RuntimeStore(&self.runtime);
        let records = self.registry.lock().collect_all_attrs_on_window(&store, win);
        for record in records {
            let ptr = record.lock().user_ptr();
            let key = self
                .registry
                .lock()
                .lookup_key_by_window_and_ptr(&store, win, ptr);
            if let Some(key) = key {
                self.release_bound(win, key, record)?;
            }
        }
        self.runtime.window_free(win)?;
        Ok(())
    }

    /// Always refuses: windows carrying library-owned allocations may not
    /// be cloned (spec §4.4 "Attribute copy callback").
    pub fn attribute_copy_refused(&self) -> Result<()> {
        Err(Error::AttributeCopyUnsupported)
    }

    /// Binds a tracked, unbound allocation to `win`. A no-op (`Ok(())`) if
    /// `ptr` is not known to the allocation table — an unmanaged pointer the
    /// caller is free to put in a window without this library's help.
    fn bind(&self, win: R::Window, ptr: usize, owner_override: Option<Owner>) -> Result<()> {
        let Some(record) = self.registry.lock().lookup_by_user_ptr(ptr, true) else {
            return Ok(());
        };
        if let Some(owner) = owner_override {
            record.lock().owner = owner;
        }
        let key = self.runtime.create_keyval()?;
        self.runtime.set_attr(win, key, record.clone())?;
        self.registry.lock().insert_key(key);
        Ok(())
    }

    /// The attribute release callback (spec §4.4, "the load-bearing hook").
    /// Removes the attribute from the host runtime and the key table, then
    /// either tears the allocation down (library-owned) or re-enters it
    /// into the allocation table (user-owned, back to "unbound").
    fn release_bound(&self, win: R::Window, key: R::AttrKey, record: RecordHandle) -> Result<()> {
        self.runtime.delete_attr(win, key)?;
        self.registry.lock().delete_key(key);

        let owner = record.lock().owner;
        match owner {
            Owner::Library => self.destroy(record),
            Owner::User => {
                self.registry.lock().insert_ptr(record);
                Ok(())
            }
        }
    }
}
