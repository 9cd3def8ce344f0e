//! An in-process `HostRuntime` used to drive `storagewin-core`'s facades
//! deterministically without a real one-sided-communication runtime — the
//! role a services/mock layer plays for other hub-shaped crates in this
//! workspace.
//!
//! Not part of the placement engine itself; exists purely so
//! `storagewin-tests` can exercise the spec §8 scenarios in-process.

use std::alloc::{alloc, dealloc, Layout};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use storagewin_core::RecordHandle;
use storagewin_runtime::{Error, HostRuntime, Result};

/// Opaque window handle minted by [`MockRuntime`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MockWindow(u64);

/// Opaque attribute key minted by [`MockRuntime`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MockAttrKey(u64);

/// In-process stand-in for the host runtime. Native allocation goes through
/// the system allocator; windows and keyvals are simple counters; attribute
/// storage is a `HashMap` keyed by `(window, key)`.
#[derive(Default)]
pub struct MockRuntime {
    next_window: AtomicU64,
    next_key: AtomicU64,
    native_layouts: Mutex<HashMap<usize, Layout>>,
    attrs: Mutex<HashMap<(MockWindow, MockAttrKey), RecordHandle>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostRuntime for MockRuntime {
    type Window = MockWindow;
    type AttrKey = MockAttrKey;
    type Value = RecordHandle;

    fn native_alloc(&self, size: usize) -> Result<*mut u8> {
        let layout =
            Layout::from_size_align(size.max(1), 8).map_err(|e| Error::Alloc(e.to_string()))?;
        let ptr = unsafe { alloc(layout) };
        if ptr.is_null() {
            return Err(Error::Alloc("allocator returned null".to_string()));
        }
        self.native_layouts.lock().insert(ptr as usize, layout);
        Ok(ptr)
    }

    fn native_free(&self, ptr: *mut u8) -> Result<()> {
        let layout = self
            .native_layouts
            .lock()
            .remove(&(ptr as usize))
            .ok_or_else(|| Error::Free("unknown native allocation".to_string()))?;
        unsafe { dealloc(ptr, layout) };
        Ok(())
    }

    fn window_create(&self, _base: *mut u8, _size: usize) -> Result<Self::Window> {
        Ok(MockWindow(self.next_window.fetch_add(1, Ordering::Relaxed)))
    }

    fn window_attach(&self, _win: Self::Window, _base: *mut u8, _size: usize) -> Result<()> {
        Ok(())
    }

    fn window_detach(&self, _win: Self::Window, _base: *mut u8) -> Result<()> {
        Ok(())
    }

    fn window_free(&self, win: Self::Window) -> Result<()> {
        // Defensive: storagewin-core's window_free already releases every
        // bound attribute before calling this, so this should be a no-op.
        self.attrs.lock().retain(|(w, _), _| *w != win);
        Ok(())
    }

    fn window_sync(&self, _win: Self::Window) -> Result<()> {
        Ok(())
    }

    fn create_keyval(&self) -> Result<Self::AttrKey> {
        Ok(MockAttrKey(self.next_key.fetch_add(1, Ordering::Relaxed)))
    }

    fn set_attr(&self, win: Self::Window, key: Self::AttrKey, value: Self::Value) -> Result<()> {
        self.attrs.lock().insert((win, key), value);
        Ok(())
    }

    fn get_attr(&self, win: Self::Window, key: Self::AttrKey) -> Option<Self::Value> {
        self.attrs.lock().get(&(win, key)).cloned()
    }

    fn delete_attr(&self, win: Self::Window, key: Self::AttrKey) -> Result<()> {
        self.attrs
            .lock()
            .remove(&(win, key))
            .map(|_| ())
            .ok_or_else(|| Error::DeleteAttr("no such attribute".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_alloc_and_free_round_trip() {
        let rt = MockRuntime::new();
        let ptr = rt.native_alloc(128).unwrap();
        assert!(!ptr.is_null());
        rt.native_free(ptr).unwrap();
    }

    #[test]
    fn freeing_unknown_pointer_errors() {
        let rt = MockRuntime::new();
        let bogus = 0x1000 as *mut u8;
        assert!(rt.native_free(bogus).is_err());
    }

    #[test]
    fn window_create_mints_distinct_handles() {
        let rt = MockRuntime::new();
        let a = rt.window_create(std::ptr::null_mut(), 0).unwrap();
        let b = rt.window_create(std::ptr::null_mut(), 0).unwrap();
        assert_ne!(a, b);
    }
}
