//! The `HostRuntime` trait itself.

use std::hash::Hash;

use crate::error::Result;

/// Everything `storagewin-core` needs from a one-sided-communication runtime.
///
/// `Window` and `AttrKey` are opaque handles minted by the runtime; `Value`
/// is whatever the runtime's keyval storage can hold per window-attribute
/// slot (in `storagewin-core` this is a shared, clonable handle to an
/// allocation record — spec §3/§4.4: "the value stashed on a window
/// attribute *is* the allocation record").
///
/// `window_create`/`window_attach`/`window_detach`/`window_free`/
/// `window_sync` correspond to the collective window-lifecycle operations
/// spec §1 places out of scope; `storagewin-core` calls into them but never
/// reimplements them.
pub trait HostRuntime {
    type Window: Copy + Eq + Hash;
    type AttrKey: Copy + Eq + Hash;
    type Value: Clone;

    /// Delegates to the runtime's native allocator.
    fn native_alloc(&self, size: usize) -> Result<*mut u8>;

    /// Returns a native-allocator buffer.
    fn native_free(&self, ptr: *mut u8) -> Result<()>;

    /// Creates a window over `[base, base+size)`.
    fn window_create(&self, base: *mut u8, size: usize) -> Result<Self::Window>;

    /// Attaches `[base, base+size)` to an existing dynamic window.
    fn window_attach(&self, win: Self::Window, base: *mut u8, size: usize) -> Result<()>;

    /// Detaches `base` from a dynamic window.
    fn window_detach(&self, win: Self::Window, base: *mut u8) -> Result<()>;

    /// Destroys a window. Triggers the release callback for every attribute
    /// still installed on it.
    fn window_free(&self, win: Self::Window) -> Result<()>;

    /// Runs the runtime's own synchronization for `win` (the collective
    /// fence/flush the host runtime defines; storage-backed flushing is
    /// layered on top by `storagewin-core`).
    fn window_sync(&self, win: Self::Window) -> Result<()>;

    /// Mints a fresh attribute key via the runtime's keyval facility.
    fn create_keyval(&self) -> Result<Self::AttrKey>;

    /// Installs `value` under `key` on `win`.
    fn set_attr(&self, win: Self::Window, key: Self::AttrKey, value: Self::Value) -> Result<()>;

    /// Reads the value currently installed under `key` on `win`, if any.
    fn get_attr(&self, win: Self::Window, key: Self::AttrKey) -> Option<Self::Value>;

    /// Removes the attribute under `key` on `win`. A real runtime invokes
    /// the attribute's release callback synchronously as part of this call;
    /// `storagewin-core` relies on that to observe the removal.
    fn delete_attr(&self, win: Self::Window, key: Self::AttrKey) -> Result<()>;

    /// Whether windows carrying this runtime's attributes may be copied.
    /// Spec §4.4: "always signals not supported" for library-owned
    /// allocations; runtimes with no copy operation at all can simply leave
    /// the default.
    fn copy_is_supported(&self) -> bool {
        false
    }
}
