//! The association registry (spec §4.2): two growable, insertion-ordered
//! tables correlating a user-visible pointer, a window handle, and a
//! per-window attribute key.
//!
//! The registry never talks to a host runtime directly — `lookup_attr_by_window`
//! and friends take an [`AttrStore`] reference so this crate stays a leaf with
//! no dependency on `storagewin-runtime`.

mod store;
mod table;

pub use store::AttrStore;
pub use table::{Registry, UserPointer};
