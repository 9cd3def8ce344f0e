//! Adapts a [`HostRuntime`] to [`storagewin_registry::AttrStore`].
//!
//! `storagewin-registry` stays a leaf crate with no knowledge of
//! `storagewin-runtime`; this newtype is the seam that lets the registry's
//! window-scan operations ask a real runtime for attribute values.

use storagewin_registry::AttrStore;
use storagewin_runtime::HostRuntime;

use crate::context::RecordHandle;

pub(crate) struct RuntimeStore<'a, R>(pub &'a R);

impl<R: HostRuntime<Value = RecordHandle>> AttrStore<R::Window, R::AttrKey, RecordHandle>
    for RuntimeStore<'_, R>
{
    fn get_attr(&self, window: R::Window, key: R::AttrKey) -> Option<RecordHandle> {
        self.0.get_attr(window, key)
    }
}
