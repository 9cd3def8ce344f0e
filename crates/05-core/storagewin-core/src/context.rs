//! The process-scope placement context (spec §9: "Global mutable state").
//!
//! The original source keeps the page size and both registry tables in
//! process-wide singletons. Here that becomes a context a caller constructs
//! once (around the host-runtime lifecycle boundary — init before any
//! window/allocation call, drop at finalize) and threads through every
//! facade call, rather than a literal `static`: the host runtime itself is
//! generic (`R: HostRuntime`), so a true global would have to pick one
//! concrete runtime type at compile time for the whole process.
//!
//! Per spec §5 the registry is not internally synchronized by design
//! ("single-writer... to keep that wrap trivial") — `Core` supplies exactly
//! one `parking_lot::Mutex` wrap around it, matching the workspace's
//! pervasive use of `parking_lot` for shared mutable state.

use std::sync::Arc;

use parking_lot::Mutex;

use storagewin_backing::{NoStriping, StripeHint};
use storagewin_registry::Registry;
use storagewin_runtime::HostRuntime;

use crate::record::AllocationRecord;

/// A shared handle to one allocation record — what a `HostRuntime` stores
/// as the value of a window attribute (spec §3/§4.4).
pub type RecordHandle = Arc<Mutex<AllocationRecord>>;

/// Owns the association registry and the host-runtime binding for one
/// process. All of C4/C5's entry points are methods on this type.
///
/// `R::Value` is fixed to `RecordHandle` — a runtime's window-attribute
/// storage exists, in this library, purely to carry allocation records.
pub struct Core<R: HostRuntime<Value = RecordHandle>> {
    pub(crate) runtime: R,
    pub(crate) registry: Mutex<Registry<R::Window, R::AttrKey, RecordHandle>>,
    pub(crate) stripe_hint: Box<dyn StripeHint + Send + Sync>,
}

impl<R: HostRuntime<Value = RecordHandle>> Core<R> {
    /// Creates a context with no parallel-filesystem striping hook.
    pub fn new(runtime: R) -> Self {
        Self::with_stripe_hint(runtime, NoStriping)
    }

    /// Creates a context whose storage allocations pre-touch the file's
    /// stripe layout (spec §4.3 step 2) via the supplied hook.
    pub fn with_stripe_hint(runtime: R, stripe_hint: impl StripeHint + Send + Sync + 'static) -> Self {
        Self {
            runtime,
            registry: Mutex::new(Registry::new()),
            stripe_hint: Box::new(stripe_hint),
        }
    }

    /// The bound host runtime.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}
