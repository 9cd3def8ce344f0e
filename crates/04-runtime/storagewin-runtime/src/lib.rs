//! The host-runtime seam (spec §1: "the host runtime itself ... only their
//! interfaces to the core appear").
//!
//! Spec §1 places the one-sided-communication runtime itself out of scope —
//! init/finalize, the collective window-creation barrier, parameter packing,
//! remote transfers, process ranks. What the core still needs is a named
//! type for "the opaque window handle minted by the host runtime" and "a
//! per-window attribute key" (spec §3 Glossary), plus a seam a real binding
//! (or, for tests, an in-process stand-in) can be plugged into. `HostRuntime`
//! is that seam.

mod error;
mod traits;

pub use error::{Error, Result};
pub use traits::HostRuntime;
