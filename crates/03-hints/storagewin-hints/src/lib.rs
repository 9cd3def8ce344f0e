//! The hint resolver (spec §6): translates a flat string-keyed hint bag into
//! a resolved placement descriptor.
//!
//! `HintBag` is deliberately a thin wrapper over `HashMap<String, String>`,
//! not a `serde`-derived document — the bag is exactly the flat key/value map
//! a host runtime's info object already is, and every key not in the table
//! below has no effect (unrecognized keys, including any shape of a legacy
//! schema, are silently ignored).

mod descriptor;
mod error;
mod hintbag;
mod resolve;

pub use descriptor::{PlacementDescriptor, StorageDescriptor};
pub use error::{Error, Result};
pub use hintbag::HintBag;
pub use resolve::resolve;
