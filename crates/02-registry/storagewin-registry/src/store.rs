//! Seam between the registry and the host runtime's own attribute storage.

/// Asks the host runtime for the value currently installed under `key` on
/// `window`, without the registry knowing anything about how the host
/// runtime represents windows or keys internally.
pub trait AttrStore<W, K, V> {
    fn get_attr(&self, window: W, key: K) -> Option<V>;
}
