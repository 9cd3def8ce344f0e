//! The two growable tables themselves (spec §4.2 / §3).
//!
//! Not internally synchronized — spec §5 is explicit that the registry is
//! single-writer by design, driven from one thread per process. Callers that
//! plug into a threaded host runtime wrap a `Registry` in their own mutex.

use crate::store::AttrStore;

/// Extracts the user-visible pointer of a record, for `PointerTable` lookups.
///
/// The "user-visible pointer" is the `data` pointer for a RAM-kind allocation
/// and the `user_addr` for a Storage-kind one (spec §3); callers decide which
/// by implementing this on their own record type.
pub trait UserPointer {
    fn user_ptr(&self) -> usize;
}

const INITIAL_CAPACITY: usize = 64;

/// The association registry: a `PointerTable` of unbound allocation records
/// and an `AttrKeyTable` of attribute keys minted for bound ones.
///
/// `W` is the host runtime's window handle type, `K` its attribute-key type,
/// `V` the value stashed as an attribute (normally a shared, clonable handle
/// to an allocation record).
#[derive(Debug)]
pub struct Registry<W, K, V> {
    pointers: Vec<V>,
    keys: Vec<K>,
    _window: std::marker::PhantomData<W>,
}

impl<W, K, V> Default for Registry<W, K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W, K, V> Registry<W, K, V> {
    /// Creates an empty registry with both tables pre-sized to their starting
    /// capacity (spec §4.2: "starting from capacity 64").
    pub fn new() -> Self {
        Self {
            pointers: Vec::with_capacity(INITIAL_CAPACITY),
            keys: Vec::with_capacity(INITIAL_CAPACITY),
            _window: std::marker::PhantomData,
        }
    }

    /// Appends a record to the `PointerTable`.
    pub fn insert_ptr(&mut self, record: V) {
        self.pointers.push(record);
    }

    /// Appends a key to the `AttrKeyTable`.
    pub fn insert_key(&mut self, key: K) {
        self.keys.push(key);
    }

    /// Number of unbound records currently tracked.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Number of minted attribute keys currently tracked.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Removes and returns a key from the `AttrKeyTable`, shifting later
    /// entries down to preserve insertion order.
    pub fn delete_key(&mut self, key: K) -> Option<K>
    where
        K: PartialEq + Copy,
    {
        let idx = self.keys.iter().position(|k| *k == key)?;
        Some(self.keys.remove(idx))
    }
}

impl<W, K, V> Registry<W, K, V>
where
    V: UserPointer,
{
    /// Scans the `PointerTable` for a record whose user-visible pointer
    /// equals `ptr`. If `consume` is set, removes it on a hit (shifting the
    /// tail down to preserve order); otherwise leaves the table untouched.
    pub fn lookup_by_user_ptr(&mut self, ptr: usize, consume: bool) -> Option<V>
    where
        V: Clone,
    {
        let idx = self.pointers.iter().position(|r| r.user_ptr() == ptr)?;
        if consume {
            Some(self.pointers.remove(idx))
        } else {
            Some(self.pointers[idx].clone())
        }
    }
}

impl<W, K, V> Registry<W, K, V>
where
    W: Copy,
    K: Copy + PartialEq,
    V: UserPointer + Clone,
{
    /// Scans the `AttrKeyTable`, asking `store` for each key's value on
    /// `window`, and returns the first hit. If `consume`, also removes that
    /// key from the table (the caller is expected to have already removed
    /// the attribute from the host runtime's own storage).
    pub fn lookup_attr_by_window<S: AttrStore<W, K, V>>(
        &mut self,
        store: &S,
        window: W,
        consume: bool,
    ) -> Option<V> {
        for idx in 0..self.keys.len() {
            if let Some(value) = store.get_attr(window, self.keys[idx]) {
                if consume {
                    self.keys.remove(idx);
                }
                return Some(value);
            }
        }
        None
    }

    /// Scans the `AttrKeyTable` for the key whose value on `window` has
    /// user-visible pointer `ptr`.
    pub fn lookup_key_by_window_and_ptr<S: AttrStore<W, K, V>>(
        &self,
        store: &S,
        window: W,
        ptr: usize,
    ) -> Option<K> {
        self.keys
            .iter()
            .copied()
            .find(|&key| matches!(store.get_attr(window, key), Some(v) if v.user_ptr() == ptr))
    }

    /// Collects every allocation record bound to `window`, in key-insertion
    /// order.
    pub fn collect_all_attrs_on_window<S: AttrStore<W, K, V>>(
        &self,
        store: &S,
        window: W,
    ) -> Vec<V> {
        self.keys
            .iter()
            .filter_map(|&key| store.get_attr(window, key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Clone, Debug, PartialEq)]
    struct Rec(usize);
    impl UserPointer for Rec {
        fn user_ptr(&self) -> usize {
            self.0
        }
    }

    struct FakeStore {
        // (window, key) -> value
        values: RefCell<HashMap<(u32, u32), Rec>>,
    }

    impl AttrStore<u32, u32, Rec> for FakeStore {
        fn get_attr(&self, window: u32, key: u32) -> Option<Rec> {
            self.values.borrow().get(&(window, key)).cloned()
        }
    }

    #[test]
    fn insert_and_lookup_ptr_preserves_order() {
        let mut reg: Registry<u32, u32, Rec> = Registry::new();
        reg.insert_ptr(Rec(10));
        reg.insert_ptr(Rec(20));
        reg.insert_ptr(Rec(30));
        assert_eq!(reg.lookup_by_user_ptr(20, false), Some(Rec(20)));
        assert_eq!(reg.pointer_count(), 3);
    }

    #[test]
    fn consuming_lookup_removes_and_shifts_tail() {
        let mut reg: Registry<u32, u32, Rec> = Registry::new();
        reg.insert_ptr(Rec(10));
        reg.insert_ptr(Rec(20));
        reg.insert_ptr(Rec(30));
        assert_eq!(reg.lookup_by_user_ptr(20, true), Some(Rec(20)));
        assert_eq!(reg.pointer_count(), 2);
        assert_eq!(reg.lookup_by_user_ptr(20, false), None);
        assert_eq!(reg.lookup_by_user_ptr(30, false), Some(Rec(30)));
    }

    #[test]
    fn lookup_attr_by_window_scans_keys_via_store() {
        let mut reg: Registry<u32, u32, Rec> = Registry::new();
        reg.insert_key(1);
        reg.insert_key(2);
        let store = FakeStore {
            values: RefCell::new(HashMap::from([((7, 2), Rec(99))])),
        };
        let found = reg.lookup_attr_by_window(&store, 7, false);
        assert_eq!(found, Some(Rec(99)));
        assert_eq!(reg.key_count(), 2);
    }

    #[test]
    fn lookup_attr_by_window_consumes_key_on_hit() {
        let mut reg: Registry<u32, u32, Rec> = Registry::new();
        reg.insert_key(1);
        reg.insert_key(2);
        let store = FakeStore {
            values: RefCell::new(HashMap::from([((7, 2), Rec(99))])),
        };
        let found = reg.lookup_attr_by_window(&store, 7, true);
        assert_eq!(found, Some(Rec(99)));
        assert_eq!(reg.key_count(), 1);
    }

    #[test]
    fn lookup_key_by_window_and_ptr_finds_matching_key() {
        let mut reg: Registry<u32, u32, Rec> = Registry::new();
        reg.insert_key(1);
        reg.insert_key(2);
        let store = FakeStore {
            values: RefCell::new(HashMap::from([((7, 1), Rec(5)), ((7, 2), Rec(9))])),
        };
        assert_eq!(reg.lookup_key_by_window_and_ptr(&store, 7, 9), Some(2));
        assert_eq!(reg.lookup_key_by_window_and_ptr(&store, 7, 42), None);
    }

    #[test]
    fn collect_all_attrs_on_window_returns_every_value_present() {
        let mut reg: Registry<u32, u32, Rec> = Registry::new();
        reg.insert_key(1);
        reg.insert_key(2);
        reg.insert_key(3);
        let store = FakeStore {
            values: RefCell::new(HashMap::from([((7, 1), Rec(5)), ((7, 3), Rec(9))])),
        };
        let all = reg.collect_all_attrs_on_window(&store, 7);
        assert_eq!(all, vec![Rec(5), Rec(9)]);
    }

    #[test]
    fn delete_key_removes_and_shifts_tail() {
        let mut reg: Registry<u32, u32, Rec> = Registry::new();
        reg.insert_key(1);
        reg.insert_key(2);
        reg.insert_key(3);
        assert_eq!(reg.delete_key(2), Some(2));
        assert_eq!(reg.key_count(), 2);
        assert_eq!(reg.delete_key(2), None);
    }

    proptest::proptest! {
        #[test]
        fn pointer_table_never_contains_removed_entry(
            ptrs in proptest::collection::vec(0usize..1000, 1..50),
            remove_idx in 0usize..50,
        ) {
            let mut reg: Registry<u32, u32, Rec> = Registry::new();
            for &p in &ptrs {
                reg.insert_ptr(Rec(p));
            }
            if remove_idx < ptrs.len() {
                let target = ptrs[remove_idx];
                let removed = reg.lookup_by_user_ptr(target, true);
                proptest::prop_assert!(removed.is_some());
                proptest::prop_assert_eq!(reg.pointer_count(), ptrs.len() - 1);
            }
        }
    }
}
