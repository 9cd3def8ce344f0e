//! Pure page-alignment and split-geometry arithmetic (spec §4.1).
//!
//! Kept free of any syscall so the split-tiling invariants can be checked
//! with property tests without touching the filesystem.

use std::sync::OnceLock;

use crate::types::SplitOrder;

static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

/// The process's page size, queried once and cached for the lifetime of the process.
pub fn page_size() -> usize {
    *PAGE_SIZE.get_or_init(|| rustix::param::page_size())
}

/// Rounds `value` down to the nearest multiple of `page`.
pub fn align_down(value: usize, page: usize) -> usize {
    (value / page) * page
}

/// Geometry of one hybrid mapping, derived from a request and (if relevant) the
/// current size of an existing backing file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Page-aligned offset into the file where the mapping begins.
    pub aligned_offset: usize,
    /// `requested_offset - aligned_offset`.
    pub delta: usize,
    /// Total length of the virtual region, in bytes.
    pub length: usize,
    /// Bytes backed by the file.
    pub storage_length: usize,
    /// Bytes backed by anonymous memory.
    pub ram_length: usize,
}

/// Computes the geometry of a hybrid mapping per spec §4.1.
///
/// `file_exists`/`file_size` describe the backing file *before* this call
/// extends it. `split_factor` must already be clamped to `[0.0, 1.0]` by the
/// caller (the hint resolver is responsible for validating user input).
pub fn compute(
    requested_offset: usize,
    requested_length: usize,
    file_exists: bool,
    file_size: usize,
    split_factor: f64,
    split_order: SplitOrder,
) -> Geometry {
    let page = page_size();
    let mut aligned_offset = align_down(requested_offset, page);
    let delta = requested_offset - aligned_offset;

    let length = if file_exists && requested_length == 0 {
        aligned_offset = 0;
        file_size
    } else {
        requested_length + delta
    };

    // Truncation toward zero mirrors the C source's `(size_t)(factor * (double)length)` cast.
    let frac_len = (split_factor * length as f64) as usize;

    let (storage_length, ram_length) = match split_order {
        SplitOrder::StoragePrefix => {
            let non_storage_raw = length.saturating_sub(frac_len);
            let ram_length = align_down(non_storage_raw, page);
            (length - ram_length, ram_length)
        }
        SplitOrder::RamPrefix => {
            let storage_length = align_down(frac_len, page);
            (storage_length, length - storage_length)
        }
    };

    Geometry {
        aligned_offset,
        delta,
        length,
        storage_length,
        ram_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_ram_when_factor_zero_ram_prefix() {
        let page = page_size();
        let g = compute(0, 3 * page + 17, false, 0, 0.0, SplitOrder::RamPrefix);
        assert_eq!(g.storage_length, 0);
        assert_eq!(g.ram_length, g.length);
    }

    #[test]
    fn pure_storage_when_factor_one() {
        let page = page_size();
        let g = compute(0, 5 * page, false, 0, 1.0, SplitOrder::RamPrefix);
        assert_eq!(g.ram_length, 0);
        assert_eq!(g.storage_length, g.length);
    }

    #[test]
    fn requested_length_zero_remaps_whole_existing_file() {
        let page = page_size();
        let g = compute(page * 4, 0, true, page * 10, 1.0, SplitOrder::RamPrefix);
        assert_eq!(g.aligned_offset, 0);
        assert_eq!(g.length, page * 10);
    }

    #[test]
    fn hybrid_split_tiles_exactly() {
        let page = page_size();
        for order in [SplitOrder::RamPrefix, SplitOrder::StoragePrefix] {
            let g = compute(0, 2 * 1024 * 1024, false, 0, 0.5, order);
            assert_eq!(g.storage_length + g.ram_length, g.length);
        }
    }

    #[test]
    fn ram_prefix_storage_length_is_page_multiple() {
        let page = page_size();
        for factor in [0.0, 0.1, 0.33, 0.5, 0.75, 1.0] {
            let g = compute(0, 10 * page + 123, false, 0, factor, SplitOrder::RamPrefix);
            assert_eq!(g.storage_length % page, 0);
        }
    }

    proptest::proptest! {
        #[test]
        fn split_always_tiles_exactly(
            len in 0usize..(16 * 1024 * 1024),
            factor in 0.0f64..=1.0,
            storage_prefix in proptest::bool::ANY,
        ) {
            let order = if storage_prefix { SplitOrder::StoragePrefix } else { SplitOrder::RamPrefix };
            let g = compute(0, len, false, 0, factor, order);
            proptest::prop_assert_eq!(g.storage_length + g.ram_length, g.length);
        }

        #[test]
        fn ram_prefix_storage_length_always_page_aligned(
            len in 0usize..(16 * 1024 * 1024),
            factor in 0.0f64..=1.0,
        ) {
            let g = compute(0, len, false, 0, factor, SplitOrder::RamPrefix);
            proptest::prop_assert_eq!(g.storage_length % page_size(), 0);
        }

        #[test]
        fn aligned_offset_is_always_page_aligned(
            offset in 0usize..(64 * 1024 * 1024),
            len in 0usize..(16 * 1024 * 1024),
        ) {
            let g = compute(offset, len, false, 0, 1.0, SplitOrder::RamPrefix);
            proptest::prop_assert_eq!(g.aligned_offset % page_size(), 0);
        }
    }
}
