//! End-to-end scenarios from spec §8, run against `storagewin-core` wired up
//! to the in-process `MockRuntime`.

#[cfg(test)]
mod tests {
    use std::fs;

    use storagewin_backing::page_size;
    use storagewin_core::{Core, HintBag};
    use storagewin_mock::MockRuntime;

    fn write_pattern(ptr: *mut u8, len: usize, f: impl Fn(usize) -> u8) {
        let buf = unsafe { std::slice::from_raw_parts_mut(ptr, len) };
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = f(i);
        }
    }

    fn checksum_byte(i: usize) -> u8 {
        (i.wrapping_mul(2_654_435_761)) as u8
    }

    #[test]
    fn scenario1_pure_storage_window_unlinks_on_free() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w0");

        let mut hints = HintBag::new();
        hints
            .insert("alloc_type", "storage")
            .insert("storage_alloc_filename", path.to_str().unwrap())
            .insert("storage_alloc_offset", "0")
            .insert("storage_alloc_factor", "1.0")
            .insert("storage_alloc_unlink", "true");

        let core = Core::new(MockRuntime::new());
        let size = 4 * 1024 * 1024;
        let (win, ptr) = core.window_allocate(size, &hints).unwrap();

        write_pattern(ptr, size, checksum_byte);

        core.window_sync(win).unwrap();
        // Library-owned (born inside window_allocate): destroying the
        // window tears the allocation down, including the unlink.
        core.window_free(win).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn scenario2_hybrid_ram_prefix_only_tail_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w1");
        let page = page_size();

        let mut hints = HintBag::new();
        hints
            .insert("alloc_type", "storage")
            .insert("storage_alloc_filename", path.to_str().unwrap())
            .insert("storage_alloc_factor", "0.5")
            .insert("storage_alloc_order", "1"); // RamPrefix

        let core = Core::new(MockRuntime::new());
        let size = 2 * 1024 * 1024;
        let (win, ptr) = core.window_allocate(size, &hints).unwrap();

        write_pattern(ptr, size, |_| 0xAA);

        core.window_sync(win).unwrap();
        core.window_free(win).unwrap();

        let storage_length = (size / 2 / page) * page; // align_down
        let on_disk = fs::read(&path).unwrap();
        assert_eq!(on_disk.len(), storage_length);
        assert!(on_disk.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn scenario3_hybrid_storage_prefix_only_head_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w2");
        let page = page_size();

        let mut hints = HintBag::new();
        hints
            .insert("alloc_type", "storage")
            .insert("storage_alloc_filename", path.to_str().unwrap())
            .insert("storage_alloc_factor", "0.5")
            .insert("storage_alloc_order", "0"); // StoragePrefix

        let core = Core::new(MockRuntime::new());
        let size = 2 * 1024 * 1024;
        let (win, ptr) = core.window_allocate(size, &hints).unwrap();

        write_pattern(ptr, size, |_| 0xAA);

        core.window_sync(win).unwrap();
        core.window_free(win).unwrap();

        // StoragePrefix rounds the RAM half down, so storage can be
        // page-aligned-up from the exact half (spec §9 Open Question).
        let ram_length = (size - (size as f64 * 0.5) as usize) / page * page;
        let storage_length = size - ram_length;
        let on_disk = fs::read(&path).unwrap();
        assert_eq!(on_disk.len(), storage_length);
        assert!(on_disk.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn scenario4_user_owned_allocation_round_trips_through_registry() {
        let core = Core::new(MockRuntime::new());
        let hints = HintBag::new(); // alloc_type defaults to memory

        let ptr = core.allocate(4096, &hints).unwrap();
        let win = core.window_create(ptr, 4096).unwrap();
        core.window_detach(win, ptr).unwrap();
        core.free(ptr).unwrap();

        // Freeing again must fail: the record is gone, not merely unbound.
        assert!(core.free(ptr).is_err());
    }

    #[test]
    fn scenario5_library_owned_allocation_dies_with_its_window() {
        let core = Core::new(MockRuntime::new());
        let hints = HintBag::new();

        let (win, ptr) = core.window_allocate(4096, &hints).unwrap();
        core.window_free(win).unwrap();

        // No explicit free was called; the window's destruction already
        // tore the allocation down, so this pointer is now unknown.
        let err = core.free(ptr).unwrap_err();
        assert!(matches!(err, storagewin_core::Error::UnknownBase));
    }

    #[test]
    fn scenario6_mixed_placement_sync_is_rejected_but_nondestructive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w3");

        let core = Core::new(MockRuntime::new());

        let ram_ptr = core.allocate(4096, &HintBag::new()).unwrap();

        let mut storage_hints = HintBag::new();
        storage_hints
            .insert("alloc_type", "storage")
            .insert("storage_alloc_filename", path.to_str().unwrap());
        let storage_ptr = core.allocate(4096, &storage_hints).unwrap();

        let win = core.window_create(ram_ptr, 4096).unwrap();
        core.window_attach(win, storage_ptr, 4096).unwrap();

        let err = core.window_sync(win).unwrap_err();
        assert!(matches!(err, storagewin_core::Error::MixedPlacementSync));

        // Both allocations remain intact: detaching and freeing each still
        // works cleanly.
        core.window_detach(win, ram_ptr).unwrap();
        core.window_detach(win, storage_ptr).unwrap();
        core.free(ram_ptr).unwrap();
        core.free(storage_ptr).unwrap();
    }

    #[test]
    fn split_factor_zero_yields_pure_ram_region_but_still_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w4");

        let mut hints = HintBag::new();
        hints
            .insert("alloc_type", "storage")
            .insert("storage_alloc_filename", path.to_str().unwrap())
            .insert("storage_alloc_factor", "0.0");

        let core = Core::new(MockRuntime::new());
        let ptr = core.allocate(8192, &hints).unwrap();
        write_pattern(ptr, 8192, |_| 0x42);
        core.free(ptr).unwrap();

        assert!(path.exists());
        // Pure-RAM split: nothing written through the RAM-only mapping
        // reaches the file.
        let on_disk = fs::read(&path).unwrap();
        assert!(on_disk.iter().all(|&b| b == 0));
    }
}
