//! The hybrid virtual-address assembler (spec §4.1).

use std::ffi::c_void;
use std::fs::{self};
use std::os::fd::AsFd;
use std::path::Path;
use std::ptr;

use rustix::fs::{ftruncate, open, Mode, OFlags};
use rustix::mm::{
    madvise, mmap, mmap_anonymous, mprotect, msync, Advice, MapFlags, MprotectFlags, MsyncFlags,
    ProtFlags,
};

use crate::error::{Error, Result};
use crate::geometry::{self, Geometry};
use crate::types::{AccessPattern, OpenMode, SplitOrder};

/// One hybrid (RAM + file) mapping. See spec §3 for the field-level invariants.
#[derive(Debug)]
pub struct MappedFile {
    filename: String,
    file_offset: usize,
    total_length: usize,
    user_length: usize,
    storage_length: usize,
    ram_length: usize,
    order: SplitOrder,
    /// Stored as `usize` rather than a raw pointer so `MappedFile` stays `Send`;
    /// the address is only ever meaningful as a pointer within this process.
    base_addr: usize,
    user_addr: usize,
    unlink_on_release: bool,
}

fn open_flags(mode: OpenMode) -> (OFlags, ProtFlags) {
    match mode {
        OpenMode::ReadOnly => (OFlags::RDONLY, ProtFlags::READ),
        OpenMode::WriteOnly => (OFlags::WRONLY, ProtFlags::WRITE),
        // Executable is included for read-write mappings so that remote writes
        // landing on these pages never trip W^X enforcement; spec §9 flags this
        // as unjustified but keeps it, and so do we.
        OpenMode::ReadWrite => (OFlags::RDWR, ProtFlags::READ | ProtFlags::WRITE | ProtFlags::EXEC),
    }
}

fn advice_of(pattern: AccessPattern) -> Advice {
    match pattern {
        AccessPattern::Normal => Advice::Normal,
        AccessPattern::Sequential => Advice::Sequential,
        AccessPattern::Random => Advice::Random,
    }
}

fn fs_err(path: &Path, source: std::io::Error) -> Error {
    Error::Filesystem {
        path: path.to_path_buf(),
        source,
    }
}

fn map_err(source: std::io::Error) -> Error {
    Error::Mapping { source }
}

/// rustix reports syscall failures as `Errno`; this crate's `Error` carries
/// `std::io::Error` so callers get the usual `Display`/`source()` behavior.
fn io(errno: rustix::io::Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(errno.raw_os_error())
}

impl MappedFile {
    /// Creates a file (if needed), truncates it to the required size, and
    /// assembles a single contiguous virtual region whose sub-ranges are a
    /// file mapping and (optionally) an anonymous mapping, per spec §4.1.
    ///
    /// Any syscall failure short-circuits here; partially-installed
    /// sub-mappings from an earlier step in this same call are not rolled
    /// back (spec §4.1 failure semantics — the caller destroys the record and
    /// either retries the whole allocation or terminates).
    #[allow(clippy::too_many_arguments)]
    pub fn alloc(
        filename: impl Into<String>,
        requested_offset: usize,
        requested_length: usize,
        split_factor: f64,
        split_order: SplitOrder,
        unlink_on_release: bool,
        access_pattern: AccessPattern,
        open_mode: OpenMode,
        file_mode: u32,
    ) -> Result<Self> {
        let filename = filename.into();
        let path = Path::new(&filename);

        let file_exists = path.try_exists().map_err(|e| fs_err(path, e))?;

        let (oflags, prot) = open_flags(open_mode);
        let fd = open(path, oflags | OFlags::CREATE, Mode::from_bits_truncate(file_mode))
            .map_err(|e| fs_err(path, io(e)))?;

        let file_size = rustix::fs::fstat(&fd)
            .map_err(|e| fs_err(path, io(e)))?
            .st_size as usize;

        let Geometry {
            aligned_offset,
            length,
            storage_length,
            ram_length,
            ..
        } = geometry::compute(
            requested_offset,
            requested_length,
            file_exists,
            file_size,
            split_factor,
            split_order,
        );

        if aligned_offset + storage_length > file_size {
            ftruncate(&fd, (aligned_offset + storage_length) as u64)
                .map_err(|e| fs_err(path, io(e)))?;
        }

        let base_addr = if length > 0 {
            // Step 1: reserve a contiguous range of the right size at a
            // kernel-chosen address, then release it immediately. The address
            // is a reservation token, not a live mapping — the only portable
            // way to get a contiguous range we can install differently-backed
            // sub-mappings into without racing other mappers in this process.
            let reservation = unsafe {
                mmap_anonymous(
                    ptr::null_mut(),
                    length,
                    ProtFlags::empty(),
                    MapFlags::PRIVATE,
                )
                .map_err(|e| map_err(io(e)))?
            };
            unsafe {
                rustix::mm::munmap(reservation, length).map_err(|e| map_err(io(e)))?;
            }

            let base = reservation as usize;
            install_submappings(base, fd.as_fd(), order_layout(split_order, storage_length, ram_length), aligned_offset, prot)?;

            if storage_length > 0 {
                let storage_addr = base + storage_offset(split_order, ram_length);
                unsafe {
                    madvise(
                        storage_addr as *mut c_void,
                        storage_length,
                        advice_of(access_pattern),
                    )
                    .map_err(|e| map_err(io(e)))?;
                }
            }

            base
        } else {
            0
        };

        // `fd` is dropped (and therefore closed) here; the installed mappings
        // keep the underlying file open at the kernel level.
        drop(fd);

        let delta = requested_offset - geometry::align_down(requested_offset, geometry::page_size());

        Ok(Self {
            filename,
            file_offset: aligned_offset,
            total_length: length,
            user_length: requested_length,
            storage_length,
            ram_length,
            order: split_order,
            base_addr,
            user_addr: base_addr + delta,
            unlink_on_release,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn file_offset(&self) -> usize {
        self.file_offset
    }

    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn user_length(&self) -> usize {
        self.user_length
    }

    pub fn storage_length(&self) -> usize {
        self.storage_length
    }

    pub fn ram_length(&self) -> usize {
        self.ram_length
    }

    pub fn order(&self) -> SplitOrder {
        self.order
    }

    pub fn base_ptr(&self) -> *mut u8 {
        self.base_addr as *mut u8
    }

    /// The (possibly unaligned) address handed back to the caller.
    pub fn user_ptr(&self) -> *mut u8 {
        self.user_addr as *mut u8
    }

    /// Address of the file-backed sub-range, if one is installed.
    fn storage_addr(&self) -> Option<usize> {
        if self.storage_length == 0 {
            return None;
        }
        Some(self.base_addr + storage_offset(self.order, self.ram_length))
    }

    /// Flushes the entire file sub-range synchronously.
    pub fn sync(&self) -> Result<()> {
        if let Some(addr) = self.storage_addr() {
            unsafe {
                msync(addr as *mut c_void, self.storage_length, MsyncFlags::SYNC)
                    .map_err(|e| map_err(io(e)))?;
            }
        }
        Ok(())
    }

    /// Flushes `[page_align_down(offset), page_align_down(offset) + length + delta)`
    /// of the file sub-range, relative to its own start. `async_flush` selects
    /// `MS_ASYNC` over `MS_SYNC`.
    pub fn sync_range(&self, offset: usize, length: usize, async_flush: bool) -> Result<()> {
        let Some(storage_addr) = self.storage_addr() else {
            return Ok(());
        };
        let page = geometry::page_size();
        let aligned_offset = geometry::align_down(offset, page);
        let delta = offset - aligned_offset;
        let flags = if async_flush {
            MsyncFlags::ASYNC
        } else {
            MsyncFlags::SYNC
        };
        unsafe {
            msync(
                (storage_addr + aligned_offset) as *mut c_void,
                length + delta,
                flags,
            )
            .map_err(|e| map_err(io(e)))?;
        }
        Ok(())
    }

    /// Sets protection to none, unmaps the whole region, and — if
    /// `unlink_on_release` was set — removes the backing file. Freeing the
    /// filename string happens last (it is simply dropped with `self`).
    pub fn free(self) -> Result<()> {
        if self.total_length > 0 {
            unsafe {
                mprotect(
                    self.base_addr as *mut c_void,
                    self.total_length,
                    MprotectFlags::empty(),
                )
                .map_err(|e| map_err(io(e)))?;
                rustix::mm::munmap(self.base_addr as *mut c_void, self.total_length)
                    .map_err(|e| map_err(io(e)))?;
            }
        }
        if self.unlink_on_release {
            fs::remove_file(&self.filename).map_err(|e| fs_err(Path::new(&self.filename), e))?;
        }
        Ok(())
    }
}


/// Offset, relative to `base_addr`, of the file sub-range's start.
fn storage_offset(order: SplitOrder, ram_length: usize) -> usize {
    match order {
        SplitOrder::StoragePrefix => 0,
        SplitOrder::RamPrefix => ram_length,
    }
}

enum Layout {
    StorageThenRam { storage_len: usize, ram_len: usize },
    RamThenStorage { ram_len: usize, storage_len: usize },
}

fn order_layout(order: SplitOrder, storage_len: usize, ram_len: usize) -> Layout {
    match order {
        SplitOrder::StoragePrefix => Layout::StorageThenRam {
            storage_len,
            ram_len,
        },
        SplitOrder::RamPrefix => Layout::RamThenStorage {
            ram_len,
            storage_len,
        },
    }
}

/// Installs the file and/or anonymous sub-mappings into `[base, base+length)`
/// using fixed-address installs that replace the reservation (spec §4.1 step 2).
fn install_submappings(
    base: usize,
    fd: rustix::fd::BorrowedFd<'_>,
    layout: Layout,
    file_offset: usize,
    prot: ProtFlags,
) -> Result<()> {
    // Always shared, with NORESERVE so dirty pages reach the file and the
    // anonymous half doesn't reserve swap.
    let flags = MapFlags::SHARED | MapFlags::FIXED | MapFlags::NORESERVE;

    let install_file = |addr: usize, len: usize, offset: usize| -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        unsafe {
            mmap(addr as *mut c_void, len, prot, flags, fd, offset as u64)
                .map_err(|e| map_err(io(e)))?;
        }
        Ok(())
    };
    let install_anon = |addr: usize, len: usize| -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        unsafe {
            mmap_anonymous(addr as *mut c_void, len, prot, flags).map_err(|e| map_err(io(e)))?;
        }
        Ok(())
    };

    match layout {
        Layout::StorageThenRam {
            storage_len,
            ram_len,
        } => {
            install_file(base, storage_len, file_offset)?;
            install_anon(base + storage_len, ram_len)?;
        }
        Layout::RamThenStorage {
            ram_len,
            storage_len,
        } => {
            install_anon(base, ram_len)?;
            install_file(base + ram_len, storage_len, file_offset)?;
        }
    }

    Ok(())
}
