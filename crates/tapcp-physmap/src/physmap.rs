//! Physical memory mapping for register access
//!
//! Maps windows of the physical address space through /dev/mem. This is how
//! the FPGA fabric bridge and the CPU peripherals are reached from user
//! space on the board.
//!
//! # Safety
//!
//! Accessing physical memory is inherently unsafe and requires root privileges.
//! The mapping functions ensure proper alignment and size constraints.

use crate::error::{PhysmapError, Result};

/// A mapped region of physical memory
#[cfg(target_os = "linux")]
pub struct PhysMap {
    /// Pointer to the first requested byte
    ptr: *mut u8,
    /// Requested size
    len: usize,
    /// Page-aligned size passed to mmap
    map_size: usize,
    /// Physical address (for error reporting)
    phys_addr: u64,
}

#[cfg(target_os = "linux")]
impl PhysMap {
    /// Map `size` bytes of physical memory starting at `phys_addr`
    ///
    /// The caller must make sure the range is a register window and not
    /// RAM in use by the kernel.
    pub fn new(phys_addr: u64, size: usize) -> Result<Self> {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;
        use std::os::unix::io::AsRawFd;

        if size == 0 || size % 4 != 0 {
            return Err(PhysmapError::InvalidSize(size as u64));
        }

        let page_mask = page_size() - 1;
        let offset = (phys_addr as usize) & page_mask;
        let aligned_addr = phys_addr & !(page_mask as u64);
        let map_size =
            page_span(offset, size, page_mask).ok_or(PhysmapError::InvalidSize(size as u64))?;

        // O_SYNC for uncached access
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open("/dev/mem")
            .map_err(PhysmapError::DevMem)?;

        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                map_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                aligned_addr as libc::off_t,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(PhysmapError::MemoryMap {
                address: phys_addr,
                size,
                source: std::io::Error::last_os_error(),
            });
        }

        log::debug!(
            "physmap: mapped {:#x} bytes at {:#x} ({:#x} with page alignment)",
            size,
            phys_addr,
            map_size
        );

        Ok(Self {
            ptr: unsafe { (ptr as *mut u8).add(offset) },
            len: size,
            map_size,
            phys_addr,
        })
    }

    /// Read a 32-bit register
    ///
    /// `offset` must be 4-byte aligned and inside the mapping.
    #[inline]
    pub fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset + 4 <= self.len);
        debug_assert!(offset & 3 == 0, "unaligned 32-bit read");
        unsafe { core::ptr::read_volatile(self.ptr.add(offset) as *const u32) }
    }

    /// Write a 32-bit register
    ///
    /// `offset` must be 4-byte aligned and inside the mapping.
    #[inline]
    pub fn write32(&self, offset: usize, value: u32) {
        debug_assert!(offset + 4 <= self.len);
        debug_assert!(offset & 3 == 0, "unaligned 32-bit write");
        unsafe { core::ptr::write_volatile(self.ptr.add(offset) as *mut u32, value) }
    }

    /// Get the physical address of this mapping
    pub fn phys_addr(&self) -> u64 {
        self.phys_addr
    }

    /// Get the size of this mapping
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the mapping is empty (never true for a live mapping)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Page-rounded length of a mapping of `size` bytes starting `offset`
/// bytes into a page, or `None` if it does not fit in `usize`
#[cfg(target_os = "linux")]
fn page_span(offset: usize, size: usize, page_mask: usize) -> Option<usize> {
    let end = size.checked_add(offset)?.checked_add(page_mask)?;
    Some(end & !page_mask)
}

#[cfg(target_os = "linux")]
fn page_size() -> usize {
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

#[cfg(target_os = "linux")]
impl Drop for PhysMap {
    fn drop(&mut self) {
        let offset = (self.phys_addr as usize) & (page_size() - 1);
        unsafe {
            let base = self.ptr.sub(offset);
            libc::munmap(base as *mut libc::c_void, self.map_size);
        }
    }
}

// The mapping is plain MMIO owned by this value
#[cfg(target_os = "linux")]
unsafe impl Send for PhysMap {}

// Stub for non-Linux platforms
#[cfg(not(target_os = "linux"))]
pub struct PhysMap {
    _private: (),
}

#[cfg(not(target_os = "linux"))]
impl PhysMap {
    pub fn new(_phys_addr: u64, _size: usize) -> Result<Self> {
        Err(PhysmapError::NotSupported)
    }

    pub fn read32(&self, _offset: usize) -> u32 {
        0
    }

    pub fn write32(&self, _offset: usize, _value: u32) {}

    pub fn phys_addr(&self) -> u64 {
        0
    }

    pub fn len(&self) -> usize {
        0
    }

    pub fn is_empty(&self) -> bool {
        true
    }
}
