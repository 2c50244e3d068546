//! Functional (untimed) memory array.
//!
//! This module provides the architectural backing store shared by all cores.
//! It performs:
//! 1. **Region management:** Fixed text/data/stack/kernel regions of the
//!    MIPS memory map, each a little-endian byte array.
//! 2. **Word access:** `read_32`/`write_32` ignore the low two address bits;
//!    unmapped reads return 0 and unmapped writes are dropped, so a faulting
//!    program keeps running.
//!
//! Timing is modeled entirely by the cache hierarchy and DRAM; this array
//! answers instantly and is the single source of data truth.

/// Base address and size of the text segment.
pub const MEM_TEXT_START: u32 = 0x0040_0000;
const MEM_TEXT_SIZE: usize = 0x0010_0000;

/// Base address and size of the data segment.
pub const MEM_DATA_START: u32 = 0x1000_0000;
const MEM_DATA_SIZE: usize = 0x0010_0000;

/// Base address and size of the stack segment.
pub const MEM_STACK_START: u32 = 0x7ff0_0000;
const MEM_STACK_SIZE: usize = 0x0010_0000;

/// Base address and size of the kernel text segment.
pub const MEM_KTEXT_START: u32 = 0x8000_0000;
const MEM_KTEXT_SIZE: usize = 0x0010_0000;

/// Base address and size of the kernel data segment.
pub const MEM_KDATA_START: u32 = 0x9000_0000;
const MEM_KDATA_SIZE: usize = 0x0010_0000;

struct MemRegion {
    start: u32,
    data: Vec<u8>,
}

impl MemRegion {
    fn new(start: u32, size: usize) -> Self {
        Self {
            start,
            data: vec![0; size],
        }
    }

    fn contains(&self, addr: u32) -> bool {
        addr >= self.start && (addr as u64) + 4 <= self.start as u64 + self.data.len() as u64
    }
}

/// The functional memory array.
pub struct Memory {
    regions: Vec<MemRegion>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a zero-filled memory with the standard MIPS regions.
    pub fn new() -> Self {
        Self {
            regions: vec![
                MemRegion::new(MEM_TEXT_START, MEM_TEXT_SIZE),
                MemRegion::new(MEM_DATA_START, MEM_DATA_SIZE),
                MemRegion::new(MEM_STACK_START, MEM_STACK_SIZE),
                MemRegion::new(MEM_KTEXT_START, MEM_KTEXT_SIZE),
                MemRegion::new(MEM_KDATA_START, MEM_KDATA_SIZE),
            ],
        }
    }

    /// Reads the aligned 32-bit word containing `addr`.
    ///
    /// The low two address bits are ignored. Reads outside every region
    /// return 0.
    pub fn read_32(&self, addr: u32) -> u32 {
        let addr = addr & !3;
        for region in &self.regions {
            if region.contains(addr) {
                let off = (addr - region.start) as usize;
                return u32::from_le_bytes([
                    region.data[off],
                    region.data[off + 1],
                    region.data[off + 2],
                    region.data[off + 3],
                ]);
            }
        }
        0
    }

    /// Writes the aligned 32-bit word containing `addr`.
    ///
    /// The low two address bits are ignored. Writes outside every region are
    /// dropped.
    pub fn write_32(&mut self, addr: u32, val: u32) {
        let addr = addr & !3;
        for region in &mut self.regions {
            if region.contains(addr) {
                let off = (addr - region.start) as usize;
                region.data[off..off + 4].copy_from_slice(&val.to_le_bytes());
                return;
            }
        }
    }
}
