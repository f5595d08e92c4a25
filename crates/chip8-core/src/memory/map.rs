//! Fixed memory-region map and decoding helpers.

/// Inclusive start address of the interpreter-reserved region.
pub const INTERPRETER_START: u16 = 0x000;
/// Inclusive end address of the interpreter-reserved region.
pub const INTERPRETER_END: u16 = 0x1FF;
/// Inclusive start address of the program region; also the canonical load origin.
pub const PROGRAM_START: u16 = 0x200;
/// Inclusive end address of the program region (last addressable byte).
pub const PROGRAM_END: u16 = 0xFFF;

/// Canonical fixed-region descriptor for the memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    /// Region classification.
    pub region: MemoryRegion,
    /// Inclusive start address.
    pub start: u16,
    /// Inclusive end address.
    pub end: u16,
}

/// Region classification for addresses inside the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    /// Interpreter area holding the glyph table (`0x000..=0x1FF`).
    Interpreter,
    /// Program image and working memory (`0x200..=0xFFF`).
    Program,
}

impl MemoryRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Interpreter => (INTERPRETER_START, INTERPRETER_END),
            Self::Program => (PROGRAM_START, PROGRAM_END),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }

    /// Returns the canonical descriptor for this region.
    #[must_use]
    pub const fn descriptor(self) -> RegionDescriptor {
        let (start, end) = self.bounds();
        RegionDescriptor {
            region: self,
            start,
            end,
        }
    }
}

/// Region layout in ascending address order.
pub const FIXED_MEMORY_REGIONS: [RegionDescriptor; 2] = [
    MemoryRegion::Interpreter.descriptor(),
    MemoryRegion::Program.descriptor(),
];

const _: () = assert_fixed_region_layout();

const fn assert_fixed_region_layout() {
    assert!(
        FIXED_MEMORY_REGIONS[0].end + 1 == FIXED_MEMORY_REGIONS[1].start,
        "fixed regions must be contiguous"
    );
    assert!(
        FIXED_MEMORY_REGIONS[1].end as usize + 1 == super::MEMORY_BYTES,
        "fixed regions must cover the whole address space"
    );
}

/// Decodes an address into its region, or `None` past the end of memory.
#[must_use]
pub const fn decode_memory_region(addr: u16) -> Option<MemoryRegion> {
    match addr {
        INTERPRETER_START..=INTERPRETER_END => Some(MemoryRegion::Interpreter),
        PROGRAM_START..=PROGRAM_END => Some(MemoryRegion::Program),
        _ => None,
    }
}
