//! Memory model primitives, glyph table, and fixed address-space policies.

/// Bounds legality helpers for fetch and data access.
pub mod access;
/// Built-in hexadecimal glyph table.
pub mod font;
/// Fixed memory-region map and address decoder.
pub mod map;

pub use access::{validate_fetch, validate_read, validate_write, WORD_ACCESS_BYTES};
pub use font::{glyph_address, FONT_BASE, FONT_GLYPHS, GLYPH_BYTES, GLYPH_COUNT};
pub use map::{
    decode_memory_region, MemoryRegion, RegionDescriptor, FIXED_MEMORY_REGIONS, INTERPRETER_END,
    INTERPRETER_START, PROGRAM_END, PROGRAM_START,
};

use crate::FaultCode;

/// Size in bytes of the flat address space (4 KiB).
pub const MEMORY_BYTES: usize = 4096;

/// Canonical program load origin.
pub const PROGRAM_ORIGIN: u16 = PROGRAM_START;

/// Allocates a zeroed 4 KiB backing store.
#[must_use]
pub fn new_address_space() -> Box<[u8]> {
    vec![0; MEMORY_BYTES].into_boxed_slice()
}

/// Byte-addressable storage with bounds-checked access.
///
/// Out-of-range reads and writes are reported as
/// [`FaultCode::AddressOutOfRange`]; nothing is ever clamped or wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates zeroed memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: new_address_space(),
        }
    }

    /// Copies `bytes` into memory starting at `origin`, truncating at the end
    /// of the address space.
    ///
    /// Returns the number of bytes actually copied; an origin past the end
    /// copies nothing. Callers that must reject oversized images check the
    /// length first (see [`CoreState::load_program`](crate::CoreState::load_program)).
    pub fn load(&mut self, origin: u16, bytes: &[u8]) -> usize {
        let start = usize::from(origin);
        let Some(window) = self.bytes.get_mut(start..) else {
            return 0;
        };
        let copied = bytes.len().min(window.len());
        window[..copied].copy_from_slice(&bytes[..copied]);
        copied
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when `addr` is past the end.
    pub fn read8(&self, addr: u16) -> Result<u8, FaultCode> {
        validate_read(addr, 1)?;
        Ok(self.bytes[usize::from(addr)])
    }

    /// Reads a big-endian 16-bit word from `addr` and `addr + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when either byte is past the
    /// end.
    pub fn read16(&self, addr: u16) -> Result<u16, FaultCode> {
        validate_read(addr, WORD_ACCESS_BYTES)?;
        let at = usize::from(addr);
        Ok(u16::from_be_bytes([self.bytes[at], self.bytes[at + 1]]))
    }

    /// Reads `len` consecutive bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when the range runs past the
    /// end.
    pub fn read_range(&self, addr: u16, len: u16) -> Result<&[u8], FaultCode> {
        validate_read(addr, len)?;
        let at = usize::from(addr);
        Ok(&self.bytes[at..at + usize::from(len)])
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::AddressOutOfRange`] when `addr` is past the end.
    pub fn write8(&mut self, addr: u16, value: u8) -> Result<(), FaultCode> {
        validate_write(addr)?;
        self.bytes[usize::from(addr)] = value;
        Ok(())
    }

    /// Installs the glyph table at [`FONT_BASE`].
    pub fn install_font(&mut self) {
        self.load(FONT_BASE, &FONT_GLYPHS);
    }

    /// Borrows the whole backing store.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
