//! Bounds policy helpers shared by fetch and data accesses.

use crate::{FaultCode, MEMORY_BYTES};

/// Byte width of one instruction word.
pub const WORD_ACCESS_BYTES: u16 = 2;

/// Validates that `width` bytes starting at `addr` lie inside memory.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] when any byte of the access falls
/// at or past [`MEMORY_BYTES`].
pub const fn validate_read(addr: u16, width: u16) -> Result<(), FaultCode> {
    // u32 keeps `addr + width` from wrapping for addresses near u16::MAX.
    if addr as u32 + width as u32 <= MEMORY_BYTES as u32 {
        Ok(())
    } else {
        Err(FaultCode::AddressOutOfRange)
    }
}

/// Validates a single-byte write at `addr`.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] when `addr` is past the end of
/// memory.
pub const fn validate_write(addr: u16) -> Result<(), FaultCode> {
    validate_read(addr, 1)
}

/// Validates a 2-byte instruction fetch at `pc`.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] when `pc` or `pc + 1` is past the
/// end of memory.
pub const fn validate_fetch(pc: u16) -> Result<(), FaultCode> {
    validate_read(pc, WORD_ACCESS_BYTES)
}
