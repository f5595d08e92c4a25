//! Built-in glyph table for the hexadecimal digits `0..=F`.

/// Address of the first glyph byte.
pub const FONT_BASE: u16 = 0x050;
/// Bytes per glyph (one byte per 4-pixel-wide row).
pub const GLYPH_BYTES: u16 = 5;
/// Number of glyphs in the table.
pub const GLYPH_COUNT: usize = 16;

/// Glyph rows for `0..=F`, five bytes each, high nibble holds the pixels.
pub const FONT_GLYPHS: [u8; GLYPH_COUNT * GLYPH_BYTES as usize] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for `value`, as loaded into `I` by `FX29`.
///
/// The full register value is scaled, so values above `0xF` point past the
/// table into the interpreter area rather than being masked.
#[must_use]
pub const fn glyph_address(value: u8) -> u16 {
    FONT_BASE + value as u16 * GLYPH_BYTES
}

#[cfg(test)]
mod tests {
    use super::{glyph_address, FONT_BASE, FONT_GLYPHS, GLYPH_BYTES};

    #[test]
    fn glyph_addresses_step_by_glyph_size() {
        assert_eq!(glyph_address(0), FONT_BASE);
        assert_eq!(glyph_address(1), FONT_BASE + GLYPH_BYTES);
        assert_eq!(glyph_address(0xF), FONT_BASE + 15 * GLYPH_BYTES);
    }

    #[test]
    fn largest_register_value_stays_inside_memory() {
        assert!(usize::from(glyph_address(u8::MAX)) < crate::MEMORY_BYTES);
    }

    #[test]
    fn glyph_table_fits_below_program_origin() {
        let end = usize::from(FONT_BASE) + FONT_GLYPHS.len();
        assert!(end <= usize::from(crate::PROGRAM_ORIGIN));
    }
}
