//! Framebuffer model and the display collaborator contract.
//!
//! The framebuffer is 64x32 monochrome pixels packed eight to a byte, row
//! major, with the most significant bit of each byte as the leftmost pixel.
//! That packed form is what the engine hands to [`Display::draw`].

/// Framebuffer width in pixels.
pub const DISPLAY_WIDTH: usize = 64;
/// Framebuffer height in pixels.
pub const DISPLAY_HEIGHT: usize = 32;
/// Packed bytes per framebuffer row.
pub const ROW_BYTES: usize = DISPLAY_WIDTH / 8;
/// Packed framebuffer size in bytes.
pub const FRAMEBUFFER_BYTES: usize = ROW_BYTES * DISPLAY_HEIGHT;

/// Pixel formats a display may be asked to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DisplayEncoding {
    /// One bit per pixel, 8 pixels per byte, MSB first, rows top to bottom.
    #[default]
    MonochromePacked,
}

/// How sprite pixels past the right or bottom edge are handled.
///
/// The sprite origin always wraps modulo the display size; this only governs
/// pixels that would spill over the edge from a valid origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SpriteEdge {
    /// Spilled pixels reappear on the opposite edge.
    #[default]
    Wrap,
    /// Spilled pixels are dropped.
    Clip,
}

/// Packed monochrome framebuffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Framebuffer {
    bits: [u8; FRAMEBUFFER_BYTES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            bits: [0; FRAMEBUFFER_BYTES],
        }
    }
}

impl Framebuffer {
    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.bits = [0; FRAMEBUFFER_BYTES];
    }

    /// Returns whether the pixel at (`x`, `y`) is lit; coordinates wrap.
    #[must_use]
    pub const fn pixel(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x % DISPLAY_WIDTH, y % DISPLAY_HEIGHT);
        self.bits[byte] & mask != 0
    }

    /// XORs one pixel on; returns `true` when a lit pixel was turned off.
    fn flip(&mut self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x, y);
        let erased = self.bits[byte] & mask != 0;
        self.bits[byte] ^= mask;
        erased
    }

    const fn locate(x: usize, y: usize) -> (usize, u8) {
        (y * ROW_BYTES + x / 8, 0x80 >> (x % 8))
    }

    /// XORs an 8-pixel-wide sprite with `rows.len()` rows at (`x`, `y`).
    ///
    /// The origin wraps modulo the display size. Returns `true` when any lit
    /// pixel was erased.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8], edge: SpriteEdge) -> bool {
        let origin_x = usize::from(x) % DISPLAY_WIDTH;
        let origin_y = usize::from(y) % DISPLAY_HEIGHT;
        let mut collision = false;

        for (dy, row) in rows.iter().enumerate() {
            let mut py = origin_y + dy;
            if py >= DISPLAY_HEIGHT {
                match edge {
                    SpriteEdge::Wrap => py %= DISPLAY_HEIGHT,
                    SpriteEdge::Clip => break,
                }
            }
            for dx in 0..8 {
                if row & (0x80 >> dx) == 0 {
                    continue;
                }
                let mut px = origin_x + dx;
                if px >= DISPLAY_WIDTH {
                    match edge {
                        SpriteEdge::Wrap => px %= DISPLAY_WIDTH,
                        SpriteEdge::Clip => continue,
                    }
                }
                collision |= self.flip(px, py);
            }
        }

        collision
    }

    /// Borrows the packed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FRAMEBUFFER_BYTES] {
        &self.bits
    }

    /// Number of lit pixels.
    #[must_use]
    pub fn lit_pixels(&self) -> u32 {
        self.bits.iter().map(|byte| byte.count_ones()).sum()
    }
}

/// Display surface that repaints from a framebuffer.
///
/// Called synchronously from the `00E0` and `DXYN` paths after the
/// instruction commits. The engine ignores whatever the display does with
/// the frame.
pub trait Display {
    /// Presents `framebuffer`, interpreted according to `encoding`.
    fn draw(&mut self, framebuffer: &Framebuffer, encoding: DisplayEncoding);
}

/// Display that discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDisplay;

impl Display for HeadlessDisplay {
    fn draw(&mut self, _framebuffer: &Framebuffer, _encoding: DisplayEncoding) {}
}

#[cfg(test)]
mod tests {
    use super::{Framebuffer, SpriteEdge, DISPLAY_HEIGHT, DISPLAY_WIDTH, FRAMEBUFFER_BYTES};

    #[test]
    fn packed_layout_is_msb_first_row_major() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(0, 0, &[0x80], SpriteEdge::Wrap);
        fb.draw_sprite(9, 1, &[0x80], SpriteEdge::Wrap);
        assert_eq!(fb.as_bytes()[0], 0x80);
        assert_eq!(fb.as_bytes()[8 + 1], 0x40);
        assert_eq!(fb.as_bytes().len(), FRAMEBUFFER_BYTES);
    }

    #[test]
    fn redraw_erases_and_reports_collision() {
        let mut fb = Framebuffer::default();
        assert!(!fb.draw_sprite(10, 5, &[0xF0, 0x90], SpriteEdge::Wrap));
        assert_eq!(fb.lit_pixels(), 6);
        assert!(fb.draw_sprite(10, 5, &[0xF0, 0x90], SpriteEdge::Wrap));
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn disjoint_sprites_do_not_collide() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(0, 0, &[0xF0], SpriteEdge::Wrap);
        assert!(!fb.draw_sprite(0, 0, &[0x0F], SpriteEdge::Wrap));
        assert_eq!(fb.as_bytes()[0], 0xFF);
    }

    #[test]
    fn origin_wraps_modulo_display_size() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(64 + 3, 32 + 2, &[0x80], SpriteEdge::Clip);
        assert!(fb.pixel(3, 2));
    }

    #[test]
    fn wrap_edge_moves_spilled_pixels_to_opposite_side() {
        let mut fb = Framebuffer::default();
        let x = u8::try_from(DISPLAY_WIDTH - 4).expect("fits");
        let y = u8::try_from(DISPLAY_HEIGHT - 1).expect("fits");
        fb.draw_sprite(x, y, &[0xFF, 0x80], SpriteEdge::Wrap);
        assert!(fb.pixel(DISPLAY_WIDTH - 1, DISPLAY_HEIGHT - 1));
        assert!(fb.pixel(0, DISPLAY_HEIGHT - 1));
        assert!(fb.pixel(3, DISPLAY_HEIGHT - 1));
        assert!(fb.pixel(DISPLAY_WIDTH - 4, 0));
        assert_eq!(fb.lit_pixels(), 9);
    }

    #[test]
    fn clip_edge_drops_spilled_pixels() {
        let mut fb = Framebuffer::default();
        let x = u8::try_from(DISPLAY_WIDTH - 4).expect("fits");
        let y = u8::try_from(DISPLAY_HEIGHT - 1).expect("fits");
        fb.draw_sprite(x, y, &[0xFF, 0x80], SpriteEdge::Clip);
        assert_eq!(fb.lit_pixels(), 4);
        assert!(!fb.pixel(0, DISPLAY_HEIGHT - 1));
        assert!(!fb.pixel(DISPLAY_WIDTH - 4, 0));
    }

    #[test]
    fn clear_turns_every_pixel_off() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(1, 1, &[0xFF; 15], SpriteEdge::Wrap);
        fb.clear();
        assert_eq!(fb.lit_pixels(), 0);
    }
}
