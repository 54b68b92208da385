use std::io;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Display
/// The sink the interpreter draws into. The Chip-8 display is 64x32 monochrome
/// pixels; implementations decide how (and whether) a frame is shown.
///
/// Pixels are only ever XORed on, so `set_pixel` reports collisions: a lit pixel
/// being switched off by a draw.
pub trait Display {
    /// Switch every pixel off
    fn clear(&mut self) -> io::Result<()>;

    /// Whether the pixel at (x, y) is lit
    fn pixel(&self, x: usize, y: usize) -> bool;

    /// XOR `on` into the pixel at (x, y)
    ///
    /// Returns true if the pixel was lit and is now off.
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool;

    /// XOR a sprite onto the display with its top left corner at (x, y)
    ///
    /// Each byte is a row of 8 pixels, most significant bit leftmost. Pixels
    /// that fall off an edge wrap around to the opposite edge.
    /// Returns true if any pixel collided.
    fn set_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                let px = (x + bit) % DISPLAY_WIDTH;
                collision |= self.set_pixel(px, py, (byte >> (7 - bit)) & 1 == 1);
            }
        }
        collision
    }

    /// Present the current frame
    fn render(&mut self) -> io::Result<()>;
}

/// Discards everything; for running programs headless
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDisplay;

impl Display for NoDisplay {
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn pixel(&self, _x: usize, _y: usize) -> bool {
        false
    }

    fn set_pixel(&mut self, _x: usize, _y: usize, _on: bool) -> bool {
        false
    }

    fn render(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// # FrameBuffer
/// An in-memory display, indexed as [y][x].
///
/// Rendering is a no-op; renderers wrap a FrameBuffer and present its rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    /// The rows of the frame, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool; DISPLAY_WIDTH]> {
        self.pixels.iter()
    }

    /// Number of lit pixels
    pub fn lit(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&p| p).count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FrameBuffer {
    fn clear(&mut self) -> io::Result<()> {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        Ok(())
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        let pixel = &mut self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH];
        let collision = on && *pixel;
        *pixel ^= on;
        collision
    }

    fn render(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_xors() {
        let mut frame = FrameBuffer::new();
        assert!(!frame.set_pixel(3, 4, true));
        assert!(frame.pixel(3, 4));
        assert!(!frame.set_pixel(3, 4, false));
        assert!(frame.pixel(3, 4));
        assert!(frame.set_pixel(3, 4, true));
        assert!(!frame.pixel(3, 4));
    }

    #[test]
    fn test_set_sprite_draws_rows_msb_first() {
        let mut frame = FrameBuffer::new();
        assert!(!frame.set_sprite(0, 0, &[0x80, 0x01]));
        assert!(frame.pixel(0, 0));
        assert!(!frame.pixel(1, 0));
        assert!(frame.pixel(7, 1));
        assert_eq!(frame.lit(), 2);
    }

    #[test]
    fn test_set_sprite_wraps_around_edges() {
        let mut frame = FrameBuffer::new();
        frame.set_sprite(62, 31, &[0xF0, 0xF0]);
        assert!(frame.pixel(62, 31));
        assert!(frame.pixel(63, 31));
        assert!(frame.pixel(0, 31));
        assert!(frame.pixel(1, 31));
        assert!(frame.pixel(62, 0));
        assert!(frame.pixel(1, 0));
        assert_eq!(frame.lit(), 8);
    }

    #[test]
    fn test_set_sprite_twice_collides_and_erases() {
        let mut frame = FrameBuffer::new();
        assert!(!frame.set_sprite(10, 10, &[0xF0, 0x90]));
        assert!(frame.set_sprite(10, 10, &[0xF0, 0x90]));
        assert_eq!(frame.lit(), 0);
    }

    #[test]
    fn test_clear() {
        let mut frame = FrameBuffer::new();
        frame.set_sprite(0, 0, &[0xFF]);
        frame.clear().unwrap();
        assert_eq!(frame, FrameBuffer::new());
    }

    #[test]
    fn test_no_display_never_collides() {
        let mut display = NoDisplay;
        assert!(!display.set_sprite(0, 0, &[0xFF]));
        assert!(!display.set_sprite(0, 0, &[0xFF]));
        assert!(!display.pixel(0, 0));
    }
}
