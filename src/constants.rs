/// Width of the display in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// Height of the display in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Default size of addressable memory in bytes
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are conventionally loaded and execution starts
pub const PROGRAM_START: u16 = 0x200;

/// Where the sprite sheet is loaded
pub const FONT_ADDRESS: u16 = 0x000;

/// Bytes per glyph in the sprite sheet
pub const GLYPH_SIZE: u16 = 5;

/// Maximum number of nested subroutine calls
pub const STACK_DEPTH: usize = 16;

/// Instructions executed per second by default
pub const CLOCK_SPEED: u32 = 500;

/// Rate at which the delay and sound timers count down
pub const TIMER_SPEED: u32 = 60;

/// # Sprite sheet
/// Hexadecimal digits 0..F, each 8 pixels wide and 5 rows tall.
/// Only the high nibble of each row is lit.
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
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
