use std::io::{self, Write};

use chip8_vm::{Display, FrameBuffer};
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};

/// Formats a FrameBuffer as text, one line per row.
///
/// # Arguments
/// * `frame` a Chip-8 FrameBuffer
/// * `on` the character for a lit pixel
/// * `off` the character for an unlit pixel
fn frame_to_text(frame: &FrameBuffer, on: char, off: char) -> Vec<String> {
    frame
        .rows()
        .map(|row| row.iter().map(|&p| if p { on } else { off }).collect())
        .collect()
}

/// # Text display
/// Draws the 64x32 Chip-8 display on a terminal using block characters, one
/// character per pixel.
///
/// A frame is only written when something has been drawn since the last one.
/// The cursor is hidden while the display is alive.
pub struct TextDisplay<W: Write> {
    frame: FrameBuffer,
    out: W,
    dirty: bool,
}

impl<W: Write> TextDisplay<W> {
    /// Takes over `out`: hides the cursor and clears the screen
    pub fn new(mut out: W) -> io::Result<Self> {
        execute!(out, Hide, Clear(ClearType::All))?;
        Ok(TextDisplay {
            frame: FrameBuffer::new(),
            out,
            dirty: true,
        })
    }
}

impl<W: Write> Drop for TextDisplay<W> {
    fn drop(&mut self) {
        // nothing left to report a failure to
        let _ = execute!(self.out, Show);
    }
}

impl<W: Write> Display for TextDisplay<W> {
    fn clear(&mut self) -> io::Result<()> {
        self.frame.clear()?;
        self.dirty = true;
        queue!(self.out, Clear(ClearType::All))
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        self.frame.pixel(x, y)
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        self.dirty |= on;
        self.frame.set_pixel(x, y, on)
    }

    fn render(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        queue!(self.out, MoveTo(0, 0))?;
        for line in frame_to_text(&self.frame, '█', ' ') {
            queue!(self.out, Print(line), MoveToNextLine(1))?;
        }
        self.out.flush()?;
        self.dirty = false;
        Ok(())
    }
}

/// # Debug display
/// Crudely prints every frame as a grid of `*` (lit) and `_` (unlit), each
/// row prefixed with its number. Useful for logging what a program drew.
pub struct DebugDisplay<W: Write> {
    frame: FrameBuffer,
    out: W,
}

impl<W: Write> DebugDisplay<W> {
    pub fn new(out: W) -> Self {
        DebugDisplay {
            frame: FrameBuffer::new(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for DebugDisplay<W> {
    fn clear(&mut self) -> io::Result<()> {
        self.frame.clear()
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        self.frame.pixel(x, y)
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        self.frame.set_pixel(x, y, on)
    }

    fn render(&mut self) -> io::Result<()> {
        for (y, line) in frame_to_text(&self.frame, '*', '_').iter().enumerate() {
            writeln!(self.out, "{:02}:{}", y, line)?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::Command;

    /// The escape sequence `command` writes
    fn ansi(command: impl Command) -> String {
        let mut out = String::new();
        command.write_ansi(&mut out).unwrap();
        out
    }

    #[test]
    fn test_frame_to_text() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(1, 0, true);
        frame.set_pixel(0, 1, true);
        let lines = frame_to_text(&frame, '#', '.');

        assert_eq!(lines.len(), 32);
        assert!(lines[0].starts_with(".#.."));
        assert!(lines[1].starts_with("#..."));
        assert_eq!(lines[2], ".".repeat(64));
    }

    #[test]
    fn test_debug_display_numbers_rows() {
        let mut display = DebugDisplay::new(Vec::new());
        display.set_sprite(0, 0, &[0xC0]);
        display.render().unwrap();
        let out = String::from_utf8(display.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 32);
        assert_eq!(lines[0], format!("00:**{}", "_".repeat(62)));
        assert!(lines[31].starts_with("31:_"));
    }

    #[test]
    fn test_text_display_takes_over_the_screen() {
        let display = TextDisplay::new(Vec::new()).unwrap();
        let out = String::from_utf8(display.out.clone()).unwrap();
        assert_eq!(out, ansi(Hide) + &ansi(Clear(ClearType::All)));
    }

    #[test]
    fn test_text_display_skips_unchanged_frames() {
        let mut display = TextDisplay::new(Vec::new()).unwrap();
        display.render().unwrap();
        let first = display.out.len();
        assert!(first > 0);

        display.render().unwrap();
        assert_eq!(display.out.len(), first);

        display.set_sprite(0, 0, &[0x80]);
        display.render().unwrap();
        assert!(display.out.len() > first);
    }

    #[test]
    fn test_text_display_draws_blocks() {
        let mut display = TextDisplay::new(Vec::new()).unwrap();
        display.out.clear();
        display.set_sprite(0, 0, &[0x80]);
        display.render().unwrap();
        let out = String::from_utf8(display.out.clone()).unwrap();

        let home = ansi(MoveTo(0, 0));
        assert!(out.starts_with(&home));
        assert!(out[home.len()..].starts_with('█'));
        assert_eq!(out.matches('█').count(), 1);
        assert_eq!(out.matches(&ansi(MoveToNextLine(1))).count(), 32);
    }
}
