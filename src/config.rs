use crate::constants::{MEMORY_SIZE, PROGRAM_START};

/// How a virtual machine is built
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Bytes of addressable memory; at least enough for the sprite sheet
    pub memory_size: usize,
    /// Where programs are loaded and where the pc starts
    pub program_start: u16,
    /// Report words outside the instruction set as `UnknownOpcode` rather
    /// than skipping over them
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory_size: MEMORY_SIZE,
            program_start: PROGRAM_START,
            strict: true,
        }
    }
}
