use std::fmt;

use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::Table;

use crate::constants::{FONT_ADDRESS, SPRITE_SHEET, STACK_DEPTH};
use crate::error::Result;
use crate::memory::Memory;

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry, borrow, shift and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), counted down externally at 60Hz
///
/// ## Memory
/// - a 16 slot stack of return addresses
/// - addressable memory, 4096 bytes unless configured otherwise
///     - 0x000..0x050 holds the sprite sheet
///     - programs are loaded at 0x200
#[derive(Clone, Debug)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: Memory,
}

impl State {
    /// Allocates `memory_size` bytes, loads the sprite sheet and points the pc at `start`
    pub fn new(memory_size: usize, start: u16) -> Result<Self> {
        let mut memory = Memory::new(memory_size);
        memory.load(&mut &SPRITE_SHEET[..], usize::from(FONT_ADDRESS))?;

        Ok(State {
            v: [0; 16],
            i: 0,
            pc: start,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
        })
    }
}

/// Formats a register value and, when there is one, whatever it refers to
fn row(subject: impl Into<String>, value: impl Into<u16>, referenced: Option<u16>) -> Vec<String> {
    let value = value.into();
    let (hex, int) = match referenced {
        Some(r) => (format!("{:#04X}", r), r.to_string()),
        None => ("---".to_string(), "---".to_string()),
    };
    vec![
        subject.into(),
        format!("{:#04X}", value),
        value.to_string(),
        hex,
        int,
    ]
}

/// Renders the registers as a table; `RValue` is whatever the register points at
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte_at = |address: u16| self.memory.read(usize::from(address)).ok().map(u16::from);

        let mut table = Table::new();
        table.load_preset(ASCII_FULL_CONDENSED).set_header(vec![
            "Subject",
            "Value(Hex)",
            "Value(int)",
            "RValue(Hex)",
            "RValue(int)",
        ]);
        for (n, &v) in self.v.iter().enumerate() {
            table.add_row(row(format!("V{:X}", n), v, None));
        }
        table
            .add_row(row("I", self.i, byte_at(self.i)))
            .add_row(row("DT", self.delay_timer, None))
            .add_row(row("ST", self.sound_timer, None))
            .add_row(row("PC", self.pc, byte_at(self.pc)))
            .add_row(row(
                "PC+1",
                self.pc.wrapping_add(1),
                byte_at(self.pc.wrapping_add(1)),
            ))
            .add_row(row(
                "SP",
                self.sp,
                self.stack.get(usize::from(self.sp)).copied(),
            ));

        write!(f, "{}", table)
    }
}
