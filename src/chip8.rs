use std::io::Read;

use log::{trace, warn};

use crate::config::Config;
use crate::constants::{FONT_ADDRESS, GLYPH_SIZE, STACK_DEPTH};
use crate::display::Display;
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::random::{RandomSource, ThreadRandom};
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns:
///  - the `state`: registers, stack, timers and memory
///  - a `display` it draws into, a `keypad` it reads, a `random` source for `Cxkk`
///
/// Supplies interfaces for:
/// - loading the sprite sheet (done on construction) and roms
/// - advancing the CPU one instruction at a time
/// - counting down its timers
///
/// Pacing is left to the caller: `step` as often as the clock speed demands
/// and `decrement_timers` at 60Hz.
pub struct Chip8<D, K, R = ThreadRandom> {
    config: Config,
    state: State,
    display: D,
    keypad: K,
    random: R,
}

impl<D: Display, K: Keypad> Chip8<D, K> {
    pub fn new(config: Config, display: D, keypad: K) -> Result<Self> {
        Self::with_random(config, display, keypad, ThreadRandom)
    }
}

impl<D: Display, K: Keypad, R: RandomSource> Chip8<D, K, R> {
    /// Like `new`, drawing random bytes from `random`
    pub fn with_random(config: Config, display: D, keypad: K, random: R) -> Result<Self> {
        Ok(Chip8 {
            config,
            state: State::new(config.memory_size, config.program_start)?,
            display,
            keypad,
            random,
        })
    }

    /// Load raw bytes into memory
    ///
    /// # Arguments
    /// * `source` the bytes to load; read until exhausted
    /// * `offset` the address of the first byte
    pub fn load(&mut self, source: &mut dyn Read, offset: u16) -> Result<usize> {
        self.state.memory.load(source, usize::from(offset))
    }

    /// Load a rom at the configured program start
    pub fn load_program(&mut self, source: &mut dyn Read) -> Result<usize> {
        self.load(source, self.config.program_start)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    /// Present the current frame
    pub fn render(&mut self) -> Result<()> {
        Ok(self.display.render()?)
    }

    /// Whether a tone should currently be sounding
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Counts both timers down by one, stopping at zero
    pub fn decrement_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Fetches, decodes and executes the instruction at the pc
    ///
    /// Errors raised by the instruction carry its address and opcode. The pc
    /// has already moved past the instruction when an error is returned.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.state.pc;
        let op = Opcode(self.state.memory.word(usize::from(pc))?);
        self.state.pc = pc.wrapping_add(2);

        self.execute(pc, op).map_err(|source| Error::Instruction {
            pc,
            opcode: op.0,
            source: Box::new(source),
        })
    }

    fn execute(&mut self, pc: u16, op: Opcode) -> Result<()> {
        use Instruction::*;

        let instruction = match Instruction::decode(op) {
            Some(instruction) => instruction,
            None if self.config.strict => return Err(Error::UnknownOpcode),
            None => {
                warn!("skipping unknown opcode {} at {:#05X}", op, pc);
                return Ok(());
            }
        };
        trace!("{:#05X}  {}  {}", pc, op, instruction);

        let s = &mut self.state;
        match instruction {
            Sys(_) => {}
            Cls => self.display.clear()?,
            Ret => {
                if s.sp == 0 {
                    return Err(Error::StackUnderflow);
                }
                s.sp -= 1;
                s.pc = s.stack[usize::from(s.sp)];
            }
            Jp(addr) => s.pc = addr,
            Call(addr) => {
                let slot = s
                    .stack
                    .get_mut(usize::from(s.sp))
                    .ok_or(Error::StackOverflow(STACK_DEPTH))?;
                *slot = s.pc;
                s.sp += 1;
                s.pc = addr;
            }
            SeByte(x, kk) => skip_if(&mut s.pc, s.v[x] == kk),
            SneByte(x, kk) => skip_if(&mut s.pc, s.v[x] != kk),
            SeReg(x, y) => skip_if(&mut s.pc, s.v[x] == s.v[y]),
            LdByte(x, kk) => s.v[x] = kk,
            AddByte(x, kk) => s.v[x] = s.v[x].wrapping_add(kk),
            LdReg(x, y) => s.v[x] = s.v[y],
            Or(x, y) => s.v[x] |= s.v[y],
            And(x, y) => s.v[x] &= s.v[y],
            Xor(x, y) => s.v[x] ^= s.v[y],
            // Flags come from the operands; VF is written before Vx so that
            // the result wins when x is F
            AddReg(x, y) => {
                let (sum, carry) = s.v[x].overflowing_add(s.v[y]);
                s.v[0xF] = u8::from(carry);
                s.v[x] = sum;
            }
            Sub(x, y) => {
                let (vx, vy) = (s.v[x], s.v[y]);
                s.v[0xF] = u8::from(vx > vy);
                s.v[x] = vx.wrapping_sub(vy);
            }
            Shr(x) => {
                let vx = s.v[x];
                s.v[0xF] = vx & 0x1;
                s.v[x] = vx >> 1;
            }
            Subn(x, y) => {
                let (vx, vy) = (s.v[x], s.v[y]);
                s.v[0xF] = u8::from(vy > vx);
                s.v[x] = vy.wrapping_sub(vx);
            }
            Shl(x) => {
                let vx = s.v[x];
                s.v[0xF] = vx >> 7;
                s.v[x] = vx << 1;
            }
            SneReg(x, y) => skip_if(&mut s.pc, s.v[x] != s.v[y]),
            LdI(addr) => s.i = addr,
            JpV0(addr) => s.pc = addr + u16::from(s.v[0x0]),
            Rnd(x, kk) => s.v[x] = self.random.next_byte() & kk,
            Drw(x, y, n) => {
                let sprite = s.memory.slice(usize::from(s.i), usize::from(n))?;
                let collision = self
                    .display
                    .set_sprite(usize::from(s.v[x]), usize::from(s.v[y]), sprite);
                s.v[0xF] = u8::from(collision);
            }
            Skp(x) => skip_if(&mut s.pc, self.keypad.is_down(s.v[x] & 0xF)),
            Sknp(x) => skip_if(&mut s.pc, !self.keypad.is_down(s.v[x] & 0xF)),
            LdVxDt(x) => s.v[x] = s.delay_timer,
            LdVxKey(x) => match self.keypad.wait_for_key()? {
                key @ 0x0..=0xF => s.v[x] = key,
                key => return Err(Error::InvalidKey(key)),
            },
            LdDtVx(x) => s.delay_timer = s.v[x],
            LdStVx(x) => s.sound_timer = s.v[x],
            AddI(x) => s.i = s.i.wrapping_add(u16::from(s.v[x])),
            LdFont(x) => s.i = FONT_ADDRESS + u16::from(s.v[x]) * GLYPH_SIZE,
            Bcd(x) => {
                let vx = s.v[x];
                s.memory
                    .write_all(usize::from(s.i), &[vx / 100, vx / 10 % 10, vx % 10])?;
            }
            Store(x) => s.memory.write_all(usize::from(s.i), &s.v[..=x])?,
            Load(x) => {
                let bytes = s.memory.slice(usize::from(s.i), x + 1)?;
                s.v[..=x].copy_from_slice(bytes);
            }
        }
        Ok(())
    }
}

/// Skips the next instruction when `condition` holds
fn skip_if(pc: &mut u16, condition: bool) {
    if condition {
        *pc = pc.wrapping_add(2);
    }
}
