pub use chip8::Chip8;
pub use config::Config;
pub use constants::{CLOCK_SPEED, TIMER_SPEED};
pub use display::{Display, FrameBuffer, NoDisplay};
pub use error::{Error, Result};
pub use instruction::Instruction;
pub use keypad::{Keypad, NoKeypad, ScriptedKeypad};
pub use memory::Memory;
pub use opcode::Opcode;
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use state::State;

mod chip8;
mod config;
pub mod constants;
pub mod display;
mod error;
mod instruction;
pub mod keypad;
mod memory;
mod opcode;
pub mod random;
mod state;
