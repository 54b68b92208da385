use std::io;

use thiserror::Error;

/// Everything that can stop the virtual machine.
#[derive(Debug, Error)]
pub enum Error {
    /// A memory access or load reached past the end of memory.
    #[error("access of {len} byte(s) at {address:#06X} is outside memory of {size} bytes")]
    OutOfBounds {
        address: usize,
        len: usize,
        size: usize,
    },
    /// A subroutine call was made with every stack slot in use.
    #[error("stack overflow: more than {0} nested calls")]
    StackOverflow(usize),
    /// A return was made with an empty stack.
    #[error("stack underflow: return without a matching call")]
    StackUnderflow,
    /// The instruction word matches no known instruction.
    #[error("unknown opcode")]
    UnknownOpcode,
    /// The keypad reported a key that isn't on it.
    #[error("key {0:#04X} is not on the keypad")]
    InvalidKey(u8),
    /// A byte source, display or keypad failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// An instruction failed while executing.
    #[error("{opcode:04X} at {pc:#05X}: {source}")]
    Instruction {
        pc: u16,
        opcode: u16,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The innermost cause, stripped of any instruction context.
    pub fn root(&self) -> &Error {
        match self {
            Error::Instruction { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_instruction_context() {
        let error = Error::Instruction {
            pc: 0x204,
            opcode: 0x00EE,
            source: Box::new(Error::StackUnderflow),
        };
        assert!(matches!(error.root(), Error::StackUnderflow));
    }

    #[test]
    fn test_instruction_message_names_address_and_opcode() {
        let error = Error::Instruction {
            pc: 0x2A4,
            opcode: 0xF233,
            source: Box::new(Error::OutOfBounds {
                address: 0xFFE,
                len: 3,
                size: 0x1000,
            }),
        };
        let message = error.to_string();
        assert!(message.starts_with("F233 at 0x2A4"));
        assert!(message.contains("0x0FFE"));
    }
}
