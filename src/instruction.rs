use std::fmt;

use crate::opcode::Opcode;

/// Register index 0x0..=0xF
pub type Register = usize;

/// # Instructions
/// A decoded opcode. Mnemonics follow Cowgod's technical reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn - call a machine code routine; ignored by interpreters
    Sys(u16),
    /// 00E0 - clear the display
    Cls,
    /// 00EE - PC = STACK.pop()
    Ret,
    /// 1nnn - PC = nnn
    Jp(u16),
    /// 2nnn - STACK.push(PC); PC = nnn
    Call(u16),
    /// 3xkk - if Vx == kk then PC += 2
    SeByte(Register, u8),
    /// 4xkk - if Vx != kk then PC += 2
    SneByte(Register, u8),
    /// 5xy0 - if Vx == Vy then PC += 2
    SeReg(Register, Register),
    /// 6xkk - Vx = kk
    LdByte(Register, u8),
    /// 7xkk - Vx += kk
    AddByte(Register, u8),
    /// 8xy0 - Vx = Vy
    LdReg(Register, Register),
    /// 8xy1 - Vx |= Vy
    Or(Register, Register),
    /// 8xy2 - Vx &= Vy
    And(Register, Register),
    /// 8xy3 - Vx ^= Vy
    Xor(Register, Register),
    /// 8xy4 - Vx += Vy; VF = carry
    AddReg(Register, Register),
    /// 8xy5 - Vx -= Vy; VF = Vx > Vy
    Sub(Register, Register),
    /// 8xy6 - Vx >>= 1; VF = lsb
    Shr(Register),
    /// 8xy7 - Vx = Vy - Vx; VF = Vy > Vx
    Subn(Register, Register),
    /// 8xyE - Vx <<= 1; VF = msb
    Shl(Register),
    /// 9xy0 - if Vx != Vy then PC += 2
    SneReg(Register, Register),
    /// Annn - I = nnn
    LdI(u16),
    /// Bnnn - PC = nnn + V0
    JpV0(u16),
    /// Cxkk - Vx = random & kk
    Rnd(Register, u8),
    /// Dxyn - draw n rows from I at (Vx, Vy); VF = collision
    Drw(Register, Register, u8),
    /// Ex9E - if key Vx is down then PC += 2
    Skp(Register),
    /// ExA1 - if key Vx is up then PC += 2
    Sknp(Register),
    /// Fx07 - Vx = DT
    LdVxDt(Register),
    /// Fx0A - Vx = next key press
    LdVxKey(Register),
    /// Fx15 - DT = Vx
    LdDtVx(Register),
    /// Fx18 - ST = Vx
    LdStVx(Register),
    /// Fx1E - I += Vx
    AddI(Register),
    /// Fx29 - I = address of the glyph for Vx
    LdFont(Register),
    /// Fx33 - mem[I..I+3] = bcd(Vx)
    Bcd(Register),
    /// Fx55 - mem[I..=I+x] = V0..=Vx
    Store(Register),
    /// Fx65 - V0..=Vx = mem[I..=I+x]
    Load(Register),
}

impl Instruction {
    /// Selects the instruction for an opcode, or `None` if it isn't part of the instruction set
    pub fn decode(op: Opcode) -> Option<Instruction> {
        use Instruction::*;

        let x = usize::from(op.x());
        let y = usize::from(op.y());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys(op.nnn()),
            (0x1, ..) => Jp(op.nnn()),
            (0x2, ..) => Call(op.nnn()),
            (0x3, ..) => SeByte(x, op.kk()),
            (0x4, ..) => SneByte(x, op.kk()),
            (0x5, .., 0x0) => SeReg(x, y),
            (0x6, ..) => LdByte(x, op.kk()),
            (0x7, ..) => AddByte(x, op.kk()),
            (0x8, .., 0x0) => LdReg(x, y),
            (0x8, .., 0x1) => Or(x, y),
            (0x8, .., 0x2) => And(x, y),
            (0x8, .., 0x3) => Xor(x, y),
            (0x8, .., 0x4) => AddReg(x, y),
            (0x8, .., 0x5) => Sub(x, y),
            (0x8, .., 0x6) => Shr(x),
            (0x8, .., 0x7) => Subn(x, y),
            (0x8, .., 0xE) => Shl(x),
            (0x9, .., 0x0) => SneReg(x, y),
            (0xA, ..) => LdI(op.nnn()),
            (0xB, ..) => JpV0(op.nnn()),
            (0xC, ..) => Rnd(x, op.kk()),
            (0xD, ..) => Drw(x, y, op.n()),
            (0xE, _, 0x9, 0xE) => Skp(x),
            (0xE, _, 0xA, 0x1) => Sknp(x),
            (0xF, _, 0x0, 0x7) => LdVxDt(x),
            (0xF, _, 0x0, 0xA) => LdVxKey(x),
            (0xF, _, 0x1, 0x5) => LdDtVx(x),
            (0xF, _, 0x1, 0x8) => LdStVx(x),
            (0xF, _, 0x1, 0xE) => AddI(x),
            (0xF, _, 0x2, 0x9) => LdFont(x),
            (0xF, _, 0x3, 0x3) => Bcd(x),
            (0xF, _, 0x5, 0x5) => Store(x),
            (0xF, _, 0x6, 0x5) => Load(x),
            _ => return None,
        };
        Some(instruction)
    }
}

/// Disassembles the instruction, e.g. `LD V3, 0x1F`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys(a) => write!(f, "SYS {:#05X}", a),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(a) => write!(f, "JP {:#05X}", a),
            Call(a) => write!(f, "CALL {:#05X}", a),
            SeByte(x, kk) => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SneByte(x, kk) => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SeReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte(x, kk) => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte(x, kk) => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LdReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr(x) => write!(f, "SHR V{:X}", x),
            Subn(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl(x) => write!(f, "SHL V{:X}", x),
            SneReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(a) => write!(f, "LD I, {:#05X}", a),
            JpV0(a) => write!(f, "JP V0, {:#05X}", a),
            Rnd(x, kk) => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Drw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp(x) => write!(f, "SKP V{:X}", x),
            Sknp(x) => write!(f, "SKNP V{:X}", x),
            LdVxDt(x) => write!(f, "LD V{:X}, DT", x),
            LdVxKey(x) => write!(f, "LD V{:X}, K", x),
            LdDtVx(x) => write!(f, "LD DT, V{:X}", x),
            LdStVx(x) => write!(f, "LD ST, V{:X}", x),
            AddI(x) => write!(f, "ADD I, V{:X}", x),
            LdFont(x) => write!(f, "LD F, V{:X}", x),
            Bcd(x) => write!(f, "LD B, V{:X}", x),
            Store(x) => write!(f, "LD [I], V{:X}", x),
            Load(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use Instruction::*;

    fn decode(word: u16) -> Option<Instruction> {
        Instruction::decode(Opcode(word))
    }

    #[test]
    fn test_decodes_fixed_words() {
        assert_eq!(decode(0x00E0), Some(Cls));
        assert_eq!(decode(0x00EE), Some(Ret));
        assert_eq!(decode(0x0123), Some(Sys(0x123)));
    }

    #[test]
    fn test_decodes_addresses() {
        assert_eq!(decode(0x1ABC), Some(Jp(0xABC)));
        assert_eq!(decode(0x2123), Some(Call(0x123)));
        assert_eq!(decode(0xA2F0), Some(LdI(0x2F0)));
        assert_eq!(decode(0xB300), Some(JpV0(0x300)));
    }

    #[test]
    fn test_decodes_register_forms() {
        assert_eq!(decode(0x3A11), Some(SeByte(0xA, 0x11)));
        assert_eq!(decode(0x8124), Some(AddReg(0x1, 0x2)));
        assert_eq!(decode(0x812E), Some(Shl(0x1)));
        assert_eq!(decode(0xD125), Some(Drw(0x1, 0x2, 0x5)));
        assert_eq!(decode(0xE59E), Some(Skp(0x5)));
        assert_eq!(decode(0xF51E), Some(AddI(0x5)));
        assert_eq!(decode(0xFF65), Some(Load(0xF)));
    }

    #[test]
    fn test_rejects_words_outside_the_instruction_set() {
        assert_eq!(decode(0x5121), None);
        assert_eq!(decode(0x8128), None);
        assert_eq!(decode(0x9121), None);
        assert_eq!(decode(0xE1A2), None);
        assert_eq!(decode(0xF1FF), None);
    }

    #[test]
    fn test_disassembles() {
        assert_eq!(decode(0x631F).unwrap().to_string(), "LD V3, 0x1F");
        assert_eq!(decode(0x2205).unwrap().to_string(), "CALL 0x205");
        assert_eq!(decode(0xD01F).unwrap().to_string(), "DRW V0, V1, 15");
        assert_eq!(decode(0xF355).unwrap().to_string(), "LD [I], V3");
    }
}
