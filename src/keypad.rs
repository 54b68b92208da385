use std::collections::VecDeque;
use std::io;

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad, keys 0x0..=0xF.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
pub trait Keypad {
    /// Whether `key` is currently held
    fn is_down(&mut self, key: u8) -> bool;

    /// Block until a key is pressed and return it
    fn wait_for_key(&mut self) -> io::Result<u8>;
}

/// A keypad with nothing attached. No key is ever down and waiting fails
/// instead of blocking forever.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoKeypad;

impl Keypad for NoKeypad {
    fn is_down(&mut self, _key: u8) -> bool {
        false
    }

    fn wait_for_key(&mut self) -> io::Result<u8> {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no keypad attached",
        ))
    }
}

/// A keypad driven by a script: a set of held keys plus a queue of presses
/// handed out one per wait.
#[derive(Clone, Debug, Default)]
pub struct ScriptedKeypad {
    held: [bool; 16],
    presses: VecDeque<u8>,
}

impl ScriptedKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `keys` to be returned by successive waits
    pub fn with_presses(keys: &[u8]) -> Self {
        ScriptedKeypad {
            held: [false; 16],
            presses: keys.iter().copied().collect(),
        }
    }

    /// Set the held status of key
    pub fn hold(&mut self, key: u8) {
        self.held[usize::from(key & 0xF)] = true;
    }

    /// Unset the held status of key
    pub fn release(&mut self, key: u8) {
        self.held[usize::from(key & 0xF)] = false;
    }

    /// Presses not yet consumed
    pub fn pending(&self) -> usize {
        self.presses.len()
    }
}

impl Keypad for ScriptedKeypad {
    fn is_down(&mut self, key: u8) -> bool {
        self.held.get(usize::from(key)).copied().unwrap_or(false)
    }

    fn wait_for_key(&mut self) -> io::Result<u8> {
        self.presses.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keypad() {
        let mut keypad = NoKeypad;
        assert!(!keypad.is_down(0x1));
        assert_eq!(
            keypad.wait_for_key().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_hold_and_release() {
        let mut keypad = ScriptedKeypad::new();
        keypad.hold(0xE);
        assert!(keypad.is_down(0xE));
        assert!(!keypad.is_down(0xD));
        keypad.release(0xE);
        assert!(!keypad.is_down(0xE));
    }

    #[test]
    fn test_out_of_range_key_is_up() {
        let mut keypad = ScriptedKeypad::new();
        assert!(!keypad.is_down(0x10));
    }

    #[test]
    fn test_presses_are_consumed_in_order() {
        let mut keypad = ScriptedKeypad::with_presses(&[0x5, 0xA]);
        assert_eq!(keypad.wait_for_key().unwrap(), 0x5);
        assert_eq!(keypad.pending(), 1);
        assert_eq!(keypad.wait_for_key().unwrap(), 0xA);
        assert!(keypad.wait_for_key().is_err());
    }
}
