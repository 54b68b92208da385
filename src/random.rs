/// Source of the random bytes used by `Cxkk`
pub trait RandomSource {
    fn next_byte(&mut self) -> u8;
}

/// Random bytes from the thread-local generator
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_byte(&mut self) -> u8 {
        rand::random()
    }
}

/// Replays a fixed sequence of bytes, starting over when it runs out
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    bytes: Vec<u8>,
    next: usize,
}

impl SequenceRandom {
    /// An empty sequence always yields 0
    pub fn new(bytes: &[u8]) -> Self {
        SequenceRandom {
            bytes: bytes.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_byte(&mut self) -> u8 {
        if self.bytes.is_empty() {
            return 0;
        }
        let byte = self.bytes[self.next];
        self.next = (self.next + 1) % self.bytes.len();
        byte
    }
}
