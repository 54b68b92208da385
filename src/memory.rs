use std::io::Read;

use log::debug;

use crate::error::{Error, Result};

/// # Memory
/// A flat, byte addressable store whose size is fixed when it is created.
///
/// Every access is bounds checked; nothing wraps around the end of memory and
/// nothing is silently truncated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[u8]>,
}

impl Memory {
    /// Creates zeroed memory of `size` bytes
    pub fn new(size: usize) -> Self {
        Memory {
            cells: vec![0; size].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads the byte at `address`
    pub fn read(&self, address: usize) -> Result<u8> {
        Ok(self.slice(address, 1)?[0])
    }

    /// Writes `value` to `address`
    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        self.slice_mut(address, 1)?[0] = value;
        Ok(())
    }

    /// Reads the big-endian word at `address..address + 2`
    pub fn word(&self, address: usize) -> Result<u16> {
        let bytes = self.slice(address, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    /// Borrows `len` bytes starting at `address`
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let range = self.range(address, len)?;
        Ok(&self.cells[range])
    }

    /// Mutably borrows `len` bytes starting at `address`
    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        let range = self.range(address, len)?;
        Ok(&mut self.cells[range])
    }

    /// Copies `bytes` into memory starting at `address`
    pub fn write_all(&mut self, address: usize, bytes: &[u8]) -> Result<()> {
        self.slice_mut(address, bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Load the entire contents of `source` into memory at `offset`
    ///
    /// The source is drained before anything is written, so an image that
    /// doesn't fit leaves memory untouched.
    ///
    /// # Arguments
    /// * `source` anything that yields the raw bytes of an image (a ROM file, a slice)
    /// * `offset` the address of the first byte
    pub fn load(&mut self, source: &mut dyn Read, offset: usize) -> Result<usize> {
        let mut image = Vec::new();
        source.read_to_end(&mut image)?;
        self.write_all(offset, &image)?;
        debug!("loaded {} bytes at {:#05X}", image.len(), offset);
        Ok(image.len())
    }

    fn range(&self, address: usize, len: usize) -> Result<std::ops::Range<usize>> {
        match address.checked_add(len) {
            Some(end) if end <= self.cells.len() => Ok(address..end),
            _ => Err(Error::OutOfBounds {
                address,
                len,
                size: self.cells.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let memory = Memory::new(0x100);
        assert_eq!(memory.len(), 0x100);
        assert_eq!(memory.slice(0, 0x100).unwrap(), &[0; 0x100][..]);
    }

    #[test]
    fn test_read_word() {
        let mut memory = Memory::new(8);
        memory.write_all(0, &[0, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(memory.word(0x4).unwrap(), 0x0405);
    }

    #[test]
    fn test_word_at_last_byte_is_out_of_bounds() {
        let memory = Memory::new(8);
        assert!(matches!(
            memory.word(7),
            Err(Error::OutOfBounds {
                address: 7,
                len: 2,
                size: 8
            })
        ));
    }

    #[test]
    fn test_write_past_end_is_out_of_bounds() {
        let mut memory = Memory::new(8);
        assert!(memory.write(7, 0xAA).is_ok());
        assert!(matches!(memory.write(8, 0xAA), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_huge_address_does_not_wrap() {
        let memory = Memory::new(8);
        assert!(matches!(
            memory.slice(usize::MAX, 2),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_load_fits_exactly() {
        let mut memory = Memory::new(0x205);
        let mut source: &[u8] = &[0x30, 0x31, 0x32, 0x33, 0x34];
        assert_eq!(memory.load(&mut source, 0x200).unwrap(), 5);
        assert_eq!(
            memory.slice(0x200, 5).unwrap(),
            &[0x30, 0x31, 0x32, 0x33, 0x34]
        );
        assert_eq!(memory.slice(0, 0x200).unwrap(), &[0; 0x200][..]);
    }

    #[test]
    fn test_load_overrun_leaves_memory_untouched() {
        let mut memory = Memory::new(0x205);
        let mut source: &[u8] = &[0x30, 0x31, 0x32, 0x33, 0x34];
        let before = memory.clone();
        assert!(matches!(
            memory.load(&mut source, 0x201),
            Err(Error::OutOfBounds {
                address: 0x201,
                len: 5,
                size: 0x205
            })
        ));
        assert_eq!(memory, before);
    }

    #[test]
    fn test_load_empty_source() {
        let mut memory = Memory::new(0x10);
        let mut source: &[u8] = &[];
        assert_eq!(memory.load(&mut source, 0x10).unwrap(), 0);
    }
}
