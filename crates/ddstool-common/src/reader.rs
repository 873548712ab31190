//! Cursor over a borrowed byte slice.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A bounds-checked little-endian reader over a byte slice.
///
/// Reads never copy more than the value being decoded; `read_bytes` hands
/// back sub-slices of the original buffer.
///
/// # Example
///
/// ```
/// use ddstool_common::BinaryReader;
///
/// let data = *b"DDS \x7c\x00\x00\x00";
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_array::<4>().unwrap(), *b"DDS ");
/// assert_eq!(reader.read_u32().unwrap(), 124);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset from the start of the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Everything after the cursor.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Read `count` bytes and advance.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array::<4>().map(u32::from_le_bytes)
    }

    /// Read a plain-old-data struct laid out exactly as on disk.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let offset = self.position;
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            offset,
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_little_endian() {
        let data = [0x44, 0x44, 0x53, 0x20, 0x7c, 0x00, 0x00, 0x00];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x2053_4444);
        assert_eq!(reader.read_u32().unwrap(), 124);
        assert_eq!(reader.position(), 8);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_remaining_bytes_after_partial_read() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut reader = BinaryReader::new(&data);

        reader.read_bytes(4).unwrap();
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.remaining_bytes(), &[5, 6]);
    }

    #[test]
    fn test_eof_reports_offset() {
        let data = [0u8; 6];
        let mut reader = BinaryReader::new(&data);
        reader.read_u32().unwrap();

        match reader.read_u32() {
            Err(Error::UnexpectedEof {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 4);
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected EOF, got {other:?}"),
        }
        // A failed read does not move the cursor.
        assert_eq!(reader.position(), 4);
    }
}
