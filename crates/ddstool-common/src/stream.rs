//! Fixed-layout struct I/O over `std::io` streams.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// Extends `Read` with helpers for on-disk structures.
pub trait ReadExt: Read {
    /// Read a structure whose in-memory layout matches the stream.
    fn read_struct<T: FromBytes>(&mut self) -> io::Result<T> {
        let mut bytes = vec![0u8; std::mem::size_of::<T>()];
        self.read_exact(&mut bytes)?;
        T::read_from_bytes(&bytes).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "struct size does not match buffer")
        })
    }

    /// Read a little-endian u32.
    fn read_u32_le(&mut self) -> io::Result<u32> {
        self.read_u32::<LittleEndian>()
    }
}

impl<R: Read + ?Sized> ReadExt for R {}

/// Extends `Write` with helpers for on-disk structures.
pub trait WriteExt: Write {
    /// Write a structure byte-for-byte.
    fn write_struct<T: IntoBytes + Immutable>(&mut self, value: &T) -> io::Result<()> {
        self.write_all(value.as_bytes())
    }

    /// Write a little-endian u32.
    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_u32::<LittleEndian>(value)
    }
}

impl<W: Write + ?Sized> WriteExt for W {}
