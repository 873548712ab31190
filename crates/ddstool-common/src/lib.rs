//! Common utilities for ddstool.
//!
//! - [`BinaryReader`] - bounds-checked little-endian reading from byte slices
//! - [`ReadExt`] / [`WriteExt`] - fixed-layout struct I/O over `std::io` streams

mod error;
mod reader;
mod stream;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use stream::{ReadExt, WriteExt};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
