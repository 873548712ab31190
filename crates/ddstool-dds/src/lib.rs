//! DDS (DirectDraw Surface) texture container codec.
//!
//! Parses and writes DDS headers (legacy pixel formats and the DX10
//! extension), resolves them to DXGI formats, derives mip and slice
//! geometry, and restructures payloads:
//! - [`Dds::disassemble`] splits arrays and volumes into single textures
//! - [`Dds::assemble`] stacks textures into arrays, volumes and cubemaps
//! - [`Dds::remove_mips`] keeps only the base level
//!
//! Compressed payloads are never touched except through an external
//! [`BlockCodec`].
//!
//! # Example
//!
//! ```no_run
//! use ddstool_dds::{AssembleMode, Dds};
//!
//! let faces = (0..6)
//!     .map(|i| Dds::open(format!("face{i}.dds")))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let cube = Dds::assemble(faces, AssembleMode::Cube)?;
//! cube.save_to_file("cube.dds")?;
//! # Ok::<(), ddstool_dds::Error>(())
//! ```

mod codec;
mod container;
mod error;
pub mod format;
pub mod header;
pub mod layout;
mod options;

#[cfg(test)]
mod test_prelude;

pub use codec::{BlockCodec, BlockSize, CodecFailure, CodecSession};
pub use container::{AssembleMode, Dds};
pub use error::{Error, ErrorKind, Result};
pub use format::{DxgiFormat, FormatDescriptor, FormatFlags};
pub use header::raw::FourCC;
pub use header::{Header, TextureType};
pub use layout::{MipLayout, MipLevel};
pub use options::ReadOptions;

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
