//! ddstool - DDS texture container library.
//!
//! This crate re-exports the ddstool library crates behind one name.
//!
//! # Crates
//!
//! - [`ddstool_common`] - Binary reading and struct stream helpers
//! - [`ddstool_dds`] - DDS headers, DXGI formats, mip layout and slice restructuring
//!
//! # Example
//!
//! ```no_run
//! use ddstool::prelude::*;
//!
//! let dds = Dds::open("skybox.dds")?;
//! println!("{} {}", dds.header().format(), dds.header().texture_type());
//!
//! for (i, face) in dds.disassemble()?.into_iter().enumerate() {
//!     face.save_to_file(format!("skybox_{i}.dds"))?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use ddstool_common as common;
pub use ddstool_dds as dds;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use ddstool_common::BinaryReader;
    pub use ddstool_dds::{
        AssembleMode, BlockCodec, CodecSession, Dds, DxgiFormat, FormatDescriptor, Header,
        ReadOptions, TextureType,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
