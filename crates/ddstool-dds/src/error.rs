//! Error types for DDS handling.

use thiserror::Error;

use crate::format::DxgiFormat;
use crate::header::raw::FourCC;

/// Errors that can occur when working with DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] ddstool_common::Error),

    /// Bad magic or structure size.
    #[error("not a DDS file: {field} at offset {offset} is {actual:#x}, expected {expected:#x}")]
    NotDds {
        field: &'static str,
        offset: usize,
        expected: u32,
        actual: u32,
    },

    /// Legacy FourCC of a format family with no DXGI equivalent.
    #[error("unsupported FourCC: {0}")]
    UnsupportedFourCc(FourCC),

    /// DXGI id outside the catalog.
    #[error("unsupported DXGI format id: {0}")]
    UnsupportedFormat(u32),

    /// Non-official (ASTC) format refused by the read options.
    #[error("non-official DXGI format {0} is not allowed here")]
    NonOfficialFormat(DxgiFormat),

    /// Format name not found in the catalog.
    #[error("unknown DXGI format name: {0:?}")]
    UnknownFormatName(String),

    /// DX10 resource dimension other than 2D or 3D.
    #[error("unsupported resource dimension {0} (only 2D and 3D textures are supported)")]
    UnsupportedDimension(u32),

    /// Assemble inputs disagree on format.
    #[error("format mismatch at input {index}: expected {expected}, got {actual}")]
    FormatMismatch {
        index: usize,
        expected: DxgiFormat,
        actual: DxgiFormat,
    },

    /// Assemble inputs disagree on dimensions.
    #[error(
        "size mismatch at input {index}: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    SizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Assemble inputs disagree on mip count.
    #[error("mip count mismatch at input {index}: expected {expected}, got {actual}")]
    MipCountMismatch {
        index: usize,
        expected: u32,
        actual: u32,
    },

    /// Assemble input has the wrong surface structure.
    #[error("cannot assemble input {index}: {reason}")]
    LayoutMismatch { index: usize, reason: &'static str },

    /// Cube assembly with a face count other than six.
    #[error("a cubemap needs 6 faces, got {0}")]
    CubeFaceCount(usize),

    /// Nothing to assemble.
    #[error("cannot assemble an empty list of textures")]
    EmptyAssembly,

    /// Disassemble on a texture that is neither an array nor a volume.
    #[error("texture has array size {array_size} and depth {depth}; nothing to disassemble")]
    NotLayered { array_size: u32, depth: u32 },

    /// Payload does not split evenly into slices.
    #[error("corrupt payload: {payload_len} bytes do not divide into {slice_count} slices")]
    CorruptPayload { payload_len: usize, slice_count: usize },

    /// Array size, depth and face count multiply past the address space.
    #[error("array size {array_size} x depth {depth} x {faces} faces overflows the slice count")]
    SliceCountOverflow { array_size: u32, depth: u32, faces: u32 },

    /// Slice byte lengths that differ. `index` is the slice, or the input
    /// when assembling.
    #[error("slice length mismatch at {index}: expected {expected} bytes, got {actual}")]
    SliceLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Slice list that does not match the header's slice count.
    #[error("header describes {expected} slices, got {actual}")]
    SliceCountMismatch { expected: usize, actual: usize },

    /// Slice shorter than the mip range being accessed.
    #[error("slice {slice} holds {actual} bytes, expected at least {expected}")]
    TruncatedSlice {
        slice: usize,
        expected: usize,
        actual: usize,
    },

    /// Slice or mip index past the end.
    #[error("{what} index {index} out of range (count: {count})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        count: usize,
    },

    /// Mip layout requested for a format without a fixed block layout.
    #[error("{0} has no fixed block layout")]
    NoFixedLayout(DxgiFormat),

    /// Transcoding request between formats the adapter path does not handle.
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: DxgiFormat, to: DxgiFormat },

    /// Failure reported by an external block codec.
    #[error("codec failure: {0}")]
    CodecFailure(String),
}

/// Taxonomy bucket of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotDds,
    UnsupportedFourCc,
    UnsupportedFormat,
    UnsupportedDimension,
    FormatMismatch,
    SizeMismatch,
    CorruptPayload,
    CodecFailure,
    Io,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotDds { .. } => ErrorKind::NotDds,
            Self::UnsupportedFourCc(_) => ErrorKind::UnsupportedFourCc,
            Self::UnsupportedFormat(_)
            | Self::NonOfficialFormat(_)
            | Self::UnknownFormatName(_)
            | Self::NoFixedLayout(_)
            | Self::UnsupportedConversion { .. } => ErrorKind::UnsupportedFormat,
            Self::UnsupportedDimension(_) => ErrorKind::UnsupportedDimension,
            Self::FormatMismatch { .. } => ErrorKind::FormatMismatch,
            Self::SizeMismatch { .. }
            | Self::MipCountMismatch { .. }
            | Self::SliceLengthMismatch { .. } => ErrorKind::SizeMismatch,
            Self::CorruptPayload { .. }
            | Self::SliceCountOverflow { .. }
            | Self::SliceCountMismatch { .. }
            | Self::TruncatedSlice { .. } => ErrorKind::CorruptPayload,
            Self::CodecFailure(_) => ErrorKind::CodecFailure,
            Self::Io(_) | Self::Common(_) => ErrorKind::Io,
            Self::LayoutMismatch { .. }
            | Self::CubeFaceCount(_)
            | Self::EmptyAssembly
            | Self::NotLayered { .. }
            | Self::OutOfRange { .. } => ErrorKind::Other,
        }
    }

    /// Whether the error condemns a single input file, so a batch over
    /// many files can move on to the next one.
    pub fn is_file_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotDds
                | ErrorKind::UnsupportedFourCc
                | ErrorKind::UnsupportedFormat
                | ErrorKind::UnsupportedDimension
                | ErrorKind::CorruptPayload
                | ErrorKind::Io
        )
    }
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_can_skip_per_file_errors() {
        assert!(Error::UnsupportedFormat(200).is_file_fatal());
        assert!(Error::UnsupportedDimension(2).is_file_fatal());
        assert!(Error::CorruptPayload { payload_len: 3, slice_count: 2 }.is_file_fatal());

        let mismatch = Error::SizeMismatch {
            index: 1,
            expected: (4, 4),
            actual: (8, 4),
        };
        assert_eq!(mismatch.kind(), ErrorKind::SizeMismatch);
        assert!(!mismatch.is_file_fatal());
        assert_eq!(
            mismatch.to_string(),
            "size mismatch at input 1: expected 4x4, got 8x4"
        );
        assert!(!Error::CodecFailure("boom".into()).is_file_fatal());
    }
}
