//! Surface and mip geometry.
//!
//! A payload is a sequence of equally sized slices. Each slice holds one
//! mip chain, largest level first, and the slices are ordered
//! array element, then depth, then cube face.

use std::iter::FusedIterator;

use crate::format::FormatDescriptor;
use crate::header::Header;
use crate::{Error, Result};

/// One level of a mip chain, positioned within its slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    pub level: u32,
    pub width: u32,
    pub height: u32,
    /// Byte offset from the start of the slice.
    pub offset: usize,
    pub size: usize,
}

/// Iterator over the levels of a mip chain.
#[derive(Debug, Clone)]
pub struct MipLayout {
    descriptor: FormatDescriptor,
    width: u32,
    height: u32,
    level: u32,
    count: u32,
    offset: usize,
}

impl MipLayout {
    pub fn new(descriptor: FormatDescriptor, width: u32, height: u32, count: u32) -> Self {
        Self {
            descriptor,
            width,
            height,
            level: 0,
            count,
            offset: 0,
        }
    }

    /// Total byte size of the remaining levels.
    pub fn total_size(&self) -> usize {
        self.clone().map(|mip| mip.size).sum()
    }
}

impl Iterator for MipLayout {
    type Item = MipLevel;

    fn next(&mut self) -> Option<MipLevel> {
        if self.level >= self.count {
            return None;
        }

        let size = usize::try_from(self.descriptor.surface_size(self.width, self.height))
            .unwrap_or(usize::MAX);
        let mip = MipLevel {
            level: self.level,
            width: self.width,
            height: self.height,
            offset: self.offset,
            size,
        };

        self.level += 1;
        self.offset = self.offset.saturating_add(size);
        self.width = (self.width / 2).max(1);
        self.height = (self.height / 2).max(1);
        Some(mip)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.level) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MipLayout {}

impl FusedIterator for MipLayout {}

/// Mip chain of one slice of `header`.
pub fn mip_layout(header: &Header) -> Result<MipLayout> {
    let descriptor = header.descriptor();
    if !descriptor.has_fixed_layout() {
        return Err(Error::NoFixedLayout(header.format()));
    }
    Ok(MipLayout::new(
        descriptor,
        header.width(),
        header.height(),
        header.mip_count(),
    ))
}

/// Number of slices stored in the payload.
pub fn slice_count(header: &Header) -> Result<usize> {
    let faces: u32 = if header.is_cube() { 6 } else { 1 };
    (header.array_size() as usize)
        .checked_mul(header.depth() as usize)
        .and_then(|count| count.checked_mul(faces as usize))
        .ok_or(Error::SliceCountOverflow {
            array_size: header.array_size(),
            depth: header.depth(),
            faces,
        })
}

/// Byte size of one full mip chain.
pub fn slice_size(header: &Header) -> Result<usize> {
    Ok(mip_layout(header)?.total_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DxgiFormat;

    #[test]
    fn test_bc1_chain() {
        let header = Header::new(DxgiFormat::BC1_UNORM, 64, 64).with_mip_count(7);
        let mips: Vec<_> = mip_layout(&header).unwrap().collect();

        assert_eq!(mips.len(), 7);
        assert_eq!(mips[0].size, 2048);
        assert_eq!(mips[1].offset, 2048);
        assert_eq!((mips[6].width, mips[6].height), (1, 1));
        // Levels below one block still take a full block.
        assert_eq!(mips[5].size, 8);
        assert_eq!(mips[6].size, 8);
        assert_eq!(slice_size(&header).unwrap(), 2048 + 512 + 128 + 32 + 8 + 8 + 8);
    }

    #[test]
    fn test_non_square_clamps_to_one() {
        let header = Header::new(DxgiFormat::R8G8B8A8_UNORM, 8, 2).with_mip_count(4);
        let dims: Vec<_> = mip_layout(&header)
            .unwrap()
            .map(|mip| (mip.width, mip.height, mip.size))
            .collect();
        assert_eq!(dims, [(8, 2, 64), (4, 1, 16), (2, 1, 8), (1, 1, 4)]);
    }

    #[test]
    fn test_odd_dimensions_floor() {
        let header = Header::new(DxgiFormat::R8_UNORM, 5, 3).with_mip_count(3);
        let sizes: Vec<_> = mip_layout(&header).unwrap().map(|mip| mip.size).collect();
        assert_eq!(sizes, [15, 2, 1]);
    }

    #[test]
    fn test_exact_size() {
        let header = Header::new(DxgiFormat::BC7_UNORM, 16, 16).with_mip_count(5);
        let mut layout = mip_layout(&header).unwrap();
        assert_eq!(layout.len(), 5);
        layout.next();
        assert_eq!(layout.len(), 4);
    }

    #[test]
    fn test_slice_count() {
        let plain = Header::new(DxgiFormat::BC1_UNORM, 4, 4);
        assert_eq!(slice_count(&plain).unwrap(), 1);

        let cube_array = Header::new(DxgiFormat::BC1_UNORM, 4, 4)
            .with_cube(true)
            .with_array_size(2);
        assert_eq!(slice_count(&cube_array).unwrap(), 12);

        let volume = Header::new(DxgiFormat::BC1_UNORM, 4, 4).with_depth(8);
        assert_eq!(slice_count(&volume).unwrap(), 8);
    }

    #[test]
    fn test_slice_count_overflow_is_an_error() {
        let huge = Header::new(DxgiFormat::BC1_UNORM, 4, 4)
            .with_cube(true)
            .with_array_size(u32::MAX)
            .with_depth(u32::MAX);
        let err = slice_count(&huge).unwrap_err();
        assert!(matches!(
            err,
            Error::SliceCountOverflow {
                array_size: u32::MAX,
                depth: u32::MAX,
                faces: 6
            }
        ));
        assert_eq!(err.kind(), crate::ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_planar_has_no_layout() {
        let header = Header::new(DxgiFormat::NV12, 16, 16);
        assert!(matches!(mip_layout(&header), Err(Error::NoFixedLayout(DxgiFormat::NV12))));

        let header = Header::new(DxgiFormat::UNKNOWN, 16, 16);
        assert!(matches!(mip_layout(&header), Err(Error::NoFixedLayout(_))));
    }
}
