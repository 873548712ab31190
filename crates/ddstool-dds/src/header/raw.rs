//! On-disk DDS header structures.
//!
//! Layouts follow <https://learn.microsoft.com/en-us/windows/win32/direct3ddds/dds-header>.
//! All fields are little-endian and packed.

use std::fmt;

use bitflags::bitflags;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// DDS file header, minus the leading magic.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawHeader {
    /// Header size (should be 124).
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    /// Row pitch for uncompressed formats, top-level byte size for compressed ones.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    pub mipmap_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: RawPixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

impl RawHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    pub flags: u32,
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red, green, blue and alpha masks in that order.
    pub bit_masks: [u32; 4],
}

impl RawPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    /// The pixel format every DX10 header carries.
    pub const fn dx10() -> Self {
        Self {
            size: Self::SIZE,
            flags: PixelFormatFlags::FOURCC.bits(),
            four_cc: FourCC::DX10,
            rgb_bit_count: 0,
            bit_masks: [0; 4],
        }
    }

    #[inline]
    pub fn flags(&self) -> PixelFormatFlags {
        PixelFormatFlags::from_bits_retain(self.flags)
    }

    #[inline]
    pub fn is_dx10(&self) -> bool {
        self.four_cc == FourCC::DX10
    }
}

/// DX10 extended header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawDxt10Header {
    pub dxgi_format: u32,
    /// 2 = 1D, 3 = 2D, 4 = 3D.
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    /// Alpha mode in the low three bits.
    pub misc_flags2: u32,
}

/// Four-character code for compression type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const NONE: Self = Self([0; 4]);
    pub const DXT1: Self = Self(*b"DXT1");
    pub const DXT2: Self = Self(*b"DXT2");
    pub const DXT3: Self = Self(*b"DXT3");
    pub const DXT4: Self = Self(*b"DXT4");
    pub const DXT5: Self = Self(*b"DXT5");
    /// DX10 extended header follows.
    pub const DX10: Self = Self(*b"DX10");
    pub const ATI1: Self = Self(*b"ATI1");
    pub const ATI2: Self = Self(*b"ATI2");
    pub const BC4U: Self = Self(*b"BC4U");
    pub const BC4S: Self = Self(*b"BC4S");
    pub const BC5U: Self = Self(*b"BC5U");
    pub const BC5S: Self = Self(*b"BC5S");

    /// A FourCC stored as a small D3DFORMAT number rather than characters.
    pub const fn numeric(value: u32) -> Self {
        Self(value.to_le_bytes())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({self})")
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ' || *b == 0) {
            let end = self.0.iter().position(|&b| b == 0).unwrap_or(4);
            f.write_str(&String::from_utf8_lossy(&self.0[..end]))
        } else {
            write!(f, "{:#010x}", u32::from_le_bytes(self.0))
        }
    }
}

bitflags! {
    /// `dwFlags` of the DDS header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFlags: u32 {
        const CAPS = 0x1;
        const HEIGHT = 0x2;
        const WIDTH = 0x4;
        /// `pitch_or_linear_size` holds a row pitch.
        const PITCH = 0x8;
        const PIXELFORMAT = 0x1000;
        const MIPMAPCOUNT = 0x20000;
        /// `pitch_or_linear_size` holds the byte size of the top mip.
        const LINEARSIZE = 0x80000;
        const DEPTH = 0x800000;
        const REQUIRED = Self::CAPS.bits()
            | Self::HEIGHT.bits()
            | Self::WIDTH.bits()
            | Self::PIXELFORMAT.bits()
            | Self::MIPMAPCOUNT.bits();
    }

    /// `dwCaps` of the DDS header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Caps: u32 {
        /// More than one surface (mipmaps or cube faces).
        const COMPLEX = 0x8;
        const TEXTURE = 0x1000;
        const MIPMAP = 0x400000;
    }

    /// `dwCaps2` of the DDS header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Caps2: u32 {
        const CUBEMAP = 0x200;
        const CUBEMAP_POSITIVEX = 0x400;
        const CUBEMAP_NEGATIVEX = 0x800;
        const CUBEMAP_POSITIVEY = 0x1000;
        const CUBEMAP_NEGATIVEY = 0x2000;
        const CUBEMAP_POSITIVEZ = 0x4000;
        const CUBEMAP_NEGATIVEZ = 0x8000;
        const CUBEMAP_ALL_FACES = Self::CUBEMAP_POSITIVEX.bits()
            | Self::CUBEMAP_NEGATIVEX.bits()
            | Self::CUBEMAP_POSITIVEY.bits()
            | Self::CUBEMAP_NEGATIVEY.bits()
            | Self::CUBEMAP_POSITIVEZ.bits()
            | Self::CUBEMAP_NEGATIVEZ.bits();
        const VOLUME = 0x200000;
    }

    /// `dwFlags` of the legacy pixel format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PixelFormatFlags: u32 {
        const ALPHAPIXELS = 0x1;
        const ALPHA = 0x2;
        const FOURCC = 0x4;
        const RGB = 0x40;
        const YUV = 0x200;
        const LUMINANCE = 0x20000;
        /// Signed data; the resolved format is switched to its SNORM/SINT twin.
        const BUMPDUDV = 0x80000;
    }
}

/// `miscFlag` bit marking a DX10 texture as a cubemap.
pub const DX10_MISC_TEXTURECUBE: u32 = 0x4;

/// DX10 `resourceDimension` values.
pub mod dimension {
    pub const TEXTURE1D: u32 = 2;
    pub const TEXTURE2D: u32 = 3;
    pub const TEXTURE3D: u32 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sizes_match_disk_layout() {
        assert_eq!(std::mem::size_of::<RawHeader>(), 124);
        assert_eq!(std::mem::size_of::<RawPixelFormat>(), 32);
        assert_eq!(std::mem::size_of::<RawDxt10Header>(), 20);
    }

    #[test]
    fn test_fourcc_display() {
        assert_eq!(FourCC::DXT1.to_string(), "DXT1");
        assert_eq!(FourCC(*b"ETC\0").to_string(), "ETC");
        assert_eq!(FourCC::numeric(113).to_string(), "q");
        assert_eq!(FourCC([0xff, 0, 0, 1]).to_string(), "0x010000ff");
    }

    #[test]
    fn test_cube_face_mask() {
        assert_eq!(Caps2::CUBEMAP_ALL_FACES.bits() | Caps2::CUBEMAP.bits(), 0xFE00);
    }
}
