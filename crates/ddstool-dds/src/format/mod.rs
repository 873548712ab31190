//! DXGI format catalog.
//!
//! Every supported format is described once, in the table below, with its
//! block geometry and capability flags. Everything else in the crate asks
//! the catalog instead of inspecting format names.
//!
//! Reference: <https://learn.microsoft.com/en-us/windows/win32/api/dxgiformat/ne-dxgiformat-dxgi_format>

mod legacy;

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::Error;

pub use legacy::{resolve_legacy, BITMASK_TO_DXGI, FOURCC_TO_DXGI, UNCANONICAL_FOURCC};

bitflags! {
    /// Capability flags attached to a [`FormatDescriptor`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatFlags: u32 {
        /// Block-compressed (BCn or ASTC).
        const COMPRESSED = 1 << 0;
        /// Floating point or BC6H payload.
        const HDR = 1 << 1;
        /// SNORM or signed half-float payload.
        const SIGNED = 1 << 2;
        /// sRGB color space.
        const SRGB = 1 << 3;
        /// UINT or SINT channels.
        const INT = 1 << 4;
        const TYPELESS = 1 << 5;
        /// Non-official ASTC extension ids.
        const ASTC = 1 << 6;
        /// Video formats stored as separate planes; no fixed mip layout.
        const PLANAR = 1 << 7;
        /// Can be decoded to an 8-bit LDR intermediate.
        const TO_TGA = 1 << 8;
        /// Can be decoded to a floating point HDR intermediate.
        const TO_HDR = 1 << 9;
    }
}

/// Static description of one DXGI format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    pub format: DxgiFormat,
    pub name: &'static str,
    /// Bytes per block (per pixel for 1x1 formats). Zero for `UNKNOWN`.
    pub bytes_per_block: u32,
    pub block_width: u32,
    pub block_height: u32,
    pub flags: FormatFlags,
}

impl FormatDescriptor {
    /// Numeric DXGI id.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.format as u32
    }

    #[inline]
    pub const fn is_compressed(&self) -> bool {
        self.flags.contains(FormatFlags::COMPRESSED)
    }

    #[inline]
    pub const fn is_hdr(&self) -> bool {
        self.flags.contains(FormatFlags::HDR)
    }

    #[inline]
    pub const fn is_signed(&self) -> bool {
        self.flags.contains(FormatFlags::SIGNED)
    }

    #[inline]
    pub const fn is_srgb(&self) -> bool {
        self.flags.contains(FormatFlags::SRGB)
    }

    #[inline]
    pub const fn is_int(&self) -> bool {
        self.flags.contains(FormatFlags::INT)
    }

    #[inline]
    pub const fn is_typeless(&self) -> bool {
        self.flags.contains(FormatFlags::TYPELESS)
    }

    #[inline]
    pub const fn is_astc(&self) -> bool {
        self.flags.contains(FormatFlags::ASTC)
    }

    /// Whether the id is part of the published DXGI enumeration.
    #[inline]
    pub const fn is_official(&self) -> bool {
        !self.is_astc()
    }

    #[inline]
    pub const fn is_planar(&self) -> bool {
        self.flags.contains(FormatFlags::PLANAR)
    }

    #[inline]
    pub const fn convertible_to_tga(&self) -> bool {
        self.flags.contains(FormatFlags::TO_TGA)
    }

    #[inline]
    pub const fn convertible_to_hdr(&self) -> bool {
        self.flags.contains(FormatFlags::TO_HDR)
    }

    /// Whether mip sizes can be derived from the block grid alone.
    #[inline]
    pub const fn has_fixed_layout(&self) -> bool {
        self.bytes_per_block > 0 && !self.is_planar()
    }

    /// Number of blocks covering `width` x `height` pixels.
    pub fn block_count(&self, width: u32, height: u32) -> (u64, u64) {
        (
            u64::from(width.div_ceil(self.block_width)),
            u64::from(height.div_ceil(self.block_height)),
        )
    }

    /// Bytes of one row of blocks.
    pub fn row_pitch(&self, width: u32) -> u64 {
        self.block_count(width, 1).0 * u64::from(self.bytes_per_block)
    }

    /// Bytes of a full `width` x `height` surface.
    pub fn surface_size(&self, width: u32, height: u32) -> u64 {
        let (blocks_x, blocks_y) = self.block_count(width, height);
        blocks_x * blocks_y * u64::from(self.bytes_per_block)
    }
}

macro_rules! dxgi_formats {
    ($(
        $name:ident = $id:literal => ($bytes:literal, $bw:literal, $bh:literal) [$($flag:ident),*]
    ),* $(,)?) => {
        /// DXGI format ids, including the non-official ASTC range.
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum DxgiFormat {
            $($name = $id,)*
        }

        impl DxgiFormat {
            /// Every catalogued format, in id order.
            pub const ALL: &'static [DxgiFormat] = &[$(DxgiFormat::$name,)*];

            /// Look up a format by numeric id.
            pub const fn from_u32(id: u32) -> Option<Self> {
                match id {
                    $($id => Some(Self::$name),)*
                    _ => None,
                }
            }

            /// The canonical name without the `DXGI_FORMAT_` prefix.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }

            pub const fn descriptor(self) -> FormatDescriptor {
                match self {
                    $(Self::$name => FormatDescriptor {
                        format: Self::$name,
                        name: stringify!($name),
                        bytes_per_block: $bytes,
                        block_width: $bw,
                        block_height: $bh,
                        flags: FormatFlags::empty()$(.union(FormatFlags::$flag))*,
                    },)*
                }
            }
        }
    };
}

dxgi_formats! {
    UNKNOWN = 0 => (0, 1, 1) [],
    R32G32B32A32_TYPELESS = 1 => (16, 1, 1) [TYPELESS],
    R32G32B32A32_FLOAT = 2 => (16, 1, 1) [HDR, TO_HDR],
    R32G32B32A32_UINT = 3 => (16, 1, 1) [INT],
    R32G32B32A32_SINT = 4 => (16, 1, 1) [INT],
    R32G32B32_TYPELESS = 5 => (12, 1, 1) [TYPELESS],
    R32G32B32_FLOAT = 6 => (12, 1, 1) [HDR, TO_HDR],
    R32G32B32_UINT = 7 => (12, 1, 1) [INT],
    R32G32B32_SINT = 8 => (12, 1, 1) [INT],
    R16G16B16A16_TYPELESS = 9 => (8, 1, 1) [TYPELESS],
    R16G16B16A16_FLOAT = 10 => (8, 1, 1) [HDR, TO_HDR],
    R16G16B16A16_UNORM = 11 => (8, 1, 1) [],
    R16G16B16A16_UINT = 12 => (8, 1, 1) [INT],
    R16G16B16A16_SNORM = 13 => (8, 1, 1) [SIGNED],
    R16G16B16A16_SINT = 14 => (8, 1, 1) [INT],
    R32G32_TYPELESS = 15 => (8, 1, 1) [TYPELESS],
    R32G32_FLOAT = 16 => (8, 1, 1) [HDR],
    R32G32_UINT = 17 => (8, 1, 1) [INT],
    R32G32_SINT = 18 => (8, 1, 1) [INT],
    R32G8X24_TYPELESS = 19 => (8, 1, 1) [TYPELESS],
    D32_FLOAT_S8X24_UINT = 20 => (8, 1, 1) [HDR, INT],
    R32_FLOAT_X8X24_TYPELESS = 21 => (8, 1, 1) [HDR, TYPELESS],
    X32_TYPELESS_G8X24_UINT = 22 => (8, 1, 1) [TYPELESS, INT],
    R10G10B10A2_TYPELESS = 23 => (4, 1, 1) [TYPELESS],
    R10G10B10A2_UNORM = 24 => (4, 1, 1) [],
    R10G10B10A2_UINT = 25 => (4, 1, 1) [INT],
    R11G11B10_FLOAT = 26 => (4, 1, 1) [HDR],
    R8G8B8A8_TYPELESS = 27 => (4, 1, 1) [TYPELESS],
    R8G8B8A8_UNORM = 28 => (4, 1, 1) [TO_TGA],
    R8G8B8A8_UNORM_SRGB = 29 => (4, 1, 1) [SRGB, TO_TGA],
    R8G8B8A8_UINT = 30 => (4, 1, 1) [INT],
    R8G8B8A8_SNORM = 31 => (4, 1, 1) [SIGNED],
    R8G8B8A8_SINT = 32 => (4, 1, 1) [INT],
    R16G16_TYPELESS = 33 => (4, 1, 1) [TYPELESS],
    R16G16_FLOAT = 34 => (4, 1, 1) [HDR],
    R16G16_UNORM = 35 => (4, 1, 1) [],
    R16G16_UINT = 36 => (4, 1, 1) [INT],
    R16G16_SNORM = 37 => (4, 1, 1) [SIGNED],
    R16G16_SINT = 38 => (4, 1, 1) [INT],
    R32_TYPELESS = 39 => (4, 1, 1) [TYPELESS],
    D32_FLOAT = 40 => (4, 1, 1) [HDR],
    R32_FLOAT = 41 => (4, 1, 1) [HDR],
    R32_UINT = 42 => (4, 1, 1) [INT],
    R32_SINT = 43 => (4, 1, 1) [INT],
    R24G8_TYPELESS = 44 => (4, 1, 1) [TYPELESS],
    D24_UNORM_S8_UINT = 45 => (4, 1, 1) [INT],
    R24_UNORM_X8_TYPELESS = 46 => (4, 1, 1) [TYPELESS],
    X24_TYPELESS_G8_UINT = 47 => (4, 1, 1) [TYPELESS, INT],
    R8G8_TYPELESS = 48 => (2, 1, 1) [TYPELESS],
    R8G8_UNORM = 49 => (2, 1, 1) [],
    R8G8_UINT = 50 => (2, 1, 1) [INT],
    R8G8_SNORM = 51 => (2, 1, 1) [SIGNED],
    R8G8_SINT = 52 => (2, 1, 1) [INT],
    R16_TYPELESS = 53 => (2, 1, 1) [TYPELESS],
    R16_FLOAT = 54 => (2, 1, 1) [HDR],
    D16_UNORM = 55 => (2, 1, 1) [],
    R16_UNORM = 56 => (2, 1, 1) [],
    R16_UINT = 57 => (2, 1, 1) [INT],
    R16_SNORM = 58 => (2, 1, 1) [SIGNED],
    R16_SINT = 59 => (2, 1, 1) [INT],
    R8_TYPELESS = 60 => (1, 1, 1) [TYPELESS],
    R8_UNORM = 61 => (1, 1, 1) [TO_TGA],
    R8_UINT = 62 => (1, 1, 1) [INT],
    R8_SNORM = 63 => (1, 1, 1) [SIGNED],
    R8_SINT = 64 => (1, 1, 1) [INT],
    A8_UNORM = 65 => (1, 1, 1) [TO_TGA],
    R1_UNORM = 66 => (1, 8, 1) [],
    R9G9B9E5_SHAREDEXP = 67 => (4, 1, 1) [],
    R8G8_B8G8_UNORM = 68 => (4, 2, 1) [],
    G8R8_G8B8_UNORM = 69 => (4, 2, 1) [],
    BC1_TYPELESS = 70 => (8, 4, 4) [COMPRESSED, TYPELESS, TO_TGA],
    BC1_UNORM = 71 => (8, 4, 4) [COMPRESSED, TO_TGA],
    BC1_UNORM_SRGB = 72 => (8, 4, 4) [COMPRESSED, SRGB, TO_TGA],
    BC2_TYPELESS = 73 => (16, 4, 4) [COMPRESSED, TYPELESS, TO_TGA],
    BC2_UNORM = 74 => (16, 4, 4) [COMPRESSED, TO_TGA],
    BC2_UNORM_SRGB = 75 => (16, 4, 4) [COMPRESSED, SRGB, TO_TGA],
    BC3_TYPELESS = 76 => (16, 4, 4) [COMPRESSED, TYPELESS, TO_TGA],
    BC3_UNORM = 77 => (16, 4, 4) [COMPRESSED, TO_TGA],
    BC3_UNORM_SRGB = 78 => (16, 4, 4) [COMPRESSED, SRGB, TO_TGA],
    BC4_TYPELESS = 79 => (8, 4, 4) [COMPRESSED, TYPELESS, TO_TGA],
    BC4_UNORM = 80 => (8, 4, 4) [COMPRESSED, TO_TGA],
    BC4_SNORM = 81 => (8, 4, 4) [COMPRESSED, SIGNED, TO_TGA],
    BC5_TYPELESS = 82 => (16, 4, 4) [COMPRESSED, TYPELESS],
    BC5_UNORM = 83 => (16, 4, 4) [COMPRESSED],
    BC5_SNORM = 84 => (16, 4, 4) [COMPRESSED, SIGNED],
    B5G6R5_UNORM = 85 => (2, 1, 1) [],
    B5G5R5A1_UNORM = 86 => (2, 1, 1) [TO_TGA],
    B8G8R8A8_UNORM = 87 => (4, 1, 1) [TO_TGA],
    B8G8R8X8_UNORM = 88 => (4, 1, 1) [TO_TGA],
    R10G10B10_XR_BIAS_A2_UNORM = 89 => (4, 1, 1) [],
    B8G8R8A8_TYPELESS = 90 => (4, 1, 1) [TYPELESS],
    B8G8R8A8_UNORM_SRGB = 91 => (4, 1, 1) [SRGB, TO_TGA],
    B8G8R8X8_TYPELESS = 92 => (4, 1, 1) [TYPELESS],
    B8G8R8X8_UNORM_SRGB = 93 => (4, 1, 1) [SRGB, TO_TGA],
    BC6H_TYPELESS = 94 => (16, 4, 4) [COMPRESSED, HDR, TYPELESS, TO_HDR],
    BC6H_UF16 = 95 => (16, 4, 4) [COMPRESSED, HDR, TO_HDR],
    BC6H_SF16 = 96 => (16, 4, 4) [COMPRESSED, HDR, SIGNED, TO_HDR],
    BC7_TYPELESS = 97 => (16, 4, 4) [COMPRESSED, TYPELESS, TO_TGA],
    BC7_UNORM = 98 => (16, 4, 4) [COMPRESSED, TO_TGA],
    BC7_UNORM_SRGB = 99 => (16, 4, 4) [COMPRESSED, SRGB, TO_TGA],
    AYUV = 100 => (4, 1, 1) [],
    Y410 = 101 => (4, 1, 1) [],
    Y416 = 102 => (8, 1, 1) [],
    NV12 = 103 => (2, 2, 1) [PLANAR],
    P010 = 104 => (4, 2, 1) [PLANAR],
    P016 = 105 => (4, 2, 1) [PLANAR],
    OPAQUE_420 = 106 => (2, 2, 1) [PLANAR],
    YUY2 = 107 => (4, 2, 1) [],
    Y210 = 108 => (8, 2, 1) [],
    Y216 = 109 => (8, 2, 1) [],
    NV11 = 110 => (4, 4, 1) [PLANAR],
    AI44 = 111 => (1, 1, 1) [],
    IA44 = 112 => (1, 1, 1) [],
    P8 = 113 => (1, 1, 1) [],
    A8P8 = 114 => (2, 1, 1) [],
    B4G4R4A4_UNORM = 115 => (2, 1, 1) [],
    P208 = 130 => (2, 2, 1) [PLANAR],
    V208 = 131 => (1, 1, 1) [PLANAR],
    V408 = 132 => (2, 1, 1) [PLANAR],
    ASTC_4X4_TYPELESS = 133 => (16, 4, 4) [COMPRESSED, ASTC, TYPELESS],
    ASTC_4X4_UNORM = 134 => (16, 4, 4) [COMPRESSED, ASTC],
    ASTC_4X4_UNORM_SRGB = 135 => (16, 4, 4) [COMPRESSED, ASTC, SRGB],
    ASTC_5X4_TYPELESS = 137 => (16, 5, 4) [COMPRESSED, ASTC, TYPELESS],
    ASTC_5X4_UNORM = 138 => (16, 5, 4) [COMPRESSED, ASTC],
    ASTC_5X4_UNORM_SRGB = 139 => (16, 5, 4) [COMPRESSED, ASTC, SRGB],
    ASTC_5X5_TYPELESS = 141 => (16, 5, 5) [COMPRESSED, ASTC, TYPELESS],
    ASTC_5X5_UNORM = 142 => (16, 5, 5) [COMPRESSED, ASTC],
    ASTC_5X5_UNORM_SRGB = 143 => (16, 5, 5) [COMPRESSED, ASTC, SRGB],
    ASTC_6X5_TYPELESS = 145 => (16, 6, 5) [COMPRESSED, ASTC, TYPELESS],
    ASTC_6X5_UNORM = 146 => (16, 6, 5) [COMPRESSED, ASTC],
    ASTC_6X5_UNORM_SRGB = 147 => (16, 6, 5) [COMPRESSED, ASTC, SRGB],
    ASTC_6X6_TYPELESS = 149 => (16, 6, 6) [COMPRESSED, ASTC, TYPELESS],
    ASTC_6X6_UNORM = 150 => (16, 6, 6) [COMPRESSED, ASTC],
    ASTC_6X6_UNORM_SRGB = 151 => (16, 6, 6) [COMPRESSED, ASTC, SRGB],
    ASTC_8X5_TYPELESS = 153 => (16, 8, 5) [COMPRESSED, ASTC, TYPELESS],
    ASTC_8X5_UNORM = 154 => (16, 8, 5) [COMPRESSED, ASTC],
    ASTC_8X5_UNORM_SRGB = 155 => (16, 8, 5) [COMPRESSED, ASTC, SRGB],
    ASTC_8X6_TYPELESS = 157 => (16, 8, 6) [COMPRESSED, ASTC, TYPELESS],
    ASTC_8X6_UNORM = 158 => (16, 8, 6) [COMPRESSED, ASTC],
    ASTC_8X6_UNORM_SRGB = 159 => (16, 8, 6) [COMPRESSED, ASTC, SRGB],
    ASTC_8X8_TYPELESS = 161 => (16, 8, 8) [COMPRESSED, ASTC, TYPELESS],
    ASTC_8X8_UNORM = 162 => (16, 8, 8) [COMPRESSED, ASTC],
    ASTC_8X8_UNORM_SRGB = 163 => (16, 8, 8) [COMPRESSED, ASTC, SRGB],
    ASTC_10X5_TYPELESS = 165 => (16, 10, 5) [COMPRESSED, ASTC, TYPELESS],
    ASTC_10X5_UNORM = 166 => (16, 10, 5) [COMPRESSED, ASTC],
    ASTC_10X5_UNORM_SRGB = 167 => (16, 10, 5) [COMPRESSED, ASTC, SRGB],
    ASTC_10X6_TYPELESS = 169 => (16, 10, 6) [COMPRESSED, ASTC, TYPELESS],
    ASTC_10X6_UNORM = 170 => (16, 10, 6) [COMPRESSED, ASTC],
    ASTC_10X6_UNORM_SRGB = 171 => (16, 10, 6) [COMPRESSED, ASTC, SRGB],
    ASTC_10X8_TYPELESS = 173 => (16, 10, 8) [COMPRESSED, ASTC, TYPELESS],
    ASTC_10X8_UNORM = 174 => (16, 10, 8) [COMPRESSED, ASTC],
    ASTC_10X8_UNORM_SRGB = 175 => (16, 10, 8) [COMPRESSED, ASTC, SRGB],
    ASTC_10X10_TYPELESS = 177 => (16, 10, 10) [COMPRESSED, ASTC, TYPELESS],
    ASTC_10X10_UNORM = 178 => (16, 10, 10) [COMPRESSED, ASTC],
    ASTC_10X10_UNORM_SRGB = 179 => (16, 10, 10) [COMPRESSED, ASTC, SRGB],
    ASTC_12X10_TYPELESS = 181 => (16, 12, 10) [COMPRESSED, ASTC, TYPELESS],
    ASTC_12X10_UNORM = 182 => (16, 12, 10) [COMPRESSED, ASTC],
    ASTC_12X10_UNORM_SRGB = 183 => (16, 12, 10) [COMPRESSED, ASTC, SRGB],
    ASTC_12X12_TYPELESS = 185 => (16, 12, 12) [COMPRESSED, ASTC, TYPELESS],
    ASTC_12X12_UNORM = 186 => (16, 12, 12) [COMPRESSED, ASTC],
    ASTC_12X12_UNORM_SRGB = 187 => (16, 12, 12) [COMPRESSED, ASTC, SRGB],
}

impl DxgiFormat {
    /// Numeric DXGI id.
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// The signed-normalized (or signed-integer) twin of an unsigned format.
    ///
    /// UNORM maps to SNORM and UINT to SINT when the catalog has such a
    /// format; anything else is returned unchanged.
    pub const fn signed_counterpart(self) -> Self {
        use DxgiFormat::*;

        match self {
            R32G32B32A32_UINT => R32G32B32A32_SINT,
            R32G32B32_UINT => R32G32B32_SINT,
            R16G16B16A16_UNORM => R16G16B16A16_SNORM,
            R16G16B16A16_UINT => R16G16B16A16_SINT,
            R32G32_UINT => R32G32_SINT,
            R8G8B8A8_UNORM => R8G8B8A8_SNORM,
            R8G8B8A8_UINT => R8G8B8A8_SINT,
            R16G16_UNORM => R16G16_SNORM,
            R16G16_UINT => R16G16_SINT,
            R32_UINT => R32_SINT,
            R8G8_UNORM => R8G8_SNORM,
            R8G8_UINT => R8G8_SINT,
            R16_UNORM => R16_SNORM,
            R16_UINT => R16_SINT,
            R8_UNORM => R8_SNORM,
            R8_UINT => R8_SINT,
            BC4_UNORM => BC4_SNORM,
            BC5_UNORM => BC5_SNORM,
            other => other,
        }
    }

    /// The uncompressed 8-bit intermediate an ASTC payload decodes to.
    pub const fn astc_intermediate(self) -> Self {
        if self.descriptor().is_srgb() {
            DxgiFormat::B8G8R8A8_UNORM_SRGB
        } else {
            DxgiFormat::B8G8R8A8_UNORM
        }
    }
}

impl fmt::Display for DxgiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for DxgiFormat {
    type Error = Error;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::from_u32(id).ok_or(Error::UnsupportedFormat(id))
    }
}

impl FromStr for DxgiFormat {
    type Err = Error;

    /// Parses `BC1_UNORM` or `DXGI_FORMAT_BC1_UNORM`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("DXGI_FORMAT_").unwrap_or(&upper);

        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name() == name)
            .ok_or_else(|| Error::UnknownFormatName(s.to_string()))
    }
}
