//! Format detection for headers without a DX10 extension.
//!
//! Mirrors the lookup order of DirectXTex's `GetDXGIFormat`: FourCC first,
//! then RGBA bit masks, then a B8G8R8A8 fallback.

use tracing::{debug, warn};

use crate::format::DxgiFormat;
use crate::header::raw::{FourCC, PixelFormatFlags, RawPixelFormat};
use crate::{Error, Result};

/// FourCCs of formats that have no DXGI equivalent (ETC, PVRTC, ATITC and
/// FourCC-tagged ASTC).
pub const UNCANONICAL_FOURCC: &[FourCC] = &[
    FourCC(*b"ETC\0"),
    FourCC(*b"ETC1"),
    FourCC(*b"ETC2"),
    FourCC(*b"ET2A"),
    FourCC(*b"PTC2"),
    FourCC(*b"PTC4"),
    FourCC(*b"ATC\0"),
    FourCC(*b"ATCA"),
    FourCC(*b"ATCE"),
    FourCC(*b"ATCI"),
    FourCC(*b"AS:5"),
    FourCC(*b"ASTC"),
];

/// FourCC aliases, checked in order.
pub const FOURCC_TO_DXGI: &[(&[FourCC], DxgiFormat)] = &[
    (&[FourCC::DXT1], DxgiFormat::BC1_UNORM),
    (&[FourCC::DXT2, FourCC::DXT3], DxgiFormat::BC2_UNORM),
    (&[FourCC::DXT4, FourCC::DXT5], DxgiFormat::BC3_UNORM),
    (&[FourCC::ATI1, FourCC::BC4U, FourCC(*b"3DC1")], DxgiFormat::BC4_UNORM),
    (&[FourCC::ATI2, FourCC::BC5U, FourCC(*b"3DC2")], DxgiFormat::BC5_UNORM),
    (&[FourCC::BC4S], DxgiFormat::BC4_SNORM),
    (&[FourCC::BC5S], DxgiFormat::BC5_SNORM),
    (&[FourCC(*b"BC6H")], DxgiFormat::BC6H_UF16),
    (&[FourCC(*b"BC7L"), FourCC(*b"BC7\0")], DxgiFormat::BC7_UNORM),
    (&[FourCC(*b"RGBG")], DxgiFormat::R8G8_B8G8_UNORM),
    (&[FourCC(*b"GRGB")], DxgiFormat::G8R8_G8B8_UNORM),
    (&[FourCC(*b"YUY2"), FourCC(*b"UYVY")], DxgiFormat::YUY2),
    (&[FourCC::numeric(36)], DxgiFormat::R16G16B16A16_UNORM),
    (&[FourCC::numeric(110)], DxgiFormat::R16G16B16A16_SNORM),
    (&[FourCC::numeric(111)], DxgiFormat::R16_FLOAT),
    (&[FourCC::numeric(112)], DxgiFormat::R16G16_FLOAT),
    (&[FourCC::numeric(113)], DxgiFormat::R16G16B16A16_FLOAT),
    (&[FourCC::numeric(114)], DxgiFormat::R32_FLOAT),
    (&[FourCC::numeric(115)], DxgiFormat::R32G32_FLOAT),
    (&[FourCC::numeric(116)], DxgiFormat::R32G32B32A32_FLOAT),
];

/// RGBA bit masks of uncompressed legacy formats.
pub const BITMASK_TO_DXGI: &[([u32; 4], DxgiFormat)] = &[
    ([0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000], DxgiFormat::B8G8R8A8_UNORM),
    ([0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0], DxgiFormat::B8G8R8X8_UNORM),
    ([0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000], DxgiFormat::R8G8B8A8_UNORM),
    ([0x3ff0_0000, 0x000f_fc00, 0x0000_03ff, 0xc000_0000], DxgiFormat::R10G10B10A2_UNORM),
    ([0x0000_ffff, 0xffff_0000, 0, 0], DxgiFormat::R16G16_UNORM),
    ([0xffff_ffff, 0, 0, 0], DxgiFormat::R32_FLOAT),
    ([0x7c00, 0x03e0, 0x001f, 0x8000], DxgiFormat::B5G5R5A1_UNORM),
    ([0xf800, 0x07e0, 0x001f, 0], DxgiFormat::B5G6R5_UNORM),
    ([0x0f00, 0x00f0, 0x000f, 0xf000], DxgiFormat::B4G4R4A4_UNORM),
    ([0x00ff, 0, 0, 0xff00], DxgiFormat::R8G8_UNORM),
    ([0xffff, 0, 0, 0], DxgiFormat::R16_UNORM),
    ([0xff, 0, 0, 0], DxgiFormat::R8_UNORM),
    ([0, 0, 0, 0xff], DxgiFormat::A8_UNORM),
];

/// Resolve the DXGI format described by a legacy pixel format.
///
/// Fails only for FourCCs in [`UNCANONICAL_FOURCC`]. Unrecognized FourCCs
/// and bit masks fall back to `B8G8R8A8_UNORM`, since plenty of files in
/// the wild carry zeroed or non-standard pixel formats.
pub fn resolve_legacy(pixel_format: &RawPixelFormat) -> Result<DxgiFormat> {
    let four_cc = pixel_format.four_cc;
    if UNCANONICAL_FOURCC.contains(&four_cc) {
        return Err(Error::UnsupportedFourCc(four_cc));
    }

    let flags = pixel_format.flags();

    if flags.contains(PixelFormatFlags::FOURCC) {
        if let Some(format) = lookup_fourcc(four_cc) {
            debug!(%four_cc, %format, "resolved format from FourCC");
            return Ok(format);
        }
    }

    let masks = pixel_format.bit_masks;
    let Some(format) = lookup_bitmask(masks) else {
        warn!(
            %four_cc,
            ?masks,
            "failed to detect DXGI format, loading as B8G8R8A8_UNORM"
        );
        return Ok(DxgiFormat::B8G8R8A8_UNORM);
    };

    if flags.contains(PixelFormatFlags::BUMPDUDV) {
        let signed = format.signed_counterpart();
        debug!(%format, %signed, "bump/dudv pixel format, using signed variant");
        Ok(signed)
    } else {
        Ok(format)
    }
}

fn lookup_fourcc(four_cc: FourCC) -> Option<DxgiFormat> {
    FOURCC_TO_DXGI
        .iter()
        .find(|(aliases, _)| aliases.contains(&four_cc))
        .map(|&(_, format)| format)
}

fn lookup_bitmask(masks: [u32; 4]) -> Option<DxgiFormat> {
    BITMASK_TO_DXGI
        .iter()
        .find(|(table_masks, _)| *table_masks == masks)
        .map(|&(_, format)| format)
}
