//! Raw DDS images for tests, built field by field so they do not depend on
//! the writer under test.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

use crate::format::DxgiFormat;
use crate::header::raw::{FourCC, PixelFormatFlags};

/// Offset of the payload after a header without a DX10 extension.
pub const BODY_START: usize = 128;

/// Offset of the payload after a header with a DX10 extension.
pub const DX10_BODY_START: usize = BODY_START + 20;

struct PixelFormat {
    flags: u32,
    four_cc: [u8; 4],
    bit_count: u32,
    masks: [u32; 4],
}

fn base_header(width: u32, height: u32, mip_count: u32, pf: &PixelFormat) -> Vec<u8> {
    let mut out = Vec::with_capacity(DX10_BODY_START);
    out.extend_from_slice(b"DDS ");
    let w = &mut out;
    w.write_u32::<LittleEndian>(124).unwrap();
    // CAPS | HEIGHT | WIDTH | PIXELFORMAT | MIPMAPCOUNT
    w.write_u32::<LittleEndian>(0x2_1007).unwrap();
    w.write_u32::<LittleEndian>(height).unwrap();
    w.write_u32::<LittleEndian>(width).unwrap();
    w.write_u32::<LittleEndian>(0).unwrap(); // pitch
    w.write_u32::<LittleEndian>(0).unwrap(); // depth
    w.write_u32::<LittleEndian>(mip_count).unwrap();
    for _ in 0..11 {
        w.write_u32::<LittleEndian>(0).unwrap();
    }

    w.write_u32::<LittleEndian>(32).unwrap();
    w.write_u32::<LittleEndian>(pf.flags).unwrap();
    w.extend_from_slice(&pf.four_cc);
    w.write_u32::<LittleEndian>(pf.bit_count).unwrap();
    for mask in pf.masks {
        w.write_u32::<LittleEndian>(mask).unwrap();
    }

    w.write_u32::<LittleEndian>(0x1000).unwrap(); // caps: TEXTURE
    for _ in 0..4 {
        w.write_u32::<LittleEndian>(0).unwrap(); // caps2..caps4, reserved2
    }
    assert_eq!(out.len(), BODY_START);
    out
}

/// A legacy header tagged with `four_cc`, followed by `payload`.
pub fn legacy_fourcc_dds(
    four_cc: FourCC,
    width: u32,
    height: u32,
    mip_count: u32,
    payload: &[u8],
) -> Vec<u8> {
    let pf = PixelFormat {
        flags: PixelFormatFlags::FOURCC.bits(),
        four_cc: four_cc.0,
        bit_count: 0,
        masks: [0; 4],
    };
    let mut out = base_header(width, height, mip_count, &pf);
    out.extend_from_slice(payload);
    out
}

/// A legacy one-mip header described by bit masks, followed by `payload`.
pub fn legacy_mask_dds(
    flags: PixelFormatFlags,
    bit_count: u32,
    masks: [u32; 4],
    width: u32,
    height: u32,
    payload: &[u8],
) -> Vec<u8> {
    let pf = PixelFormat {
        flags: flags.bits(),
        four_cc: [0; 4],
        bit_count,
        masks,
    };
    let mut out = base_header(width, height, 1, &pf);
    out.extend_from_slice(payload);
    out
}

/// A header with a 2D DX10 extension, followed by `payload`.
pub fn dx10_dds(
    format: DxgiFormat,
    width: u32,
    height: u32,
    mip_count: u32,
    array_size: u32,
    cube: bool,
    payload: &[u8],
) -> Vec<u8> {
    let pf = PixelFormat {
        flags: PixelFormatFlags::FOURCC.bits(),
        four_cc: *b"DX10",
        bit_count: 0,
        masks: [0; 4],
    };
    let mut out = base_header(width, height, mip_count, &pf);
    let w = &mut out;
    w.write_u32::<LittleEndian>(format.id()).unwrap();
    w.write_u32::<LittleEndian>(3).unwrap();
    w.write_u32::<LittleEndian>(if cube { 4 } else { 0 }).unwrap();
    w.write_u32::<LittleEndian>(array_size).unwrap();
    w.write_u32::<LittleEndian>(0).unwrap();
    out.extend_from_slice(payload);
    out
}

/// `len` bytes counting up from zero.
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}
