//! DDS header reading, writing and format resolution.
//!
//! [`Header`] is the normalized view of the on-disk header: the DXGI format
//! is resolved once on read, and the derived fields (`flags`,
//! `pitch_or_linear_size`, `caps`, `caps2`) are recomputed on every write.

pub mod raw;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use ddstool_common::{BinaryReader, ReadExt, WriteExt};
use tracing::{debug, warn};
use zerocopy::IntoBytes;

use crate::format::{resolve_legacy, DxgiFormat, FormatDescriptor};
use crate::layout::{self, MipLayout};
use crate::{Error, ReadOptions, Result, DDS_MAGIC};

use raw::{
    dimension, Caps, Caps2, HeaderFlags, RawDxt10Header, RawHeader, RawPixelFormat,
    DX10_MISC_TEXTURECUBE,
};

/// Size of the magic plus the fixed header.
pub const BASE_HEADER_LEN: usize = 4 + std::mem::size_of::<RawHeader>();

/// Size of the DX10 extension.
pub const DX10_HEADER_LEN: usize = std::mem::size_of::<RawDxt10Header>();

/// Byte offset of the pixel format within a file.
const PIXEL_FORMAT_OFFSET: usize = 76;

/// Shape of a texture as seen by tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Texture2D,
    Texture2DArray,
    Cube,
    CubeArray,
    Volume,
}

impl TextureType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Texture2D => "2d",
            Self::Texture2DArray => "2d_array",
            Self::Cube => "cube",
            Self::CubeArray => "cube_array",
            Self::Volume => "volume",
        }
    }
}

impl fmt::Display for TextureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved DDS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    width: u32,
    height: u32,
    depth: u32,
    mip_count: u32,
    array_size: u32,
    format: DxgiFormat,
    is_cube: bool,
    cube_faces: Caps2,
    misc_flags2: u32,
    reserved1: [u32; 11],
    /// Pixel format from a header read without a DX10 extension. Written
    /// back verbatim until the texture is restructured or reformatted.
    legacy_pixel_format: Option<RawPixelFormat>,
}

impl Header {
    /// A single-surface 2D texture with one mip level.
    pub fn new(format: DxgiFormat, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
            mip_count: 1,
            array_size: 1,
            format,
            is_cube: false,
            cube_faces: Caps2::CUBEMAP_ALL_FACES,
            misc_flags2: 0,
            reserved1: [0; 11],
            legacy_pixel_format: None,
        }
    }

    /// Set the mip count; zero means one.
    #[must_use]
    pub fn with_mip_count(mut self, mip_count: u32) -> Self {
        self.mip_count = mip_count.max(1);
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size.max(1);
        self
    }

    #[must_use]
    pub fn with_cube(mut self, is_cube: bool) -> Self {
        self.is_cube = is_cube;
        self.cube_faces = Caps2::CUBEMAP_ALL_FACES;
        self
    }

    /// Read a header with default options.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Self::read_with_options(reader, &ReadOptions::default())
    }

    /// Read the fixed header and, when flagged, the DX10 extension.
    ///
    /// Leaves `reader` positioned at the first payload byte.
    pub fn read_with_options<R: Read + ?Sized>(
        reader: &mut R,
        options: &ReadOptions,
    ) -> Result<Self> {
        let mut block = [0u8; BASE_HEADER_LEN];
        reader.read_exact(&mut block)?;

        let mut cursor = BinaryReader::new(&block);
        let magic = cursor.read_array::<4>()?;
        if &magic != DDS_MAGIC {
            return Err(Error::NotDds {
                field: "magic",
                offset: 0,
                expected: u32::from_le_bytes(*DDS_MAGIC),
                actual: u32::from_le_bytes(magic),
            });
        }

        let raw: RawHeader = cursor.read_struct()?;
        let size = raw.size;
        if size != RawHeader::SIZE {
            return Err(Error::NotDds {
                field: "header size",
                offset: 4,
                expected: RawHeader::SIZE,
                actual: size,
            });
        }

        let pixel_format = raw.pixel_format;
        let pf_size = pixel_format.size;
        if pf_size != RawPixelFormat::SIZE {
            return Err(Error::NotDds {
                field: "pixel format size",
                offset: PIXEL_FORMAT_OFFSET,
                expected: RawPixelFormat::SIZE,
                actual: pf_size,
            });
        }

        let (raw_mips, raw_depth) = (raw.mipmap_count, raw.depth);
        if raw_mips == 0 || raw_depth == 0 {
            debug!(mips = raw_mips, depth = raw_depth, "zero mip count or depth, treating as 1");
        }
        let mip_count = raw_mips.max(1);
        let depth = raw_depth.max(1);
        let caps2 = Caps2::from_bits_retain(raw.caps2);

        let mut header = Self {
            width: raw.width,
            height: raw.height,
            depth,
            mip_count,
            array_size: 1,
            format: DxgiFormat::UNKNOWN,
            is_cube: caps2.contains(Caps2::CUBEMAP),
            cube_faces: caps2.intersection(Caps2::CUBEMAP_ALL_FACES),
            misc_flags2: 0,
            reserved1: raw.reserved1,
            legacy_pixel_format: None,
        };

        if pixel_format.is_dx10() {
            let dx10: RawDxt10Header = reader.read_struct()?;
            header.apply_dx10(&dx10, options)?;
        } else {
            header.format = resolve_legacy(&pixel_format)?;
            header.legacy_pixel_format = Some(pixel_format);
        }

        debug!(
            width = header.width,
            height = header.height,
            depth = header.depth,
            mips = header.mip_count,
            array_size = header.array_size,
            cube = header.is_cube,
            format = %header.format,
            "read DDS header"
        );

        Ok(header)
    }

    fn apply_dx10(&mut self, dx10: &RawDxt10Header, options: &ReadOptions) -> Result<()> {
        let resource_dimension = dx10.resource_dimension;
        if resource_dimension != dimension::TEXTURE2D && resource_dimension != dimension::TEXTURE3D {
            return Err(Error::UnsupportedDimension(resource_dimension));
        }

        let id = dx10.dxgi_format;
        let format = DxgiFormat::from_u32(id)
            .filter(|&format| format != DxgiFormat::UNKNOWN)
            .ok_or(Error::UnsupportedFormat(id))?;
        if !format.descriptor().is_official() && !options.allow_non_official {
            return Err(Error::NonOfficialFormat(format));
        }

        let array_size = dx10.array_size;
        if array_size == 0 {
            warn!("DX10 header has array size 0, treating as 1");
        }

        self.format = format;
        self.array_size = array_size.max(1);
        self.misc_flags2 = dx10.misc_flags2;
        if dx10.misc_flag & DX10_MISC_TEXTURECUBE != 0 {
            self.is_cube = true;
        }
        if self.is_cube && self.cube_faces.is_empty() {
            self.cube_faces = Caps2::CUBEMAP_ALL_FACES;
        }
        Ok(())
    }

    /// Read just the header of a file.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read(&mut reader)
    }

    /// Write the header, followed by the DX10 extension when needed.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(DDS_MAGIC)?;
        writer.write_struct(&self.to_raw())?;
        if let Some(dx10) = self.dx10_header() {
            writer.write_struct(&dx10)?;
        }
        Ok(())
    }

    /// The serialized header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(DDS_MAGIC);
        out.extend_from_slice(self.to_raw().as_bytes());
        if let Some(dx10) = self.dx10_header() {
            out.extend_from_slice(dx10.as_bytes());
        }
        out
    }

    /// Bytes [`write`](Self::write) emits.
    pub fn encoded_len(&self) -> usize {
        if self.is_dx10() {
            BASE_HEADER_LEN + DX10_HEADER_LEN
        } else {
            BASE_HEADER_LEN
        }
    }

    fn to_raw(&self) -> RawHeader {
        RawHeader {
            size: RawHeader::SIZE,
            flags: self.flags().bits(),
            height: self.height,
            width: self.width,
            pitch_or_linear_size: self.pitch_or_linear_size(),
            depth: self.depth,
            mipmap_count: self.mip_count,
            reserved1: self.reserved1,
            pixel_format: self.pixel_format(),
            caps: self.caps().bits(),
            caps2: self.caps2().bits(),
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// The pixel format that will be written.
    pub fn pixel_format(&self) -> RawPixelFormat {
        self.legacy_pixel_format.unwrap_or_else(RawPixelFormat::dx10)
    }

    /// Whether a DX10 extension follows the fixed header on write.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format().is_dx10()
    }

    /// The DX10 extension written after the fixed header, if any.
    pub fn dx10_header(&self) -> Option<RawDxt10Header> {
        self.is_dx10().then(|| RawDxt10Header {
            dxgi_format: self.format.id(),
            resource_dimension: if self.is_volume() {
                dimension::TEXTURE3D
            } else {
                dimension::TEXTURE2D
            },
            misc_flag: if self.is_cube { DX10_MISC_TEXTURECUBE } else { 0 },
            array_size: self.array_size,
            misc_flags2: self.misc_flags2,
        })
    }

    /// Header flags derived from the current format and shape.
    pub fn flags(&self) -> HeaderFlags {
        let mut flags = HeaderFlags::REQUIRED;
        if self.descriptor().is_compressed() {
            flags |= HeaderFlags::LINEARSIZE;
        } else {
            flags |= HeaderFlags::PITCH;
        }
        if self.is_volume() {
            flags |= HeaderFlags::DEPTH;
        }
        flags
    }

    /// Byte size of the top mip for compressed formats, row pitch otherwise.
    pub fn pitch_or_linear_size(&self) -> u32 {
        let descriptor = self.descriptor();
        let value = if descriptor.is_compressed() {
            descriptor.surface_size(self.width, self.height)
        } else {
            descriptor.row_pitch(self.width)
        };
        u32::try_from(value).unwrap_or(u32::MAX)
    }

    pub fn caps(&self) -> Caps {
        let mut caps = Caps::TEXTURE;
        if self.has_mips() {
            caps |= Caps::COMPLEX | Caps::MIPMAP;
        }
        if self.is_cube {
            caps |= Caps::COMPLEX;
        }
        caps
    }

    pub fn caps2(&self) -> Caps2 {
        let mut caps2 = Caps2::empty();
        if self.is_cube {
            caps2 |= Caps2::CUBEMAP | self.cube_faces;
        }
        if self.is_volume() {
            caps2 |= Caps2::VOLUME;
        }
        caps2
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn mip_count(&self) -> u32 {
        self.mip_count
    }

    #[inline]
    pub fn array_size(&self) -> u32 {
        self.array_size
    }

    #[inline]
    pub fn format(&self) -> DxgiFormat {
        self.format
    }

    #[inline]
    pub fn descriptor(&self) -> FormatDescriptor {
        self.format.descriptor()
    }

    /// Alpha mode and other DX10 `miscFlags2` bits.
    #[inline]
    pub fn misc_flags2(&self) -> u32 {
        self.misc_flags2
    }

    #[inline]
    pub fn is_cube(&self) -> bool {
        self.is_cube
    }

    /// A cubemap that does not declare all six faces.
    pub fn is_partial_cube(&self) -> bool {
        self.is_cube && self.cube_faces != Caps2::CUBEMAP_ALL_FACES
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        self.depth > 1
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.array_size > 1
    }

    #[inline]
    pub fn has_mips(&self) -> bool {
        self.mip_count > 1
    }

    pub fn texture_type(&self) -> TextureType {
        match (self.is_volume(), self.is_cube, self.is_array()) {
            (true, _, _) => TextureType::Volume,
            (false, true, true) => TextureType::CubeArray,
            (false, true, false) => TextureType::Cube,
            (false, false, true) => TextureType::Texture2DArray,
            (false, false, false) => TextureType::Texture2D,
        }
    }

    /// Number of surfaces stored after the header.
    ///
    /// Fails when the declared array size, depth and faces overflow.
    pub fn slice_count(&self) -> Result<usize> {
        layout::slice_count(self)
    }

    /// Mip geometry of one slice.
    pub fn mip_layout(&self) -> Result<MipLayout> {
        layout::mip_layout(self)
    }

    /// Switch to another format. The next write uses a DX10 header.
    pub fn set_format(&mut self, format: DxgiFormat) {
        self.format = format;
        self.legacy_pixel_format = None;
    }

    pub(crate) fn set_mip_count(&mut self, mip_count: u32) {
        self.mip_count = mip_count.max(1);
    }

    /// Reinterpret the slice structure. Cube faces reset to all six and
    /// the next write uses a DX10 header.
    pub(crate) fn reshape(&mut self, depth: u32, array_size: u32, is_cube: bool) {
        self.depth = depth.max(1);
        self.array_size = array_size.max(1);
        self.is_cube = is_cube;
        self.cube_faces = Caps2::CUBEMAP_ALL_FACES;
        self.legacy_pixel_format = None;
    }
}
