//! In-memory DDS container: a header plus one byte buffer per slice.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::header::Header;
use crate::layout::{MipLayout, MipLevel};
use crate::{Error, ReadOptions, Result};

/// How [`Dds::assemble`] stacks its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssembleMode {
    /// One array element per input. Cubemap inputs give a cube array.
    Array,
    /// One depth layer per input.
    Volume,
    /// Exactly six plain inputs become the faces of a cubemap.
    Cube,
}

/// A loaded or assembled DDS file.
///
/// Slices are stored in payload order and each holds a full mip chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dds {
    pub(crate) header: Header,
    pub(crate) slices: Vec<Vec<u8>>,
}

impl Dds {
    /// Build a container, checking the slices against the header.
    ///
    /// Slices must all have the same length, as the payload is split
    /// evenly on load.
    pub fn new(header: Header, slices: Vec<Vec<u8>>) -> Result<Self> {
        let expected = header.slice_count()?;
        if slices.len() != expected {
            return Err(Error::SliceCountMismatch {
                expected,
                actual: slices.len(),
            });
        }
        check_slice_lengths(slices.iter().map(Vec::len))?;
        Ok(Self { header, slices })
    }

    /// Parse a whole DDS file held in memory.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        Self::load_with_options(bytes, &ReadOptions::default())
    }

    pub fn load_with_options(bytes: &[u8], options: &ReadOptions) -> Result<Self> {
        let mut cursor = bytes;
        let header = Header::read_with_options(&mut cursor, options)?;
        let slices = split_payload(&header, cursor)?;
        Ok(Self { header, slices })
    }

    /// Read a DDS file from a stream, consuming it to the end.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let header = Header::read(reader)?;
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;
        let slices = split_payload(&header, &payload)?;
        Ok(Self { header, slices })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &ReadOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        debug!(path = %path.display(), len = data.len(), "loading DDS");
        Self::load_with_options(&data, options)
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn slices(&self) -> &[Vec<u8>] {
        &self.slices
    }

    /// Total payload bytes after the header.
    pub fn payload_len(&self) -> usize {
        self.slices.iter().map(Vec::len).sum()
    }

    /// Serialize the header and payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.encoded_len() + self.payload_len());
        out.extend_from_slice(&self.header.to_bytes());
        for slice in &self.slices {
            out.extend_from_slice(slice);
        }
        out
    }

    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.header.write(writer)?;
        for slice in &self.slices {
            writer.write_all(slice)?;
        }
        Ok(())
    }

    /// Write to `path`, creating missing parent directories.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), "saved DDS");
        Ok(())
    }

    /// Mip chain geometry of each slice.
    pub fn mip_layout(&self) -> Result<MipLayout> {
        self.header.mip_layout()
    }

    /// Bytes of one mip level of one slice.
    pub fn mip(&self, slice: usize, level: u32) -> Result<&[u8]> {
        let data = self.slice(slice)?;
        let mip = self
            .mip_layout()?
            .nth(level as usize)
            .ok_or(Error::OutOfRange {
                what: "mip",
                index: level as usize,
                count: self.header.mip_count() as usize,
            })?;
        mip_bytes(slice, data, &mip)
    }

    /// Every mip level of one slice with its geometry.
    pub fn mips(&self, slice: usize) -> Result<Vec<(MipLevel, &[u8])>> {
        let data = self.slice(slice)?;
        self.mip_layout()?
            .map(|mip| mip_bytes(slice, data, &mip).map(|bytes| (mip, bytes)))
            .collect()
    }

    fn slice(&self, index: usize) -> Result<&[u8]> {
        self.slices
            .get(index)
            .map(Vec::as_slice)
            .ok_or(Error::OutOfRange {
                what: "slice",
                index,
                count: self.slices.len(),
            })
    }

    /// Split an array or volume into single-surface containers.
    ///
    /// Cubemaps keep their six faces together, so a cube array yields one
    /// cubemap per element. Every output owns its own header.
    pub fn disassemble(&self) -> Result<Vec<Dds>> {
        let (array_size, depth) = (self.header.array_size(), self.header.depth());
        if array_size <= 1 && depth <= 1 {
            return Err(Error::NotLayered { array_size, depth });
        }

        let is_cube = self.header.is_cube();
        let faces = if is_cube { 6 } else { 1 };
        let mut header = self.header.clone();
        header.reshape(1, 1, is_cube);

        let parts: Vec<Dds> = self
            .slices
            .chunks(faces)
            .map(|chunk| Dds {
                header: header.clone(),
                slices: chunk.to_vec(),
            })
            .collect();

        debug!(
            array_size,
            depth,
            cube = is_cube,
            parts = parts.len(),
            "disassembled texture"
        );
        Ok(parts)
    }

    /// Stack single-surface containers into an array, volume or cubemap.
    ///
    /// All inputs must agree on format, size, mip count and slice length.
    /// Nothing is built unless every input passes.
    pub fn assemble(parts: Vec<Dds>, mode: AssembleMode) -> Result<Dds> {
        let first_part = parts.first().ok_or(Error::EmptyAssembly)?;
        let first = first_part.header.clone();
        let slice_len = first_part.slices.first().map_or(0, Vec::len);

        for (index, part) in parts.iter().enumerate() {
            let header = &part.header;
            if header.array_size() > 1 || header.is_volume() {
                return Err(Error::LayoutMismatch {
                    index,
                    reason: "input is already an array or volume",
                });
            }
            if header.format() != first.format() {
                return Err(Error::FormatMismatch {
                    index,
                    expected: first.format(),
                    actual: header.format(),
                });
            }
            if (header.width(), header.height()) != (first.width(), first.height()) {
                return Err(Error::SizeMismatch {
                    index,
                    expected: (first.width(), first.height()),
                    actual: (header.width(), header.height()),
                });
            }
            if header.mip_count() != first.mip_count() {
                return Err(Error::MipCountMismatch {
                    index,
                    expected: first.mip_count(),
                    actual: header.mip_count(),
                });
            }
            if header.is_cube() != first.is_cube() {
                return Err(Error::LayoutMismatch {
                    index,
                    reason: "cannot mix cubemaps and plain textures",
                });
            }
            if let Some(actual) = part.slices.iter().map(Vec::len).find(|&len| len != slice_len) {
                return Err(Error::SliceLengthMismatch {
                    index,
                    expected: slice_len,
                    actual,
                });
            }
        }

        let count = u32::try_from(parts.len()).unwrap_or(u32::MAX);
        let (depth, array_size, is_cube) = match mode {
            AssembleMode::Array => (1, count, first.is_cube()),
            AssembleMode::Volume => {
                if first.is_cube() {
                    return Err(Error::LayoutMismatch {
                        index: 0,
                        reason: "a volume cannot hold cubemaps",
                    });
                }
                (count, 1, false)
            }
            AssembleMode::Cube => {
                if first.is_cube() {
                    return Err(Error::LayoutMismatch {
                        index: 0,
                        reason: "input is already a cubemap",
                    });
                }
                if parts.len() != 6 {
                    return Err(Error::CubeFaceCount(parts.len()));
                }
                (1, 1, true)
            }
        };

        let mut header = first;
        header.reshape(depth, array_size, is_cube);
        let slices: Vec<Vec<u8>> = parts.into_iter().flat_map(|part| part.slices).collect();

        debug!(
            ?mode,
            inputs = count,
            slices = slices.len(),
            format = %header.format(),
            "assembled texture"
        );
        Ok(Dds { header, slices })
    }

    /// Cut every slice down to its base level.
    ///
    /// Bytes past the base level are dropped even for single-mip textures.
    pub fn remove_mips(&mut self) -> Result<()> {
        let base = self.mip_layout()?.next().map_or(0, |mip| mip.size);
        if let Some((slice, data)) = self
            .slices
            .iter()
            .enumerate()
            .find(|(_, data)| data.len() < base)
        {
            return Err(Error::TruncatedSlice {
                slice,
                expected: base,
                actual: data.len(),
            });
        }

        for data in &mut self.slices {
            data.truncate(base);
        }
        debug!(removed = self.header.mip_count() - 1, base, "stripped mips");
        self.header.set_mip_count(1);
        Ok(())
    }
}

pub(crate) fn mip_bytes<'a>(slice: usize, data: &'a [u8], mip: &MipLevel) -> Result<&'a [u8]> {
    let end = mip.offset.saturating_add(mip.size);
    data.get(mip.offset..end).ok_or(Error::TruncatedSlice {
        slice,
        expected: end,
        actual: data.len(),
    })
}

/// Fails on the first length that differs from the first one.
fn check_slice_lengths(lengths: impl IntoIterator<Item = usize>) -> Result<()> {
    let mut lengths = lengths.into_iter().enumerate();
    let Some((_, expected)) = lengths.next() else {
        return Ok(());
    };
    match lengths.find(|&(_, len)| len != expected) {
        Some((index, actual)) => Err(Error::SliceLengthMismatch {
            index,
            expected,
            actual,
        }),
        None => Ok(()),
    }
}

fn split_payload(header: &Header, payload: &[u8]) -> Result<Vec<Vec<u8>>> {
    let slice_count = header.slice_count()?;
    // Every slice holds at least one byte, so a short payload is rejected
    // before anything is allocated per slice.
    if payload.len() < slice_count || payload.len() % slice_count != 0 {
        return Err(Error::CorruptPayload {
            payload_len: payload.len(),
            slice_count,
        });
    }

    let slice_len = payload.len() / slice_count;
    Ok(payload.chunks_exact(slice_len).map(<[u8]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DxgiFormat;
    use crate::header::raw::FourCC;
    use crate::test_prelude::*;

    fn filled(header: Header, seed: u8) -> Dds {
        let slice_len = crate::layout::slice_size(&header).unwrap();
        let slices = (0..header.slice_count().unwrap())
            .map(|i| vec![seed.wrapping_add(i as u8); slice_len])
            .collect();
        Dds::new(header, slices).unwrap()
    }

    #[test]
    fn test_load_splits_slices() {
        let payload = patterned(2048 * 3);
        let bytes = dx10_dds(DxgiFormat::BC1_UNORM, 64, 64, 1, 3, false, &payload);
        let dds = Dds::load(&bytes).unwrap();

        assert_eq!(dds.slices().len(), 3);
        assert_eq!(dds.slices()[1], &payload[2048..4096]);
        assert_eq!(dds.header().slice_count().unwrap(), dds.slices().len());
    }

    #[test]
    fn test_uneven_payload_is_corrupt() {
        let bytes = dx10_dds(DxgiFormat::BC1_UNORM, 4, 4, 1, 3, false, &[0; 10]);
        let err = Dds::load(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::CorruptPayload {
                payload_len: 10,
                slice_count: 3
            }
        ));
        assert_eq!(err.kind(), crate::ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_empty_payload_is_corrupt() {
        let bytes = dx10_dds(DxgiFormat::BC1_UNORM, 4, 4, 1, 2, false, &[]);
        assert!(matches!(
            Dds::load(&bytes),
            Err(Error::CorruptPayload {
                payload_len: 0,
                slice_count: 2
            })
        ));
    }

    #[test]
    fn test_huge_array_with_short_payload_is_corrupt() {
        let bytes = dx10_dds(DxgiFormat::BC1_UNORM, 4, 4, 1, u32::MAX, false, &[]);
        let err = Dds::load(&bytes).unwrap_err();
        assert!(matches!(err, Error::CorruptPayload { payload_len: 0, .. }));

        let bytes = dx10_dds(DxgiFormat::BC1_UNORM, 4, 4, 1, u32::MAX, false, &[0; 16]);
        assert_eq!(Dds::load(&bytes).unwrap_err().kind(), crate::ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_overflowing_slice_count_is_an_error() {
        let mut bytes = dx10_dds(DxgiFormat::BC1_UNORM, 4, 4, 1, 0x8000_0000, true, &[0; 8]);
        // Depth sits at file offset 24.
        bytes[24..28].copy_from_slice(&0x8000_0000u32.to_le_bytes());

        let err = Dds::load(&bytes).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CorruptPayload);
        assert!(err.is_file_fatal());
    }

    #[test]
    fn test_new_checks_slice_count() {
        let header = Header::new(DxgiFormat::BC1_UNORM, 4, 4).with_cube(true);
        let err = Dds::new(header, vec![vec![0; 8]; 5]).unwrap_err();
        assert!(matches!(
            err,
            Error::SliceCountMismatch {
                expected: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_new_checks_slice_lengths() {
        let header = Header::new(DxgiFormat::BC1_UNORM, 4, 4).with_array_size(3);
        let err = Dds::new(header, vec![vec![0; 8], vec![0; 8], vec![0; 16]]).unwrap_err();
        assert!(matches!(
            err,
            Error::SliceLengthMismatch {
                index: 2,
                expected: 8,
                actual: 16
            }
        ));
        assert_eq!(err.kind(), crate::ErrorKind::SizeMismatch);
    }

    #[test]
    fn test_read_from_stream_matches_load() {
        let bytes = legacy_fourcc_dds(FourCC::DXT5, 8, 8, 2, &patterned(64 + 16));
        let from_stream = Dds::read(&mut bytes.as_slice()).unwrap();
        assert_eq!(from_stream, Dds::load(&bytes).unwrap());
    }

    #[test]
    fn test_legacy_round_trip_is_byte_exact() {
        let bytes = legacy_fourcc_dds(FourCC::DXT1, 16, 16, 3, &patterned(128 + 32 + 8));
        let dds = Dds::load(&bytes).unwrap();
        let written = dds.to_bytes();

        let reloaded = Dds::load(&written).unwrap();
        assert_eq!(reloaded, dds);
        assert_eq!(&written[BODY_START..], &bytes[BODY_START..]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/tex.dds");
        let dds = filled(Header::new(DxgiFormat::BC3_UNORM, 8, 8).with_mip_count(2), 7);

        dds.save_to_file(&path).unwrap();
        let reopened = Dds::open(&path).unwrap();
        assert_eq!(reopened, dds);
        assert_eq!(Header::read_from_file(&path).unwrap(), *dds.header());
    }

    #[test]
    fn test_mip_access() {
        let header = Header::new(DxgiFormat::R8G8B8A8_UNORM, 4, 2).with_mip_count(3);
        let payload = patterned(32 + 8 + 4);
        let dds = Dds::new(header, vec![payload.clone()]).unwrap();

        assert_eq!(dds.mip(0, 0).unwrap(), &payload[..32]);
        assert_eq!(dds.mip(0, 2).unwrap(), &payload[40..44]);

        let mips = dds.mips(0).unwrap();
        assert_eq!(mips.len(), 3);
        assert_eq!((mips[1].0.width, mips[1].0.height), (2, 1));
        assert_eq!(mips[1].1, &payload[32..40]);

        assert!(matches!(
            dds.mip(0, 3),
            Err(Error::OutOfRange { what: "mip", index: 3, count: 3 })
        ));
        assert!(matches!(
            dds.mip(1, 0),
            Err(Error::OutOfRange { what: "slice", index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_mip_on_short_slice() {
        let header = Header::new(DxgiFormat::R8_UNORM, 4, 4).with_mip_count(2);
        let dds = Dds::new(header, vec![vec![0; 17]]).unwrap();
        assert!(matches!(
            dds.mip(0, 1),
            Err(Error::TruncatedSlice { slice: 0, expected: 20, actual: 17 })
        ));
    }

    #[test]
    fn test_disassemble_array() {
        let dds = filled(
            Header::new(DxgiFormat::BC7_UNORM, 8, 8)
                .with_array_size(3)
                .with_mip_count(2),
            1,
        );
        let parts = dds.disassemble().unwrap();

        assert_eq!(parts.len(), 3);
        for (part, slice) in parts.iter().zip(dds.slices()) {
            assert_eq!(part.header().array_size(), 1);
            assert_eq!(part.header().mip_count(), 2);
            assert_eq!(part.slices(), std::slice::from_ref(slice));
        }
    }

    #[test]
    fn test_disassemble_cube_array_keeps_faces_together() {
        let dds = filled(
            Header::new(DxgiFormat::BC1_UNORM, 4, 4)
                .with_cube(true)
                .with_array_size(2),
            0,
        );
        let parts = dds.disassemble().unwrap();

        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.header().is_cube() && p.slices().len() == 6));
        assert_eq!(parts[1].slices()[0], dds.slices()[6]);
    }

    #[test]
    fn test_disassemble_volume() {
        let dds = filled(Header::new(DxgiFormat::R16_FLOAT, 4, 4).with_depth(4), 3);
        let parts = dds.disassemble().unwrap();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| !p.header().is_volume()));
        assert_eq!(parts[3].slices()[0], dds.slices()[3]);
    }

    #[test]
    fn test_disassemble_plain_texture_fails() {
        let dds = filled(Header::new(DxgiFormat::BC1_UNORM, 4, 4), 0);
        assert!(matches!(
            dds.disassemble(),
            Err(Error::NotLayered { array_size: 1, depth: 1 })
        ));
    }

    #[test]
    fn test_assemble_volume() {
        let parts: Vec<_> = (0..3)
            .map(|i| filled(Header::new(DxgiFormat::R8G8B8A8_UNORM, 4, 4), i * 10))
            .collect();
        let expected: Vec<_> = parts.iter().flat_map(|p| p.slices().to_vec()).collect();

        let volume = Dds::assemble(parts, AssembleMode::Volume).unwrap();
        assert_eq!(volume.header().depth(), 3);
        assert_eq!(volume.header().array_size(), 1);
        assert!(volume.header().caps2().contains(crate::header::raw::Caps2::VOLUME));
        assert_eq!(volume.slices(), expected.as_slice());
    }

    #[test]
    fn test_assemble_cube_array() {
        let cube = filled(Header::new(DxgiFormat::BC1_UNORM, 4, 4).with_cube(true), 0);
        let array = Dds::assemble(vec![cube.clone(), cube], AssembleMode::Array).unwrap();
        assert_eq!(array.header().array_size(), 2);
        assert!(array.header().is_cube());
        assert_eq!(array.slices().len(), 12);
    }

    #[test]
    fn test_assemble_rejects_mismatches() {
        let base = || filled(Header::new(DxgiFormat::BC1_UNORM, 8, 8), 0);

        assert!(matches!(
            Dds::assemble(Vec::new(), AssembleMode::Array),
            Err(Error::EmptyAssembly)
        ));

        let other_format = filled(Header::new(DxgiFormat::BC3_UNORM, 8, 8), 0);
        assert!(matches!(
            Dds::assemble(vec![base(), other_format], AssembleMode::Array),
            Err(Error::FormatMismatch { index: 1, .. })
        ));

        let more_mips = filled(Header::new(DxgiFormat::BC1_UNORM, 8, 8).with_mip_count(2), 0);
        assert!(matches!(
            Dds::assemble(vec![base(), more_mips], AssembleMode::Array),
            Err(Error::MipCountMismatch { index: 1, expected: 1, actual: 2 })
        ));

        let array = filled(Header::new(DxgiFormat::BC1_UNORM, 8, 8).with_array_size(2), 0);
        assert!(matches!(
            Dds::assemble(vec![base(), array], AssembleMode::Array),
            Err(Error::LayoutMismatch { index: 1, .. })
        ));

        let cube = filled(Header::new(DxgiFormat::BC1_UNORM, 8, 8).with_cube(true), 0);
        assert!(matches!(
            Dds::assemble(vec![base(), cube.clone()], AssembleMode::Array),
            Err(Error::LayoutMismatch { index: 1, .. })
        ));
        assert!(matches!(
            Dds::assemble(vec![cube], AssembleMode::Volume),
            Err(Error::LayoutMismatch { index: 0, .. })
        ));

        assert!(matches!(
            Dds::assemble(vec![base(), base()], AssembleMode::Cube),
            Err(Error::CubeFaceCount(2))
        ));
    }

    #[test]
    fn test_assemble_rejects_unequal_slice_lengths() {
        let header = Header::new(DxgiFormat::BC1_UNORM, 4, 4);
        let short = Dds::new(header.clone(), vec![vec![1; 8]]).unwrap();
        let padded = Dds::new(header, vec![vec![2; 16]]).unwrap();

        let err = Dds::assemble(vec![short, padded], AssembleMode::Array).unwrap_err();
        assert!(matches!(
            err,
            Error::SliceLengthMismatch {
                index: 1,
                expected: 8,
                actual: 16
            }
        ));
        assert_eq!(err.kind(), crate::ErrorKind::SizeMismatch);
    }

    #[test]
    fn test_remove_mips() {
        let mut dds = filled(
            Header::new(DxgiFormat::BC1_UNORM, 16, 16)
                .with_array_size(2)
                .with_mip_count(5),
            9,
        );
        dds.remove_mips().unwrap();

        assert_eq!(dds.header().mip_count(), 1);
        assert!(dds.slices().iter().all(|s| s.len() == 128));
        assert_eq!(dds.slices()[1][0], 10);
        assert!(!dds.header().caps().contains(crate::header::raw::Caps::MIPMAP));
    }

    #[test]
    fn test_remove_mips_short_slice() {
        let header = Header::new(DxgiFormat::BC1_UNORM, 16, 16).with_mip_count(2);
        let mut dds = Dds::new(header, vec![vec![0; 100]]).unwrap();
        assert!(matches!(
            dds.remove_mips(),
            Err(Error::TruncatedSlice { slice: 0, expected: 128, actual: 100 })
        ));
        assert_eq!(dds.header().mip_count(), 2);
    }

    #[test]
    fn test_remove_mips_trims_single_mip_padding() {
        let header = Header::new(DxgiFormat::R8_UNORM, 4, 4);
        let mut dds = Dds::new(header, vec![patterned(20)]).unwrap();
        dds.remove_mips().unwrap();

        assert_eq!(dds.slices()[0], patterned(16));
        assert_eq!(dds.header().mip_count(), 1);
    }
}
