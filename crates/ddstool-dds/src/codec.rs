//! Block-codec adapter contract and ASTC transcoding.
//!
//! The compression algorithms live outside this crate. A [`BlockCodec`]
//! decodes or encodes one mip level at a time, and a [`CodecSession`]
//! scopes its setup and teardown to a batch of conversions.

use tracing::debug;

use crate::container::{mip_bytes, Dds};
use crate::format::{DxgiFormat, FormatDescriptor};
use crate::layout::MipLayout;
use crate::{Error, Result};

/// Failure reported by a codec. The reason is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CodecFailure(pub String);

impl From<CodecFailure> for Error {
    fn from(failure: CodecFailure) -> Self {
        Error::CodecFailure(failure.0)
    }
}

/// Block footprint in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockSize {
    pub width: u32,
    pub height: u32,
}

impl BlockSize {
    pub const fn of(descriptor: &FormatDescriptor) -> Self {
        Self {
            width: descriptor.block_width,
            height: descriptor.block_height,
        }
    }
}

/// An external block compressor.
///
/// Each call handles one whole mip level and either succeeds completely or
/// fails. Implementations may use threads internally.
pub trait BlockCodec {
    /// Acquire whatever the codec needs for a batch of calls.
    fn begin(&mut self) -> std::result::Result<(), CodecFailure> {
        Ok(())
    }

    /// Release what [`begin`](Self::begin) acquired.
    fn end(&mut self) {}

    /// Decode `width` x `height` pixels of blocks into RGBA8.
    fn decode(
        &mut self,
        block: BlockSize,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> std::result::Result<Vec<u8>, CodecFailure>;

    /// Encode `width` x `height` RGBA8 pixels into blocks.
    fn encode(
        &mut self,
        block: BlockSize,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> std::result::Result<Vec<u8>, CodecFailure>;
}

/// Scoped access to a [`BlockCodec`]: `begin` on creation, `end` on drop.
pub struct CodecSession<'a, C: BlockCodec + ?Sized> {
    codec: &'a mut C,
}

impl<'a, C: BlockCodec + ?Sized> CodecSession<'a, C> {
    pub fn new(codec: &'a mut C) -> Result<Self> {
        codec.begin()?;
        Ok(Self { codec })
    }

    /// Decode one mip level, checking the output size.
    pub fn decode(&mut self, block: BlockSize, width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>> {
        let out = self.codec.decode(block, width, height, data)?;
        let expected = width as usize * height as usize * 4;
        if out.len() != expected {
            return Err(Error::CodecFailure(format!(
                "decoder returned {} bytes for a {width}x{height} level, expected {expected}",
                out.len()
            )));
        }
        Ok(out)
    }

    /// Encode one mip level into `target`, checking the output size.
    pub fn encode(
        &mut self,
        target: &FormatDescriptor,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Vec<u8>> {
        let out = self.codec.encode(BlockSize::of(target), width, height, rgba)?;
        let expected = usize::try_from(target.surface_size(width, height)).unwrap_or(usize::MAX);
        if out.len() != expected {
            return Err(Error::CodecFailure(format!(
                "encoder returned {} bytes for a {width}x{height} {} level, expected {expected}",
                out.len(),
                target.name
            )));
        }
        Ok(out)
    }
}

impl<C: BlockCodec + ?Sized> Drop for CodecSession<'_, C> {
    fn drop(&mut self) {
        self.codec.end();
    }
}

impl Dds {
    /// Decode an ASTC texture to B8G8R8A8, keeping sRGB.
    ///
    /// The container is left untouched if any level fails.
    pub fn decompress_astc<C: BlockCodec + ?Sized>(
        &mut self,
        session: &mut CodecSession<'_, C>,
    ) -> Result<()> {
        let source = self.header.descriptor();
        let target = self.header.format().astc_intermediate();
        if !source.is_astc() {
            return Err(Error::UnsupportedConversion {
                from: source.format,
                to: target,
            });
        }

        let block = BlockSize::of(&source);
        let slices = self.transcode(|level, data| session.decode(block, level.0, level.1, data))?;

        debug!(from = %source.format, to = %target, slices = slices.len(), "decompressed ASTC");
        self.header.set_format(target);
        self.slices = slices;
        Ok(())
    }

    /// Encode a B8G8R8A8 texture into the ASTC format `target`.
    ///
    /// The container is left untouched if any level fails.
    pub fn compress_astc<C: BlockCodec + ?Sized>(
        &mut self,
        session: &mut CodecSession<'_, C>,
        target: DxgiFormat,
    ) -> Result<()> {
        let source = self.header.format();
        let is_rgba8 = matches!(
            source,
            DxgiFormat::B8G8R8A8_UNORM | DxgiFormat::B8G8R8A8_UNORM_SRGB
        );
        let descriptor = target.descriptor();
        if !is_rgba8 || !descriptor.is_astc() {
            return Err(Error::UnsupportedConversion { from: source, to: target });
        }

        let slices =
            self.transcode(|level, data| session.encode(&descriptor, level.0, level.1, data))?;

        debug!(from = %source, to = %target, slices = slices.len(), "compressed ASTC");
        self.header.set_format(target);
        self.slices = slices;
        Ok(())
    }

    /// Run `convert` over every mip of every slice, collecting new slices.
    fn transcode<F>(&self, mut convert: F) -> Result<Vec<Vec<u8>>>
    where
        F: FnMut((u32, u32), &[u8]) -> Result<Vec<u8>>,
    {
        let layout: MipLayout = self.header.mip_layout()?;
        self.slices
            .iter()
            .enumerate()
            .map(|(index, data)| {
                let mut out = Vec::new();
                for mip in layout.clone() {
                    let bytes = mip_bytes(index, data, &mip)?;
                    out.extend_from_slice(&convert((mip.width, mip.height), bytes)?);
                }
                Ok(out)
            })
            .collect()
    }
}
