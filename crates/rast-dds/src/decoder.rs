/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use log::trace;
use rast_core::bytestream::{RByteReaderTrait, RReader};
use rast_core::options::DecoderOptions;

use crate::errors::DdsDecoderErrors;

/// The four magic bytes every DDS file starts with.
const DDS_MAGIC: &[u8; 4] = b"DDS ";
/// Pixel-format flag marking the FourCC field as meaningful.
const DDPF_FOURCC: u32 = 0x4;

/// Probe some bytes to see if they constitute a valid DDS file.
///
/// Only the 4-byte magic is checked. Never allocates.
pub fn probe_dds(bytes: &[u8]) -> bool {
    bytes.get(..4) == Some(DDS_MAGIC)
}

/// The block-compressed pixel formats this reader understands.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DdsFormat {
    Dxt1,
    Dxt3,
    Dxt5
}

impl DdsFormat {
    /// Map a FourCC to a supported format.
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<DdsFormat> {
        match fourcc {
            b"DXT1" => Some(DdsFormat::Dxt1),
            b"DXT3" => Some(DdsFormat::Dxt3),
            b"DXT5" => Some(DdsFormat::Dxt5),
            _ => None
        }
    }

    /// Bytes per 4x4 block.
    pub const fn block_size(self) -> usize {
        match self {
            DdsFormat::Dxt1 => 8,
            DdsFormat::Dxt3 | DdsFormat::Dxt5 => 16
        }
    }
}

/// A DDS reader over an abstract byte stream.
///
/// Validates the fixed 124-byte header and reads the top-level mipmap's
/// block data verbatim, one block row at a time. Output stays in the
/// stored block-compressed format.
pub struct DdsDecoder<T: RByteReaderTrait> {
    bytes:           RReader<T>,
    options:         DecoderOptions,
    width:           usize,
    height:          usize,
    format:          Option<DdsFormat>,
    decoded_headers: bool
}

impl<T: RByteReaderTrait> DdsDecoder<T> {
    /// Create a new decoder with default options.
    pub fn new(source: T) -> DdsDecoder<T> {
        DdsDecoder::new_with_options(source, DecoderOptions::default())
    }

    /// Create a new decoder with the given options.
    pub fn new_with_options(source: T, options: DecoderOptions) -> DdsDecoder<T> {
        DdsDecoder {
            bytes: RReader::new(source),
            options,
            width: 0,
            height: 0,
            format: None,
            decoded_headers: false
        }
    }

    /// Image width and height in pixels, present after
    /// [`decode_headers`](Self::decode_headers) has run.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.decoded_headers.then_some((self.width, self.height))
    }

    /// The stored block-compressed format.
    pub fn format(&self) -> Option<DdsFormat> {
        self.format
    }

    /// Number of 4x4 blocks per axis.
    pub fn blocks(&self) -> Option<(usize, usize)> {
        self.decoded_headers
            .then_some((self.width.div_ceil(4), self.height.div_ceil(4)))
    }

    /// Minimum size in bytes of a buffer that can hold the tightly
    /// packed block data.
    pub fn output_buf_size(&self) -> Option<usize> {
        let (blocks_x, blocks_y) = self.blocks()?;
        let block_size = self.format?.block_size();
        blocks_x
            .checked_mul(blocks_y)
            .and_then(|blocks| blocks.checked_mul(block_size))
    }

    /// Parse the magic and the fixed header, leaving the stream at the
    /// first block.
    pub fn decode_headers(&mut self) -> Result<(), DdsDecoderErrors> {
        if self.decoded_headers {
            return Ok(());
        }

        let magic = self.bytes.read_fixed_bytes_or_error::<4>()?;
        if &magic != DDS_MAGIC {
            return Err(DdsDecoderErrors::InvalidMagicBytes);
        }
        let header_size = self.bytes.get_u32_le_err()?;
        if header_size != 124 {
            return Err(DdsDecoderErrors::InvalidHeaderSize(header_size));
        }
        self.bytes.skip(4)?; // flags
        let height = self.bytes.get_u32_le_err()? as usize;
        let width = self.bytes.get_u32_le_err()? as usize;
        // pitch-or-linear-size, depth, mipmap count and the reserved
        // words carry nothing this reader needs
        self.bytes.skip(12 + 44)?;

        let pf_size = self.bytes.get_u32_le_err()?;
        if pf_size != 32 {
            return Err(DdsDecoderErrors::InvalidPixelFormatSize(pf_size));
        }
        let pf_flags = self.bytes.get_u32_le_err()?;
        let fourcc = self.bytes.read_fixed_bytes_or_error::<4>()?;
        self.bytes.skip(20)?; // bit count and channel masks
        self.bytes.skip(16 + 4)?; // caps and reserved

        if pf_flags & DDPF_FOURCC == 0 {
            return Err(DdsDecoderErrors::NoFourCc);
        }
        let format = DdsFormat::from_fourcc(&fourcc)
            .ok_or(DdsDecoderErrors::UnsupportedFourCc(fourcc))?;

        if width == 0 || height == 0 {
            return Err(DdsDecoderErrors::ZeroDimensions);
        }
        if width > self.options.max_width() {
            return Err(DdsDecoderErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(DdsDecoderErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }

        trace!("dds header: {}x{} format={:?}", width, height, format);

        self.width = width;
        self.height = height;
        self.format = Some(format);
        self.decoded_headers = true;
        Ok(())
    }

    /// Read the block data, returning it tightly packed.
    pub fn decode(&mut self) -> Result<Vec<u8>, DdsDecoderErrors> {
        self.decode_headers()?;
        let size = self
            .output_buf_size()
            .ok_or(DdsDecoderErrors::GenericStatic("output size overflows usize"))?;
        let mut output = vec![0; size];
        self.decode_into(&mut output)?;
        Ok(output)
    }

    /// Read the block data into a tightly packed caller buffer.
    pub fn decode_into(&mut self, buf: &mut [u8]) -> Result<(), DdsDecoderErrors> {
        self.decode_headers()?;
        let (blocks_x, _) = self
            .blocks()
            .ok_or(DdsDecoderErrors::GenericStatic("headers not decoded"))?;
        let row_size = blocks_x
            * self
                .format
                .ok_or(DdsDecoderErrors::GenericStatic("headers not decoded"))?
                .block_size();
        self.decode_into_with_pitch(buf, row_size)
    }

    /// Read the block data into a caller buffer whose block rows are
    /// `pitch` bytes apart.
    ///
    /// The pitch may exceed the tightly packed row size, as it does for
    /// GPU-resident destinations; the padding bytes are left untouched.
    pub fn decode_into_with_pitch(
        &mut self, buf: &mut [u8], pitch: usize
    ) -> Result<(), DdsDecoderErrors> {
        self.decode_headers()?;
        let (blocks_x, blocks_y) = self
            .blocks()
            .ok_or(DdsDecoderErrors::GenericStatic("headers not decoded"))?;
        let block_size = self
            .format
            .ok_or(DdsDecoderErrors::GenericStatic("headers not decoded"))?
            .block_size();
        let row_size = blocks_x * block_size;

        if pitch < row_size {
            return Err(DdsDecoderErrors::TooSmallPitch(row_size, pitch));
        }
        let expected = pitch * (blocks_y - 1) + row_size;
        if buf.len() < expected {
            return Err(DdsDecoderErrors::TooSmallBuffer(expected, buf.len()));
        }

        for row in buf.chunks_mut(pitch).take(blocks_y) {
            self.bytes.read_exact_bytes(&mut row[..row_size])?;
        }
        Ok(())
    }
}
