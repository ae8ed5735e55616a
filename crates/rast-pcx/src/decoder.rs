/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use log::{trace, warn};
use rast_core::bytestream::{RByteReaderTrait, RReader};
use rast_core::colorspace::ColorSpace;
use rast_core::options::DecoderOptions;
use rast_core::palette::{Palette, PaletteEntry};

use crate::errors::PcxDecoderErrors;

/// The fixed first byte of every PCX file.
const MANUFACTURER: u8 = 10;
/// Marker byte introducing the 256-color trailer palette.
const PALETTE_MARKER: u8 = 12;

/// Probe some bytes to see if they constitute a valid PCX file.
///
/// Checks the manufacturer byte, the version, the encoding flag and the
/// bits-per-pixel field; needs the first 4 bytes. Never allocates.
pub fn probe_pcx(bytes: &[u8]) -> bool {
    if let Some(first_bytes) = bytes.get(..4) {
        return first_bytes[0] == MANUFACTURER
            && matches!(first_bytes[1], 0 | 2 | 3 | 4 | 5)
            && first_bytes[2] <= 1
            && first_bytes[3] == 8;
    }
    false
}

/// A PCX decoder over an abstract byte stream.
///
/// Supports the two layouts in actual circulation: 8-bit single-plane
/// indexed (palette stored after the pixel data) and 8-bit three-plane
/// RGB. Decodes to tightly packed top-down RGBA, or to one index byte
/// per pixel for 8-bit files when
/// [`keep_palette_index`](DecoderOptions::keep_palette_index) is set.
pub struct PcxDecoder<T: RByteReaderTrait> {
    bytes:           RReader<T>,
    options:         DecoderOptions,
    width:           usize,
    height:          usize,
    planes:          u8,
    bytes_per_line:  usize,
    decoded_headers: bool
}

impl<T: RByteReaderTrait> PcxDecoder<T> {
    /// Create a new decoder with default options.
    pub fn new(source: T) -> PcxDecoder<T> {
        PcxDecoder::new_with_options(source, DecoderOptions::default())
    }

    /// Create a new decoder with the given options.
    pub fn new_with_options(source: T, options: DecoderOptions) -> PcxDecoder<T> {
        PcxDecoder {
            bytes: RReader::new(source),
            options,
            width: 0,
            height: 0,
            planes: 0,
            bytes_per_line: 0,
            decoded_headers: false
        }
    }

    /// Image width and height, present after
    /// [`decode_headers`](Self::decode_headers) has run.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.decoded_headers.then_some((self.width, self.height))
    }

    /// The colorspace the pixels will be decoded into.
    pub fn colorspace(&self) -> Option<ColorSpace> {
        if !self.decoded_headers {
            return None;
        }
        if self.keeps_indices() {
            Some(ColorSpace::Indexed)
        } else {
            Some(ColorSpace::RGBA)
        }
    }

    /// Minimum size in bytes of a buffer that can hold the decoded
    /// output.
    pub fn output_buf_size(&self) -> Option<usize> {
        if !self.decoded_headers {
            return None;
        }
        let components = if self.keeps_indices() { 1 } else { 4 };
        self.width
            .checked_mul(self.height)
            .and_then(|size| size.checked_mul(components))
    }

    fn keeps_indices(&self) -> bool {
        self.options.keep_palette_index() && self.planes == 1
    }

    /// Parse the fixed 128-byte header, leaving the stream at the start
    /// of the RLE pixel data.
    pub fn decode_headers(&mut self) -> Result<(), PcxDecoderErrors> {
        if self.decoded_headers {
            return Ok(());
        }

        let manufacturer = self.bytes.get_u8_err()?;
        if manufacturer != MANUFACTURER {
            return Err(PcxDecoderErrors::InvalidManufacturer(manufacturer));
        }
        let _version = self.bytes.get_u8_err()?;
        let encoding = self.bytes.get_u8_err()?;
        if encoding != 1 {
            return Err(PcxDecoderErrors::UnsupportedEncoding(encoding));
        }
        let bits_per_pixel = self.bytes.get_u8_err()?;

        let x_min = usize::from(self.bytes.get_u16_le_err()?);
        let y_min = usize::from(self.bytes.get_u16_le_err()?);
        let x_max = usize::from(self.bytes.get_u16_le_err()?);
        let y_max = usize::from(self.bytes.get_u16_le_err()?);
        self.bytes.skip(4)?; // dpi fields
        self.bytes.skip(48)?; // 16-color legacy palette
        self.bytes.skip(1)?; // reserved
        let planes = self.bytes.get_u8_err()?;
        let bytes_per_line = usize::from(self.bytes.get_u16_le_err()?);
        // palette-info and filler up to the fixed 128-byte size
        self.bytes.skip(60)?;

        // only 8 bits per plane ever shipped; one plane is indexed,
        // three planes is RGB
        if bits_per_pixel != 8 || !matches!(planes, 1 | 3) {
            return Err(PcxDecoderErrors::UnsupportedPixelFormat(
                bits_per_pixel,
                planes
            ));
        }

        let width = x_max.wrapping_sub(x_min).wrapping_add(1);
        let height = y_max.wrapping_sub(y_min).wrapping_add(1);
        if x_max < x_min || y_max < y_min || width == 0 || height == 0 {
            return Err(PcxDecoderErrors::ZeroDimensions);
        }
        if width > self.options.max_width() {
            return Err(PcxDecoderErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(PcxDecoderErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }
        if bytes_per_line < width {
            return Err(PcxDecoderErrors::BadBytesPerLine(bytes_per_line, width));
        }

        trace!(
            "pcx header: {}x{} planes={} bytes_per_line={}",
            width,
            height,
            planes,
            bytes_per_line
        );

        self.width = width;
        self.height = height;
        self.planes = planes;
        self.bytes_per_line = bytes_per_line;
        self.decoded_headers = true;
        Ok(())
    }

    /// Decode the image, returning the pixels in the layout reported by
    /// [`colorspace`](Self::colorspace).
    pub fn decode(&mut self) -> Result<Vec<u8>, PcxDecoderErrors> {
        self.decode_headers()?;
        let size = self
            .output_buf_size()
            .ok_or(PcxDecoderErrors::GenericStatic("output size overflows usize"))?;
        let mut output = vec![0; size];
        self.decode_into(&mut output)?;
        Ok(output)
    }

    /// Decode the image into a caller provided buffer.
    pub fn decode_into(&mut self, buf: &mut [u8]) -> Result<(), PcxDecoderErrors> {
        self.decode_headers()?;
        let expected = self
            .output_buf_size()
            .ok_or(PcxDecoderErrors::GenericStatic("output size overflows usize"))?;
        if buf.len() < expected {
            return Err(PcxDecoderErrors::TooSmallBuffer(expected, buf.len()));
        }

        if self.planes == 1 {
            self.decode_indexed(buf)
        } else {
            self.decode_rgb(buf)
        }
    }

    /// One RLE scanline: a control byte with both high bits set encodes
    /// a run (low six bits long, next byte repeated), anything else is
    /// a single literal.
    fn read_rle_scanline(
        &mut self, out: &mut [u8], warned: &mut bool
    ) -> Result<(), PcxDecoderErrors> {
        let mut i = 0;
        while i < out.len() {
            let byte = self.bytes.get_u8_err()?;
            if byte & 0xC0 == 0xC0 {
                let declared = usize::from(byte & 0x3F);
                let value = self.bytes.get_u8_err()?;
                let count = declared.min(out.len() - i);
                if count < declared {
                    if self.options.strict_mode() {
                        return Err(PcxDecoderErrors::GenericStatic(
                            "RLE run overshoots scanline"
                        ));
                    }
                    if !*warned {
                        warn!("RLE run overshoots scanline, clamping");
                        *warned = true;
                    }
                }
                out[i..i + count].fill(value);
                i += count;
            } else {
                out[i] = byte;
                i += 1;
            }
        }
        Ok(())
    }

    /// 8-bit single plane: buffer every index first, the real palette
    /// only arrives after the pixel data.
    fn decode_indexed(&mut self, buf: &mut [u8]) -> Result<(), PcxDecoderErrors> {
        let (width, height) = (self.width, self.height);
        let mut scanline = vec![0_u8; self.bytes_per_line];
        let mut indices = vec![0_u8; width * height];
        let mut warned = false;

        for y in 0..height {
            self.read_rle_scanline(&mut scanline, &mut warned)?;
            indices[y * width..(y + 1) * width].copy_from_slice(&scanline[..width]);
        }

        if self.keeps_indices() {
            buf[..width * height].copy_from_slice(&indices);
            return Ok(());
        }

        let palette = self.read_trailer_palette()?;
        let mut clamp_warned = false;
        for (pix, index) in buf[..width * height * 4]
            .chunks_exact_mut(4)
            .zip(&indices)
        {
            let entry = palette.resolve_checked(usize::from(*index), &mut clamp_warned);
            pix.copy_from_slice(&[entry.red, entry.green, entry.blue, entry.alpha]);
        }
        Ok(())
    }

    /// The 256-color palette stored after the pixel data, introduced by
    /// a marker byte. Files that end without one get an all-black
    /// palette.
    fn read_trailer_palette(&mut self) -> Result<Palette, PcxDecoderErrors> {
        let mut palette = Palette::black(256);
        match self.bytes.get_u8_err() {
            Ok(PALETTE_MARKER) => {
                let mut entries = [0_u8; 256 * 3];
                self.bytes.read_exact_bytes(&mut entries)?;
                for (i, rgb) in entries.chunks_exact(3).enumerate() {
                    palette.set(i, PaletteEntry::new(rgb[0], rgb[1], rgb[2], 255));
                }
            }
            Ok(other) => {
                trace!("byte {other} after pixel data is not a palette marker, palette stays black");
                // the byte was not ours to consume
                self.bytes.rewind(1)?;
            }
            Err(_) => {
                trace!("no trailer palette before end of file, palette stays black");
            }
        }
        Ok(palette)
    }

    /// 24-bit: every scanline is three consecutive planes, R then G
    /// then B, decoded straight into the destination.
    fn decode_rgb(&mut self, buf: &mut [u8]) -> Result<(), PcxDecoderErrors> {
        let (width, height) = (self.width, self.height);
        let plane_size = self.bytes_per_line;
        let mut scanline = vec![0_u8; plane_size * 3];
        let mut warned = false;

        for y in 0..height {
            self.read_rle_scanline(&mut scanline, &mut warned)?;
            let (red, rest) = scanline.split_at(plane_size);
            let (green, blue) = rest.split_at(plane_size);

            let row = &mut buf[y * width * 4..(y + 1) * width * 4];
            for (x, pix) in row.chunks_exact_mut(4).enumerate() {
                pix.copy_from_slice(&[red[x], green[x], blue[x], 255]);
            }
        }
        Ok(())
    }
}
