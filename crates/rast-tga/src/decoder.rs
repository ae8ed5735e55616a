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
use rast_core::palette::{premultiply, Palette, PaletteEntry, PALETTE_SIZE};

use crate::errors::TgaDecoderErrors;

/// Expand a 5-bit channel to full 8-bit range.
fn scale_5(channel: u16) -> u8 {
    ((channel * 255 + 15) / 31) as u8
}

/// Unpack a 5-5-5 pixel word into RGB, the top bit is ignored.
fn unpack_555(value: u16) -> [u8; 3] {
    [
        scale_5((value >> 10) & 0x1F),
        scale_5((value >> 5) & 0x1F),
        scale_5(value & 0x1F)
    ]
}

/// A TGA decoder over an abstract byte stream.
///
/// Handles paletted, truecolor and grayscale images, with or without
/// RLE compression, in any of the four stored pixel orderings. Output
/// is always canonical top-down left-to-right RGBA, or raw index bytes
/// for 8-bit images when
/// [`keep_palette_index`](DecoderOptions::keep_palette_index) is set.
pub struct TgaDecoder<T: RByteReaderTrait> {
    bytes:           RReader<T>,
    options:         DecoderOptions,
    width:           usize,
    height:          usize,
    depth:           u8,
    compressed:      bool,
    right_to_left:   bool,
    bottom_up:       bool,
    palette:         Palette,
    decoded_headers: bool
}

impl<T: RByteReaderTrait> TgaDecoder<T> {
    /// Create a new decoder with default options.
    pub fn new(source: T) -> TgaDecoder<T> {
        TgaDecoder::new_with_options(source, DecoderOptions::default())
    }

    /// Create a new decoder with the given options.
    pub fn new_with_options(source: T, options: DecoderOptions) -> TgaDecoder<T> {
        TgaDecoder {
            bytes: RReader::new(source),
            options,
            width: 0,
            height: 0,
            depth: 0,
            compressed: false,
            right_to_left: false,
            bottom_up: false,
            palette: Palette::new(),
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
        self.options.keep_palette_index() && self.depth == 8
    }

    /// Parse the fixed 18-byte header, the image-ID field and the
    /// palette when one is stored, leaving the stream at the first
    /// pixel.
    pub fn decode_headers(&mut self) -> Result<(), TgaDecoderErrors> {
        if self.decoded_headers {
            return Ok(());
        }

        let id_length = self.bytes.get_u8_err()?;
        let palette_type = self.bytes.get_u8_err()?;
        let raw_type = self.bytes.get_u8_err()?;
        // bit 3 is an orthogonal compression flag
        let compressed = raw_type & 8 != 0;
        let image_type = raw_type & 7;

        let palette_start = usize::from(self.bytes.get_u16_le_err()?);
        let palette_colors = usize::from(self.bytes.get_u16_le_err()?);
        let palette_entry_size = self.bytes.get_u8_err()?;
        self.bytes.skip(4)?; // x and y origin
        let width = usize::from(self.bytes.get_u16_le_err()?);
        let height = usize::from(self.bytes.get_u16_le_err()?);
        let depth = self.bytes.get_u8_err()?;
        let descriptor = self.bytes.get_u8_err()?;

        match image_type {
            1 => {
                if palette_type != 1 {
                    return Err(TgaDecoderErrors::PaletteTypeMismatch(
                        raw_type,
                        palette_type
                    ));
                }
                if depth != 8 {
                    return Err(TgaDecoderErrors::UnsupportedBitDepth(raw_type, depth));
                }
            }
            2 => {
                if palette_type != 0 {
                    return Err(TgaDecoderErrors::PaletteTypeMismatch(
                        raw_type,
                        palette_type
                    ));
                }
                if !matches!(depth, 15 | 16 | 24 | 32) {
                    return Err(TgaDecoderErrors::UnsupportedBitDepth(raw_type, depth));
                }
            }
            3 => {
                if palette_type != 0 {
                    return Err(TgaDecoderErrors::PaletteTypeMismatch(
                        raw_type,
                        palette_type
                    ));
                }
                if depth != 8 {
                    return Err(TgaDecoderErrors::UnsupportedBitDepth(raw_type, depth));
                }
            }
            _ => return Err(TgaDecoderErrors::UnsupportedImageType(raw_type))
        }

        if width == 0 || height == 0 {
            return Err(TgaDecoderErrors::ZeroDimensions);
        }
        if width > self.options.max_width() {
            return Err(TgaDecoderErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(TgaDecoderErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }

        // the image-ID field is not retained
        self.bytes.skip(usize::from(id_length))?;

        self.palette = if image_type == 3 {
            // grayscale rows resolve through an identity ramp
            Palette::grayscale(PALETTE_SIZE)
        } else {
            Palette::black(PALETTE_SIZE)
        };
        if palette_type == 1 {
            self.read_palette(palette_start, palette_colors, palette_entry_size)?;
        }

        trace!(
            "tga header: {}x{} type={} depth={} descriptor={:#04x}",
            width,
            height,
            raw_type,
            depth,
            descriptor
        );

        self.width = width;
        self.height = height;
        self.depth = depth;
        self.compressed = compressed;
        self.right_to_left = descriptor & 0x10 != 0;
        self.bottom_up = descriptor & 0x20 == 0;
        self.decoded_headers = true;
        Ok(())
    }

    /// Read the stored palette into the window starting at
    /// `palette_start`. Entries past slot 255 are consumed but dropped.
    fn read_palette(
        &mut self, palette_start: usize, palette_colors: usize, entry_size: u8
    ) -> Result<(), TgaDecoderErrors> {
        if !matches!(entry_size, 16 | 24 | 32) {
            return Err(TgaDecoderErrors::UnsupportedPaletteEntrySize(entry_size));
        }
        if palette_start + palette_colors > PALETTE_SIZE {
            warn!(
                "palette window {}..{} exceeds 256 entries, truncating",
                palette_start,
                palette_start + palette_colors
            );
        }

        for i in 0..palette_colors {
            let entry = match entry_size {
                16 => {
                    let value = self.bytes.get_u16_le_err()?;
                    let [r, g, b] = unpack_555(value);
                    PaletteEntry::new(r, g, b, 255)
                }
                24 => {
                    let [b, g, r] = self.bytes.read_fixed_bytes_or_error::<3>()?;
                    PaletteEntry::new(r, g, b, 255)
                }
                _ => {
                    // fourth byte carries no meaning in stored palettes
                    let [b, g, r, _] = self.bytes.read_fixed_bytes_or_error::<4>()?;
                    PaletteEntry::new(r, g, b, 255)
                }
            };
            let slot = palette_start + i;
            if slot < PALETTE_SIZE {
                self.palette.set(slot, entry);
            }
        }
        Ok(())
    }

    /// Decode the image, returning the pixels in the layout reported by
    /// [`colorspace`](Self::colorspace).
    pub fn decode(&mut self) -> Result<Vec<u8>, TgaDecoderErrors> {
        self.decode_headers()?;
        let size = self
            .output_buf_size()
            .ok_or(TgaDecoderErrors::GenericStatic("output size overflows usize"))?;
        let mut output = vec![0; size];
        self.decode_into(&mut output)?;
        Ok(output)
    }

    /// Decode the image into a caller provided buffer.
    pub fn decode_into(&mut self, buf: &mut [u8]) -> Result<(), TgaDecoderErrors> {
        self.decode_headers()?;
        let expected = self
            .output_buf_size()
            .ok_or(TgaDecoderErrors::GenericStatic("output size overflows usize"))?;
        if buf.len() < expected {
            return Err(TgaDecoderErrors::TooSmallBuffer(expected, buf.len()));
        }

        let pixel_bytes = match self.depth {
            8 => 1,
            15 | 16 => 2,
            24 => 3,
            _ => 4
        };
        let (width, height) = (self.width, self.height);
        let components = if self.keeps_indices() { 1 } else { 4 };

        let mut row = vec![0_u8; width * pixel_bytes];
        let mut overshoot_warned = false;
        let mut clamp_warned = false;

        for y in 0..height {
            if self.compressed {
                self.read_rle_row(&mut row, pixel_bytes, &mut overshoot_warned)?;
            } else {
                self.bytes.read_exact_bytes(&mut row)?;
            }

            let true_y = if self.bottom_up { height - 1 - y } else { y };
            let dest = &mut buf[true_y * width * components..(true_y + 1) * width * components];

            match self.depth {
                8 => self.row_indexed(&row, dest, &mut clamp_warned),
                15 | 16 => self.row_16(&row, dest),
                24 => self.row_24(&row, dest),
                _ => self.row_32(&row, dest)
            }
        }
        Ok(())
    }

    /// Destination column for a stored column, honoring the
    /// right-to-left descriptor bit.
    fn dest_x(&self, x: usize) -> usize {
        if self.right_to_left {
            self.width - 1 - x
        } else {
            x
        }
    }

    fn row_indexed(&self, src: &[u8], dest: &mut [u8], clamp_warned: &mut bool) {
        let keep = self.keeps_indices();
        for (x, index) in src.iter().enumerate() {
            let dx = self.dest_x(x);
            if keep {
                dest[dx] = *index;
            } else {
                let entry = self.palette.resolve_checked(usize::from(*index), clamp_warned);
                dest[dx * 4..dx * 4 + 4]
                    .copy_from_slice(&[entry.red, entry.green, entry.blue, entry.alpha]);
            }
        }
    }

    fn row_16(&self, src: &[u8], dest: &mut [u8]) {
        for (x, pix) in src.chunks_exact(2).enumerate() {
            let value = u16::from_le_bytes([pix[0], pix[1]]);
            let [r, g, b] = unpack_555(value);
            let dx = self.dest_x(x);
            dest[dx * 4..dx * 4 + 4].copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn row_24(&self, src: &[u8], dest: &mut [u8]) {
        for (x, pix) in src.chunks_exact(3).enumerate() {
            let dx = self.dest_x(x);
            dest[dx * 4..dx * 4 + 4].copy_from_slice(&[pix[2], pix[1], pix[0], 255]);
        }
    }

    fn row_32(&self, src: &[u8], dest: &mut [u8]) {
        let premultiplied = self.options.premultiply_alpha();
        for (x, pix) in src.chunks_exact(4).enumerate() {
            let [b, g, r, a] = [pix[0], pix[1], pix[2], pix[3]];
            let dx = self.dest_x(x);
            let out = if premultiplied {
                [
                    premultiply(r, a),
                    premultiply(g, a),
                    premultiply(b, a),
                    a
                ]
            } else {
                [r, g, b, a]
            };
            dest[dx * 4..dx * 4 + 4].copy_from_slice(&out);
        }
    }

    /// One RLE row: packets with the top control bit set repeat a
    /// single pixel value, others carry that many literal pixels.
    ///
    /// A packet declaring more pixels than the row has left is clamped
    /// to the row; literal pixels past the clamp are still consumed so
    /// the stream stays in sync.
    fn read_rle_row(
        &mut self, row: &mut [u8], pixel_bytes: usize, warned: &mut bool
    ) -> Result<(), TgaDecoderErrors> {
        let width = row.len() / pixel_bytes;
        let mut pixel = [0_u8; 4];
        let mut x = 0;

        while x < width {
            let control = self.bytes.get_u8_err()?;
            let count = usize::from(control & 0x7F) + 1;
            let allowed = count.min(width - x);
            if allowed < count {
                if self.options.strict_mode() {
                    return Err(TgaDecoderErrors::GenericStatic(
                        "RLE packet overshoots row"
                    ));
                }
                if !*warned {
                    warn!("RLE packet overshoots row, clamping");
                    *warned = true;
                }
            }

            if control & 0x80 != 0 {
                self.bytes.read_exact_bytes(&mut pixel[..pixel_bytes])?;
                for chunk in row[x * pixel_bytes..(x + allowed) * pixel_bytes]
                    .chunks_exact_mut(pixel_bytes)
                {
                    chunk.copy_from_slice(&pixel[..pixel_bytes]);
                }
            } else {
                for i in 0..count {
                    self.bytes.read_exact_bytes(&mut pixel[..pixel_bytes])?;
                    if i < allowed {
                        let at = (x + i) * pixel_bytes;
                        row[at..at + pixel_bytes].copy_from_slice(&pixel[..pixel_bytes]);
                    }
                }
            }
            x += allowed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{scale_5, unpack_555};

    #[test]
    fn five_bit_scaling_covers_full_range() {
        assert_eq!(scale_5(0), 0);
        assert_eq!(scale_5(16), 132);
        assert_eq!(scale_5(31), 255);
    }

    #[test]
    fn unpack_555_ignores_the_top_bit() {
        assert_eq!(unpack_555(0x7FFF), [255, 255, 255]);
        assert_eq!(unpack_555(0xFFFF), [255, 255, 255]);
        assert_eq!(unpack_555(0x7C00), [255, 0, 0]);
        assert_eq!(unpack_555(0x001F), [0, 0, 255]);
    }
}
