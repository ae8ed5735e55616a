/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use log::{trace, warn};
use rast_core::bitfield::BitfieldDescriptor;
use rast_core::bytestream::{RByteReaderTrait, RReader};
use rast_core::colorspace::ColorSpace;
use rast_core::options::DecoderOptions;
use rast_core::palette::{premultiply, Palette, PaletteEntry};

use crate::common::{BmpCompression, BmpHeader, BmpHeaderKind};
use crate::errors::BmpDecoderErrors;
use crate::utils::expand_row;

/// The six info-header sizes a BMP file can carry.
const HEADER_SIZES: [u32; 6] = [12, 40, 52, 56, 108, 124];

/// Probe some bytes to see if they constitute a valid BMP file.
///
/// Checks the `BM` magic and the info-header size field; needs at least
/// the first 18 bytes of the file. Never allocates and never reads past
/// the slice it is given.
pub fn probe_bmp(bytes: &[u8]) -> bool {
    if let Some(first_bytes) = bytes.get(..18) {
        if &first_bytes[..2] == b"BM" {
            let size = u32::from_le_bytes(first_bytes[14..18].try_into().unwrap());
            return HEADER_SIZES.contains(&size);
        }
    }
    false
}

/// A BMP decoder over an abstract byte stream.
///
/// Decodes to tightly packed top-down RGBA, or to one palette index
/// byte per pixel when
/// [`keep_palette_index`](DecoderOptions::keep_palette_index) is set and
/// the file is 8 bits or below.
pub struct BmpDecoder<T: RByteReaderTrait> {
    bytes:           RReader<T>,
    options:         DecoderOptions,
    header:          Option<BmpHeader>,
    fields:          [Option<BitfieldDescriptor>; 4],
    palette:         Palette,
    decoded_headers: bool
}

impl<T: RByteReaderTrait> BmpDecoder<T> {
    /// Create a new decoder with default options.
    pub fn new(source: T) -> BmpDecoder<T> {
        BmpDecoder::new_with_options(source, DecoderOptions::default())
    }

    /// Create a new decoder with the given options.
    pub fn new_with_options(source: T, options: DecoderOptions) -> BmpDecoder<T> {
        BmpDecoder {
            bytes: RReader::new(source),
            options,
            header: None,
            fields: [None; 4],
            palette: Palette::new(),
            decoded_headers: false
        }
    }

    /// Image width and height, present after
    /// [`decode_headers`](Self::decode_headers) has run.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.header.as_ref().map(|h| (h.width, h.height))
    }

    /// The colorspace the pixels will be decoded into.
    pub fn colorspace(&self) -> Option<ColorSpace> {
        let header = self.header.as_ref()?;
        if self.keeps_indices(header) {
            Some(ColorSpace::Indexed)
        } else {
            Some(ColorSpace::RGBA)
        }
    }

    /// Minimum size in bytes of a buffer that can hold the decoded
    /// output.
    pub fn output_buf_size(&self) -> Option<usize> {
        let header = self.header.as_ref()?;
        let components = if self.keeps_indices(header) { 1 } else { 4 };
        header
            .width
            .checked_mul(header.height)
            .and_then(|size| size.checked_mul(components))
    }

    fn keeps_indices(&self, header: &BmpHeader) -> bool {
        self.options.keep_palette_index() && header.depth <= 8
    }

    /// Parse the file and info headers, the channel masks and the
    /// palette, leaving the stream at the start of the pixel data.
    ///
    /// Calling this multiple times is cheap, later calls are no-ops.
    pub fn decode_headers(&mut self) -> Result<(), BmpDecoderErrors> {
        if self.decoded_headers {
            return Ok(());
        }

        let magic = self.bytes.read_fixed_bytes_or_error::<2>()?;
        if &magic != b"BM" {
            return Err(BmpDecoderErrors::InvalidMagicBytes);
        }
        let _file_size = self.bytes.get_u32_le_err()?;
        self.bytes.skip(4)?; // two reserved u16 fields
        let pix_start = self.bytes.get_u32_le_err()?;

        let size = self.bytes.get_u32_le_err()?;
        let kind = BmpHeaderKind::from_size(size)
            .ok_or(BmpDecoderErrors::UnsupportedHeaderSize(size))?;

        let mut header = if kind.is_os2() {
            let width = usize::from(self.bytes.get_u16_le_err()?);
            let height = usize::from(self.bytes.get_u16_le_err()?);
            let _planes = self.bytes.get_u16_le_err()?;
            let depth = self.bytes.get_u16_le_err()?;

            BmpHeader {
                kind,
                size,
                width,
                height,
                flipped: true,
                depth,
                comp: BmpCompression::Rgb,
                pix_start,
                colors_used: 0,
                masks: [0; 4]
            }
        } else {
            let width = self.bytes.get_u32_le_err()? as i32;
            let height = self.bytes.get_u32_le_err()? as i32;
            let _planes = self.bytes.get_u16_le_err()?;
            let depth = self.bytes.get_u16_le_err()?;
            let comp_value = self.bytes.get_u32_le_err()?;
            let comp = BmpCompression::from_u32(comp_value)
                .ok_or(BmpDecoderErrors::UnsupportedCompression(comp_value))?;
            let _size_image = self.bytes.get_u32_le_err()?;
            self.bytes.skip(8)?; // pixels-per-meter fields
            let colors_used = self.bytes.get_u32_le_err()?;
            let _colors_important = self.bytes.get_u32_le_err()?;

            if width < 0 {
                return Err(BmpDecoderErrors::NegativeWidth);
            }
            // negative height flags a top-down file, the sign never
            // leaves this function
            let flipped = height >= 0;

            BmpHeader {
                kind,
                size,
                width: width as usize,
                height: height.unsigned_abs() as usize,
                flipped,
                depth,
                comp,
                pix_start,
                colors_used,
                masks: [0; 4]
            }
        };

        trace!(
            "bmp header: size={} {}x{} depth={} comp={:?} flipped={}",
            header.size,
            header.width,
            header.height,
            header.depth,
            header.comp,
            header.flipped
        );

        self.check_dimensions(&header)?;

        if !matches!(header.depth, 1 | 2 | 4 | 8 | 16 | 24 | 32) {
            return Err(BmpDecoderErrors::UnsupportedBitDepth(header.depth));
        }
        match header.comp {
            BmpCompression::Rle8 if header.depth != 8 => {
                return Err(BmpDecoderErrors::GenericStatic("RLE8 requires 8-bit depth"))
            }
            BmpCompression::Rle4 if header.depth != 4 => {
                return Err(BmpDecoderErrors::GenericStatic("RLE4 requires 4-bit depth"))
            }
            _ => ()
        }

        if header.kind.has_rgb_masks() || header.comp == BmpCompression::Bitfields {
            for mask in header.masks.iter_mut().take(3) {
                *mask = self.bytes.get_u32_le_err()?;
            }
            if header.kind.has_alpha_mask() {
                header.masks[3] = self.bytes.get_u32_le_err()?;
            }
            for (field, mask) in self.fields.iter_mut().zip(header.masks) {
                if mask != 0 {
                    *field = Some(
                        BitfieldDescriptor::from_mask(mask)
                            .ok_or(BmpDecoderErrors::InvalidBitfieldMask(mask))?
                    );
                }
            }
        }

        // color-management fields in the V4/V5 headers are not used,
        // hop over them
        if header.size > 56 {
            self.bytes.set_position(14 + header.size as usize)?;
        }

        if header.depth <= 8 && header.comp != BmpCompression::Bitfields {
            self.read_palette(&header)?;
        }

        // the declared pixel offset is only honored when it lies ahead,
        // oversized headers may already have carried us past it
        let position = self.bytes.position()?;
        if u64::from(header.pix_start) > position {
            self.bytes.set_position(header.pix_start as usize)?;
        }

        self.header = Some(header);
        self.decoded_headers = true;
        Ok(())
    }

    fn check_dimensions(&self, header: &BmpHeader) -> Result<(), BmpDecoderErrors> {
        if header.width == 0 || header.height == 0 {
            return Err(BmpDecoderErrors::ZeroDimensions);
        }
        if header.width > self.options.max_width() {
            return Err(BmpDecoderErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                header.width
            ));
        }
        if header.height > self.options.max_height() {
            return Err(BmpDecoderErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                header.height
            ));
        }
        Ok(())
    }

    fn read_palette(&mut self, header: &BmpHeader) -> Result<(), BmpDecoderErrors> {
        let entry_size: usize = if header.kind.is_os2() { 3 } else { 4 };

        let mut count = header.colors_used as usize;
        if count == 0 {
            count = if header.kind.is_os2() {
                // OS/2 files leave the count implicit in the gap between
                // the header and the pixel data
                (header.pix_start as usize).saturating_sub(14 + 12) / 3
            } else {
                1 << header.depth
            };
        }
        if count > 256 {
            warn!("palette of {count} entries exceeds 256, excess entries ignored");
            if self.options.strict_mode() {
                return Err(BmpDecoderErrors::GenericStatic(
                    "palette has more than 256 entries"
                ));
            }
        }

        for _ in 0..count.min(256) {
            let entry = if header.kind.is_os2() {
                let [b, g, r] = self.bytes.read_fixed_bytes_or_error::<3>()?;
                PaletteEntry::new(r, g, b, 255)
            } else {
                let [b, g, r, _] = self.bytes.read_fixed_bytes_or_error::<4>()?;
                PaletteEntry::new(r, g, b, 255)
            };
            self.palette.push(entry);
        }
        if count > 256 {
            self.bytes.skip((count - 256) * entry_size)?;
        }
        Ok(())
    }

    /// Decode the image, returning the pixels in the layout reported by
    /// [`colorspace`](Self::colorspace).
    pub fn decode(&mut self) -> Result<Vec<u8>, BmpDecoderErrors> {
        self.decode_headers()?;
        let size = self
            .output_buf_size()
            .ok_or(BmpDecoderErrors::GenericStatic("output size overflows usize"))?;
        let mut output = vec![0; size];
        self.decode_into(&mut output)?;
        Ok(output)
    }

    /// Decode the image into a caller provided buffer.
    ///
    /// The buffer must hold at least
    /// [`output_buf_size`](Self::output_buf_size) bytes.
    pub fn decode_into(&mut self, buf: &mut [u8]) -> Result<(), BmpDecoderErrors> {
        self.decode_headers()?;

        let expected = self
            .output_buf_size()
            .ok_or(BmpDecoderErrors::GenericStatic("output size overflows usize"))?;
        if buf.len() < expected {
            return Err(BmpDecoderErrors::TooSmallBuffer(expected, buf.len()));
        }
        let header = self.header.take().ok_or(BmpDecoderErrors::GenericStatic(
            "headers not decoded, call decode_headers first"
        ))?;

        let result = match header.comp {
            BmpCompression::Rle8 | BmpCompression::Rle4 => self.decode_rle(&header, buf),
            BmpCompression::Rgb | BmpCompression::Bitfields => match header.depth {
                1 | 2 | 4 | 8 => self.decode_paletted(&header, buf),
                16 => self.decode_16(&header, buf),
                24 => self.decode_24(&header, buf),
                32 => self.decode_32(&header, buf),
                _ => unreachable!("depth validated during header decode")
            }
        };
        self.header = Some(header);
        result
    }

    /// Destination row index for the `y`-th row in file order.
    fn dest_row(header: &BmpHeader, y: usize) -> usize {
        if header.flipped {
            header.height - 1 - y
        } else {
            y
        }
    }

    /// Bytes one packed row occupies on disk, padded to a 4-byte
    /// boundary.
    fn src_row_size(header: &BmpHeader) -> usize {
        ((header.width * usize::from(header.depth) + 31) / 32) * 4
    }

    fn decode_paletted(
        &mut self, header: &BmpHeader, buf: &mut [u8]
    ) -> Result<(), BmpDecoderErrors> {
        let keep_indices = self.keeps_indices(header);
        let row_size = Self::src_row_size(header);
        let mut scanline = vec![0_u8; row_size];
        let mut indices = vec![0_u8; header.width];
        let mut warned = false;

        for y in 0..header.height {
            self.bytes.read_exact_bytes(&mut scanline)?;
            expand_row(header.depth, &scanline, &mut indices);

            let dest_y = Self::dest_row(header, y);
            if keep_indices {
                buf[dest_y * header.width..(dest_y + 1) * header.width]
                    .copy_from_slice(&indices);
            } else {
                let row = &mut buf[dest_y * header.width * 4..(dest_y + 1) * header.width * 4];
                for (pix, index) in row.chunks_exact_mut(4).zip(&indices) {
                    let entry = self.palette.resolve_checked(usize::from(*index), &mut warned);
                    pix.copy_from_slice(&[entry.red, entry.green, entry.blue, entry.alpha]);
                }
            }
        }
        Ok(())
    }

    fn decode_16(&mut self, header: &BmpHeader, buf: &mut [u8]) -> Result<(), BmpDecoderErrors> {
        // without masks a 16-bit BMP is 5-5-5
        let have_rgb_masks = self.fields.iter().take(3).any(Option::is_some);
        let rgb_fields: [Option<BitfieldDescriptor>; 3] = if have_rgb_masks {
            [self.fields[0], self.fields[1], self.fields[2]]
        } else {
            [
                BitfieldDescriptor::from_mask(0x7C00),
                BitfieldDescriptor::from_mask(0x03E0),
                BitfieldDescriptor::from_mask(0x001F)
            ]
        };
        let alpha_field = self.fields[3];
        let premul = self.options.premultiply_alpha();

        let row_size = Self::src_row_size(header);
        let mut scanline = vec![0_u8; row_size];

        for y in 0..header.height {
            self.bytes.read_exact_bytes(&mut scanline)?;
            let dest_y = Self::dest_row(header, y);
            let row = &mut buf[dest_y * header.width * 4..(dest_y + 1) * header.width * 4];

            for (pix, word) in row
                .chunks_exact_mut(4)
                .zip(scanline.chunks_exact(2))
            {
                let value = u32::from(u16::from_le_bytes([word[0], word[1]]));
                let mut rgba = [
                    rgb_fields[0].map_or(0, |f| f.extract(value)),
                    rgb_fields[1].map_or(0, |f| f.extract(value)),
                    rgb_fields[2].map_or(0, |f| f.extract(value)),
                    255
                ];
                if let Some(field) = alpha_field {
                    let alpha = field.extract(value);
                    rgba[3] = alpha;
                    if premul {
                        for channel in &mut rgba[..3] {
                            *channel = premultiply(*channel, alpha);
                        }
                    }
                }
                pix.copy_from_slice(&rgba);
            }
        }
        Ok(())
    }

    fn decode_24(&mut self, header: &BmpHeader, buf: &mut [u8]) -> Result<(), BmpDecoderErrors> {
        let row_size = Self::src_row_size(header);
        let mut scanline = vec![0_u8; row_size];

        for y in 0..header.height {
            self.bytes.read_exact_bytes(&mut scanline)?;
            let dest_y = Self::dest_row(header, y);
            let row = &mut buf[dest_y * header.width * 4..(dest_y + 1) * header.width * 4];

            for (pix, bgr) in row
                .chunks_exact_mut(4)
                .zip(scanline.chunks_exact(3))
            {
                pix.copy_from_slice(&[bgr[2], bgr[1], bgr[0], 255]);
            }
        }
        Ok(())
    }

    fn decode_32(&mut self, header: &BmpHeader, buf: &mut [u8]) -> Result<(), BmpDecoderErrors> {
        let rgb_fields = [self.fields[0], self.fields[1], self.fields[2]];
        let alpha_field = self.fields[3];
        let premul = self.options.premultiply_alpha();

        let mut scanline = vec![0_u8; header.width * 4];
        let mut alpha_seen = 0_u8;

        for y in 0..header.height {
            self.bytes.read_exact_bytes(&mut scanline)?;
            let dest_y = Self::dest_row(header, y);
            let row = &mut buf[dest_y * header.width * 4..(dest_y + 1) * header.width * 4];

            for (pix, bytes) in row
                .chunks_exact_mut(4)
                .zip(scanline.chunks_exact(4))
            {
                let word = u32::from_le_bytes(bytes.try_into().unwrap());
                // default layout without masks is BGRA
                let mut rgba = [
                    rgb_fields[0].map_or(bytes[2], |f| f.extract(word)),
                    rgb_fields[1].map_or(bytes[1], |f| f.extract(word)),
                    rgb_fields[2].map_or(bytes[0], |f| f.extract(word)),
                    alpha_field.map_or(bytes[3], |f| f.extract(word))
                ];
                let alpha = rgba[3];
                alpha_seen |= alpha;
                if alpha_field.is_some() && premul {
                    for channel in &mut rgba[..3] {
                        *channel = premultiply(*channel, alpha);
                    }
                }
                pix.copy_from_slice(&rgba);
            }
        }

        if alpha_field.is_none() {
            // alpha heuristic: the decision needs the whole image, so a
            // second pass fixes the channel up after the fact
            if alpha_seen == 0 {
                trace!("32-bit bmp with all-zero alpha bytes, treating as opaque");
                for pix in buf[..header.width * header.height * 4].chunks_exact_mut(4) {
                    pix[3] = 255;
                }
            } else if premul {
                for pix in buf[..header.width * header.height * 4].chunks_exact_mut(4) {
                    let alpha = pix[3];
                    for channel in &mut pix[..3] {
                        *channel = premultiply(*channel, alpha);
                    }
                }
            }
        }
        Ok(())
    }

    fn decode_rle(&mut self, header: &BmpHeader, buf: &mut [u8]) -> Result<(), BmpDecoderErrors> {
        let is_rle4 = header.comp == BmpCompression::Rle4;
        let keep_indices = self.keeps_indices(header);
        let (width, height) = (header.width, header.height);

        // decode into a canonical top-down index grid first, palette
        // resolution happens in a second pass
        let mut indices = vec![0_u8; width * height];
        let mut x = 0_usize;
        let mut line = 0_usize;
        let mut clamp_warned = false;

        'decode: while line < height {
            let count = self.bytes.get_u8_err()?;
            let value = self.bytes.get_u8_err()?;

            if count > 0 {
                let declared = usize::from(count);
                let writable = declared.min(width - x);
                if writable < declared {
                    self.warn_overshoot(&mut clamp_warned)?;
                }
                let base = Self::dest_row(header, line) * width + x;
                if is_rle4 {
                    let pair = [value >> 4, value & 0x0F];
                    for (i, out) in indices[base..base + writable].iter_mut().enumerate() {
                        *out = pair[i % 2];
                    }
                } else {
                    indices[base..base + writable].fill(value);
                }
                x += writable;
                continue;
            }

            match value {
                0 => {
                    // end of line, any undershot remainder stays at
                    // index zero
                    x = 0;
                    line += 1;
                }
                1 => break 'decode,
                2 => {
                    // delta escape jumps the cursor without writing
                    let dx = usize::from(self.bytes.get_u8_err()?);
                    let dy = usize::from(self.bytes.get_u8_err()?);
                    x = (x + dx).min(width);
                    line += dy;
                }
                literal_count => {
                    let declared = usize::from(literal_count);
                    let writable = declared.min(width - x);
                    if writable < declared {
                        self.warn_overshoot(&mut clamp_warned)?;
                    }
                    let base = Self::dest_row(header, line) * width + x;

                    // every declared literal is consumed even when the
                    // write is clamped, otherwise the stream desyncs
                    if is_rle4 {
                        let mut packed = (declared + 1) / 2;
                        // absolute runs are padded to a 16-bit boundary
                        if packed % 2 == 1 {
                            packed += 1;
                        }
                        let mut literals = vec![0_u8; packed];
                        self.bytes.read_exact_bytes(&mut literals)?;
                        for (i, out) in indices[base..base + writable].iter_mut().enumerate() {
                            let byte = literals[i / 2];
                            *out = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                        }
                    } else {
                        let padded = declared + (declared % 2);
                        let mut literals = vec![0_u8; padded];
                        self.bytes.read_exact_bytes(&mut literals)?;
                        indices[base..base + writable].copy_from_slice(&literals[..writable]);
                    }
                    x += writable;
                }
            }
        }

        if keep_indices {
            buf[..width * height].copy_from_slice(&indices);
        } else {
            let mut warned = false;
            for (pix, index) in buf[..width * height * 4]
                .chunks_exact_mut(4)
                .zip(&indices)
            {
                let entry = self.palette.resolve_checked(usize::from(*index), &mut warned);
                pix.copy_from_slice(&[entry.red, entry.green, entry.blue, entry.alpha]);
            }
        }
        Ok(())
    }

    fn warn_overshoot(&self, warned: &mut bool) -> Result<(), BmpDecoderErrors> {
        if self.options.strict_mode() {
            return Err(BmpDecoderErrors::GenericStatic(
                "RLE run overshoots declared row width"
            ));
        }
        if !*warned {
            warn!("RLE run overshoots declared row width, clamping");
            *warned = true;
        }
        Ok(())
    }
}
