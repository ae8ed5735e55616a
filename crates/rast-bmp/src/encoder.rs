/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use rast_core::bytestream::{RByteWriterTrait, RWriter};
use rast_core::colorspace::ColorSpace;
use rast_core::options::EncoderOptions;

use crate::errors::BmpEncoderErrors;

/// Size of the file header plus the 40-byte info header.
const PIXEL_OFFSET: u32 = 14 + 40;

/// A BMP encoder.
///
/// Always writes the one historical variant every reader understands:
/// uncompressed 24-bit bottom-up pixels under a 40-byte info header,
/// rows zero-padded to a 4-byte boundary. Input may be RGB or RGBA,
/// the alpha channel is dropped.
pub struct BmpEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions
}

impl<'a> BmpEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> BmpEncoder<'a> {
        BmpEncoder { data, options }
    }

    /// Encode the pixels into `sink`, returning the number of bytes
    /// written.
    pub fn encode<T: RByteWriterTrait>(&self, sink: T) -> Result<usize, BmpEncoderErrors> {
        let width = self.options.width();
        let height = self.options.height();
        let colorspace = self.options.colorspace();

        let components = match colorspace {
            ColorSpace::RGB => 3,
            ColorSpace::RGBA => 4,
            other => return Err(BmpEncoderErrors::UnsupportedColorspace(other))
        };
        if width == 0 || height == 0 {
            return Err(BmpEncoderErrors::ZeroDimensions);
        }
        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(BmpEncoderErrors::TooLargeDimensions(width.max(height)));
        }
        let expected = width * height * components;
        if self.data.len() != expected {
            return Err(BmpEncoderErrors::WrongInputSize(expected, self.data.len()));
        }

        let pad = (4 - (width * 3) % 4) % 4;
        let row_size = width * 3 + pad;
        let file_size = PIXEL_OFFSET as usize + row_size * height;

        let mut writer = RWriter::new(sink);
        writer.reserve(file_size)?;

        // file header
        writer.write_all(b"BM")?;
        writer.write_u32_le_err(file_size as u32)?;
        writer.write_u32_le_err(0)?; // reserved
        writer.write_u32_le_err(PIXEL_OFFSET)?;
        // info header
        writer.write_u32_le_err(40)?;
        writer.write_u32_le_err(width as u32)?;
        writer.write_u32_le_err(height as u32)?;
        writer.write_u16_le_err(1)?; // planes
        writer.write_u16_le_err(24)?; // bits per pixel
        writer.write_u32_le_err(0)?; // compression, BI_RGB
        writer.write_u32_le_err((row_size * height) as u32)?;
        writer.write_u32_le_err(2835)?; // x pixels per meter, 72 dpi
        writer.write_u32_le_err(2835)?; // y pixels per meter
        writer.write_u32_le_err(0)?; // colors used
        writer.write_u32_le_err(0)?; // important colors

        let padding = [0_u8; 3];
        let row_stride = width * components;

        // bottom-up rows, BGR byte order
        for row in self.data.chunks_exact(row_stride).rev() {
            for pix in row.chunks_exact(components) {
                writer.write_all(&[pix[2], pix[1], pix[0]])?;
            }
            writer.write_all(&padding[..pad])?;
        }
        writer.flush()?;

        Ok(writer.bytes_written())
    }
}
