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

use crate::errors::TgaEncoderErrors;

/// A TGA encoder.
///
/// Always writes uncompressed 32-bit truecolor, bottom-up and
/// left-to-right, with no palette and no image ID. Input may be RGB
/// (alpha filled with 255) or RGBA.
pub struct TgaEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions
}

impl<'a> TgaEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> TgaEncoder<'a> {
        TgaEncoder { data, options }
    }

    /// Encode the pixels into `sink`, returning the number of bytes
    /// written.
    pub fn encode<T: RByteWriterTrait>(&self, sink: T) -> Result<usize, TgaEncoderErrors> {
        let width = self.options.width();
        let height = self.options.height();
        let colorspace = self.options.colorspace();

        let components = match colorspace {
            ColorSpace::RGB => 3,
            ColorSpace::RGBA => 4,
            other => return Err(TgaEncoderErrors::UnsupportedColorspace(other))
        };
        if width == 0 || height == 0 {
            return Err(TgaEncoderErrors::ZeroDimensions);
        }
        if width > usize::from(u16::MAX) || height > usize::from(u16::MAX) {
            return Err(TgaEncoderErrors::TooLargeDimensions(width.max(height)));
        }
        let expected = width * height * components;
        if self.data.len() != expected {
            return Err(TgaEncoderErrors::WrongInputSize(expected, self.data.len()));
        }

        let mut writer = RWriter::new(sink);
        writer.reserve(18 + width * height * 4)?;

        writer.write_u8_err(0)?; // no image ID
        writer.write_u8_err(0)?; // no palette
        writer.write_u8_err(2)?; // uncompressed truecolor
        writer.write_all(&[0_u8; 5])?; // palette specification
        writer.write_u16_le_err(0)?; // x origin
        writer.write_u16_le_err(0)?; // y origin
        writer.write_u16_le_err(width as u16)?;
        writer.write_u16_le_err(height as u16)?;
        writer.write_u8_err(32)?; // bits per pixel
        writer.write_u8_err(8)?; // descriptor, 8 alpha bits, bottom-up

        let row_stride = width * components;
        // bottom-up rows, BGRA byte order
        for row in self.data.chunks_exact(row_stride).rev() {
            for pix in row.chunks_exact(components) {
                let alpha = if components == 4 { pix[3] } else { 255 };
                writer.write_all(&[pix[2], pix[1], pix[0], alpha])?;
            }
        }
        writer.flush()?;

        Ok(writer.bytes_written())
    }
}
