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

use crate::errors::PcxEncoderErrors;

/// Longest run a single control byte can encode.
const MAX_RUN: usize = 63;

/// A PCX encoder.
///
/// Always writes the version 5, 8-bit-per-plane, 3-plane RLE layout.
/// Input may be RGB or RGBA, the alpha channel is dropped.
pub struct PcxEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions
}

impl<'a> PcxEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> PcxEncoder<'a> {
        PcxEncoder { data, options }
    }

    /// Encode the pixels into `sink`, returning the number of bytes
    /// written.
    pub fn encode<T: RByteWriterTrait>(&self, sink: T) -> Result<usize, PcxEncoderErrors> {
        let width = self.options.width();
        let height = self.options.height();
        let colorspace = self.options.colorspace();

        let components = match colorspace {
            ColorSpace::RGB => 3,
            ColorSpace::RGBA => 4,
            other => return Err(PcxEncoderErrors::UnsupportedColorspace(other))
        };
        if width == 0 || height == 0 {
            return Err(PcxEncoderErrors::ZeroDimensions);
        }
        // the header stores the bounding box in u16 fields
        if width > usize::from(u16::MAX) || height > usize::from(u16::MAX) {
            return Err(PcxEncoderErrors::TooLargeDimensions(width.max(height)));
        }
        let expected = width * height * components;
        if self.data.len() != expected {
            return Err(PcxEncoderErrors::WrongInputSize(expected, self.data.len()));
        }

        let mut writer = RWriter::new(sink);
        // worst case every byte costs a control byte
        writer.reserve(128 + width * height * 6)?;

        writer.write_u8_err(10)?; // manufacturer
        writer.write_u8_err(5)?; // version
        writer.write_u8_err(1)?; // RLE encoding
        writer.write_u8_err(8)?; // bits per plane
        writer.write_u16_le_err(0)?; // x min
        writer.write_u16_le_err(0)?; // y min
        writer.write_u16_le_err((width - 1) as u16)?;
        writer.write_u16_le_err((height - 1) as u16)?;
        writer.write_u16_le_err(320)?; // horizontal dpi
        writer.write_u16_le_err(200)?; // vertical dpi
        writer.write_all(&[0_u8; 48])?; // legacy 16-color palette
        writer.write_u8_err(0)?; // reserved
        writer.write_u8_err(3)?; // planes
        writer.write_u16_le_err(width as u16)?;
        writer.write_u16_le_err(1)?; // palette info, color
        writer.write_all(&[0_u8; 58])?; // filler up to 128 bytes

        let mut plane = vec![0_u8; width];
        let row_stride = width * components;

        for row in self.data.chunks_exact(row_stride) {
            for channel in 0..3 {
                for (value, pix) in plane.iter_mut().zip(row.chunks_exact(components)) {
                    *value = pix[channel];
                }
                write_rle_plane(&mut writer, &plane)?;
            }
        }
        writer.flush()?;

        Ok(writer.bytes_written())
    }
}

/// RLE-encode one plane of one scanline.
///
/// Runs cap at 63 bytes; a lone byte with its top two bits set cannot
/// be written literally and goes out as a run of one.
fn write_rle_plane<T: RByteWriterTrait>(
    writer: &mut RWriter<T>, plane: &[u8]
) -> Result<(), PcxEncoderErrors> {
    let mut i = 0;
    while i < plane.len() {
        let value = plane[i];
        let mut run = 1;
        while run < MAX_RUN && i + run < plane.len() && plane[i + run] == value {
            run += 1;
        }
        if run > 1 || value >= 0xC0 {
            writer.write_u8_err(0xC0 | run as u8)?;
        }
        writer.write_u8_err(value)?;
        i += run;
    }
    Ok(())
}
