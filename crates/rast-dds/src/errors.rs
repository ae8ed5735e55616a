/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Formatter};

use rast_core::bytestream::RByteIoError;

/// DDS errors that can occur during decoding
#[non_exhaustive]
pub enum DdsDecoderErrors {
    /// The file does not start with the DDS magic
    InvalidMagicBytes,
    /// The header-size field is not the fixed 124
    InvalidHeaderSize(u32),
    /// The pixel-format size field is not the fixed 32
    InvalidPixelFormatSize(u32),
    /// The pixel format does not carry a FourCC, uncompressed DDS is
    /// unsupported
    NoFourCc,
    /// A FourCC outside the three supported block formats
    UnsupportedFourCc([u8; 4]),
    /// A width or height of zero
    ZeroDimensions,
    /// Too large dimensions for a given width or height
    TooLargeDimensions(&'static str, usize, usize),
    /// The output buffer is too small, expected at least
    /// a size but got another size
    TooSmallBuffer(usize, usize),
    /// The destination row pitch is smaller than a row of blocks
    TooSmallPitch(usize, usize),
    /// Generic message
    GenericStatic(&'static str),
    IoErrors(RByteIoError)
}

impl Debug for DdsDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidMagicBytes => {
                writeln!(f, "Invalid magic bytes, expected `DDS `")
            }
            Self::InvalidHeaderSize(size) => {
                writeln!(f, "Invalid header size {}, expected 124", size)
            }
            Self::InvalidPixelFormatSize(size) => {
                writeln!(f, "Invalid pixel format size {}, expected 32", size)
            }
            Self::NoFourCc => {
                writeln!(f, "Pixel format carries no FourCC, uncompressed DDS is unsupported")
            }
            Self::UnsupportedFourCc(fourcc) => {
                writeln!(f, "Unsupported FourCC {:?}", fourcc)
            }
            Self::ZeroDimensions => {
                writeln!(f, "Width or height is zero")
            }
            Self::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension}, {found} exceeds {expected}"
                )
            }
            Self::TooSmallBuffer(expected, found) => {
                writeln!(
                    f,
                    "Too small of buffer, expected {} but found {}",
                    expected, found
                )
            }
            Self::TooSmallPitch(expected, found) => {
                writeln!(
                    f,
                    "Destination pitch {} is smaller than a block row of {} bytes",
                    found, expected
                )
            }
            Self::GenericStatic(message) => {
                writeln!(f, "{}", message)
            }
            Self::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
        }
    }
}

impl From<RByteIoError> for DdsDecoderErrors {
    fn from(value: RByteIoError) -> Self {
        DdsDecoderErrors::IoErrors(value)
    }
}
