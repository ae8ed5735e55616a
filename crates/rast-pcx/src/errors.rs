/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Formatter};

use rast_core::bytestream::RByteIoError;
use rast_core::colorspace::ColorSpace;

/// PCX errors that can occur during decoding
#[non_exhaustive]
pub enum PcxDecoderErrors {
    /// The first byte is not the fixed PCX manufacturer byte
    InvalidManufacturer(u8),
    /// The encoding byte is not byte-run-length
    UnsupportedEncoding(u8),
    /// A bits-per-pixel / plane-count combination this decoder does
    /// not understand
    UnsupportedPixelFormat(u8, u8),
    /// The declared bytes-per-scanline is smaller than the image width
    BadBytesPerLine(usize, usize),
    /// A width or height of zero
    ZeroDimensions,
    /// Too large dimensions for a given width or height
    TooLargeDimensions(&'static str, usize, usize),
    /// The output buffer is too small, expected at least
    /// a size but got another size
    TooSmallBuffer(usize, usize),
    /// Generic message
    GenericStatic(&'static str),
    IoErrors(RByteIoError)
}

impl Debug for PcxDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidManufacturer(byte) => {
                writeln!(f, "Invalid manufacturer byte {}, expected 10", byte)
            }
            Self::UnsupportedEncoding(enc) => {
                writeln!(f, "Unsupported encoding {}, only RLE (1) is understood", enc)
            }
            Self::UnsupportedPixelFormat(bpp, planes) => {
                writeln!(
                    f,
                    "Unsupported pixel format, {} bits per pixel with {} planes",
                    bpp, planes
                )
            }
            Self::BadBytesPerLine(line, width) => {
                writeln!(
                    f,
                    "Declared bytes per scanline {} is less than width {}",
                    line, width
                )
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
            Self::GenericStatic(message) => {
                writeln!(f, "{}", message)
            }
            Self::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
        }
    }
}

impl From<RByteIoError> for PcxDecoderErrors {
    fn from(value: RByteIoError) -> Self {
        PcxDecoderErrors::IoErrors(value)
    }
}

/// PCX errors that can occur during encoding
#[non_exhaustive]
pub enum PcxEncoderErrors {
    /// The input colorspace cannot be written as a 3-plane PCX
    UnsupportedColorspace(ColorSpace),
    /// Input length does not match width * height * components
    WrongInputSize(usize, usize),
    /// A width or height of zero
    ZeroDimensions,
    /// Dimensions exceed the 16-bit bounding box of the header
    TooLargeDimensions(usize),
    IoErrors(RByteIoError)
}

impl Debug for PcxEncoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedColorspace(colorspace) => {
                writeln!(f, "Cannot encode {colorspace:?} as PCX, expected RGB or RGBA")
            }
            Self::WrongInputSize(expected, found) => {
                writeln!(f, "Expected input of length {} but found {}", expected, found)
            }
            Self::ZeroDimensions => {
                writeln!(f, "Width or height is zero")
            }
            Self::TooLargeDimensions(dim) => {
                writeln!(f, "Dimension {} exceeds what a PCX header can store", dim)
            }
            Self::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
        }
    }
}

impl From<RByteIoError> for PcxEncoderErrors {
    fn from(value: RByteIoError) -> Self {
        PcxEncoderErrors::IoErrors(value)
    }
}
