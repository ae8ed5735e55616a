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

/// BMP errors that can occur during decoding
#[non_exhaustive]
pub enum BmpDecoderErrors {
    /// The file/bytes do not start with `BM`
    InvalidMagicBytes,
    /// The info-header size is not one of the six known variants
    UnsupportedHeaderSize(u32),
    /// The header declares a negative width
    NegativeWidth,
    /// A width or height of zero
    ZeroDimensions,
    /// Too large dimensions for a given width or height
    TooLargeDimensions(&'static str, usize, usize),
    /// A bit depth this decoder does not understand
    UnsupportedBitDepth(u16),
    /// A compression code this decoder does not understand
    UnsupportedCompression(u32),
    /// A channel mask whose set bits are not one contiguous run
    InvalidBitfieldMask(u32),
    /// The output buffer is too small, expected at least
    /// a size but got another size
    TooSmallBuffer(usize, usize),
    /// Generic message
    GenericStatic(&'static str),
    IoErrors(RByteIoError)
}

impl Debug for BmpDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidMagicBytes => {
                writeln!(f, "Invalid magic bytes, file does not start with BM")
            }
            Self::UnsupportedHeaderSize(size) => {
                writeln!(f, "Unknown info header size {}", size)
            }
            Self::NegativeWidth => {
                writeln!(f, "Negative width is not allowed")
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
            Self::UnsupportedBitDepth(depth) => {
                writeln!(f, "Unsupported bit depth {}", depth)
            }
            Self::UnsupportedCompression(comp) => {
                writeln!(f, "Unsupported compression code {}", comp)
            }
            Self::InvalidBitfieldMask(mask) => {
                writeln!(f, "Invalid bitfield mask {mask:#010x}, set bits are not contiguous")
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

impl From<RByteIoError> for BmpDecoderErrors {
    fn from(value: RByteIoError) -> Self {
        BmpDecoderErrors::IoErrors(value)
    }
}

/// BMP errors that can occur during encoding
#[non_exhaustive]
pub enum BmpEncoderErrors {
    /// The input colorspace cannot be written as 24-bit BMP
    UnsupportedColorspace(ColorSpace),
    /// Input length does not match width * height * components
    WrongInputSize(usize, usize),
    /// A width or height of zero
    ZeroDimensions,
    /// Dimensions exceed what the format can store
    TooLargeDimensions(usize),
    IoErrors(RByteIoError)
}

impl Debug for BmpEncoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedColorspace(colorspace) => {
                writeln!(f, "Cannot encode {colorspace:?} as 24-bit BMP, expected RGB or RGBA")
            }
            Self::WrongInputSize(expected, found) => {
                writeln!(f, "Expected input of length {} but found {}", expected, found)
            }
            Self::ZeroDimensions => {
                writeln!(f, "Width or height is zero")
            }
            Self::TooLargeDimensions(dim) => {
                writeln!(f, "Dimension {} exceeds what a BMP header can store", dim)
            }
            Self::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
        }
    }
}

impl From<RByteIoError> for BmpEncoderErrors {
    fn from(value: RByteIoError) -> Self {
        BmpEncoderErrors::IoErrors(value)
    }
}
