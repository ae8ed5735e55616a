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

/// TGA errors that can occur during decoding
#[non_exhaustive]
pub enum TgaDecoderErrors {
    /// The image-type byte is not paletted, truecolor or grayscale
    UnsupportedImageType(u8),
    /// The palette-type byte disagrees with the image type
    PaletteTypeMismatch(u8, u8),
    /// A bit depth the image type does not allow
    UnsupportedBitDepth(u8, u8),
    /// A palette entry size other than 16, 24 or 32 bits
    UnsupportedPaletteEntrySize(u8),
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

impl Debug for TgaDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedImageType(image_type) => {
                writeln!(f, "Unsupported image type {}", image_type)
            }
            Self::PaletteTypeMismatch(image_type, palette_type) => {
                writeln!(
                    f,
                    "Palette type {} does not match image type {}",
                    palette_type, image_type
                )
            }
            Self::UnsupportedBitDepth(image_type, depth) => {
                writeln!(
                    f,
                    "Unsupported bit depth {} for image type {}",
                    depth, image_type
                )
            }
            Self::UnsupportedPaletteEntrySize(size) => {
                writeln!(f, "Unsupported palette entry size of {} bits", size)
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

impl From<RByteIoError> for TgaDecoderErrors {
    fn from(value: RByteIoError) -> Self {
        TgaDecoderErrors::IoErrors(value)
    }
}

/// TGA errors that can occur during encoding
#[non_exhaustive]
pub enum TgaEncoderErrors {
    /// The input colorspace cannot be written as 32-bit truecolor
    UnsupportedColorspace(ColorSpace),
    /// Input length does not match width * height * components
    WrongInputSize(usize, usize),
    /// A width or height of zero
    ZeroDimensions,
    /// Dimensions exceed the 16-bit fields of the header
    TooLargeDimensions(usize),
    IoErrors(RByteIoError)
}

impl Debug for TgaEncoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedColorspace(colorspace) => {
                writeln!(f, "Cannot encode {colorspace:?} as TGA, expected RGB or RGBA")
            }
            Self::WrongInputSize(expected, found) => {
                writeln!(f, "Expected input of length {} but found {}", expected, found)
            }
            Self::ZeroDimensions => {
                writeln!(f, "Width or height is zero")
            }
            Self::TooLargeDimensions(dim) => {
                writeln!(f, "Dimension {} exceeds what a TGA header can store", dim)
            }
            Self::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
        }
    }
}

impl From<RByteIoError> for TgaEncoderErrors {
    fn from(value: RByteIoError) -> Self {
        TgaEncoderErrors::IoErrors(value)
    }
}
