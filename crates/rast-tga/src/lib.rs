/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A TGA decoder and encoder
//!
//! # Supported on decode
//! - Paletted, truecolor and grayscale images, plain or RLE compressed
//! - 8, 15, 16, 24 and 32 bits per pixel
//! - All four origin-flag combinations in the descriptor byte
//!
//! # Supported on encode
//! - Uncompressed 32-bit truecolor, the variant every reader accepts
//!
//! Output on decode is tightly packed top-down left-to-right RGBA
//! whatever the stored ordering was, or one index byte per pixel for
//! 8-bit images when the caller asked to keep palette indices.
//!
//! TGA has no magic number, so there is no content probe here; dispatch
//! on this format goes by file extension alone.

pub use crate::decoder::TgaDecoder;
pub use crate::encoder::TgaEncoder;
pub use crate::errors::{TgaDecoderErrors, TgaEncoderErrors};

mod decoder;
mod encoder;
mod errors;
