/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A BMP decoder and encoder
//!
//! The decoder handles every historical info-header size
//! (12, 40, 52, 56, 108 and 124 bytes) behind one canonical header.
//!
//! # Supported on decode
//! - Paletted images (1, 2, 4 and 8 bits)
//! - RLE (4 bit and 8 bit), including delta and absolute-mode escapes
//! - Masked images (16 bit and 32 bit bitfields)
//! - 24 and 32 bit raw images, with the historical 32-bit alpha
//!   heuristic and optional alpha premultiplication
//!
//! # Supported on encode
//! - Uncompressed 24-bit bottom-up images with a 40-byte header
//!
//! # Unsupported
//! - Embedded PNG and JPEG compression
//!
//! Output on decode is tightly packed top-down RGBA, or one index byte
//! per pixel when the caller asked to keep palette indices.

pub use crate::decoder::{probe_bmp, BmpDecoder};
pub use crate::encoder::BmpEncoder;
pub use crate::errors::{BmpDecoderErrors, BmpEncoderErrors};

mod common;
mod decoder;
mod encoder;
mod errors;
mod utils;
