/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A PCX decoder and encoder
//!
//! # Supported on decode
//! - 8-bit indexed images with the 256-color trailer palette
//! - 24-bit images stored as three color planes per scanline
//!
//! # Supported on encode
//! - The 8-bit-per-plane, 3-plane RLE layout every reader understands
//!
//! Output on decode is tightly packed top-down RGBA, or one index byte
//! per pixel for 8-bit files when the caller asked to keep palette
//! indices.

pub use crate::decoder::{probe_pcx, PcxDecoder};
pub use crate::encoder::PcxEncoder;
pub use crate::errors::{PcxDecoderErrors, PcxEncoderErrors};

mod decoder;
mod encoder;
mod errors;
