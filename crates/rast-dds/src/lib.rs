/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A minimal DDS reader for block-compressed textures
//!
//! Only the three classic FourCC formats are handled, DXT1, DXT3 and
//! DXT5. The blocks are not decompressed; the decoder hands back the
//! compressed block data exactly as stored so it can be uploaded to a
//! GPU untouched. Uncompressed DDS variants and the DX10 extension
//! header are not supported.
//!
//! There is no encoder.

pub use crate::decoder::{probe_dds, DdsDecoder, DdsFormat};
pub use crate::errors::DdsDecoderErrors;

mod decoder;
mod errors;
