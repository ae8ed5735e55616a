/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoder and encoder options
//!
//! One `DecoderOptions` value configures every decoder in the rast
//! family, so a single instance can be reused across formats. Same for
//! `EncoderOptions` and the encoders.

pub use self::decoder::DecoderOptions;
pub use self::encoder::EncoderOptions;

mod decoder;
mod encoder;
