/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by the rast codec crates
//!
//! This crate provides the pieces every codec in the rast family
//! needs but none of them should own:
//!
//! - A bytestream reader and writer with endian aware reads and writes
//! - Colorspace information shared by decoded images
//! - Image decoder and encoder options
//! - The shared palette table used by all indexed-color formats
//! - Bitfield mask decomposition used by packed-pixel formats
//!
//! # Features
//!  - `serde`: Enables serializing of some of the data structures
//!    present in the crate

pub mod bitfield;
pub mod bytestream;
pub mod colorspace;
pub mod options;
pub mod palette;
