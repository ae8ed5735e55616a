/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Format-agnostic image loading and saving over the rast codecs
//!
//! The entry point is the [`FormatRegistry`](registry::FormatRegistry),
//! an explicit context object mapping file extensions to handlers. A
//! registry created through
//! [`with_builtin_formats`](registry::FormatRegistry::with_builtin_formats)
//! knows BMP, PCX and TGA for both loading and saving and DDS for
//! loading:
//!
//! ```no_run
//! use rast_image::registry::FormatRegistry;
//!
//! let registry = FormatRegistry::with_builtin_formats();
//! let bitmap = registry.load("photo.bmp").unwrap();
//! registry.save("copy.pcx", &bitmap).unwrap();
//! ```
//!
//! When the extension is untrustworthy,
//! [`guess_format`](format::guess_format) sniffs magic bytes instead.

pub mod bitmap;
pub mod errors;
pub mod format;
pub mod registry;
