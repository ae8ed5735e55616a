/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Byte stream reading and writing
//!
//! This module exposes the traits codecs use for I/O together with
//! endian-aware wrappers over them.
//!
//! Readers implement [`RByteReaderTrait`], writers implement
//! [`RByteWriterTrait`]. Both traits are object safe so that dispatch
//! layers can hold `&mut dyn` streams; codecs themselves stay generic
//! and pay no virtual-call cost for concrete types.
//!
//! For in-memory buffers prefer [`RCursor`] over [`std::io::Cursor`],
//! it implements the reader trait without going through the `std::io`
//! error machinery.

pub use self::reader::{RByteIoError, RReader, RSeekFrom};
pub use self::reader::cursor::RCursor;
pub use self::traits::{RByteReaderTrait, RByteWriterTrait};
pub use self::writer::RWriter;

mod reader;
mod traits;
mod writer;
