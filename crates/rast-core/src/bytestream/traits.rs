/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Traits for reading and writing images in the rast crates
//!
//! Anything seekable and byte addressable can back a decoder by
//! implementing [`RByteReaderTrait`], and anything that accepts bytes can
//! back an encoder by implementing [`RByteWriterTrait`].
//!
//! Both traits are deliberately object safe: fixed-size and endian-aware
//! reads live on the [`RReader`](crate::bytestream::RReader) and
//! [`RWriter`](crate::bytestream::RWriter) wrappers instead, so a
//! `&mut dyn RByteReaderTrait` is a valid reader for any decoder.

use crate::bytestream::reader::{RByteIoError, RSeekFrom};

/// The input trait implemented for readers.
///
/// Implemented out of the box for [`RCursor`](crate::bytestream::RCursor)
/// (in-memory buffers) and for [`BufReader`](std::io::BufReader) over
/// anything that is `Read + Seek`, and for `&mut T` of any implementor.
pub trait RByteReaderTrait {
    /// Read a single byte from the stream and return `0`
    /// if the byte cannot be read, e.g because of EOF.
    ///
    /// Called from hot per-pixel loops, implementations should make it cheap.
    fn read_byte_no_error(&mut self) -> u8;

    /// Read exact bytes required to fill `buf` or return an error if that
    /// isn't possible.
    ///
    /// On error the implementation should not advance the stream position.
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError>;

    /// Read bytes into `buf` returning how many bytes were read or an
    /// error if one occurred.
    ///
    /// Unlike [`read_exact_bytes`](Self::read_exact_bytes) a short read is
    /// not an error.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, RByteIoError>;

    /// Fill `buf` with upcoming data without advancing the stream position.
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError>;

    /// Seek to a new position in the stream.
    fn r_seek(&mut self, from: RSeekFrom) -> Result<u64, RByteIoError>;

    /// Report whether we are at the end of the stream.
    ///
    /// May cost a syscall for file-backed readers, use sparingly.
    fn is_eof(&mut self) -> Result<bool, RByteIoError>;

    /// Return the current stream position.
    fn r_position(&mut self) -> Result<u64, RByteIoError>;
}

impl<T: RByteReaderTrait + ?Sized> RByteReaderTrait for &mut T {
    #[inline(always)]
    fn read_byte_no_error(&mut self) -> u8 {
        (**self).read_byte_no_error()
    }

    #[inline(always)]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError> {
        (**self).read_exact_bytes(buf)
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, RByteIoError> {
        (**self).read_bytes(buf)
    }

    #[inline(always)]
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError> {
        (**self).peek_exact_bytes(buf)
    }

    #[inline(always)]
    fn r_seek(&mut self, from: RSeekFrom) -> Result<u64, RByteIoError> {
        (**self).r_seek(from)
    }

    #[inline(always)]
    fn is_eof(&mut self) -> Result<bool, RByteIoError> {
        (**self).is_eof()
    }

    #[inline(always)]
    fn r_position(&mut self) -> Result<u64, RByteIoError> {
        (**self).r_position()
    }
}

/// The writer trait implemented for encoder sinks.
///
/// Implemented out of the box for `Vec<u8>`, for
/// [`BufWriter`](std::io::BufWriter) over anything `Write`, and for
/// `&mut T` of any implementor.
pub trait RByteWriterTrait {
    /// Write some bytes into the sink returning the number of bytes
    /// written or an error.
    ///
    /// An implementation is free to write fewer bytes than are in `buf`.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, RByteIoError>;

    /// Write every byte of `buf` to the sink or error out.
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), RByteIoError>;

    /// Ensure written bytes have reached the sink.
    ///
    /// Encoders call this once after the last write so a failing final
    /// flush is not silently swallowed.
    fn flush_bytes(&mut self) -> Result<(), RByteIoError>;

    /// A hint for how many bytes the encoded output is expected to take.
    ///
    /// In-memory sinks can use this to reserve memory up front; sinks that
    /// cannot make use of it should just return `Ok(())`.
    fn reserve_capacity(&mut self, size: usize) -> Result<(), RByteIoError>;
}

impl<T: RByteWriterTrait + ?Sized> RByteWriterTrait for &mut T {
    #[inline(always)]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, RByteIoError> {
        (**self).write_bytes(buf)
    }

    #[inline(always)]
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), RByteIoError> {
        (**self).write_all_bytes(buf)
    }

    #[inline(always)]
    fn flush_bytes(&mut self) -> Result<(), RByteIoError> {
        (**self).flush_bytes()
    }

    #[inline(always)]
    fn reserve_capacity(&mut self, size: usize) -> Result<(), RByteIoError> {
        (**self).reserve_capacity(size)
    }
}
