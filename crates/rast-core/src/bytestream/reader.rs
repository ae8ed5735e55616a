/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::fmt::Formatter;

pub(crate) mod cursor;
pub(crate) mod std_readers;

use crate::bytestream::RByteReaderTrait;

/// Enumeration of possible methods to seek within an I/O object.
///
/// Analogous to [`SeekFrom`](std::io::SeekFrom), duplicated here so the
/// reader trait does not leak `std::io` types into codec signatures.
#[derive(Copy, PartialEq, Eq, Clone, Debug)]
pub enum RSeekFrom {
    /// Sets the offset to the provided number of bytes.
    Start(u64),
    /// Sets the offset to the size of this object plus the specified
    /// number of bytes.
    End(i64),
    /// Sets the offset to the current position plus the specified
    /// number of bytes.
    ///
    /// It is possible to seek beyond the end of an object, but it's an
    /// error to seek before byte 0.
    Current(i64)
}

impl RSeekFrom {
    pub(crate) fn to_std_seek(self) -> std::io::SeekFrom {
        match self {
            RSeekFrom::Start(pos) => std::io::SeekFrom::Start(pos),
            RSeekFrom::End(pos) => std::io::SeekFrom::End(pos),
            RSeekFrom::Current(pos) => std::io::SeekFrom::Current(pos)
        }
    }
}

/// Errors arising from stream reads and writes
pub enum RByteIoError {
    /// An error from the underlying `std::io` stream
    StdIoError(std::io::Error),
    /// A numeric cast that could not be carried out
    TryFromIntError(core::num::TryFromIntError),
    /// Requested bytes vs bytes actually read
    NotEnoughBytes(usize, usize),
    /// Bytes to write vs space actually available
    NotEnoughBuffer(usize, usize),
    /// Generic message
    Generic(&'static str),
    /// An out of bounds or otherwise impossible seek
    SeekError(&'static str)
}

impl core::fmt::Debug for RByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            RByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            RByteIoError::TryFromIntError(err) => {
                writeln!(f, "Cannot convert to int {}", err)
            }
            RByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            RByteIoError::NotEnoughBuffer(expected, found) => {
                writeln!(
                    f,
                    "Not enough buffer to write {expected} bytes, buffer size is {found}"
                )
            }
            RByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
            RByteIoError::SeekError(err) => {
                writeln!(f, "Seek error: {err}")
            }
        }
    }
}

impl From<std::io::Error> for RByteIoError {
    fn from(value: std::io::Error) -> Self {
        RByteIoError::StdIoError(value)
    }
}

impl From<core::num::TryFromIntError> for RByteIoError {
    fn from(value: core::num::TryFromIntError) -> Self {
        RByteIoError::TryFromIntError(value)
    }
}

impl From<&'static str> for RByteIoError {
    fn from(value: &'static str) -> Self {
        RByteIoError::Generic(value)
    }
}

/// A wrapper over a byte source with position and integer helpers.
///
/// Decoders wrap their input in this once and read integers, fixed
/// arrays and raw bytes through it. Every format in this workspace is
/// little endian on disk, so only little-endian accessors exist.
pub struct RReader<T: RByteReaderTrait> {
    inner: T
}

impl<T: RByteReaderTrait> RReader<T> {
    pub fn new(source: T) -> RReader<T> {
        RReader { inner: source }
    }

    /// Advance the stream position by `num` bytes without reading them.
    #[inline(always)]
    pub fn skip(&mut self, num: usize) -> Result<u64, RByteIoError> {
        self.inner.r_seek(RSeekFrom::Current(num as i64))
    }

    /// Move the stream position back by `num` bytes.
    #[inline(always)]
    pub fn rewind(&mut self, num: usize) -> Result<u64, RByteIoError> {
        self.inner.r_seek(RSeekFrom::Current(-(num as i64)))
    }

    #[inline(always)]
    pub fn seek(&mut self, from: RSeekFrom) -> Result<u64, RByteIoError> {
        self.inner.r_seek(from)
    }

    /// Seek to an absolute position from the start of the stream.
    #[inline]
    pub fn set_position(&mut self, position: usize) -> Result<(), RByteIoError> {
        self.seek(RSeekFrom::Start(position as u64))?;
        Ok(())
    }

    #[inline(always)]
    pub fn position(&mut self) -> Result<u64, RByteIoError> {
        self.inner.r_position()
    }

    /// Read a single byte, erroring out on EOF.
    #[inline(always)]
    pub fn get_u8_err(&mut self) -> Result<u8, RByteIoError> {
        Ok(self.read_fixed_bytes_or_error::<1>()?[0])
    }

    /// Read a `u16` stored little endian, erroring out on EOF.
    #[inline]
    pub fn get_u16_le_err(&mut self) -> Result<u16, RByteIoError> {
        Ok(u16::from_le_bytes(self.read_fixed_bytes_or_error::<2>()?))
    }

    /// Read a `u32` stored little endian, erroring out on EOF.
    #[inline]
    pub fn get_u32_le_err(&mut self) -> Result<u32, RByteIoError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes_or_error::<4>()?))
    }

    /// Read `N` bytes or error out if they cannot all be read.
    #[inline(always)]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], RByteIoError> {
        let mut byte_store = [0; N];
        self.inner.read_exact_bytes(&mut byte_store)?;
        Ok(byte_store)
    }

    /// Fill `buf` completely or error out.
    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError> {
        self.inner.read_exact_bytes(buf)
    }
}
