/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use std::io::{BufWriter, Write};

use crate::bytestream::reader::RByteIoError;
use crate::bytestream::RByteWriterTrait;

/// Growable in-memory sink.
impl RByteWriterTrait for Vec<u8> {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, RByteIoError> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), RByteIoError> {
        self.extend_from_slice(buf);
        Ok(())
    }

    #[inline]
    fn flush_bytes(&mut self) -> Result<(), RByteIoError> {
        Ok(())
    }

    #[inline]
    fn reserve_capacity(&mut self, size: usize) -> Result<(), RByteIoError> {
        self.reserve(size);
        Ok(())
    }
}

/// File-style sink, anything `Write` wrapped in a [`BufWriter`].
impl<W: Write> RByteWriterTrait for BufWriter<W> {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, RByteIoError> {
        self.write(buf).map_err(RByteIoError::StdIoError)
    }

    #[inline]
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), RByteIoError> {
        self.write_all(buf).map_err(RByteIoError::StdIoError)
    }

    #[inline]
    fn flush_bytes(&mut self) -> Result<(), RByteIoError> {
        self.flush().map_err(RByteIoError::StdIoError)
    }

    #[inline]
    fn reserve_capacity(&mut self, _size: usize) -> Result<(), RByteIoError> {
        Ok(())
    }
}
