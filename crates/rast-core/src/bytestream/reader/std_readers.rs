/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use crate::bytestream::reader::{RByteIoError, RSeekFrom};
use crate::bytestream::RByteReaderTrait;

/// File-style reader, anything `Read + Seek` wrapped in a [`BufReader`].
///
/// The buffered wrapper is required; codecs issue many small reads and a
/// bare `File` would turn each one into a syscall.
impl<T: Read + Seek> RByteReaderTrait for BufReader<T> {
    #[inline]
    fn read_byte_no_error(&mut self) -> u8 {
        let mut buf = [0];
        let _ = self.read(&mut buf);
        buf[0]
    }

    #[inline]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError> {
        match self.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(err) => {
                // read_exact leaves the position unspecified on failure,
                // keep the trait contract by rewinding past whatever it took
                let _ = self.seek(SeekFrom::Current(-(buf.len() as i64)));
                Err(RByteIoError::StdIoError(err))
            }
        }
    }

    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, RByteIoError> {
        let mut read = 0;
        while read < buf.len() {
            match self.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(err) => return Err(RByteIoError::StdIoError(err))
            }
        }
        Ok(read)
    }

    #[inline]
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError> {
        self.read_exact(buf)
            .map_err(RByteIoError::StdIoError)?;
        self.seek(SeekFrom::Current(-(buf.len() as i64)))
            .map_err(RByteIoError::StdIoError)?;
        Ok(())
    }

    #[inline]
    fn r_seek(&mut self, from: RSeekFrom) -> Result<u64, RByteIoError> {
        // seek_relative preserves the internal buffer where possible
        if let RSeekFrom::Current(off) = from {
            let pos = self.stream_position()?;
            self.seek_relative(off)?;
            return Ok((pos as i64 + off) as u64);
        }
        self.seek(from.to_std_seek()).map_err(RByteIoError::StdIoError)
    }

    #[inline]
    fn is_eof(&mut self) -> Result<bool, RByteIoError> {
        self.fill_buf()
            .map(|buf| buf.is_empty())
            .map_err(RByteIoError::StdIoError)
    }

    #[inline]
    fn r_position(&mut self) -> Result<u64, RByteIoError> {
        self.stream_position().map_err(RByteIoError::StdIoError)
    }
}
