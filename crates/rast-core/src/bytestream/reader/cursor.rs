/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use crate::bytestream::reader::{RByteIoError, RSeekFrom};
use crate::bytestream::RByteReaderTrait;

/// An in-memory reader over anything that derefs to a byte slice.
///
/// This is the preferred reader for buffers already in memory, it never
/// goes through `std::io` and every operation is a bounds check and a
/// copy at worst.
pub struct RCursor<T: AsRef<[u8]>> {
    stream:   T,
    position: usize
}

impl<T: AsRef<[u8]>> RCursor<T> {
    pub fn new(stream: T) -> RCursor<T> {
        RCursor {
            stream,
            position: 0
        }
    }

    #[inline]
    fn remaining(&self) -> &[u8] {
        let stream = self.stream.as_ref();
        &stream[self.position.min(stream.len())..]
    }
}

impl<T: AsRef<[u8]>> RByteReaderTrait for RCursor<T> {
    #[inline(always)]
    fn read_byte_no_error(&mut self) -> u8 {
        match self.stream.as_ref().get(self.position) {
            Some(byte) => {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }

    #[inline]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError> {
        let remaining = self.remaining();
        if remaining.len() < buf.len() {
            return Err(RByteIoError::NotEnoughBytes(buf.len(), remaining.len()));
        }
        buf.copy_from_slice(&remaining[..buf.len()]);
        self.position += buf.len();
        Ok(())
    }

    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, RByteIoError> {
        let remaining = self.remaining();
        let can_read = remaining.len().min(buf.len());
        buf[..can_read].copy_from_slice(&remaining[..can_read]);
        self.position += can_read;
        Ok(can_read)
    }

    #[inline]
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), RByteIoError> {
        let remaining = self.remaining();
        if remaining.len() < buf.len() {
            return Err(RByteIoError::NotEnoughBytes(buf.len(), remaining.len()));
        }
        buf.copy_from_slice(&remaining[..buf.len()]);
        Ok(())
    }

    fn r_seek(&mut self, from: RSeekFrom) -> Result<u64, RByteIoError> {
        let len = self.stream.as_ref().len() as i64;
        let new_pos = match from {
            RSeekFrom::Start(pos) => i64::try_from(pos)?,
            RSeekFrom::End(pos) => len + pos,
            RSeekFrom::Current(pos) => self.position as i64 + pos
        };
        if new_pos < 0 {
            return Err(RByteIoError::SeekError("cannot seek before byte 0"));
        }
        self.position = new_pos as usize;
        Ok(self.position as u64)
    }

    #[inline]
    fn is_eof(&mut self) -> Result<bool, RByteIoError> {
        Ok(self.position >= self.stream.as_ref().len())
    }

    #[inline]
    fn r_position(&mut self) -> Result<u64, RByteIoError> {
        Ok(self.position as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_and_seeks() {
        let mut cursor = RCursor::new([1_u8, 2, 3, 4, 5]);
        assert_eq!(cursor.read_byte_no_error(), 1);

        let mut two = [0; 2];
        cursor.read_exact_bytes(&mut two).unwrap();
        assert_eq!(two, [2, 3]);

        cursor.r_seek(RSeekFrom::Start(0)).unwrap();
        assert_eq!(cursor.read_byte_no_error(), 1);

        cursor.r_seek(RSeekFrom::End(-1)).unwrap();
        assert_eq!(cursor.read_byte_no_error(), 5);
        assert!(cursor.is_eof().unwrap());
    }

    #[test]
    fn peek_does_not_advance() {
        let mut cursor = RCursor::new([9_u8, 8, 7]);
        let mut buf = [0; 2];
        cursor.peek_exact_bytes(&mut buf).unwrap();
        assert_eq!(buf, [9, 8]);
        assert_eq!(cursor.r_position().unwrap(), 0);
    }

    #[test]
    fn short_read_reports_bytes_read() {
        let mut cursor = RCursor::new([1_u8, 2]);
        let mut buf = [0; 4];
        assert_eq!(cursor.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[1, 2]);
    }

    #[test]
    fn short_exact_read_is_an_error() {
        let mut cursor = RCursor::new([1_u8]);
        let mut buf = [0; 4];
        assert!(cursor.read_exact_bytes(&mut buf).is_err());
        // position untouched after the failed read
        assert_eq!(cursor.r_position().unwrap(), 0);
    }
}
