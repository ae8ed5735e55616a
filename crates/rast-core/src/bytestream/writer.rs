/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::mem::size_of;

pub(crate) mod std_writers;

use crate::bytestream::reader::RByteIoError;
use crate::bytestream::RByteWriterTrait;

/// An endian-aware wrapper over a byte sink.
///
/// Encoders wrap their output in this once and write integers and raw
/// bytes through it, it also tracks how many bytes have been handed to
/// the sink.
pub struct RWriter<T: RByteWriterTrait> {
    inner:         T,
    bytes_written: usize
}

impl<T: RByteWriterTrait> RWriter<T> {
    pub fn new(sink: T) -> RWriter<T> {
        RWriter {
            inner:         sink,
            bytes_written: 0
        }
    }

    /// Destroy this writer returning the underlying sink.
    #[inline(always)]
    pub fn consume(self) -> T {
        self.inner
    }

    /// Number of bytes handed to the sink so far.
    #[inline(always)]
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Hint the expected total output size to the sink.
    #[inline]
    pub fn reserve(&mut self, size: usize) -> Result<(), RByteIoError> {
        self.inner.reserve_capacity(size)
    }

    /// Write a single byte to the sink or error out.
    #[inline(always)]
    pub fn write_u8_err(&mut self, byte: u8) -> Result<(), RByteIoError> {
        self.write_all(&[byte])
    }

    /// Write every byte of `buf` to the sink or error out.
    #[inline]
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), RByteIoError> {
        self.inner.write_all_bytes(buf)?;
        self.bytes_written += buf.len();
        Ok(())
    }

    /// Ensure all written bytes have reached the sink.
    ///
    /// Call once after the final write, a failure here means the output
    /// is not durable even though every write succeeded.
    #[inline]
    pub fn flush(&mut self) -> Result<(), RByteIoError> {
        self.inner.flush_bytes()
    }
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

macro_rules! write_single_type {
    ($name:tt,$name2:tt,$name3:tt,$int_type:tt) => {
        impl<T: RByteWriterTrait> RWriter<T>
        {
            #[inline(always)]
            fn $name(&mut self, value: $int_type, mode: Mode) -> Result<(), RByteIoError>
            {
                const SIZE: usize = size_of::<$int_type>();

                let bytes: [u8; SIZE] = match mode {
                    Mode::BE => value.to_be_bytes(),
                    Mode::LE => value.to_le_bytes()
                };
                self.write_all(&bytes)
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying sink cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name2(&mut self, value: $int_type) -> Result<(), RByteIoError>
            {
                self.$name(value, Mode::BE)
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying sink cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name3(&mut self, value: $int_type) -> Result<(), RByteIoError>
            {
                self.$name(value, Mode::LE)
            }
        }
    };
}

write_single_type!(write_u16_inner, write_u16_be_err, write_u16_le_err, u16);
write_single_type!(write_u32_inner, write_u32_be_err, write_u32_le_err, u32);
