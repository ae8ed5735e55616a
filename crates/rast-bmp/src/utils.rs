/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Sub-byte pixel unpacking
//!
//! BMP packs 1, 2 and 4-bit palette indices most-significant-bit first
//! into word-aligned rows. Each depth gets its own pure expansion
//! routine so the bit arithmetic is testable on its own; trailing pad
//! bits at the end of a row fall away because the caller sizes `output`
//! to the pixel width.

/// Expand 1-bit indices, 8 pixels per byte, MSB first.
pub fn expand_bits_1(input: &[u8], output: &mut [u8]) {
    let mut out_chunks = output.chunks_exact_mut(8);
    let mut in_bytes = input.iter();

    for (chunk, byte) in (&mut out_chunks).zip(&mut in_bytes) {
        for (i, out) in chunk.iter_mut().enumerate() {
            *out = (byte >> (7 - i)) & 1;
        }
    }
    // partial trailing chunk
    let remainder = out_chunks.into_remainder();
    if let (false, Some(byte)) = (remainder.is_empty(), in_bytes.next()) {
        for (i, out) in remainder.iter_mut().enumerate() {
            *out = (byte >> (7 - i)) & 1;
        }
    }
}

/// Expand 2-bit indices, 4 pixels per byte, high crumb first.
pub fn expand_bits_2(input: &[u8], output: &mut [u8]) {
    let mut out_chunks = output.chunks_exact_mut(4);
    let mut in_bytes = input.iter();

    for (chunk, byte) in (&mut out_chunks).zip(&mut in_bytes) {
        for (i, out) in chunk.iter_mut().enumerate() {
            *out = (byte >> (6 - 2 * i)) & 0b11;
        }
    }
    let remainder = out_chunks.into_remainder();
    if let (false, Some(byte)) = (remainder.is_empty(), in_bytes.next()) {
        for (i, out) in remainder.iter_mut().enumerate() {
            *out = (byte >> (6 - 2 * i)) & 0b11;
        }
    }
}

/// Expand 4-bit indices, 2 pixels per byte, high nibble first.
pub fn expand_bits_4(input: &[u8], output: &mut [u8]) {
    let mut out_chunks = output.chunks_exact_mut(2);
    let mut in_bytes = input.iter();

    for (chunk, byte) in (&mut out_chunks).zip(&mut in_bytes) {
        chunk[0] = byte >> 4;
        chunk[1] = byte & 0x0F;
    }
    let remainder = out_chunks.into_remainder();
    if let (false, Some(byte)) = (remainder.is_empty(), in_bytes.next()) {
        remainder[0] = byte >> 4;
    }
}

/// Expand one packed row of `depth`-bit indices into one byte per pixel.
///
/// `input` must hold at least `ceil(output.len() * depth / 8)` bytes.
pub fn expand_row(depth: u16, input: &[u8], output: &mut [u8]) {
    match depth {
        1 => expand_bits_1(input, output),
        2 => expand_bits_2(input, output),
        4 => expand_bits_4(input, output),
        8 => output.copy_from_slice(&input[..output.len()]),
        _ => unreachable!("depth checked during header decode")
    }
}
