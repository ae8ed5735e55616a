/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Cross-crate integration tests: registry dispatch, file and stream
//! round trips, and probe behavior across formats.
//!
//! Everything here runs on synthetic in-memory images; files needed for
//! the path-based registry API live in a per-test temporary directory.

#![cfg(test)]

use rast_image::bitmap::{Bitmap, PixelLayout};

mod probes;
mod registry;

/// A deterministic RGBA test image with every alpha byte opaque, so
/// savers that drop alpha still round-trip exactly.
pub fn rgba_image(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .flat_map(|i| [(i * 7) as u8, (i * 13) as u8, (i * 29) as u8, 255])
        .collect()
}

pub fn rgba_bitmap(width: usize, height: usize) -> Bitmap {
    Bitmap::from_decoded(width, height, PixelLayout::Rgba8, rgba_image(width, height))
        .unwrap()
}

/// A minimal DXT1 DDS file: one 4x4 block of `block` bytes.
pub fn dxt1_file(block: &[u8; 8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"DDS ");
    out.extend_from_slice(&124_u32.to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());
    out.extend_from_slice(&4_u32.to_le_bytes()); // height
    out.extend_from_slice(&4_u32.to_le_bytes()); // width
    out.extend_from_slice(&[0; 56]);
    out.extend_from_slice(&32_u32.to_le_bytes());
    out.extend_from_slice(&4_u32.to_le_bytes()); // FourCC flag
    out.extend_from_slice(b"DXT1");
    out.extend_from_slice(&[0; 40]);
    out.extend_from_slice(block);
    out
}
