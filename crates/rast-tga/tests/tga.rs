/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decode and round-trip tests over synthetic in-memory TGA files.

use rast_core::bytestream::RCursor;
use rast_core::colorspace::ColorSpace;
use rast_core::options::{DecoderOptions, EncoderOptions};
use rast_tga::{TgaDecoder, TgaEncoder};

/// Build a whole TGA file: 18-byte header, optional palette, pixels.
fn tga_file(
    palette_type: u8, image_type: u8, palette_start: u16, entry_size: u8, palette: &[u8],
    width: u16, height: u16, depth: u8, descriptor: u8, pixels: &[u8]
) -> Vec<u8> {
    let palette_colors = if palette_type == 1 {
        (palette.len() / usize::from(entry_size / 8)) as u16
    } else {
        0
    };

    let mut out = vec![0, palette_type, image_type];
    out.extend_from_slice(&palette_start.to_le_bytes());
    out.extend_from_slice(&palette_colors.to_le_bytes());
    out.push(entry_size);
    out.extend_from_slice(&0_u16.to_le_bytes()); // x origin
    out.extend_from_slice(&0_u16.to_le_bytes()); // y origin
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(depth);
    out.push(descriptor);
    out.extend_from_slice(palette);
    out.extend_from_slice(pixels);
    out
}

fn decode(file: &[u8], options: DecoderOptions) -> Vec<u8> {
    let mut decoder = TgaDecoder::new_with_options(RCursor::new(file), options);
    decoder.decode().expect("decode failed")
}

/// Canonical 2x2 test image, top-down, left-to-right RGB.
const PIXELS_2X2: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]];

#[test]
fn origin_flags_all_normalize_to_top_down() {
    let expected: Vec<u8> = PIXELS_2X2
        .iter()
        .flat_map(|[r, g, b]| [*r, *g, *b, 255])
        .collect();

    for descriptor in [0x00_u8, 0x10, 0x20, 0x30] {
        let top_to_bottom = descriptor & 0x20 != 0;
        let right_to_left = descriptor & 0x10 != 0;

        // store the canonical image in the order the descriptor claims
        let mut rows: Vec<&[[u8; 3]]> = PIXELS_2X2.chunks_exact(2).collect();
        if !top_to_bottom {
            rows.reverse();
        }
        let mut stored = Vec::new();
        for row in rows {
            let mut row: Vec<[u8; 3]> = row.to_vec();
            if right_to_left {
                row.reverse();
            }
            for [r, g, b] in row {
                stored.extend_from_slice(&[b, g, r]);
            }
        }

        let file = tga_file(0, 2, 0, 0, &[], 2, 2, 24, descriptor, &stored);
        assert_eq!(
            decode(&file, DecoderOptions::default()),
            expected,
            "wrong normalization for descriptor {descriptor:#04x}"
        );
    }
}

#[test]
fn paletted_resolves_through_window_offset() {
    // two 24-bit palette entries stored at slots 2 and 3, BGR on disk
    let palette = [30, 20, 10, 60, 50, 40];
    let file = tga_file(1, 1, 2, 24, &palette, 2, 1, 8, 0x20, &[2, 3]);

    assert_eq!(
        decode(&file, DecoderOptions::default()),
        vec![10, 20, 30, 255, 40, 50, 60, 255]
    );
}

#[test]
fn sixteen_bit_palette_entries_expand_from_555() {
    let palette = 0x7C00_u16.to_le_bytes(); // pure red
    let file = tga_file(1, 1, 0, 16, &palette, 1, 1, 8, 0x20, &[0]);

    assert_eq!(decode(&file, DecoderOptions::default()), vec![255, 0, 0, 255]);
}

#[test]
fn grayscale_synthesizes_identity_palette() {
    let file = tga_file(0, 3, 0, 0, &[], 3, 1, 8, 0x20, &[0, 128, 255]);

    assert_eq!(
        decode(&file, DecoderOptions::default()),
        vec![0, 0, 0, 255, 128, 128, 128, 255, 255, 255, 255, 255]
    );
}

#[test]
fn keep_palette_index_returns_raw_indices() {
    let file = tga_file(0, 3, 0, 0, &[], 3, 1, 8, 0x20, &[3, 1, 4]);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    let mut decoder = TgaDecoder::new_with_options(RCursor::new(&file), options);
    let indices = decoder.decode().expect("decode failed");
    assert_eq!(decoder.colorspace(), Some(ColorSpace::Indexed));
    assert_eq!(indices, vec![3, 1, 4]);
}

#[test]
fn rle_run_and_raw_packets() {
    // grayscale RLE (type 3 + 8): a run of three 9s, then two literals
    let rle = [0x82, 9, 0x01, 5, 6];
    let file = tga_file(0, 11, 0, 0, &[], 5, 1, 8, 0x20, &rle);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    assert_eq!(decode(&file, options), vec![9, 9, 9, 5, 6]);
}

#[test]
fn rle_overshoot_is_clamped_not_fatal() {
    // a run of 128 on a 4-wide row
    let rle = [0xFF, 7];
    let file = tga_file(0, 11, 0, 0, &[], 4, 1, 8, 0x20, &rle);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    assert_eq!(decode(&file, options), vec![7, 7, 7, 7]);

    let strict = DecoderOptions::default()
        .set_keep_palette_index(true)
        .set_strict_mode(true);
    let mut decoder = TgaDecoder::new_with_options(RCursor::new(&file), strict);
    assert!(decoder.decode().is_err());
}

#[test]
fn thirty_two_bit_premultiplies_unless_disabled() {
    // one BGRA pixel with alpha 128
    let file = tga_file(0, 2, 0, 0, &[], 1, 1, 32, 0x20, &[200, 200, 200, 128]);

    assert_eq!(
        decode(&file, DecoderOptions::default()),
        vec![100, 100, 100, 128]
    );
    assert_eq!(
        decode(&file, DecoderOptions::default().set_premultiply_alpha(false)),
        vec![200, 200, 200, 128]
    );
}

#[test]
fn fifteen_bit_pixels_unpack_as_555() {
    let pixel = 0x7FFF_u16.to_le_bytes();
    let file = tga_file(0, 2, 0, 0, &[], 1, 1, 16, 0x20, &pixel);

    assert_eq!(decode(&file, DecoderOptions::default()), vec![255, 255, 255, 255]);
}

#[test]
fn palette_type_mismatch_fails_header_parse() {
    // truecolor claiming a stored palette
    let file = tga_file(1, 2, 0, 24, &[0, 0, 0], 1, 1, 24, 0x20, &[0, 0, 0]);
    let mut decoder = TgaDecoder::new(RCursor::new(&file));
    assert!(decoder.decode_headers().is_err());
}

#[test]
fn round_trip_widths_with_alpha() {
    for width in [3_usize, 4] {
        let pixels: Vec<u8> = (0..width * 2 * 4).map(|i| (i * 11) as u8).collect();

        let options = EncoderOptions::new(width, 2, ColorSpace::RGBA);
        let mut sink = Vec::new();
        TgaEncoder::new(&pixels, options)
            .encode(&mut sink)
            .expect("encode failed");

        let decoded = decode(
            &sink,
            DecoderOptions::default().set_premultiply_alpha(false)
        );
        assert_eq!(decoded, pixels, "round trip failed for width {width}");
    }
}
