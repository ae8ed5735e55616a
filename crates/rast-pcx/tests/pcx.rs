/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decode and round-trip tests over synthetic in-memory PCX files.

use rast_core::bytestream::RCursor;
use rast_core::colorspace::ColorSpace;
use rast_core::options::{DecoderOptions, EncoderOptions};
use rast_pcx::{probe_pcx, PcxDecoder, PcxEncoder};

/// Build a whole PCX file: the fixed 128-byte header, the RLE pixel
/// stream and, optionally, the 256-color trailer palette.
fn pcx_file(
    width: u16, height: u16, planes: u8, bytes_per_line: u16, rle: &[u8],
    palette: Option<&[[u8; 3]]>
) -> Vec<u8> {
    let mut out = vec![10, 5, 1, 8];
    out.extend_from_slice(&0_u16.to_le_bytes()); // x min
    out.extend_from_slice(&0_u16.to_le_bytes()); // y min
    out.extend_from_slice(&(width - 1).to_le_bytes());
    out.extend_from_slice(&(height - 1).to_le_bytes());
    out.extend_from_slice(&320_u16.to_le_bytes());
    out.extend_from_slice(&200_u16.to_le_bytes());
    out.extend_from_slice(&[0; 48]); // legacy palette
    out.push(0); // reserved
    out.push(planes);
    out.extend_from_slice(&bytes_per_line.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes()); // palette info
    out.extend_from_slice(&[0; 58]);
    assert_eq!(out.len(), 128);

    out.extend_from_slice(rle);
    if let Some(entries) = palette {
        out.push(12);
        let mut trailer = vec![0_u8; 256 * 3];
        for (slot, entry) in trailer.chunks_exact_mut(3).zip(entries) {
            slot.copy_from_slice(entry);
        }
        out.extend_from_slice(&trailer);
    }
    out
}

fn decode(file: &[u8], options: DecoderOptions) -> Vec<u8> {
    let mut decoder = PcxDecoder::new_with_options(RCursor::new(file), options);
    decoder.decode().expect("decode failed")
}

#[test]
fn indexed_resolves_through_trailer_palette() {
    // 2x2 literal indices 0..=3
    let file = pcx_file(
        2,
        2,
        1,
        2,
        &[0, 1, 2, 3],
        Some(&[[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]])
    );
    assert!(probe_pcx(&file));

    let mut decoder = PcxDecoder::new(RCursor::new(&file));
    let pixels = decoder.decode().expect("decode failed");
    assert_eq!(decoder.dimensions(), Some((2, 2)));
    assert_eq!(decoder.colorspace(), Some(ColorSpace::RGBA));
    assert_eq!(
        pixels,
        vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 0, 255
        ]
    );
}

#[test]
fn missing_trailer_palette_decodes_to_black() {
    let file = pcx_file(2, 1, 1, 2, &[1, 2], None);
    assert_eq!(
        decode(&file, DecoderOptions::default()),
        vec![0, 0, 0, 255, 0, 0, 0, 255]
    );
}

#[test]
fn keep_palette_index_returns_raw_indices() {
    let file = pcx_file(3, 1, 1, 3, &[7, 8, 9], Some(&[[1, 1, 1]]));

    let options = DecoderOptions::default().set_keep_palette_index(true);
    let mut decoder = PcxDecoder::new_with_options(RCursor::new(&file), options);
    let indices = decoder.decode().expect("decode failed");
    assert_eq!(decoder.colorspace(), Some(ColorSpace::Indexed));
    assert_eq!(indices, vec![7, 8, 9]);
}

#[test]
fn three_planes_decode_as_rgb() {
    // 2x2, each scanline is an R plane, a G plane then a B plane
    #[rustfmt::skip]
    let rle = [
        10, 11, /* G */ 20, 21, /* B */ 30, 31, // row 0
        40, 41, /* G */ 50, 51, /* B */ 60, 61, // row 1
    ];
    let file = pcx_file(2, 2, 3, 2, &rle, None);

    assert_eq!(
        decode(&file, DecoderOptions::default()),
        vec![
            10, 20, 30, 255, 11, 21, 31, 255, //
            40, 50, 60, 255, 41, 51, 61, 255
        ]
    );
}

#[test]
fn runs_and_literals_mix_within_a_scanline() {
    // run of four 5s then a literal on a 5-wide row; a literal value
    // with the top bits set must arrive as a run of one
    let rle = [0xC4, 5, 9, 0xC1, 0xC0];
    let file = pcx_file(6, 1, 1, 6, &rle, None);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    assert_eq!(decode(&file, options), vec![5, 5, 5, 5, 9, 0xC0]);
}

#[test]
fn bytes_per_line_padding_is_ignored() {
    // 3-wide row padded to 4 stored bytes
    let file = pcx_file(3, 2, 1, 4, &[1, 2, 3, 0, 4, 5, 6, 0], None);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    assert_eq!(decode(&file, options), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn rle_overshoot_is_clamped_not_fatal() {
    // run of 63 on a 4-byte scanline
    let file = pcx_file(4, 1, 1, 4, &[0xFF, 7], None);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    assert_eq!(decode(&file, options), vec![7, 7, 7, 7]);

    let strict = DecoderOptions::default()
        .set_keep_palette_index(true)
        .set_strict_mode(true);
    let mut decoder = PcxDecoder::new_with_options(RCursor::new(&file), strict);
    assert!(decoder.decode().is_err());
}

#[test]
fn bad_bytes_per_line_fails_header_parse() {
    let file = pcx_file(4, 1, 1, 2, &[0, 0], None);
    let mut decoder = PcxDecoder::new(RCursor::new(&file));
    assert!(decoder.decode_headers().is_err());
}

#[test]
fn round_trip_widths_across_run_boundaries() {
    for width in [3_usize, 4] {
        let pixels: Vec<u8> = (0..width * 2 * 3).map(|i| (i * 5) as u8).collect();

        let options = EncoderOptions::new(width, 2, ColorSpace::RGB);
        let mut sink = Vec::new();
        PcxEncoder::new(&pixels, options)
            .encode(&mut sink)
            .expect("encode failed");

        assert!(probe_pcx(&sink));
        let decoded = decode(&sink, DecoderOptions::default());

        let expected: Vec<u8> = pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect();
        assert_eq!(decoded, expected, "round trip failed for width {width}");
    }
}

#[test]
fn probe_rejects_near_misses() {
    assert!(!probe_pcx(&[]));
    assert!(!probe_pcx(&[10, 5, 1])); // too short
    assert!(!probe_pcx(&[11, 5, 1, 8])); // wrong manufacturer
    assert!(!probe_pcx(&[10, 1, 1, 8])); // version 1 never shipped
    assert!(!probe_pcx(&[10, 5, 2, 8])); // unknown encoding
    assert!(!probe_pcx(&[10, 5, 1, 4])); // planar EGA depths unsupported
    assert!(probe_pcx(&[10, 5, 1, 8]));
}
