/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decode and round-trip tests over synthetic in-memory BMP files.

use rast_bmp::{probe_bmp, BmpDecoder, BmpEncoder};
use rast_core::bytestream::RCursor;
use rast_core::colorspace::ColorSpace;
use rast_core::options::{DecoderOptions, EncoderOptions};

/// Build a whole BMP file from its parts.
///
/// `header_size` picks the info-header variant; mask fields inside
/// 52/56/108/124-byte headers default to zero unless `masks` is given.
/// Palette entries are written in the 4-byte Windows layout (or 3-byte
/// when `header_size == 12`).
#[allow(clippy::too_many_arguments)]
fn bmp_file(
    header_size: u32, width: i32, height: i32, depth: u16, comp: u32, colors_used: u32,
    masks: Option<[u32; 4]>, palette: &[[u8; 3]], pixel_data: &[u8]
) -> Vec<u8> {
    let is_os2 = header_size == 12;
    let entry_size = if is_os2 { 3 } else { 4 };
    // BI_BITFIELDS masks on a 40-byte header live after the header
    let loose_masks = if comp == 3 && header_size == 40 { 12 } else { 0 };
    let pix_offset =
        14 + header_size + loose_masks + (palette.len() * entry_size) as u32;

    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&0_u32.to_le_bytes()); // file size, unused
    out.extend_from_slice(&0_u32.to_le_bytes()); // reserved
    out.extend_from_slice(&pix_offset.to_le_bytes());
    out.extend_from_slice(&header_size.to_le_bytes());

    if is_os2 {
        out.extend_from_slice(&(width as u16).to_le_bytes());
        out.extend_from_slice(&(height as u16).to_le_bytes());
        out.extend_from_slice(&1_u16.to_le_bytes());
        out.extend_from_slice(&depth.to_le_bytes());
    } else {
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1_u16.to_le_bytes());
        out.extend_from_slice(&depth.to_le_bytes());
        out.extend_from_slice(&comp.to_le_bytes());
        out.extend_from_slice(&[0_u8; 12]); // image size + resolution
        out.extend_from_slice(&colors_used.to_le_bytes());
        out.extend_from_slice(&0_u32.to_le_bytes()); // important colors

        let masks = masks.unwrap_or([0; 4]);
        if header_size >= 52 {
            for mask in &masks[..3] {
                out.extend_from_slice(&mask.to_le_bytes());
            }
        }
        if header_size >= 56 {
            out.extend_from_slice(&masks[3].to_le_bytes());
        }
        // color-management tail of the V4/V5 headers
        let written = out.len() as u32 - 14;
        out.extend(std::iter::repeat(0).take((header_size - written) as usize));

        // BI_BITFIELDS masks on a 40-byte header follow the header
        if comp == 3 && header_size == 40 {
            for mask in &masks[..3] {
                out.extend_from_slice(&mask.to_le_bytes());
            }
        }
    }

    for entry in palette {
        let [r, g, b] = *entry;
        if is_os2 {
            out.extend_from_slice(&[b, g, r]);
        } else {
            out.extend_from_slice(&[b, g, r, 0]);
        }
    }
    out.extend_from_slice(pixel_data);
    out
}

/// Pack top-down RGB pixels into padded 24-bit BMP rows, bottom-up when
/// `flipped` is set.
fn rows_24(pixels: &[[u8; 3]], width: usize, flipped: bool) -> Vec<u8> {
    let pad = (4 - (width * 3) % 4) % 4;
    let rows: Vec<&[[u8; 3]]> = pixels.chunks_exact(width).collect();
    let mut out = Vec::new();

    let mut emit = |row: &[[u8; 3]]| {
        for [r, g, b] in row {
            out.extend_from_slice(&[*b, *g, *r]);
        }
        out.extend(std::iter::repeat(0).take(pad));
    };
    if flipped {
        rows.iter().rev().for_each(|row| emit(row));
    } else {
        rows.iter().for_each(|row| emit(row));
    }
    out
}

fn decode(file: &[u8], options: DecoderOptions) -> Vec<u8> {
    let mut decoder = BmpDecoder::new_with_options(RCursor::new(file), options);
    decoder.decode().expect("decode failed")
}

const PIXELS_2X2: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]];

fn rgba_of(pixels: &[[u8; 3]]) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|[r, g, b]| [*r, *g, *b, 255])
        .collect()
}

#[test]
fn all_header_sizes_decode_identically() {
    for header_size in [12, 40, 52, 56, 108, 124] {
        let data = rows_24(&PIXELS_2X2, 2, true);
        let file = bmp_file(header_size, 2, 2, 24, 0, 0, None, &[], &data);

        assert!(probe_bmp(&file), "probe rejected header size {header_size}");

        let mut decoder = BmpDecoder::new(RCursor::new(file));
        let pixels = decoder.decode().expect("decode failed");
        assert_eq!(decoder.dimensions(), Some((2, 2)));
        assert_eq!(
            pixels,
            rgba_of(&PIXELS_2X2),
            "wrong pixels for header size {header_size}"
        );
    }
}

#[test]
fn negative_height_normalizes_to_top_down() {
    let bottom_up = bmp_file(40, 2, 2, 24, 0, 0, None, &[], &rows_24(&PIXELS_2X2, 2, true));
    let top_down = bmp_file(40, 2, -2, 24, 0, 0, None, &[], &rows_24(&PIXELS_2X2, 2, false));

    assert_eq!(
        decode(&bottom_up, DecoderOptions::default()),
        decode(&top_down, DecoderOptions::default())
    );
}

#[test]
fn rle8_control_codes() {
    // 5x4, bottom-up. Exercises runs, absolute mode with its pad byte,
    // end-of-line, a delta that skips a row and end-of-image.
    #[rustfmt::skip]
    let rle: Vec<u8> = vec![
        // file row 0: run of two 1s, absolute run [2, 3, 4] + pad
        2, 1, 0, 3, 2, 3, 4, 0,
        0, 0, // end of line
        // file row 1: full-width run of 7s
        5, 7, 0, 0,
        // file row 2: delta jumps dx=1 dy=1 into row 3
        0, 2, 1, 1,
        // file row 3 continues at x=1
        2, 6,
        0, 1, // end of image
    ];
    let file = bmp_file(40, 5, 4, 8, 1, 2, None, &[[9, 9, 9], [8, 8, 8]], &rle);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    let indices = decode(&file, options);

    #[rustfmt::skip]
    let expected = vec![
        0, 6, 6, 0, 0, // file row 3
        0, 0, 0, 0, 0, // file row 2, skipped by the delta
        7, 7, 7, 7, 7, // file row 1
        1, 1, 2, 3, 4, // file row 0
    ];
    assert_eq!(indices, expected);
}

#[test]
fn rle_overshoot_is_clamped_not_fatal() {
    // run of 200 on a 3-wide row
    let rle: Vec<u8> = vec![200, 5, 0, 0, 0, 1];
    let file = bmp_file(40, 3, 1, 8, 1, 1, None, &[[1, 2, 3]], &rle);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    assert_eq!(decode(&file, options), vec![5, 5, 5]);

    // strict mode upgrades the clamp to a hard error
    let strict = DecoderOptions::default().set_strict_mode(true);
    let mut decoder = BmpDecoder::new_with_options(RCursor::new(file), strict);
    assert!(decoder.decode().is_err());
}

#[test]
fn rle4_absolute_runs_pack_nibbles() {
    // 8x1. A run alternates its two nibbles; the absolute run of five
    // packs high nibble first into three bytes plus the pad byte that
    // keeps the stream on a 16-bit boundary.
    #[rustfmt::skip]
    let rle: Vec<u8> = vec![
        3, 0x12,                   // run: 1, 2, 1
        0, 5, 0x34, 0x56, 0x70, 0, // absolute: 3, 4, 5, 6, 7
        0, 0,                      // end of line
        0, 1,                      // end of image
    ];
    let file = bmp_file(40, 8, 1, 4, 2, 1, None, &[[1, 2, 3]], &rle);

    let options = DecoderOptions::default().set_keep_palette_index(true);
    assert_eq!(decode(&file, options), vec![1, 2, 1, 3, 4, 5, 6, 7]);
}

#[test]
fn paletted_4_bit_resolves_through_palette() {
    // 2x1, one byte per row holding both nibbles, padded to 4 bytes
    let file = bmp_file(
        40,
        2,
        1,
        4,
        0,
        2,
        None,
        &[[10, 20, 30], [40, 50, 60]],
        &[0x01, 0, 0, 0]
    );
    let pixels = decode(&file, DecoderOptions::default());
    assert_eq!(pixels, vec![10, 20, 30, 255, 40, 50, 60, 255]);
}

#[test]
fn alpha_heuristic_all_zero_is_opaque() {
    // 2x1 32-bit, BGRA on disk, every alpha byte zero
    let data = [10, 20, 30, 0, 40, 50, 60, 0];
    let file = bmp_file(40, 2, 1, 32, 0, 0, None, &[], &data);

    let pixels = decode(&file, DecoderOptions::default());
    assert_eq!(pixels, vec![30, 20, 10, 255, 60, 50, 40, 255]);
}

#[test]
fn alpha_heuristic_nonzero_premultiplies() {
    let data = [100, 100, 100, 0, 200, 200, 200, 128];
    let file = bmp_file(40, 2, 1, 32, 0, 0, None, &[], &data);

    let premultiplied = decode(&file, DecoderOptions::default());
    assert_eq!(premultiplied, vec![0, 0, 0, 0, 100, 100, 100, 128]);

    let straight = decode(
        &file,
        DecoderOptions::default().set_premultiply_alpha(false)
    );
    assert_eq!(straight, vec![100, 100, 100, 0, 200, 200, 200, 128]);
}

#[test]
fn declared_alpha_mask_premultiplies() {
    // BGRA-style masks, alpha 128 halves every color channel
    let masks = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000];
    let data = [200, 200, 200, 128];
    let file = bmp_file(56, 1, 1, 32, 3, 0, Some(masks), &[], &data);

    let pixels = decode(&file, DecoderOptions::default());
    assert_eq!(pixels, vec![100, 100, 100, 128]);
}

#[test]
fn sixteen_bit_alpha_mask_premultiplies() {
    // 5-5-5-1, white with the alpha bit clear
    let masks = [0x7C00, 0x03E0, 0x001F, 0x8000];
    let file = bmp_file(56, 1, 1, 16, 3, 0, Some(masks), &[], &[0xFF, 0x7F, 0, 0]);

    let pixels = decode(&file, DecoderOptions::default());
    assert_eq!(pixels, vec![0, 0, 0, 0]);

    let straight = decode(
        &file,
        DecoderOptions::default().set_premultiply_alpha(false)
    );
    assert_eq!(straight, vec![255, 255, 255, 0]);
}

#[test]
fn declared_alpha_mask_skips_the_heuristic() {
    // 56-byte header declares ARGB-style masks; all-zero alpha must
    // stay zero since the heuristic does not apply
    let masks = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000];
    let data = [10, 20, 30, 0];
    let file = bmp_file(56, 1, 1, 32, 3, 0, Some(masks), &[], &data);

    let pixels = decode(
        &file,
        DecoderOptions::default().set_premultiply_alpha(false)
    );
    assert_eq!(pixels, vec![30, 20, 10, 0]);
}

#[test]
fn invalid_bitfield_mask_fails_decode() {
    let masks = [0xF00F, 0x03E0, 0x001F, 0];
    let file = bmp_file(40, 1, 1, 16, 3, 0, Some(masks), &[], &[0, 0, 0, 0]);

    let mut decoder = BmpDecoder::new(RCursor::new(file));
    assert!(decoder.decode_headers().is_err());
}

#[test]
fn sixteen_bit_defaults_to_555() {
    // one pixel, 0x7FFF is white in 5-5-5
    let file = bmp_file(40, 1, 1, 16, 0, 0, None, &[], &[0xFF, 0x7F, 0, 0]);
    assert_eq!(decode(&file, DecoderOptions::default()), vec![255, 255, 255, 255]);
}

#[test]
fn round_trip_widths_across_padding_boundary() {
    // width 4 needs no row padding, width 3 needs it
    for width in [3_usize, 4] {
        let pixels: Vec<[u8; 3]> = (0..width * 2)
            .map(|i| [i as u8, (i * 3) as u8, (i * 7) as u8])
            .collect();
        let rgb: Vec<u8> = pixels.iter().flatten().copied().collect();

        let options = EncoderOptions::new(width, 2, ColorSpace::RGB);
        let mut sink = Vec::new();
        BmpEncoder::new(&rgb, options)
            .encode(&mut sink)
            .expect("encode failed");

        assert!(probe_bmp(&sink));
        let decoded = decode(&sink, DecoderOptions::default());
        assert_eq!(decoded, rgba_of(&pixels), "round trip failed for width {width}");
    }
}

#[test]
fn probe_rejects_near_misses() {
    assert!(!probe_bmp(b"BM"));
    assert!(!probe_bmp(&[0; 32]));

    // right magic, bogus header size
    let mut file = bmp_file(40, 1, 1, 24, 0, 0, None, &[], &[0, 0, 0, 0]);
    file[14] = 39;
    assert!(!probe_bmp(&file));
}
