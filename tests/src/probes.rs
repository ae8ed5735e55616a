/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use rast_bmp::{probe_bmp, BmpEncoder};
use rast_core::colorspace::ColorSpace;
use rast_core::options::EncoderOptions;
use rast_dds::probe_dds;
use rast_image::format::{guess_format, probe_jpeg, probe_png, probe_webp, ImageFormat};
use rast_pcx::{probe_pcx, PcxEncoder};
use rast_tga::TgaEncoder;

use crate::{dxt1_file, rgba_image};

/// One real file (or file prefix) per recognizable format.
fn samples() -> Vec<(ImageFormat, Vec<u8>)> {
    let pixels = rgba_image(4, 4);
    let options = EncoderOptions::new(4, 4, ColorSpace::RGBA);

    let mut bmp = Vec::new();
    BmpEncoder::new(&pixels, options).encode(&mut bmp).unwrap();
    let mut pcx = Vec::new();
    PcxEncoder::new(&pixels, options).encode(&mut pcx).unwrap();

    vec![
        (ImageFormat::Bmp, bmp),
        (ImageFormat::Pcx, pcx),
        (ImageFormat::Dds, dxt1_file(&[0; 8])),
        (
            ImageFormat::Png,
            vec![137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, b'I', b'H', b'D', b'R']
        ),
        (
            ImageFormat::Jpeg,
            vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 16, b'J', b'F', b'I', b'F', 0, 1]
        ),
        (ImageFormat::WebP, b"RIFF\x28\x00\x00\x00WEBPVP8 \x1c\x00\x00\x00".to_vec()),
    ]
}

#[test]
fn guess_format_recognizes_each_sample() {
    for (format, bytes) in samples() {
        assert_eq!(guess_format(&bytes), format, "misidentified {format:?}");
    }
}

#[test]
fn probes_are_false_for_every_other_format() {
    for (format, bytes) in samples() {
        assert_eq!(probe_bmp(&bytes), format == ImageFormat::Bmp);
        assert_eq!(probe_pcx(&bytes), format == ImageFormat::Pcx);
        assert_eq!(probe_dds(&bytes), format == ImageFormat::Dds);
        assert_eq!(probe_png(&bytes), format == ImageFormat::Png);
        assert_eq!(probe_jpeg(&bytes), format == ImageFormat::Jpeg);
        assert_eq!(probe_webp(&bytes), format == ImageFormat::WebP);
    }
}

#[test]
fn tga_is_never_content_sniffed() {
    let pixels = rgba_image(4, 4);
    let options = EncoderOptions::new(4, 4, ColorSpace::RGBA);
    let mut tga = Vec::new();
    TgaEncoder::new(&pixels, options).encode(&mut tga).unwrap();

    assert_eq!(guess_format(&tga), ImageFormat::Unknown);
}
