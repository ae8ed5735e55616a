/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Magic-byte identification probes and content-based format guessing
//!
//! Each probe looks at a fixed-size prefix of the given bytes and
//! answers a plain yes or no; none of them allocate or decode anything.
//! The probes take slices rather than streams, a caller probing a
//! stream reads a prefix once and tries the probes against it.
//!
//! TGA is absent on purpose: it has no magic number, files of that
//! format are only ever reached through extension dispatch.

use rast_bmp::probe_bmp;
use rast_dds::probe_dds;
use rast_pcx::probe_pcx;

/// The formats the registry can name.
///
/// `Png`, `Jpeg` and `WebP` are recognized by
/// [`guess_format`] so a caller can route them to an external decoder,
/// no codec for them lives in this workspace.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Bmp,
    Pcx,
    Tga,
    Dds,
    Png,
    Jpeg,
    WebP,
    Unknown
}

impl ImageFormat {
    /// The canonical extension for the format, with the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bmp => ".bmp",
            ImageFormat::Pcx => ".pcx",
            ImageFormat::Tga => ".tga",
            ImageFormat::Dds => ".dds",
            ImageFormat::Png => ".png",
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::WebP => ".webp",
            ImageFormat::Unknown => ""
        }
    }
}

/// Probe some bytes to see if they constitute a valid PNG file.
///
/// Checks the fixed 8-byte signature. Never allocates.
pub fn probe_png(bytes: &[u8]) -> bool {
    bytes.get(..8) == Some(&[137, 80, 78, 71, 13, 10, 26, 10])
}

/// Probe some bytes to see if they constitute a valid JPEG file.
///
/// Checks the start-of-image marker and that a marker segment follows
/// it. Never allocates.
pub fn probe_jpeg(bytes: &[u8]) -> bool {
    if let Some(first_bytes) = bytes.get(..3) {
        return first_bytes[0] == 0xFF && first_bytes[1] == 0xD8 && first_bytes[2] == 0xFF;
    }
    false
}

/// Probe some bytes to see if they constitute a valid WebP file.
///
/// Checks the RIFF container magic and the WEBP form type. Never
/// allocates.
pub fn probe_webp(bytes: &[u8]) -> bool {
    bytes.get(..4) == Some(b"RIFF") && bytes.get(8..12) == Some(b"WEBP")
}

/// Guess the format of some bytes from their leading magic.
///
/// Returns [`ImageFormat::Unknown`] when nothing matches; in particular
/// TGA files always come back unknown since the format has nothing to
/// sniff.
pub fn guess_format(bytes: &[u8]) -> ImageFormat {
    // ordered cheapest magic first; PCX last of the four since its
    // "magic" is just a handful of plausible header bytes
    if probe_png(bytes) {
        ImageFormat::Png
    } else if probe_jpeg(bytes) {
        ImageFormat::Jpeg
    } else if probe_webp(bytes) {
        ImageFormat::WebP
    } else if probe_dds(bytes) {
        ImageFormat::Dds
    } else if probe_bmp(bytes) {
        ImageFormat::Bmp
    } else if probe_pcx(bytes) {
        ImageFormat::Pcx
    } else {
        ImageFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_do_not_cross_match() {
        let png = [137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 16, b'J', b'F', b'I', b'F'];
        let webp = *b"RIFF\x24\x00\x00\x00WEBPVP8 ";

        assert_eq!(guess_format(&png), ImageFormat::Png);
        assert_eq!(guess_format(&jpeg), ImageFormat::Jpeg);
        assert_eq!(guess_format(&webp), ImageFormat::WebP);

        assert!(!probe_png(&jpeg));
        assert!(!probe_jpeg(&webp));
        assert!(!probe_webp(&png));
    }

    #[test]
    fn short_input_is_a_plain_no() {
        assert_eq!(guess_format(&[]), ImageFormat::Unknown);
        assert_eq!(guess_format(&[0xFF]), ImageFormat::Unknown);
        assert!(!probe_webp(b"RIFF"));
    }
}
