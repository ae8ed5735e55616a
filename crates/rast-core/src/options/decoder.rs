/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Global decoder options

/// Decoder options that are flags
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone)]
struct DecoderFlags {
    /// Write raw palette indices for indexed formats instead of
    /// resolving them through the palette.
    keep_palette_index: bool,
    /// Multiply color channels by `alpha / 255` when an image
    /// carries an alpha channel.
    premultiply_alpha:  bool
}

impl Default for DecoderFlags {
    fn default() -> Self {
        DecoderFlags {
            keep_palette_index: false,
            premultiply_alpha:  true
        }
    }
}

/// Decoder options
///
/// Not all options are respected by every decoder; the documentation of
/// each accessor names the decoders that honor it.
///
/// The struct is a builder, setters consume `self` and hand it back:
///
/// ```
/// use rast_core::options::DecoderOptions;
///
/// let options = DecoderOptions::default()
///     .set_max_width(1 << 10)
///     .set_premultiply_alpha(false);
/// assert_eq!(options.max_width(), 1 << 10);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    max_width:   usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    max_height:  usize,
    /// Treat recoverable anomalies as hard errors
    /// instead of logging them and continuing.
    ///
    /// - Default value: false
    strict_mode: bool,
    flags:       DecoderFlags
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_width:   1 << 14,
            max_height:  1 << 14,
            strict_mode: false,
            flags:       DecoderFlags::default()
        }
    }
}

impl DecoderOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Whether recoverable anomalies (clamped RLE runs, excess palette
    /// entries) abort the decode instead of being logged.
    ///
    /// - Respected by: all decoders
    pub const fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Treat recoverable anomalies as hard errors.
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }

    /// Whether decoders should keep raw palette indices for formats of
    /// 8 bits and below instead of resolving them to RGBA.
    ///
    /// - Default: false
    /// - Respected by: `bmp`, `pcx`, `tga`
    pub const fn keep_palette_index(&self) -> bool {
        self.flags.keep_palette_index
    }

    /// Ask decoders to emit one raw palette index byte per pixel for
    /// indexed formats instead of resolved RGBA.
    pub fn set_keep_palette_index(mut self, yes: bool) -> Self {
        self.flags.keep_palette_index = yes;
        self
    }

    /// Whether color channels get multiplied by `alpha / 255` when the
    /// image carries an alpha channel.
    ///
    /// - Default: true
    /// - Respected by: `bmp` (32-bit), `tga` (32-bit)
    pub const fn premultiply_alpha(&self) -> bool {
        self.flags.premultiply_alpha
    }

    /// Enable or disable alpha premultiplication for formats that carry
    /// an alpha channel.
    pub fn set_premultiply_alpha(mut self, yes: bool) -> Self {
        self.flags.premultiply_alpha = yes;
        self
    }
}
