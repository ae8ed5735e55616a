/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Global encoder options

use crate::colorspace::ColorSpace;

/// Encoder options
///
/// Describes the pixel buffer handed to an encoder: its dimensions and
/// the colorspace of the samples. Builder-style like
/// [`DecoderOptions`](crate::options::DecoderOptions).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    width:      usize,
    height:     usize,
    colorspace: ColorSpace
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            width:      0,
            height:     0,
            colorspace: ColorSpace::RGBA
        }
    }
}

impl EncoderOptions {
    pub fn new(width: usize, height: usize, colorspace: ColorSpace) -> EncoderOptions {
        EncoderOptions {
            width,
            height,
            colorspace
        }
    }

    /// Get the width of the pixel buffer to be encoded
    pub const fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Get the height of the pixel buffer to be encoded
    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Get the colorspace of the samples in the pixel buffer
    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub fn set_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }
}
