/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The pixel buffer handlers decode into and encode from

use crate::errors::ImageErrors;

/// How the bytes of a [`Bitmap`] are laid out.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PixelLayout {
    /// Packed 4-byte RGBA, byte order fixed regardless of host
    /// endianness.
    Rgba8,
    /// One palette index byte per pixel, produced by index-preserving
    /// decodes.
    Index8,
    /// 4x4 block compressed, 8 bytes per block.
    Dxt1,
    /// 4x4 block compressed, 16 bytes per block.
    Dxt3,
    /// 4x4 block compressed, 16 bytes per block.
    Dxt5
}

impl PixelLayout {
    pub const fn name(self) -> &'static str {
        match self {
            PixelLayout::Rgba8 => "rgba8",
            PixelLayout::Index8 => "index8",
            PixelLayout::Dxt1 => "dxt1",
            PixelLayout::Dxt3 => "dxt3",
            PixelLayout::Dxt5 => "dxt5"
        }
    }

    pub const fn is_block_compressed(self) -> bool {
        matches!(self, PixelLayout::Dxt1 | PixelLayout::Dxt3 | PixelLayout::Dxt5)
    }

    /// Bytes one stored row occupies for an image `width` pixels wide.
    ///
    /// For block-compressed layouts a "row" is a row of 4x4 blocks.
    pub const fn row_size(self, width: usize) -> usize {
        match self {
            PixelLayout::Rgba8 => width * 4,
            PixelLayout::Index8 => width,
            PixelLayout::Dxt1 => width.div_ceil(4) * 8,
            PixelLayout::Dxt3 | PixelLayout::Dxt5 => width.div_ceil(4) * 16
        }
    }

    /// Number of stored rows for an image `height` pixels tall.
    pub const fn row_count(self, height: usize) -> usize {
        if self.is_block_compressed() {
            height.div_ceil(4)
        } else {
            height
        }
    }
}

/// A decoded image: dimensions, a layout and the bytes themselves.
///
/// Rows are `pitch` bytes apart; for bitmaps created by this crate the
/// pitch always equals the tight row size, but the accessors go through
/// it so callers stay correct if that changes.
pub struct Bitmap {
    width:  usize,
    height: usize,
    layout: PixelLayout,
    pitch:  usize,
    data:   Vec<u8>
}

/// A borrowed view of a bitmap's bytes plus the row stride needed to
/// walk them.
pub struct LockedRegion<'a> {
    pub data:  &'a [u8],
    pub pitch: usize
}

/// The writable counterpart of [`LockedRegion`].
pub struct LockedRegionMut<'a> {
    pub data:  &'a mut [u8],
    pub pitch: usize
}

impl Bitmap {
    /// An all-zero bitmap of the given dimensions and layout.
    pub fn new(width: usize, height: usize, layout: PixelLayout) -> Bitmap {
        let pitch = layout.row_size(width);
        Bitmap {
            width,
            height,
            layout,
            pitch,
            data: vec![0; pitch * layout.row_count(height)]
        }
    }

    /// Wrap bytes a decoder produced.
    ///
    /// `data` must be tightly packed in `layout`; anything else fails
    /// rather than constructing a bitmap whose accessors would lie.
    pub fn from_decoded(
        width: usize, height: usize, layout: PixelLayout, data: Vec<u8>
    ) -> Result<Bitmap, ImageErrors> {
        let pitch = layout.row_size(width);
        if data.len() != pitch * layout.row_count(height) {
            return Err(ImageErrors::GenericStr(
                "pixel data length does not match dimensions and layout"
            ));
        }
        Ok(Bitmap {
            width,
            height,
            layout,
            pitch,
            data
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Borrow the bytes for reading.
    pub fn lock(&self) -> LockedRegion<'_> {
        LockedRegion {
            data:  &self.data,
            pitch: self.pitch
        }
    }

    /// Borrow the bytes for writing.
    pub fn lock_mut(&mut self) -> LockedRegionMut<'_> {
        LockedRegionMut {
            data:  &mut self.data,
            pitch: self.pitch
        }
    }

    /// Consume the bitmap, returning its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
