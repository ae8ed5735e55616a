/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// BMP compression modes the decoder understands.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BmpCompression {
    Rgb,
    Rle8,
    Rle4,
    Bitfields
}

impl BmpCompression {
    pub fn from_u32(num: u32) -> Option<BmpCompression> {
        match num {
            0 => Some(BmpCompression::Rgb),
            1 => Some(BmpCompression::Rle8),
            2 => Some(BmpCompression::Rle4),
            3 => Some(BmpCompression::Bitfields),
            _ => None
        }
    }
}

/// The six known info-header sizes.
///
/// Everything the rest of the pipeline needs is resolved into
/// [`BmpHeader`] once, this enum only drives how the header bytes are
/// parsed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BmpHeaderKind {
    /// 12-byte legacy OS/2 header, 16-bit dimensions, 3-byte palette
    /// entries, no compression field
    Os2,
    /// 40-byte baseline Windows header
    Info,
    /// 52-byte header adding RGB channel masks
    V2,
    /// 56-byte header adding an alpha channel mask
    V3,
    /// 108-byte header adding color-management fields (skipped)
    V4,
    /// 124-byte header adding more color-management fields (skipped)
    V5
}

impl BmpHeaderKind {
    pub fn from_size(size: u32) -> Option<BmpHeaderKind> {
        match size {
            12 => Some(BmpHeaderKind::Os2),
            40 => Some(BmpHeaderKind::Info),
            52 => Some(BmpHeaderKind::V2),
            56 => Some(BmpHeaderKind::V3),
            108 => Some(BmpHeaderKind::V4),
            124 => Some(BmpHeaderKind::V5),
            _ => None
        }
    }

    pub const fn is_os2(&self) -> bool {
        matches!(self, BmpHeaderKind::Os2)
    }

    /// Whether this header variant stores RGB channel masks.
    pub const fn has_rgb_masks(&self) -> bool {
        !matches!(self, BmpHeaderKind::Os2 | BmpHeaderKind::Info)
    }

    /// Whether this header variant stores an alpha channel mask.
    pub const fn has_alpha_mask(&self) -> bool {
        matches!(self, BmpHeaderKind::V3 | BmpHeaderKind::V4 | BmpHeaderKind::V5)
    }
}

/// The canonical resolved header every decode path works from,
/// whatever on-disk variant it came out of.
#[derive(Debug)]
pub struct BmpHeader {
    pub kind:         BmpHeaderKind,
    pub size:         u32,
    pub width:        usize,
    pub height:       usize,
    /// True for bottom-up files (the on-disk default); the sign of the
    /// on-disk height never leaves the header parser.
    pub flipped:      bool,
    pub depth:        u16,
    pub comp:         BmpCompression,
    /// Pixel data offset from the start of the file.
    pub pix_start:    u32,
    /// Declared palette color count (0 means "use the default rule").
    pub colors_used:  u32,
    /// Channel masks in R, G, B, A order; 0 means absent.
    pub masks:        [u32; 4]
}
