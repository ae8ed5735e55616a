/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Bitfield mask decomposition for packed-pixel formats
//!
//! Formats like BMP describe where each color channel lives inside a
//! 16 or 32-bit pixel word with a per-channel bit mask. A valid mask is
//! a single contiguous run of set bits; anything else is rejected
//! outright instead of being truncated into garbage shift/width values.

/// A channel position inside a packed pixel word, derived from a mask.
///
/// `(pixel >> shift) & ((1 << bits) - 1)` extracts the raw channel
/// value, [`extract`](Self::extract) additionally scales it to 8 bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BitfieldDescriptor {
    shift: u32,
    bits:  u32
}

impl BitfieldDescriptor {
    /// Decompose a channel mask into its shift and bit count.
    ///
    /// Returns `None` when the set bits do not form one contiguous run.
    /// A zero mask means "channel absent" and must be handled by the
    /// caller before calling this.
    pub fn from_mask(mask: u32) -> Option<BitfieldDescriptor> {
        if mask == 0 {
            return None;
        }
        let shift = mask.trailing_zeros();
        let run = mask >> shift;
        let bits = run.trailing_ones();
        // a contiguous run shifted down is all-ones in its low bits
        if bits < 32 && run != (1_u32 << bits) - 1 {
            return None;
        }
        Some(BitfieldDescriptor { shift, bits })
    }

    pub const fn shift(&self) -> u32 {
        self.shift
    }

    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Extract this channel from a pixel word, scaled to the 0-255 range.
    #[inline]
    pub fn extract(&self, pixel: u32) -> u8 {
        let value = (pixel >> self.shift) & mask_for(self.bits);
        if self.bits >= 8 {
            (value >> (self.bits - 8)) as u8
        } else {
            // widen with a rounding divide so full-scale input maps
            // to exactly 255
            let max = mask_for(self.bits);
            ((value * 255 + max / 2) / max) as u8
        }
    }
}

#[inline(always)]
const fn mask_for(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1_u32 << bits) - 1
    }
}
