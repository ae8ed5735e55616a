/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The shared palette table used by all indexed-color codecs
//!
//! A palette is created fresh for every decode and dropped when the
//! decode completes, it is never shared between calls.

use log::warn;

/// Upper bound on palette entries any supported format can address.
pub const PALETTE_SIZE: usize = 256;

/// A single RGBA palette entry, 8 bits per channel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PaletteEntry {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    pub alpha: u8
}

impl PaletteEntry {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> PaletteEntry {
        PaletteEntry {
            red,
            green,
            blue,
            alpha
        }
    }
}

/// An ordered table of up to [`PALETTE_SIZE`] RGBA entries.
///
/// Lookups clamp the index into the populated range, a malformed file
/// whose pixel data addresses entries it never defined cannot cause an
/// out of bounds read.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    entries: Vec<PaletteEntry>
}

impl Palette {
    pub fn new() -> Palette {
        Palette {
            entries: Vec::new()
        }
    }

    /// A palette of `count` identity gray entries (R = G = B = index),
    /// as synthesized for grayscale formats with no stored palette.
    pub fn grayscale(count: usize) -> Palette {
        let entries = (0..count.min(PALETTE_SIZE))
            .map(|i| PaletteEntry::new(i as u8, i as u8, i as u8, 255))
            .collect();
        Palette { entries }
    }

    /// A palette of `count` black opaque entries.
    ///
    /// Used where a format promises a palette later in the stream that
    /// may turn out to be missing.
    pub fn black(count: usize) -> Palette {
        Palette {
            entries: vec![PaletteEntry::new(0, 0, 0, 255); count.min(PALETTE_SIZE)]
        }
    }

    /// Append an entry, ignoring entries beyond [`PALETTE_SIZE`].
    pub fn push(&mut self, entry: PaletteEntry) {
        if self.entries.len() < PALETTE_SIZE {
            self.entries.push(entry);
        }
    }

    /// Overwrite the entry at `index`, extending the table with black
    /// entries when `index` lies beyond the populated range.
    pub fn set(&mut self, index: usize, entry: PaletteEntry) {
        if index >= PALETTE_SIZE {
            return;
        }
        if index >= self.entries.len() {
            self.entries
                .resize(index + 1, PaletteEntry::new(0, 0, 0, 255));
        }
        self.entries[index] = entry;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a pixel's palette index to its RGBA entry.
    ///
    /// Out-of-range indices are reduced modulo the populated size; an
    /// empty palette resolves everything to opaque black.
    #[inline]
    pub fn resolve(&self, index: usize) -> PaletteEntry {
        match self.entries.len() {
            0 => PaletteEntry::new(0, 0, 0, 255),
            len => self.entries[index % len]
        }
    }

    /// Like [`resolve`](Self::resolve) but warns once the first time an
    /// out-of-range index is clamped.
    #[inline]
    pub fn resolve_checked(&self, index: usize, warned: &mut bool) -> PaletteEntry {
        if index >= self.entries.len() && !*warned {
            warn!(
                "palette index {} outside populated palette of {} entries, clamping",
                index,
                self.entries.len()
            );
            *warned = true;
        }
        self.resolve(index)
    }
}

/// Scale a color channel by `alpha / 255`.
///
/// The division rounds down, matching the historical producers of
/// premultiplied BMP and TGA files.
#[inline(always)]
pub const fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((channel as u16 * alpha as u16) / 255) as u8
}
