/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Extension-keyed dispatch to the format codecs
//!
//! The registry is an explicit context object, not process-global
//! state; the embedding application creates one, optionally registers
//! extra handlers and hands out shared references. Registration
//! mutates the registry and must be serialized by the caller, lookups
//! after the handler set stabilizes are read-only and safe to run
//! concurrently.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::trace;
use rast_bmp::{BmpDecoder, BmpEncoder};
use rast_core::bytestream::{RByteReaderTrait, RByteWriterTrait};
use rast_core::colorspace::ColorSpace;
use rast_core::options::{DecoderOptions, EncoderOptions};
use rast_dds::{DdsDecoder, DdsFormat};
use rast_pcx::{PcxDecoder, PcxEncoder};
use rast_tga::{TgaDecoder, TgaEncoder};

use crate::bitmap::{Bitmap, PixelLayout};
use crate::errors::ImageErrors;

/// Longest extension `register` accepts, leading dot included.
pub const MAX_EXTENSION_LENGTH: usize = 31;

/// Loads a bitmap from a file on disk.
pub type FileLoader =
    Box<dyn Fn(&Path, &DecoderOptions) -> Result<Bitmap, ImageErrors> + Send + Sync>;
/// Saves a bitmap to a file on disk.
pub type FileSaver = Box<dyn Fn(&Path, &Bitmap) -> Result<(), ImageErrors> + Send + Sync>;
/// Loads a bitmap from an already-open stream.
pub type StreamLoader = Box<
    dyn Fn(&mut dyn RByteReaderTrait, &DecoderOptions) -> Result<Bitmap, ImageErrors>
        + Send
        + Sync
>;
/// Saves a bitmap to an already-open stream.
pub type StreamSaver =
    Box<dyn Fn(&mut dyn RByteWriterTrait, &Bitmap) -> Result<(), ImageErrors> + Send + Sync>;

struct Entry {
    extension:     String,
    loader:        Option<FileLoader>,
    saver:         Option<FileSaver>,
    stream_loader: Option<StreamLoader>,
    stream_saver:  Option<StreamSaver>
}

/// Maps case-insensitive file extensions to handler functions.
///
/// Lookup is a linear scan from the most recent registration backward,
/// so re-registering an extension shadows the earlier handler. The
/// table only ever holds a handful of entries, linear scan is fine.
#[derive(Default)]
pub struct FormatRegistry {
    entries: Vec<Entry>
}

impl FormatRegistry {
    /// An empty registry with no handlers at all.
    pub fn new() -> FormatRegistry {
        FormatRegistry::default()
    }

    /// A registry with every codec in this workspace wired up:
    /// `.bmp`/`.dib`, `.pcx`, `.tga`/`.tpic` for load and save, `.dds`
    /// for load only.
    pub fn with_builtin_formats() -> FormatRegistry {
        let mut registry = FormatRegistry::new();
        for extension in [".bmp", ".dib"] {
            registry.insert(
                extension,
                Some(Box::new(|path: &Path, options: &DecoderOptions| {
                    let mut reader = BufReader::new(File::open(path)?);
                    load_bmp(&mut reader, options)
                })),
                Some(Box::new(|path: &Path, bitmap: &Bitmap| {
                    let mut writer = BufWriter::new(File::create(path)?);
                    save_bmp(&mut writer, bitmap)
                })),
                Some(Box::new(load_bmp)),
                Some(Box::new(save_bmp))
            );
        }
        registry.insert(
            ".pcx",
            Some(Box::new(|path: &Path, options: &DecoderOptions| {
                let mut reader = BufReader::new(File::open(path)?);
                load_pcx(&mut reader, options)
            })),
            Some(Box::new(|path: &Path, bitmap: &Bitmap| {
                let mut writer = BufWriter::new(File::create(path)?);
                save_pcx(&mut writer, bitmap)
            })),
            Some(Box::new(load_pcx)),
            Some(Box::new(save_pcx))
        );
        for extension in [".tga", ".tpic"] {
            registry.insert(
                extension,
                Some(Box::new(|path: &Path, options: &DecoderOptions| {
                    let mut reader = BufReader::new(File::open(path)?);
                    load_tga(&mut reader, options)
                })),
                Some(Box::new(|path: &Path, bitmap: &Bitmap| {
                    let mut writer = BufWriter::new(File::create(path)?);
                    save_tga(&mut writer, bitmap)
                })),
                Some(Box::new(load_tga)),
                Some(Box::new(save_tga))
            );
        }
        // no DDS saver, the codec is read-only
        registry.insert(
            ".dds",
            Some(Box::new(|path: &Path, options: &DecoderOptions| {
                let mut reader = BufReader::new(File::open(path)?);
                load_dds(&mut reader, options)
            })),
            None,
            Some(Box::new(load_dds)),
            None
        );
        registry
    }

    /// Add or replace the handlers for an extension.
    ///
    /// The extension must carry its leading dot and is matched
    /// case-insensitively. On an existing entry each `Some` slot
    /// replaces the old function and each `None` slot is a removal:
    /// it clears a populated slot, and fails the whole call as a no-op
    /// when the slot holds nothing to remove. Registering only `None`
    /// functions for an extension that has no entry fails too.
    pub fn register(
        &mut self, extension: &str, loader: Option<FileLoader>, saver: Option<FileSaver>,
        stream_loader: Option<StreamLoader>, stream_saver: Option<StreamSaver>
    ) -> Result<(), ImageErrors> {
        if extension.len() > MAX_EXTENSION_LENGTH {
            return Err(ImageErrors::ExtensionTooLong(extension.len()));
        }
        let index = self
            .entries
            .iter()
            .rposition(|entry| entry.extension.eq_ignore_ascii_case(extension));
        match index {
            Some(index) => {
                let entry = &mut self.entries[index];
                if (loader.is_none() && entry.loader.is_none())
                    || (saver.is_none() && entry.saver.is_none())
                    || (stream_loader.is_none() && entry.stream_loader.is_none())
                    || (stream_saver.is_none() && entry.stream_saver.is_none())
                {
                    return Err(ImageErrors::NothingToRemove(extension.to_string()));
                }
                entry.loader = loader;
                entry.saver = saver;
                entry.stream_loader = stream_loader;
                entry.stream_saver = stream_saver;
            }
            None => {
                if loader.is_none()
                    && saver.is_none()
                    && stream_loader.is_none()
                    && stream_saver.is_none()
                {
                    return Err(ImageErrors::NothingToRegister(extension.to_string()));
                }
                self.insert(extension, loader, saver, stream_loader, stream_saver);
            }
        }
        Ok(())
    }

    fn insert(
        &mut self, extension: &str, loader: Option<FileLoader>, saver: Option<FileSaver>,
        stream_loader: Option<StreamLoader>, stream_saver: Option<StreamSaver>
    ) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .rev()
            .find(|entry| entry.extension.eq_ignore_ascii_case(extension))
        {
            entry.loader = loader;
            entry.saver = saver;
            entry.stream_loader = stream_loader;
            entry.stream_saver = stream_saver;
            return;
        }
        self.entries.push(Entry {
            extension: extension.to_ascii_lowercase(),
            loader,
            saver,
            stream_loader,
            stream_saver
        });
    }

    fn find(&self, extension: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.extension.eq_ignore_ascii_case(extension))
    }

    /// Load the file at `path`, dispatching on its extension.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Bitmap, ImageErrors> {
        self.load_with_options(path, &DecoderOptions::default())
    }

    /// Like [`load`](Self::load) with explicit decoder options.
    pub fn load_with_options<P: AsRef<Path>>(
        &self, path: P, options: &DecoderOptions
    ) -> Result<Bitmap, ImageErrors> {
        let path = path.as_ref();
        let extension = extension_of(path)
            .ok_or_else(|| ImageErrors::NoHandler(path.display().to_string()))?;
        trace!("loading {} via `{}` handler", path.display(), extension);
        let entry = self
            .find(extension)
            .and_then(|entry| entry.loader.as_ref())
            .ok_or_else(|| ImageErrors::NoHandler(extension.to_string()))?;
        entry(path, options)
    }

    /// Save `bitmap` to `path`, dispatching on the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P, bitmap: &Bitmap) -> Result<(), ImageErrors> {
        let path = path.as_ref();
        let extension = extension_of(path)
            .ok_or_else(|| ImageErrors::NoHandler(path.display().to_string()))?;
        trace!("saving {} via `{}` handler", path.display(), extension);
        let entry = self
            .find(extension)
            .and_then(|entry| entry.saver.as_ref())
            .ok_or_else(|| ImageErrors::NoHandler(extension.to_string()))?;
        entry(path, bitmap)
    }

    /// Load from an open stream, dispatching on an explicit extension
    /// hint such as `".bmp"` instead of a filename.
    pub fn load_from_stream(
        &self, stream: &mut dyn RByteReaderTrait, format_hint: &str
    ) -> Result<Bitmap, ImageErrors> {
        self.load_from_stream_with_options(stream, format_hint, &DecoderOptions::default())
    }

    /// Like [`load_from_stream`](Self::load_from_stream) with explicit
    /// decoder options.
    pub fn load_from_stream_with_options(
        &self, stream: &mut dyn RByteReaderTrait, format_hint: &str, options: &DecoderOptions
    ) -> Result<Bitmap, ImageErrors> {
        let entry = self
            .find(format_hint)
            .and_then(|entry| entry.stream_loader.as_ref())
            .ok_or_else(|| ImageErrors::NoHandler(format_hint.to_string()))?;
        entry(stream, options)
    }

    /// Save to an open stream, dispatching on an explicit extension
    /// hint.
    pub fn save_to_stream(
        &self, stream: &mut dyn RByteWriterTrait, format_hint: &str, bitmap: &Bitmap
    ) -> Result<(), ImageErrors> {
        let entry = self
            .find(format_hint)
            .and_then(|entry| entry.stream_saver.as_ref())
            .ok_or_else(|| ImageErrors::NoHandler(format_hint.to_string()))?;
        entry(stream, bitmap)
    }
}

/// The extension of `path`, from the last dot of the file name to its
/// end, dot included.
fn extension_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let dot = name.rfind('.')?;
    Some(&name[dot..])
}

fn load_bmp(
    stream: &mut dyn RByteReaderTrait, options: &DecoderOptions
) -> Result<Bitmap, ImageErrors> {
    let mut decoder = BmpDecoder::new_with_options(stream, *options);
    let pixels = decoder.decode()?;
    wrap_decoded(decoder.dimensions(), decoder.colorspace(), pixels)
}

fn load_pcx(
    stream: &mut dyn RByteReaderTrait, options: &DecoderOptions
) -> Result<Bitmap, ImageErrors> {
    let mut decoder = PcxDecoder::new_with_options(stream, *options);
    let pixels = decoder.decode()?;
    wrap_decoded(decoder.dimensions(), decoder.colorspace(), pixels)
}

fn load_tga(
    stream: &mut dyn RByteReaderTrait, options: &DecoderOptions
) -> Result<Bitmap, ImageErrors> {
    let mut decoder = TgaDecoder::new_with_options(stream, *options);
    let pixels = decoder.decode()?;
    wrap_decoded(decoder.dimensions(), decoder.colorspace(), pixels)
}

fn load_dds(
    stream: &mut dyn RByteReaderTrait, options: &DecoderOptions
) -> Result<Bitmap, ImageErrors> {
    let mut decoder = DdsDecoder::new_with_options(stream, *options);
    let blocks = decoder.decode()?;
    let (width, height) = decoder
        .dimensions()
        .ok_or(ImageErrors::GenericStr("decoder reported no dimensions"))?;
    let layout = match decoder.format() {
        Some(DdsFormat::Dxt1) => PixelLayout::Dxt1,
        Some(DdsFormat::Dxt3) => PixelLayout::Dxt3,
        Some(DdsFormat::Dxt5) => PixelLayout::Dxt5,
        None => return Err(ImageErrors::GenericStr("decoder reported no format"))
    };
    Bitmap::from_decoded(width, height, layout, blocks)
}

fn wrap_decoded(
    dimensions: Option<(usize, usize)>, colorspace: Option<ColorSpace>, pixels: Vec<u8>
) -> Result<Bitmap, ImageErrors> {
    let (width, height) =
        dimensions.ok_or(ImageErrors::GenericStr("decoder reported no dimensions"))?;
    let layout = match colorspace {
        Some(ColorSpace::Indexed) => PixelLayout::Index8,
        _ => PixelLayout::Rgba8
    };
    Bitmap::from_decoded(width, height, layout, pixels)
}

/// Borrow a bitmap's pixels for a saver that wants packed RGBA.
fn rgba_pixels(bitmap: &Bitmap) -> Result<&[u8], ImageErrors> {
    if bitmap.layout() != PixelLayout::Rgba8 {
        return Err(ImageErrors::UnsupportedLayout(bitmap.layout().name()));
    }
    Ok(bitmap.lock().data)
}

fn save_bmp(sink: &mut dyn RByteWriterTrait, bitmap: &Bitmap) -> Result<(), ImageErrors> {
    let pixels = rgba_pixels(bitmap)?;
    let options = EncoderOptions::new(bitmap.width(), bitmap.height(), ColorSpace::RGBA);
    BmpEncoder::new(pixels, options).encode(sink)?;
    Ok(())
}

fn save_pcx(sink: &mut dyn RByteWriterTrait, bitmap: &Bitmap) -> Result<(), ImageErrors> {
    let pixels = rgba_pixels(bitmap)?;
    let options = EncoderOptions::new(bitmap.width(), bitmap.height(), ColorSpace::RGBA);
    PcxEncoder::new(pixels, options).encode(sink)?;
    Ok(())
}

fn save_tga(sink: &mut dyn RByteWriterTrait, bitmap: &Bitmap) -> Result<(), ImageErrors> {
    let pixels = rgba_pixels(bitmap)?;
    let options = EncoderOptions::new(bitmap.width(), bitmap.height(), ColorSpace::RGBA);
    TgaEncoder::new(pixels, options).encode(sink)?;
    Ok(())
}
