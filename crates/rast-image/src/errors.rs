/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The aggregated error type surfaced across the registry boundary

use core::fmt::{Debug, Formatter};

use rast_bmp::{BmpDecoderErrors, BmpEncoderErrors};
use rast_core::bytestream::RByteIoError;
use rast_dds::DdsDecoderErrors;
use rast_pcx::{PcxDecoderErrors, PcxEncoderErrors};
use rast_tga::{TgaDecoderErrors, TgaEncoderErrors};

/// Anything a registry-driven load or save can fail with.
///
/// Codec errors are carried through unchanged; the remaining variants
/// come from dispatch itself.
#[non_exhaustive]
pub enum ImageErrors {
    BmpDecodeErrors(BmpDecoderErrors),
    BmpEncodeErrors(BmpEncoderErrors),
    PcxDecodeErrors(PcxDecoderErrors),
    PcxEncodeErrors(PcxEncoderErrors),
    TgaDecodeErrors(TgaDecoderErrors),
    TgaEncodeErrors(TgaEncoderErrors),
    DdsDecodeErrors(DdsDecoderErrors),
    /// No handler is registered for the extension, or the filename has
    /// no extension at all
    NoHandler(String),
    /// The extension given to `register` exceeds the maximum length
    ExtensionTooLong(usize),
    /// A registration carrying no functions for an extension that has
    /// no entry yet
    NothingToRegister(String),
    /// A registration passing `None` for a slot that is already empty
    NothingToRemove(String),
    /// A saver was handed a bitmap in a layout it cannot write
    UnsupportedLayout(&'static str),
    IoErrors(std::io::Error),
    ByteIoErrors(RByteIoError),
    GenericStr(&'static str)
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BmpDecodeErrors(err) => writeln!(f, "bmp decode: {:?}", err),
            Self::BmpEncodeErrors(err) => writeln!(f, "bmp encode: {:?}", err),
            Self::PcxDecodeErrors(err) => writeln!(f, "pcx decode: {:?}", err),
            Self::PcxEncodeErrors(err) => writeln!(f, "pcx encode: {:?}", err),
            Self::TgaDecodeErrors(err) => writeln!(f, "tga decode: {:?}", err),
            Self::TgaEncodeErrors(err) => writeln!(f, "tga encode: {:?}", err),
            Self::DdsDecodeErrors(err) => writeln!(f, "dds decode: {:?}", err),
            Self::NoHandler(name) => {
                writeln!(f, "No handler registered for `{}`", name)
            }
            Self::ExtensionTooLong(length) => {
                writeln!(f, "Extension of {} characters exceeds the maximum", length)
            }
            Self::NothingToRegister(extension) => {
                writeln!(f, "No functions to register for `{}`", extension)
            }
            Self::NothingToRemove(extension) => {
                writeln!(f, "Nothing to remove from an empty handler slot of `{}`", extension)
            }
            Self::UnsupportedLayout(layout) => {
                writeln!(f, "Cannot save a bitmap with layout {}", layout)
            }
            Self::IoErrors(err) => writeln!(f, "{:?}", err),
            Self::ByteIoErrors(err) => writeln!(f, "{:?}", err),
            Self::GenericStr(message) => writeln!(f, "{}", message)
        }
    }
}

macro_rules! impl_from {
    ($from:ty, $variant:tt) => {
        impl From<$from> for ImageErrors {
            fn from(value: $from) -> Self {
                ImageErrors::$variant(value)
            }
        }
    };
}

impl_from!(BmpDecoderErrors, BmpDecodeErrors);
impl_from!(BmpEncoderErrors, BmpEncodeErrors);
impl_from!(PcxDecoderErrors, PcxDecodeErrors);
impl_from!(PcxEncoderErrors, PcxEncodeErrors);
impl_from!(TgaDecoderErrors, TgaDecodeErrors);
impl_from!(TgaEncoderErrors, TgaEncodeErrors);
impl_from!(DdsDecoderErrors, DdsDecodeErrors);
impl_from!(std::io::Error, IoErrors);
impl_from!(RByteIoError, ByteIoErrors);
