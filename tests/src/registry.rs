/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;

use rast_core::bytestream::RCursor;
use rast_core::options::DecoderOptions;
use rast_image::bitmap::PixelLayout;
use rast_image::registry::FormatRegistry;

use crate::{dxt1_file, rgba_bitmap, rgba_image};

#[test]
fn file_round_trip_every_builtin_saver() {
    let registry = FormatRegistry::with_builtin_formats();
    let bitmap = rgba_bitmap(5, 3);
    let dir = tempfile::tempdir().unwrap();

    for extension in ["bmp", "pcx", "tga"] {
        let path = dir.path().join(format!("roundtrip.{extension}"));
        registry.save(&path, &bitmap).expect("save failed");

        let options = DecoderOptions::default().set_premultiply_alpha(false);
        let loaded = registry
            .load_with_options(&path, &options)
            .expect("load failed");

        assert_eq!(loaded.layout(), PixelLayout::Rgba8);
        assert_eq!((loaded.width(), loaded.height()), (5, 3));
        assert_eq!(
            loaded.into_vec(),
            rgba_image(5, 3),
            "round trip through {extension} failed"
        );
    }
}

#[test]
fn extension_dispatch_is_case_insensitive() {
    let registry = FormatRegistry::with_builtin_formats();
    let bitmap = rgba_bitmap(2, 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("case-test.PCX");
    registry.save(&path, &bitmap).expect("save failed");
    let loaded = registry.load(&path).expect("load failed");

    assert_eq!(loaded.into_vec(), rgba_image(2, 2));
}

#[test]
fn stream_round_trip_with_format_hints() {
    let registry = FormatRegistry::with_builtin_formats();
    let bitmap = rgba_bitmap(4, 2);

    let mut encoded: Vec<u8> = Vec::new();
    registry
        .save_to_stream(&mut encoded, ".tga", &bitmap)
        .expect("stream save failed");

    // the hint is matched case-insensitively like any extension
    let mut cursor = RCursor::new(encoded);
    let options = DecoderOptions::default().set_premultiply_alpha(false);
    let loaded = registry
        .load_from_stream_with_options(&mut cursor, ".TGA", &options)
        .expect("stream load failed");

    assert_eq!(loaded.into_vec(), rgba_image(4, 2));
}

#[test]
fn missing_handlers_fail_without_touching_the_filesystem() {
    let registry = FormatRegistry::with_builtin_formats();

    assert!(registry.load("no-extension").is_err());
    assert!(registry.load("image.xyz").is_err());
    assert!(registry.save("image.xyz", &rgba_bitmap(1, 1)).is_err());

    let mut cursor = RCursor::new(Vec::new());
    assert!(registry.load_from_stream(&mut cursor, ".xyz").is_err());
}

#[test]
fn dds_loads_as_block_compressed_and_has_no_saver() {
    let registry = FormatRegistry::with_builtin_formats();
    let block = [1, 2, 3, 4, 5, 6, 7, 8];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("block.dds");
    fs::write(&path, dxt1_file(&block)).unwrap();
    let loaded = registry.load(&path).expect("load failed");

    assert_eq!(loaded.layout(), PixelLayout::Dxt1);
    assert_eq!((loaded.width(), loaded.height()), (4, 4));
    assert_eq!(loaded.into_vec(), block);

    let mut sink: Vec<u8> = Vec::new();
    assert!(registry
        .save_to_stream(&mut sink, ".dds", &rgba_bitmap(1, 1))
        .is_err());
}

#[test]
fn late_registration_shadows_the_builtin_handler() {
    let mut registry = FormatRegistry::with_builtin_formats();
    registry
        .register(
            ".bmp",
            None,
            None,
            Some(Box::new(|_, _| Ok(rgba_bitmap(1, 1)))),
            None
        )
        .expect("register failed");

    // stream loads now hit the replacement
    let mut cursor = RCursor::new(vec![0_u8; 4]);
    let loaded = registry
        .load_from_stream(&mut cursor, ".BMP")
        .expect("replacement handler not reached");
    assert_eq!((loaded.width(), loaded.height()), (1, 1));

    // and the slots passed as None were cleared
    assert!(registry.load("whatever.bmp").is_err());
}

#[test]
fn clearing_an_empty_slot_is_a_failed_no_op() {
    let mut registry = FormatRegistry::new();
    registry
        .register(
            ".xyz",
            None,
            None,
            Some(Box::new(|_, _| Ok(rgba_bitmap(1, 1)))),
            None
        )
        .expect("register failed");

    // the file-loader slot is empty, so its None has nothing to remove
    let result = registry.register(".xyz", None, None, None, Some(Box::new(|_, _| Ok(()))));
    assert!(result.is_err());

    // the failed call changed nothing, the stream loader still answers
    let mut cursor = RCursor::new(Vec::new());
    assert!(registry.load_from_stream(&mut cursor, ".xyz").is_ok());
    let mut sink: Vec<u8> = Vec::new();
    assert!(registry
        .save_to_stream(&mut sink, ".xyz", &rgba_bitmap(1, 1))
        .is_err());
}

#[test]
fn register_validates_its_input() {
    let mut registry = FormatRegistry::new();

    // nothing to register for an unknown extension
    assert!(registry.register(".xyz", None, None, None, None).is_err());

    let long = format!(".{}", "x".repeat(40));
    assert!(registry
        .register(&long, None, None, Some(Box::new(|_, _| Ok(rgba_bitmap(1, 1)))), None)
        .is_err());
}
