/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::read;
use std::ops::ControlFlow;

use zune_psd_layers::errors::DocumentErrors;
use zune_psd_layers::PsdDocument;

use crate::writer::{LayerKind, PsdWriter, TestLayer};
use crate::{fixture_path, hash, TestEntry};

fn outline(doc: &PsdDocument) -> Vec<String> {
    let mut outline = vec![];
    doc.for_each_layer_with_level(|layer, level| {
        outline.push(format!("{level}:{}", layer.name));
        ControlFlow::Continue(())
    });
    outline
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_layer_trees() {
    let json_file = read(fixture_path("layers.json")).unwrap();

    let entries: Vec<TestEntry> = serde_json::from_slice(&json_file).unwrap();

    let mut error = false;
    let mut failed = Vec::new();

    for entry in &entries {
        let doc = PsdDocument::open(&entry.to_psd()).unwrap();

        let found = outline(&doc);
        let iterated: Vec<String> = doc
            .layers()
            .map(|(level, layer)| format!("{level}:{}", layer.name))
            .collect();

        let matches = found == entry.outline
            && iterated == entry.outline
            && doc.children_count() == Some(entry.children)
            && doc.total_layer_count() == entry.layers.len()
            && doc.is_two_level_grouping() == entry.two_level;

        if !matches {
            error = true;
            failed.push(entry.name.clone());
            // report error
            let err = format!(
                "Tree mismatch for {:?}\nExpected {:?} but found {:?}\nChildren: {:?}\nConfig:{:#?}",
                entry.name,
                entry.outline,
                found,
                doc.children_count(),
                entry
            );
            eprintln!("{}\n", err)
        }
    }
    if error {
        panic!("Errors found while building layer trees\n {:#?}", failed);
    }
}

fn sample() -> Vec<u8> {
    PsdWriter::new(vec![
        TestLayer::pixels("A", 2, 2, &[-1, 0, 1, 2], 0),
        TestLayer::group_end(),
        TestLayer::pixels("B", 3, 1, &[-1, 0, 1, 2], 1),
        TestLayer::new(LayerKind::Folder, "G"),
        TestLayer::pixels("C", 1, 4, &[-1, 0, 1, 2], 2),
    ])
    .encode()
}

#[test]
fn test_load_then_parse() {
    let data = sample();
    let mut doc = PsdDocument::new();

    assert!(matches!(doc.parse(), Err(DocumentErrors::NotLoaded)));

    doc.load(&data).unwrap();
    assert!(doc.is_loaded());
    assert_eq!((doc.width(), doc.height()), (16, 8));
    assert_eq!(doc.children_count(), Some(0));
    assert_eq!(doc.total_layer_count(), 5);

    doc.parse().unwrap();
    assert_eq!(doc.children_count(), Some(3));
    assert_eq!(outline(&doc), ["0:C", "0:G", "1:B", "0:A"]);

    assert!(matches!(doc.parse(), Err(DocumentErrors::AlreadyParsed)));
}

#[test]
fn test_reload_replaces_document() {
    let mut doc = PsdDocument::open(&sample()).unwrap();

    let other = PsdWriter::new(vec![TestLayer::new(LayerKind::Normal, "only")]).encode();
    doc.load(&other).unwrap();

    // a new load needs a new parse
    assert!(!doc.is_parsed());
    assert_eq!(doc.children_count(), Some(0));

    doc.parse().unwrap();
    assert_eq!(outline(&doc), ["0:only"]);
}

#[test]
fn test_unload_and_reparse() {
    let data = sample();
    let mut doc = PsdDocument::open(&data).unwrap();

    doc.unload();
    assert_eq!(doc.children_count(), None);
    assert_eq!(doc.total_layer_count(), 0);
    assert_eq!((doc.width(), doc.height()), (0, 0));
    assert!(!doc.for_each_layer(|_| ControlFlow::Continue(())));

    doc.load(&data).unwrap();
    doc.parse().unwrap();
    assert_eq!(doc.children_count(), Some(3));
}

#[test]
fn test_pixels_survive_tree_building() {
    let doc = PsdDocument::open(&sample()).unwrap();

    let decoded: Vec<u8> = doc
        .layers()
        .flat_map(|(_, layer)| layer.image_data().to_vec())
        .collect();

    let expected: Vec<u8> = [
        TestLayer::pixels("C", 1, 4, &[-1, 0, 1, 2], 2),
        TestLayer::pixels("B", 3, 1, &[-1, 0, 1, 2], 1),
        TestLayer::pixels("A", 2, 2, &[-1, 0, 1, 2], 0),
    ]
    .iter()
    .flat_map(|layer| layer.expected_rgba(false))
    .collect();

    assert_eq!(hash(&decoded), hash(&expected));
}

#[test]
fn test_load_from_path() {
    let path = std::env::temp_dir().join(format!("zune-psd-layers-{}.psd", std::process::id()));
    std::fs::write(&path, sample()).unwrap();

    let mut doc = PsdDocument::new();
    let result = doc.load_from_path(&path);
    std::fs::remove_file(&path).unwrap();

    result.unwrap();
    doc.parse().unwrap();
    assert_eq!(doc.children_count(), Some(3));
}

#[test]
fn test_failed_load_is_reported() {
    let mut data = sample();
    data.truncate(60);

    let mut doc = PsdDocument::open(&sample()).unwrap();

    assert!(matches!(
        doc.load(&data),
        Err(DocumentErrors::DecodeErrors(_))
    ));
    assert!(!doc.is_loaded());
}

#[test]
fn test_visitor_stops_the_walk() {
    let doc = PsdDocument::open(&sample()).unwrap();
    let mut visited = 0;

    let completed = doc.for_each_layer(|layer| {
        visited += 1;
        if layer.is_group() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert!(!completed);
    assert_eq!(visited, 2);
}
