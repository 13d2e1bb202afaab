/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A decoded document and its layer tree
use std::ops::ControlFlow;
use std::path::Path;

use log::debug;
use zune_core::options::DecoderOptions;
use zune_psd::{LayerRecord, PSDDecoder};

use crate::errors::DocumentErrors;
use crate::traverse::Layers;
use crate::tree::{LayerNode, LayerTree};

/// A photoshop document.
///
/// The document owns the decoded layer records and the tree built from them,
/// tree nodes only refer to records by index. Anything borrowed from the document
/// is invalidated by [`unload`](Self::unload) or a new load, which the borrow checker enforces.
///
/// A document goes through
/// - empty, after [`new`](Self::new) or [`unload`](Self::unload)
/// - loaded, records are decoded but there is no tree yet
/// - parsed, after [`parse`](Self::parse) built the tree
#[derive(Default)]
pub struct PsdDocument {
    width:   usize,
    height:  usize,
    loaded:  bool,
    records: Vec<LayerRecord>,
    tree:    Option<LayerTree>
}

impl PsdDocument {
    /// Create an empty document
    pub fn new() -> PsdDocument {
        PsdDocument::default()
    }

    /// Decode `data`, build its layer tree and return the document
    pub fn open(data: &[u8]) -> Result<PsdDocument, DocumentErrors> {
        let mut doc = PsdDocument::new();
        doc.load(data)?;
        doc.parse()?;
        Ok(doc)
    }

    /// Create a loaded document from records decoded elsewhere
    ///
    /// `records` should be in file order, bottom-most layer first.
    pub fn from_records(width: usize, height: usize, records: Vec<LayerRecord>) -> PsdDocument {
        PsdDocument {
            width,
            height,
            loaded: true,
            records,
            tree: None
        }
    }

    /// Load a document from an in memory PSD file using default options
    pub fn load(&mut self, data: &[u8]) -> Result<(), DocumentErrors> {
        self.load_with_options(data, DecoderOptions::default())
    }

    /// Load a document from an in memory PSD file.
    ///
    /// Whatever was loaded before is dropped first. If decoding fails
    /// the document is left empty.
    pub fn load_with_options(
        &mut self, data: &[u8], options: DecoderOptions
    ) -> Result<(), DocumentErrors> {
        self.unload();

        let mut decoder = PSDDecoder::new_with_options(data, options);

        decoder.decode_headers()?;
        let records = decoder.decode_layers()?;
        let (width, height) = decoder.dimensions().unwrap_or_default();

        debug!(
            "Loaded {}x{} document with {} layer record(s)",
            width,
            height,
            records.len()
        );

        *self = PsdDocument::from_records(width, height, records);

        Ok(())
    }

    /// Read and load the PSD file at `path`
    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DocumentErrors> {
        self.unload();

        let data = std::fs::read(path.as_ref())?;
        debug!("Read {} bytes from {:?}", data.len(), path.as_ref());

        self.load(&data)
    }

    /// Build the layer tree of a loaded document.
    ///
    /// The tree can only be built once per load.
    pub fn parse(&mut self) -> Result<(), DocumentErrors> {
        if !self.loaded {
            return Err(DocumentErrors::NotLoaded);
        }
        if self.tree.is_some() {
            return Err(DocumentErrors::AlreadyParsed);
        }
        self.tree = Some(LayerTree::build(&self.records));

        Ok(())
    }

    /// Drop the tree and the records, leaving an empty document
    pub fn unload(&mut self) {
        if self.loaded {
            debug!("Unloading document, {} record(s)", self.records.len());
        }
        *self = PsdDocument::default();
    }

    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub const fn is_parsed(&self) -> bool {
        self.tree.is_some()
    }

    /// Document width, 0 if nothing is loaded
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Document height, 0 if nothing is loaded
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The flat records in file order
    pub fn records(&self) -> &[LayerRecord] {
        &self.records
    }

    /// The layer tree, present once the document is parsed
    pub const fn tree(&self) -> Option<&LayerTree> {
        self.tree.as_ref()
    }

    /// The record a node of this document's tree was built from
    pub fn record(&self, node: &LayerNode) -> Option<&LayerRecord> {
        self.records.get(node.record())
    }

    /// Number of top level layers and groups
    ///
    /// Returns `None` if no document is loaded, a loaded but unparsed
    /// document has no children.
    pub fn children_count(&self) -> Option<usize> {
        if !self.loaded {
            return None;
        }
        Some(self.tree.as_ref().map_or(0, LayerTree::children_count))
    }

    /// Number of layer records in the file, including records the
    /// tree doesn't keep, such as group ends and adjustment layers
    pub fn total_layer_count(&self) -> usize {
        self.records.len()
    }

    /// Visit every layer depth first, a group before its members.
    ///
    /// Returns `false` if `visitor` stopped early or if no document is loaded.
    pub fn for_each_layer<'a, F>(&'a self, mut visitor: F) -> bool
    where
        F: FnMut(&'a LayerRecord) -> ControlFlow<()>
    {
        self.for_each_layer_with_level(|layer, _| visitor(layer))
    }

    /// Visit every layer depth first together with its level, top level layers
    /// are at level 0.
    ///
    /// Returns `false` if `visitor` stopped early or if no document is loaded.
    pub fn for_each_layer_with_level<'a, F>(&'a self, mut visitor: F) -> bool
    where
        F: FnMut(&'a LayerRecord, usize) -> ControlFlow<()>
    {
        if !self.loaded {
            return false;
        }
        match &self.tree {
            Some(tree) => {
                let records = &self.records;
                tree.for_each_node_with_level(|node, level| visitor(&records[node.record()], level))
            }
            None => true
        }
    }

    /// Lazily iterate over `(level, record)` pairs in the same order
    /// as [`for_each_layer_with_level`](Self::for_each_layer_with_level)
    pub fn layers(&self) -> Layers<'_> {
        Layers::new(self.tree.as_ref(), &self.records)
    }
}
