/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Lazy depth first iterators over a layer tree
//!
//! These visit nodes in the same order as the `for_each_*` walkers,
//! stopping early is done by dropping the iterator.
use std::slice::Iter;

use zune_psd::LayerRecord;

use crate::tree::{LayerNode, LayerTree};

/// Pre-order iterator over the nodes of a [`LayerTree`],
/// yielding `(level, node)` pairs
pub struct Nodes<'a> {
    stack: Vec<Iter<'a, LayerNode>>
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (usize, &'a LayerNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.len().checked_sub(1)?;

            match self.stack[level].next() {
                Some(node) => {
                    if let Some(children) = node.children() {
                        self.stack.push(children.iter());
                    }
                    return Some((level, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Pre-order iterator over the records of a tree, yielding `(level, record)` pairs
pub struct Layers<'a> {
    records: &'a [LayerRecord],
    nodes:   Nodes<'a>
}

impl<'a> Layers<'a> {
    pub(crate) fn new(tree: Option<&'a LayerTree>, records: &'a [LayerRecord]) -> Layers<'a> {
        let stack = match tree {
            Some(tree) => vec![tree.children().iter()],
            None => vec![]
        };
        Layers {
            records,
            nodes: Nodes { stack }
        }
    }
}

impl<'a> Iterator for Layers<'a> {
    type Item = (usize, &'a LayerRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.nodes.next()?;

        Some((level, &self.records[node.record()]))
    }
}

impl LayerTree {
    /// Iterate over every node depth first, a group before its children
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![self.children().iter()]
        }
    }
}
