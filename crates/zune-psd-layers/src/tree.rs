/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Rebuilding the layer hierarchy from the flat record stream
//!
//! Photoshop stores layers bottom-most first. A group is written as
//!
//! ```text
//! index   record
//!   0     </Layer group>   (hidden divider closing the group)
//!   1     member, bottom
//!   2     member, top
//!   3     group folder
//! ```
//!
//! so walking the records from the last index down to zero visits a group's
//! folder record first, then its members top to bottom, then the divider.
use std::ops::ControlFlow;

use log::{debug, trace, warn};
use zune_psd::{LayerRecord, LayerType};

use crate::list::ChildList;

/// How the tree builder treats a record
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub enum RecordKind {
    /// A leaf layer
    Normal,
    /// Opens a group, the records below it are its members
    GroupStart,
    /// Closes the innermost open group
    GroupEnd,
    /// Skipped, e.g adjustment layers or unnamed dividers
    Other
}

impl RecordKind {
    pub fn of(record: &LayerRecord) -> RecordKind {
        match record.layer_type {
            LayerType::Normal => RecordKind::Normal,
            LayerType::Folder => RecordKind::GroupStart,
            LayerType::Hidden if record.is_group_end() => RecordKind::GroupEnd,
            _ => RecordKind::Other
        }
    }
}

/// A node of the rebuilt layer tree.
///
/// Nodes don't own their records, they hold the record's index in the
/// flat record stream they were built from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LayerNode {
    Leaf(usize),
    Group {
        record:   usize,
        children: ChildList<LayerNode>
    }
}

impl LayerNode {
    /// Index of the record this node was built from
    pub const fn record(&self) -> usize {
        match self {
            LayerNode::Leaf(record) | LayerNode::Group { record, .. } => *record
        }
    }

    pub const fn is_group(&self) -> bool {
        matches!(self, LayerNode::Group { .. })
    }

    /// Children of a group, `None` for leaves
    pub const fn children(&self) -> Option<&ChildList<LayerNode>> {
        match self {
            LayerNode::Leaf(_) => None,
            LayerNode::Group { children, .. } => Some(children)
        }
    }
}

/// A group whose closing divider hasn't been seen yet
struct OpenGroup {
    record:   usize,
    children: ChildList<LayerNode>
}

impl OpenGroup {
    fn close(self) -> LayerNode {
        LayerNode::Group {
            record:   self.record,
            children: self.children
        }
    }
}

/// The list members are appended to, the innermost open group or the root
fn innermost<'a>(
    open: &'a mut [OpenGroup], root: &'a mut ChildList<LayerNode>
) -> &'a mut ChildList<LayerNode> {
    match open.last_mut() {
        Some(group) => &mut group.children,
        None => root
    }
}

/// The layer hierarchy of a document.
///
/// Top level nodes are stored in visual order, top-most layer first,
/// and so are the children of every group.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LayerTree {
    children: ChildList<LayerNode>
}

impl LayerTree {
    /// Build the tree of `records`, a flat record stream in file order.
    ///
    /// This never fails, malformed streams produce a best effort tree:
    /// - records that are neither layers, folders nor group ends are skipped
    /// - a folder without a matching group end extends to the first record
    /// - a group end with no open folder ends the top level, records
    ///   below it are not part of the tree
    ///
    /// Nesting is tracked with an explicit stack so arbitrarily deep
    /// files don't exhaust the call stack.
    pub fn build(records: &[LayerRecord]) -> LayerTree {
        let mut root = ChildList::new();
        let mut open: Vec<OpenGroup> = Vec::new();

        for (index, record) in records.iter().enumerate().rev() {
            match RecordKind::of(record) {
                RecordKind::Normal => {
                    innermost(&mut open, &mut root).append(LayerNode::Leaf(index));
                }
                RecordKind::GroupStart => {
                    open.push(OpenGroup {
                        record:   index,
                        children: ChildList::new()
                    });
                }
                RecordKind::GroupEnd => match open.pop() {
                    Some(group) => innermost(&mut open, &mut root).append(group.close()),
                    None => {
                        warn!("Record {index}: group end outside of any group, stopping here");
                        break;
                    }
                },
                RecordKind::Other => {
                    trace!(
                        "Record {index}: skipping {:?} record {:?}",
                        record.layer_type,
                        record.name
                    );
                }
            }
        }
        if !open.is_empty() {
            debug!("{} group(s) not closed before the first record", open.len());
        }
        while let Some(group) = open.pop() {
            innermost(&mut open, &mut root).append(group.close());
        }
        debug!(
            "Built layer tree, {} top level node(s) from {} record(s)",
            root.count(),
            records.len()
        );

        LayerTree { children: root }
    }

    /// Top level nodes
    pub fn children(&self) -> &ChildList<LayerNode> {
        &self.children
    }

    /// Number of top level nodes, descendants are not counted
    pub fn children_count(&self) -> usize {
        self.children.count()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels in the tree, 0 for an empty tree
    pub fn max_depth(&self) -> usize {
        self.nodes()
            .map(|(level, _)| level + 1)
            .max()
            .unwrap_or(0)
    }

    /// Visit every node depth first, a group before its children.
    ///
    /// Returns `false` if `visitor` stopped the walk.
    pub fn for_each_node<'a, F>(&'a self, mut visitor: F) -> bool
    where
        F: FnMut(&'a LayerNode) -> ControlFlow<()>
    {
        self.for_each_node_with_level(|node, _| visitor(node))
    }

    /// Visit every node depth first together with its level,
    /// top level nodes are at level 0.
    ///
    /// Returns `false` if `visitor` stopped the walk, once it breaks no
    /// other node is visited.
    pub fn for_each_node_with_level<'a, F>(&'a self, mut visitor: F) -> bool
    where
        F: FnMut(&'a LayerNode, usize) -> ControlFlow<()>
    {
        for (level, node) in self.nodes() {
            if visitor(node, level).is_break() {
                return false;
            }
        }
        true
    }
}

impl Drop for LayerTree {
    fn drop(&mut self) {
        // tear down iteratively, the default drop recurses once per level
        let mut pending = std::mem::take(&mut self.children).into_vec();

        while let Some(node) = pending.pop() {
            if let LayerNode::Group { children, .. } = node {
                pending.extend(children.into_vec());
            }
        }
    }
}
