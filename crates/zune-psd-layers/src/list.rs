/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An append-only ordered collection
use std::ops::ControlFlow;
use std::slice::Iter;

/// An ordered collection of owned children.
///
/// Items can only be appended and iterated, which is all a tree
/// that is written once and read many times needs.
/// Items are dropped together with the list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChildList<T> {
    items: Vec<T>
}

impl<T> Default for ChildList<T> {
    fn default() -> Self {
        ChildList::new()
    }
}

impl<T> ChildList<T> {
    pub const fn new() -> ChildList<T> {
        ChildList { items: Vec::new() }
    }

    /// Add `item` after every other item in the list
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Number of items in the list
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }

    /// Call `visitor` on every item in insertion order.
    ///
    /// Iteration stops as soon as `visitor` breaks.
    ///
    /// # Returns
    /// `true` if every item was visited, `false` if the visitor
    /// stopped early.
    pub fn for_each<'a, F>(&'a self, mut visitor: F) -> bool
    where
        F: FnMut(&'a T) -> ControlFlow<()>
    {
        self.items.iter().all(|item| visitor(item).is_continue())
    }
}

impl<T> ChildList<T> {
    /// Consume the list returning its items
    pub(crate) fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<'a, T> IntoIterator for &'a ChildList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
