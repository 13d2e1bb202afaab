/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sprite sheet queries
//!
//! A document is treated as a set of animations when it is at most two
//! levels deep and no group is nested in another, each top level group is an
//! animation and its layers are the frames.
//!
//! ```text
//! walk            ─┐
//! idle  (group)    │  animations: { "idle": [idle 0, idle 1], "walk": [walk 0] }
//! ├── idle 0       │
//! └── idle 1       │
//! walk  (group)    │
//! └── walk 0      ─┘
//! ```
use std::ops::ControlFlow;
use std::slice::Iter;

use zune_psd::LayerRecord;

use crate::document::PsdDocument;

/// A single animation frame, borrowing the layer's pixels
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct FrameInfo<'a> {
    pub name:   &'a str,
    pub width:  i32,
    pub height: i32,
    /// RGBA pixels, empty for layers without pixel data
    #[cfg_attr(feature = "serde-support", serde(skip))]
    pub pixels: &'a [u8]
}

impl<'a> From<&'a LayerRecord> for FrameInfo<'a> {
    fn from(layer: &'a LayerRecord) -> Self {
        FrameInfo {
            name:   &layer.name,
            width:  layer.width,
            height: layer.height,
            pixels: layer.image_data()
        }
    }
}

/// A top level group and its frames, in visual order
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Animation<'a> {
    pub name:   &'a str,
    pub frames: Vec<FrameInfo<'a>>
}

/// Animations keyed by their top level group's name.
///
/// Animations keep the order their groups appear in. If two groups share a
/// name the frames of the later one replace the earlier one's, keeping
/// its position.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct SpriteFrames<'a> {
    animations: Vec<Animation<'a>>
}

impl<'a> SpriteFrames<'a> {
    fn insert(&mut self, animation: Animation<'a>) {
        match self.animations.iter_mut().find(|a| a.name == animation.name) {
            Some(existing) => existing.frames = animation.frames,
            None => self.animations.push(animation)
        }
    }

    /// Frames of the animation called `name`
    pub fn get(&self, name: &str) -> Option<&[FrameInfo<'a>]> {
        self.animations
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.frames.as_slice())
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.animations.iter().map(|a| a.name)
    }

    pub fn iter(&self) -> Iter<'_, Animation<'a>> {
        self.animations.iter()
    }
}

impl PsdDocument {
    /// Whether the document is laid out as a set of animations.
    ///
    /// That is no layer is deeper than level 1 and no group is
    /// inside another group. An empty document qualifies,
    /// an unloaded one doesn't.
    pub fn is_two_level_grouping(&self) -> bool {
        if !self.is_loaded() {
            return false;
        }
        self.for_each_layer_with_level(|layer, level| {
            if level >= 2 || (level == 1 && layer.is_group()) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Collect the frames of every top level group.
    ///
    /// Top level layers that aren't groups are not part of any animation,
    /// empty groups produce animations without frames.
    ///
    /// Returns `None` if the document hasn't been parsed or isn't a
    /// [two level grouping](Self::is_two_level_grouping).
    pub fn sprite_frames(&self) -> Option<SpriteFrames<'_>> {
        if !self.is_parsed() || !self.is_two_level_grouping() {
            return None;
        }
        let mut sprites = SpriteFrames::default();
        let mut current: Option<Animation> = None;

        self.for_each_layer_with_level(|layer, level| {
            match level {
                0 => {
                    if let Some(animation) = current.take() {
                        sprites.insert(animation);
                    }
                    if layer.is_group() {
                        current = Some(Animation {
                            name:   &layer.name,
                            frames: Vec::new()
                        });
                    }
                }
                1 => {
                    if let Some(animation) = current.as_mut() {
                        animation.frames.push(FrameInfo::from(layer));
                    }
                }
                _ => return ControlFlow::Break(())
            }
            ControlFlow::Continue(())
        });

        if let Some(animation) = current {
            sprites.insert(animation);
        }
        Some(sprites)
    }
}
