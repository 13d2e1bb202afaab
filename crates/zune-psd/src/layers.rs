/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Flat layer records as stored in the layer and mask information section
use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::GROUP_END_NAME;

/// What kind of slot a layer record occupies
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LayerType {
    /// A pixel layer
    Normal,
    /// Start of a layer group (open or closed folder)
    Folder,
    /// Hidden section divider, photoshop uses these to close groups
    Hidden,
    /// Adjustment and fill layers, and anything else we don't model
    Other
}

/// A single layer record in file order.
///
/// Records are stored bottom-most first, a group's members come
/// before the group's own record and are closed by a hidden divider
/// named `</Layer group>`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayerRecord {
    pub layer_type: LayerType,
    pub name:       String,
    pub left:       i32,
    pub top:        i32,
    /// Width in pixels, or -1 if the record's rectangle is inverted
    pub width:      i32,
    /// Height in pixels, or -1 if the record's rectangle is inverted
    pub height:     i32,
    pub opacity:    u8,
    pub visible:    bool,
    /// RGBA interleaved pixels, `width*height*4` bytes.
    ///
    /// Only present for normal layers covering a non-empty area
    /// with at least one channel that could be read
    pub pixels:     Option<Vec<u8>>
}

impl LayerRecord {
    /// Create a record with no geometry and no pixels
    pub fn new(layer_type: LayerType, name: &str) -> LayerRecord {
        LayerRecord {
            layer_type,
            name: String::from(name),
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            opacity: 255,
            visible: true,
            pixels: None
        }
    }

    /// Create a normal layer carrying `pixels`
    ///
    /// `pixels` is expected to be `width*height*4` bytes of RGBA data
    pub fn with_pixels(
        name: &str, left: i32, top: i32, width: i32, height: i32, pixels: Vec<u8>
    ) -> LayerRecord {
        LayerRecord {
            left,
            top,
            width,
            height,
            pixels: Some(pixels),
            ..LayerRecord::new(LayerType::Normal, name)
        }
    }

    /// The hidden divider closing the most recently opened group
    pub fn group_end() -> LayerRecord {
        LayerRecord::new(LayerType::Hidden, GROUP_END_NAME)
    }

    pub const fn is_group(&self) -> bool {
        matches!(self.layer_type, LayerType::Folder)
    }

    /// Whether this is the divider photoshop emits to close a group
    pub fn is_group_end(&self) -> bool {
        self.layer_type == LayerType::Hidden && self.name == GROUP_END_NAME
    }

    /// Pixel data or an empty slice if the record carries none
    pub fn image_data(&self) -> &[u8] {
        self.pixels.as_deref().unwrap_or(&[])
    }
}
