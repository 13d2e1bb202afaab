/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms)]

/// `8BPS`
pub const PSD_IDENTIFIER_BE: u32 = 0x38425053;

/// `8BIM`, signature for blend modes and tagged blocks
pub const SIGNATURE_8BIM: u32 = 0x3842494D;

/// `8B64`, signature used by some writers for tagged blocks
pub const SIGNATURE_8B64: u32 = 0x38423634;

/// Name photoshop gives to the hidden record closing a group
pub const GROUP_END_NAME: &str = "</Layer group>";

/// Upper bound for the channel count in the file header
pub const MAX_CHANNELS: u16 = 56;

/// Tagged block keys we understand
pub mod keys {
    /// Unicode layer name
    pub const UNICODE_NAME: u32 = u32::from_be_bytes(*b"luni");
    /// Section divider setting
    pub const SECTION_DIVIDER: u32 = u32::from_be_bytes(*b"lsct");
    /// Nested section divider setting
    pub const NESTED_SECTION_DIVIDER: u32 = u32::from_be_bytes(*b"lsdk");

    /// Keys marking a record as an adjustment or fill layer
    pub const ADJUSTMENTS: [&[u8; 4]; 21] = [
        b"SoCo", b"GdFl", b"PtFl", b"brit", b"levl", b"curv", b"expA", b"vibA", b"hue ", b"hue2",
        b"blnc", b"blwh", b"phfl", b"mixr", b"clrL", b"nvrt", b"post", b"thrs", b"grdm", b"selc",
        b"CgEd"
    ];

    pub fn is_adjustment(key: u32) -> bool {
        let bytes = key.to_be_bytes();
        ADJUSTMENTS.iter().any(|k| **k == bytes)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorModes {
    Bitmap = 0,
    Grayscale = 1,
    IndexedColor = 2,
    RGB = 3,
    CYMK = 4,
    MultiChannel = 7,
    DuoTone = 8,
    LabColor = 9
}

impl ColorModes {
    pub fn from_int(int: u16) -> Option<ColorModes> {
        use crate::constants::ColorModes::{
            Bitmap, DuoTone, Grayscale, IndexedColor, LabColor, MultiChannel, CYMK, RGB
        };

        match int {
            0 => Some(Bitmap),
            1 => Some(Grayscale),
            2 => Some(IndexedColor),
            3 => Some(RGB),
            4 => Some(CYMK),
            7 => Some(MultiChannel),
            8 => Some(DuoTone),
            9 => Some(LabColor),
            _ => None
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CompressionMethod {
    NoCompression = 0,
    RLE = 1,
    Zip = 2,
    ZipPrediction = 3
}

impl CompressionMethod {
    pub fn from_int(int: u16) -> Option<CompressionMethod> {
        match int {
            0 => Some(Self::NoCompression),
            1 => Some(Self::RLE),
            2 => Some(Self::Zip),
            3 => Some(Self::ZipPrediction),
            _ => None
        }
    }
}

/// Section divider types stored in `lsct` blocks
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SectionDivider {
    Other = 0,
    OpenFolder = 1,
    ClosedFolder = 2,
    BoundingDivider = 3
}

impl SectionDivider {
    pub fn from_int(int: u32) -> Option<SectionDivider> {
        match int {
            0 => Some(Self::Other),
            1 => Some(Self::OpenFolder),
            2 => Some(Self::ClosedFolder),
            3 => Some(Self::BoundingDivider),
            _ => None
        }
    }
}
