/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use crate::constants::{ColorModes, PSD_IDENTIFIER_BE, SIGNATURE_8BIM};

/// PSDDecodeErrors that can occur during PSD decoding
pub enum PSDDecodeErrors {
    WrongMagicBytes(u32),
    UnsupportedFileType(u16),
    UnsupportedChannelCount(u16),
    UnsupportedBitDepth(u16),
    UnsupportedColorFormat(Option<ColorModes>),
    LargeDimensions(usize, usize),
    ZeroDimensions,
    UnknownCompression,
    /// A layer channel uses a compression we can't decode
    ///
    /// # Arguments
    /// - index of the layer record
    /// - compression number found
    UnsupportedLayerCompression(usize, u16),
    /// The layer section announces more layers than its
    /// length can possibly hold
    BadLayerCount(i16),
    /// A layer record doesn't carry the `8BIM` blend signature
    WrongBlendSignature(u32),
    /// A layer channel is too short for the plane its layer's rectangle describes
    ///
    /// # Arguments
    /// - index of the layer record
    /// - bytes the channel has
    /// - bytes the plane needs
    TruncatedChannel(usize, usize, usize),
    Generic(&'static str),
    BadRLE
}

impl Debug for PSDDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PSDDecodeErrors::Generic(reason) => {
                writeln!(f, "{reason}")
            }
            PSDDecodeErrors::WrongMagicBytes(bytes) => {
                writeln!(
                    f,
                    "Expected {:?} but found  {:?}, not a PSD image",
                    PSD_IDENTIFIER_BE.to_be_bytes(),
                    bytes.to_be_bytes()
                )
            }
            PSDDecodeErrors::UnsupportedFileType(version) => {
                writeln!(
                    f,
                    "Unsupported file version {version:?}, known versions are 1",
                )
            }
            PSDDecodeErrors::UnsupportedChannelCount(channels) => {
                writeln!(f, "Unsupported channel count {channels:?}")
            }
            PSDDecodeErrors::UnsupportedBitDepth(depth) => {
                writeln!(
                    f,
                    "Unsupported bit depth {depth:?}, supported depths are 8 and 16",
                )
            }
            PSDDecodeErrors::UnsupportedColorFormat(color) => {
                if let Some(color) = color {
                    writeln!(
                        f,
                        "Unsupported color format  {color:?}, supported formats are RGB and Grayscale",
                    )
                } else {
                    writeln!(f, "Unknown color format")
                }
            }
            PSDDecodeErrors::UnknownCompression => {
                writeln!(f, "Unknown compression format")
            }
            PSDDecodeErrors::UnsupportedLayerCompression(layer, method) => {
                writeln!(
                    f,
                    "Layer {layer} uses compression {method}, supported methods are raw and RLE"
                )
            }
            PSDDecodeErrors::BadLayerCount(count) => {
                writeln!(f, "Layer count {count} does not fit in the layer section")
            }
            PSDDecodeErrors::WrongBlendSignature(signature) => {
                writeln!(
                    f,
                    "Expected blend signature {:?} but found {:?}",
                    SIGNATURE_8BIM.to_be_bytes(),
                    signature.to_be_bytes()
                )
            }
            PSDDecodeErrors::TruncatedChannel(layer, found, needed) => {
                writeln!(
                    f,
                    "Layer {layer} channel has {found} bytes but its plane needs at least {needed}"
                )
            }
            PSDDecodeErrors::BadRLE => {
                writeln!(f, "Bad RLE")
            }
            PSDDecodeErrors::LargeDimensions(supported, found) => {
                writeln!(
                    f,
                    "Too large dimensions, supported {supported} but found {found}",
                )
            }
            PSDDecodeErrors::ZeroDimensions => {
                writeln!(f, "Zero found where not expected")
            }
        }
    }
}

impl Display for PSDDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PSDDecodeErrors {}

impl From<&'static str> for PSDDecodeErrors {
    fn from(r: &'static str) -> Self {
        Self::Generic(r)
    }
}
