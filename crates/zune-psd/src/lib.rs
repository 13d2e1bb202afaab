//! A simple PSD layer decoder
//!
//! This crate features a simple Photoshop PSD reader that hands out
//! the file's flat layer records.
//!
//! ## What it means by simple
//! Photoshop is a complicated format, probably one of the most complicated format,
//! this library doesn't claim to parse a lot of the images photoshop  and it's derivatives will generate.
//!
//! It reads the header and the layer records, it doesn't like CMYK or Lab images, only reads
//! Grayscale and RGB documents with 8 or 16 bit channels, ignoring Duotone, Multichannel,
//! zip compressed layers and a slew of other `.PSD` features I've never heard of.
//!
//! Records are returned the way the file stores them, bottom-most first, with groups
//! encoded as a folder record that comes *after* its members and a hidden
//! `</Layer group>` divider that comes before them. Rebuilding the hierarchy is left to
//! the caller (see the `zune-psd-layers` crate).
//!
//! [obligatory photoshop dunking](https://github.com/gco/xee/blob/master/XeePhotoshopLoader.m#L108)
//!
//! # Example
//! - Reading the layers of a psd file
//! ```no_run
//! use zune_psd::errors::PSDDecodeErrors;
//! use zune_psd::PSDDecoder;
//!
//! fn main() -> Result<(), PSDDecodeErrors> {
//!     let data: &[u8] = &[];
//!     let mut decoder = PSDDecoder::new(data);
//!     let layers = decoder.decode_layers()?;
//!
//!     for layer in &layers {
//!         println!("{} {}x{}", layer.name, layer.width, layer.height);
//!     }
//!     Ok(())
//! }
//! ```
//!
#![forbid(unsafe_code)]
#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub extern crate zune_core;
pub use decoder::PSDDecoder;
pub use layers::{LayerRecord, LayerType};

pub mod constants;
pub mod decoder;
pub mod errors;
pub mod layers;
