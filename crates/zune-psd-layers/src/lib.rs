//! Layer trees for Photoshop documents
//!
//! `zune-psd` hands out a document's layers as a flat list in file order,
//! bottom-most layer first, with groups encoded as a pair of marker records.
//! This crate turns that list back into the hierarchy the user sees in the layers panel
//! and provides a few queries over it.
//!
//! - [`LayerTree`] rebuilds the hierarchy from any slice of [`LayerRecord`]s,
//!   nesting depth is only limited by memory.
//! - [`PsdDocument`] owns a decoded document and its tree, and walks it depth first
//!   with a visitor that can stop early.
//! - [`PsdDocument::sprite_frames`] reads documents laid out as animations,
//!   one top level group per animation.
//!
//! # Example
//! - Print the layers of a document, indented by depth
//! ```no_run
//! use std::ops::ControlFlow;
//!
//! use zune_psd_layers::errors::DocumentErrors;
//! use zune_psd_layers::PsdDocument;
//!
//! fn main() -> Result<(), DocumentErrors> {
//!     let data = std::fs::read("sprites.psd")?;
//!     let doc = PsdDocument::open(&data)?;
//!
//!     doc.for_each_layer_with_level(|layer, level| {
//!         println!("{:indent$}{}", "", layer.name, indent = level * 2);
//!         ControlFlow::Continue(())
//!     });
//!
//!     if let Some(sprites) = doc.sprite_frames() {
//!         for animation in sprites.iter() {
//!             println!("{}: {} frame(s)", animation.name, animation.frames.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//! - `log`: Forward logging to the decoder
//! - `serde-support`: Serialize record kinds and sprite frame metadata
#![forbid(unsafe_code)]

pub extern crate zune_psd;
pub use document::PsdDocument;
pub use list::ChildList;
pub use sprite::{Animation, FrameInfo, SpriteFrames};
pub use traverse::{Layers, Nodes};
pub use tree::{LayerNode, LayerTree, RecordKind};
pub use zune_psd::{LayerRecord, LayerType};

pub mod document;
pub mod errors;
pub mod list;
pub mod sprite;
pub mod traverse;
pub mod tree;
