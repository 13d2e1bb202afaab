/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when loading and parsing documents
use std::fmt::{Debug, Display, Formatter};

use zune_psd::errors::PSDDecodeErrors;

/// Errors that may occur while loading a document or building its tree
pub enum DocumentErrors {
    /// The operation needs a loaded document
    NotLoaded,
    /// The layer tree of the document has already been built
    AlreadyParsed,
    /// The decoder couldn't read the file
    DecodeErrors(PSDDecodeErrors),
    /// Reading the file from disk failed
    IoErrors(std::io::Error)
}

impl Debug for DocumentErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentErrors::NotLoaded => {
                writeln!(f, "No document loaded")
            }
            DocumentErrors::AlreadyParsed => {
                writeln!(f, "Layer tree already built, unload the document first")
            }
            DocumentErrors::DecodeErrors(err) => {
                writeln!(f, "Could not decode file: {err:?}")
            }
            DocumentErrors::IoErrors(err) => {
                writeln!(f, "I/O error: {err}")
            }
        }
    }
}

impl Display for DocumentErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for DocumentErrors {}

impl From<PSDDecodeErrors> for DocumentErrors {
    fn from(err: PSDDecodeErrors) -> Self {
        DocumentErrors::DecodeErrors(err)
    }
}

impl From<std::io::Error> for DocumentErrors {
    fn from(err: std::io::Error) -> Self {
        DocumentErrors::IoErrors(err)
    }
}
