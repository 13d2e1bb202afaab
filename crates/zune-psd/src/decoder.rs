/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple PSD layer reader.
//!
//! This reads the file header and the layer and mask information
//! section, producing one [`LayerRecord`] per layer slot in file order.
//!
//! Blend modes, masks and effects are not interpreted, layer pixels
//! are returned as stored, without compositing.
//!
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteReader, ZReaderTrait};
use zune_core::colorspace::ColorSpace;
use zune_core::log::{trace, warn};
use zune_core::options::DecoderOptions;

use crate::constants::{
    keys, ColorModes, CompressionMethod, SectionDivider, MAX_CHANNELS, PSD_IDENTIFIER_BE,
    SIGNATURE_8B64, SIGNATURE_8BIM
};
use crate::errors::PSDDecodeErrors;
use crate::layers::{LayerRecord, LayerType};

/// Smallest possible size of a layer record in bytes
const MIN_LAYER_RECORD_SIZE: usize = 34;

struct ChannelInfo {
    id:     i16,
    length: usize
}

/// A layer record whose channel image data hasn't been read yet
struct LayerHeader {
    record:   LayerRecord,
    channels: Vec<ChannelInfo>
}

/// A simple Photoshop PSD layer reader.
///
/// The decoder doesn't flatten layers, it hands out the flat
/// layer record stream so that callers can rebuild the layer
/// hierarchy and extract individual layers.
pub struct PSDDecoder<T>
where
    T: ZReaderTrait
{
    width:               usize,
    height:              usize,
    decoded_header:      bool,
    stream:              ZByteReader<T>,
    options:             DecoderOptions,
    depth:               BitDepth,
    color_type:          Option<ColorModes>,
    channel_count:       usize,
    layer_section_start: usize
}

impl<T> PSDDecoder<T>
where
    T: ZReaderTrait
{
    /// Create a new decoder that reads a photoshop encoded file
    /// from `T` and returns its layers
    ///
    /// # Arguments
    /// - data: Data source, it has to implement the `ZReaderTrait`
    pub fn new(data: T) -> PSDDecoder<T> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    /// Creates a new decoder with options that influence decoding routines
    ///
    /// # Arguments
    /// - data: Data source
    /// - options: Custom options for the decoder
    pub fn new_with_options(data: T, options: DecoderOptions) -> PSDDecoder<T> {
        PSDDecoder {
            width: 0,
            height: 0,
            decoded_header: false,
            stream: ZByteReader::new(data),
            options,
            depth: BitDepth::Eight,
            color_type: None,
            channel_count: 0,
            layer_section_start: 0
        }
    }

    /// Decode headers from the encoded image
    ///
    /// This confirms whether the image is a photoshop image and extracts
    /// relevant information from the image including width,height and extra information.
    ///
    pub fn decode_headers(&mut self) -> Result<(), PSDDecodeErrors> {
        if self.decoded_header {
            return Ok(());
        }
        // Check identifier
        let magic = self.stream.get_u32_be_err()?;

        if magic != PSD_IDENTIFIER_BE {
            return Err(PSDDecodeErrors::WrongMagicBytes(magic));
        }

        //  file version
        let version = self.stream.get_u16_be_err()?;

        if version != 1 {
            return Err(PSDDecodeErrors::UnsupportedFileType(version));
        }
        // Skip 6 reserved bytes
        self.stream.skip(6);
        // Read the number of channels (R, G, B, A, etc).
        let channel_count = self.stream.get_u16_be_err()?;

        if channel_count > MAX_CHANNELS {
            return Err(PSDDecodeErrors::UnsupportedChannelCount(channel_count));
        }

        self.channel_count = usize::from(channel_count);

        let height = self.stream.get_u32_be_err()? as usize;
        let width = self.stream.get_u32_be_err()? as usize;

        if width > self.options.get_max_width() {
            return Err(PSDDecodeErrors::LargeDimensions(
                self.options.get_max_width(),
                width
            ));
        }

        if height > self.options.get_max_height() {
            return Err(PSDDecodeErrors::LargeDimensions(
                self.options.get_max_height(),
                height
            ));
        }

        self.width = width;
        self.height = height;

        if self.width == 0 || self.height == 0 || self.channel_count == 0 {
            return Err(PSDDecodeErrors::ZeroDimensions);
        }

        let depth = self.stream.get_u16_be_err()?;

        self.depth = match depth {
            8 => BitDepth::Eight,
            16 => BitDepth::Sixteen,
            _ => return Err(PSDDecodeErrors::UnsupportedBitDepth(depth))
        };

        let color_mode = self.stream.get_u16_be_err()?;

        let color_enum = ColorModes::from_int(color_mode);

        match color_enum {
            Some(ColorModes::RGB | ColorModes::Grayscale) => (),
            _ => return Err(PSDDecodeErrors::UnsupportedColorFormat(color_enum))
        }
        self.color_type = color_enum;

        // skip mode data
        let bytes = self.stream.get_u32_be_err()? as usize;
        self.stream.skip(bytes);

        // skip image resources
        let bytes = self.stream.get_u32_be_err()? as usize;
        self.stream.skip(bytes);

        self.layer_section_start = self.stream.get_position();

        if self.color_type == Some(ColorModes::Grayscale) {
            // PSD may have grayscale images with more than one
            // channel and will specify channel_count as 3.
            // So let's fix that here
            self.channel_count = 1;
        }

        self.decoded_header = true;

        trace!("Image width:{}", self.width);
        trace!("Image height:{}", self.height);
        trace!("Channels: {}", self.channel_count);
        trace!("Bit depth : {:?}", self.depth);

        Ok(())
    }

    /// Decode the layer records of the file
    ///
    /// Records are returned in file order, i.e bottom-most layer first.
    /// A file without a layer section returns an empty list.
    ///
    /// Pixels are only extracted for [`LayerType::Normal`] records,
    /// expanded to 8-bit RGBA. Channels too short for their layer's rectangle
    /// are an error in strict mode and skipped otherwise.
    ///
    /// This can be called multiple times, each call re-reads the layer section.
    pub fn decode_layers(&mut self) -> Result<Vec<LayerRecord>, PSDDecodeErrors> {
        if !self.decoded_header {
            self.decode_headers()?;
        }
        self.stream.set_position(self.layer_section_start);

        let section_length = self.stream.get_u32_be_err()? as usize;

        if section_length == 0 {
            trace!("No layer and mask information section");
            return Ok(Vec::new());
        }
        let info_length = self.stream.get_u32_be_err()? as usize;

        if info_length < 2 {
            trace!("Empty layer info");
            return Ok(Vec::new());
        }
        // a negative count means the first alpha channel holds
        // the merged result's transparency, we only need the magnitude
        let raw_count = self.stream.get_u16_be_err()? as i16;
        let count = usize::from(raw_count.unsigned_abs());

        if count.saturating_mul(MIN_LAYER_RECORD_SIZE) > info_length {
            return Err(PSDDecodeErrors::BadLayerCount(raw_count));
        }
        trace!("Layer count: {}", count);

        let mut headers = Vec::with_capacity(count);

        for index in 0..count {
            headers.push(self.read_layer_header(index)?);
        }

        let mut records = Vec::with_capacity(count);

        for (index, header) in headers.into_iter().enumerate() {
            records.push(self.read_layer_pixels(index, header)?);
        }

        Ok(records)
    }

    fn read_layer_header(&mut self, index: usize) -> Result<LayerHeader, PSDDecodeErrors> {
        let top = self.stream.get_u32_be_err()? as i32;
        let left = self.stream.get_u32_be_err()? as i32;
        let bottom = self.stream.get_u32_be_err()? as i32;
        let right = self.stream.get_u32_be_err()? as i32;

        let width = extent(left, right);
        let height = extent(top, bottom);

        if width > 0 && width as usize > self.options.get_max_width() {
            return Err(PSDDecodeErrors::LargeDimensions(
                self.options.get_max_width(),
                width as usize
            ));
        }
        if height > 0 && height as usize > self.options.get_max_height() {
            return Err(PSDDecodeErrors::LargeDimensions(
                self.options.get_max_height(),
                height as usize
            ));
        }

        let channel_count = self.stream.get_u16_be_err()?;

        if channel_count > MAX_CHANNELS {
            return Err(PSDDecodeErrors::UnsupportedChannelCount(channel_count));
        }
        let mut channels = Vec::with_capacity(usize::from(channel_count));

        for _ in 0..channel_count {
            let id = self.stream.get_u16_be_err()? as i16;
            let length = self.stream.get_u32_be_err()? as usize;

            channels.push(ChannelInfo { id, length });
        }

        let signature = self.stream.get_u32_be_err()?;

        if signature != SIGNATURE_8BIM {
            return Err(PSDDecodeErrors::WrongBlendSignature(signature));
        }
        // blend mode key, we don't composite
        self.stream.skip(4);

        let opacity = self.stream.get_u8_err()?;
        let _clipping = self.stream.get_u8_err()?;
        let flags = self.stream.get_u8_err()?;
        // filler
        self.stream.skip(1);

        let extra_length = self.stream.get_u32_be_err()? as usize;
        let extra_end = self.stream.get_position().saturating_add(extra_length);

        // layer mask data
        let bytes = self.stream.get_u32_be_err()? as usize;
        self.stream.skip(bytes);

        // blending ranges
        let bytes = self.stream.get_u32_be_err()? as usize;
        self.stream.skip(bytes);

        // pascal string, padded to a multiple of 4 bytes
        let name_length = usize::from(self.stream.get_u8_err()?);
        let mut name = String::with_capacity(name_length);

        for _ in 0..name_length {
            name.push(char::from(self.stream.get_u8_err()?));
        }
        let padded = (name_length + 1 + 3) & !3;
        self.stream.skip(padded - (name_length + 1));

        let mut divider = None;
        let mut adjustment = false;

        // additional layer information
        while self.stream.get_position().saturating_add(12) <= extra_end {
            let signature = self.stream.get_u32_be_err()?;

            if signature != SIGNATURE_8BIM && signature != SIGNATURE_8B64 {
                warn!(
                    "Layer {}: unknown tagged block signature {:?}, ignoring the rest",
                    index,
                    signature.to_be_bytes()
                );
                break;
            }
            let key = self.stream.get_u32_be_err()?;
            let length = self.stream.get_u32_be_err()? as usize;
            let block_end = self.stream.get_position().saturating_add(length);

            match key {
                keys::UNICODE_NAME => {
                    name = self.read_unicode_string(length)?;
                }
                keys::SECTION_DIVIDER | keys::NESTED_SECTION_DIVIDER if length >= 4 => {
                    let kind = self.stream.get_u32_be_err()?;

                    divider = match SectionDivider::from_int(kind) {
                        Some(SectionDivider::OpenFolder | SectionDivider::ClosedFolder) => {
                            Some(LayerType::Folder)
                        }
                        Some(SectionDivider::BoundingDivider) => Some(LayerType::Hidden),
                        _ => divider
                    };
                }
                key if keys::is_adjustment(key) => adjustment = true,
                _ => ()
            }
            self.stream.set_position(block_end);
        }
        self.stream.set_position(extra_end);

        let layer_type = match divider {
            Some(layer_type) => layer_type,
            None if adjustment => LayerType::Other,
            None => LayerType::Normal
        };
        trace!("Layer {}: {:?} {:?} {}x{}", index, name, layer_type, width, height);

        let record = LayerRecord {
            layer_type,
            name,
            left,
            top,
            width,
            height,
            opacity,
            visible: flags & 0x02 == 0,
            pixels: None
        };

        Ok(LayerHeader { record, channels })
    }

    /// Read a `luni` block, a length-prefixed UTF-16 big endian string
    fn read_unicode_string(&mut self, block_length: usize) -> Result<String, PSDDecodeErrors> {
        let count = self.stream.get_u32_be_err()? as usize;
        // don't trust the count past the block
        let count = count.min(block_length.saturating_sub(4) / 2);

        let mut units = Vec::new();

        for _ in 0..count {
            units.push(self.stream.get_u16_be_err()?);
        }
        while units.last() == Some(&0) {
            units.pop();
        }

        Ok(char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }

    fn read_layer_pixels(
        &mut self, index: usize, header: LayerHeader
    ) -> Result<LayerRecord, PSDDecodeErrors> {
        let LayerHeader {
            mut record,
            channels
        } = header;

        let wants_pixels =
            record.layer_type == LayerType::Normal && record.width > 0 && record.height > 0;

        let (width, height) = if wants_pixels {
            (record.width as usize, record.height as usize)
        } else {
            (0, 0)
        };
        // allocated once a channel proves it can fill it
        let mut pixels: Option<Vec<u8>> = None;

        for channel in channels {
            let channel_end = self.stream.get_position().saturating_add(channel.length);

            let targets = self.channel_targets(channel.id);

            // each channel starts with a 2 byte compression method
            if wants_pixels && !targets.is_empty() && channel.length >= 2 {
                let compression = self.stream.get_u16_be_err()?;
                let needed = self.min_channel_length(compression, width, height);
                // the file may end before the channel's declared length does
                let available = channel.length.min(self.stream.remaining().saturating_add(2));

                if available < needed {
                    if self.options.get_strict_mode() {
                        return Err(PSDDecodeErrors::TruncatedChannel(index, available, needed));
                    }
                    warn!(
                        "Layer {}: channel {} has {} bytes but a {}x{} plane needs {}, skipping it",
                        index,
                        channel.id,
                        available,
                        width,
                        height,
                        needed
                    );
                } else if let Some(plane) = self.decode_plane(index, compression, width, height)? {
                    let pixels = pixels.get_or_insert_with(|| opaque_rgba(width * height));

                    for (px, value) in pixels.chunks_exact_mut(4).zip(plane) {
                        for target in targets {
                            px[*target] = value;
                        }
                    }
                }
            }
            self.stream.set_position(channel_end);
        }
        record.pixels = pixels;

        Ok(record)
    }

    /// Smallest number of bytes, compression method included, a channel
    /// needs to describe a `width` x `height` plane
    fn min_channel_length(&self, compression: u16, width: usize, height: usize) -> usize {
        let bytes_per_sample = match self.depth {
            BitDepth::Sixteen => 2,
            _ => 1
        };
        let row_bytes = width.saturating_mul(bytes_per_sample);

        let data = match CompressionMethod::from_int(compression) {
            Some(CompressionMethod::NoCompression) => row_bytes.saturating_mul(height),
            // a row count, then at most 128 bytes for every 2 bytes of packed data
            Some(CompressionMethod::RLE) => {
                let packed_row = row_bytes.div_ceil(128).saturating_mul(2);
                height.saturating_mul(2 + packed_row)
            }
            _ => 0
        };
        data.saturating_add(2)
    }

    /// Positions in an RGBA pixel a channel id writes to
    fn channel_targets(&self, id: i16) -> &'static [usize] {
        match (self.color_type, id) {
            (_, -1) => &[3],
            (Some(ColorModes::RGB), 0) => &[0],
            (Some(ColorModes::RGB), 1) => &[1],
            (Some(ColorModes::RGB), 2) => &[2],
            (Some(ColorModes::Grayscale), 0) => &[0, 1, 2],
            // masks and anything we don't understand
            _ => &[]
        }
    }

    /// Decode a single channel into 8 bit samples
    ///
    /// Returns `None` if the channel is compressed with a method we
    /// can't handle and the decoder isn't strict
    fn decode_plane(
        &mut self, index: usize, compression: u16, width: usize, height: usize
    ) -> Result<Option<Vec<u8>>, PSDDecodeErrors> {
        let bytes_per_sample = match self.depth {
            BitDepth::Sixteen => 2,
            _ => 1
        };
        let row_bytes = width * bytes_per_sample;
        let mut plane = vec![0; row_bytes * height];

        match CompressionMethod::from_int(compression) {
            Some(CompressionMethod::NoCompression) => {
                for byte in plane.iter_mut() {
                    *byte = self.stream.get_u8_err()?;
                }
            }
            Some(CompressionMethod::RLE) => {
                // The RLE-compressed data is preceded by a 2-byte data count for each row
                // in the data, which we're going to just skip.
                self.stream.skip(height * 2);

                for row in plane.chunks_exact_mut(row_bytes) {
                    self.unpack_bits(row)?;
                }
            }
            Some(CompressionMethod::Zip | CompressionMethod::ZipPrediction) => {
                if self.options.get_strict_mode() {
                    return Err(PSDDecodeErrors::UnsupportedLayerCompression(
                        index,
                        compression
                    ));
                }
                warn!(
                    "Layer {}: zip compressed channel not supported, leaving it empty",
                    index
                );
                return Ok(None);
            }
            None => return Err(PSDDecodeErrors::UnknownCompression)
        }

        if bytes_per_sample == 2 {
            // samples are big endian, keep the most significant byte
            plane = plane.chunks_exact(2).map(|sample| sample[0]).collect();
        }
        Ok(Some(plane))
    }

    /// Unpack a PackBits encoded run into `output`
    fn unpack_bits(&mut self, output: &mut [u8]) -> Result<(), PSDDecodeErrors> {
        // Loop until you get the number of unpacked bytes you are expecting:
        //     Read the next source byte into n.
        //     If n is between 0 and 127 inclusive, copy the next n+1 bytes
        //     literally. Else if n is between -127 and -1 inclusive, copy the next
        //     byte -n+1 times. Else if n is 128, noop.
        // Endloop
        let mut position = 0;

        while position < output.len() {
            let mut len = usize::from(self.stream.get_u8_err()?);

            match len.cmp(&128) {
                Ordering::Less => {
                    // copy next len+1 bytes literally
                    len += 1;

                    if position + len > output.len() {
                        return Err(PSDDecodeErrors::BadRLE);
                    }
                    for byte in &mut output[position..position + len] {
                        *byte = self.stream.get_u8_err()?;
                    }
                    position += len;
                }
                Ordering::Equal => (),
                Ordering::Greater => {
                    // Next -len+1 bytes in the dest are replicated from next source byte.
                    // (Interpret len as a negative 8-bit int.)
                    len = 257_usize.wrapping_sub(len) & 255;

                    if position + len > output.len() {
                        return Err(PSDDecodeErrors::BadRLE);
                    }
                    let val = self.stream.get_u8_err()?;

                    output[position..position + len].fill(val);
                    position += len;
                }
            }
        }
        Ok(())
    }

    /// Get image bit depth or None if the headers haven't been decoded
    pub const fn bit_depth(&self) -> Option<BitDepth> {
        if self.decoded_header {
            return Some(self.depth);
        }
        None
    }

    /// Get image width and height respectively or None if the
    /// headers haven't been decoded
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_header {
            return Some((self.width, self.height));
        }
        None
    }
    /// Get image colorspace or None if the
    /// image header hasn't been decoded
    pub fn colorspace(&self) -> Option<ColorSpace> {
        match self.color_type? {
            ColorModes::RGB if self.channel_count >= 4 => Some(ColorSpace::RGBA),
            ColorModes::RGB => Some(ColorSpace::RGB),
            ColorModes::Grayscale if self.channel_count == 1 => Some(ColorSpace::Luma),
            ColorModes::Grayscale if self.channel_count == 2 => Some(ColorSpace::LumaA),
            _ => None
        }
    }
}

/// `pixel_count` opaque black RGBA pixels, layers without
/// a transparency channel stay opaque
fn opaque_rgba(pixel_count: usize) -> Vec<u8> {
    let mut pixels = vec![0_u8; pixel_count * 4];
    pixels.iter_mut().skip(3).step_by(4).for_each(|a| *a = 255);
    pixels
}

/// Distance between two rectangle edges, -1 if they are inverted
fn extent(start: i32, end: i32) -> i32 {
    match end.checked_sub(start) {
        Some(length) if length >= 0 => length,
        _ => -1
    }
}
