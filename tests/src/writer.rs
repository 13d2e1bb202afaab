/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Writes small PSD files with a layer section, enough for the decoder to chew on
use serde::Deserialize;

pub const RGB: u16 = 3;
pub const GRAYSCALE: u16 = 1;
pub const CMYK: u16 = 4;

pub const RAW: u16 = 0;
pub const RLE: u16 = 1;
pub const ZIP: u16 = 2;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Normal,
    Folder,
    ClosedFolder,
    GroupEnd,
    /// A bounding divider that isn't named like a group end
    Divider,
    Adjustment
}

#[derive(Clone, Debug)]
pub struct TestChannel {
    pub id:          i16,
    pub compression: u16,
    /// One 8 bit sample per pixel, widened when writing 16 bit files
    pub samples:     Vec<u8>
}

#[derive(Clone, Debug)]
pub struct TestLayer {
    pub kind:     LayerKind,
    pub name:     String,
    pub top:      i32,
    pub left:     i32,
    pub bottom:   i32,
    pub right:    i32,
    pub opacity:  u8,
    pub hidden:   bool,
    pub channels: Vec<TestChannel>
}

impl TestLayer {
    pub fn new(kind: LayerKind, name: &str) -> TestLayer {
        TestLayer {
            kind,
            name: name.to_string(),
            top: 0,
            left: 0,
            bottom: 0,
            right: 0,
            opacity: 255,
            hidden: false,
            channels: vec![]
        }
    }

    pub fn group_end() -> TestLayer {
        TestLayer::new(LayerKind::GroupEnd, "</Layer group>")
    }

    /// A normal layer with alpha and the given color channels, filled with a pattern
    /// derived from `seed`
    pub fn pixels(name: &str, width: i32, height: i32, ids: &[i16], seed: u8) -> TestLayer {
        let count = (width * height) as usize;

        let channels = ids
            .iter()
            .map(|id| {
                let base = seed.wrapping_add((*id as u8).wrapping_mul(50));

                TestChannel {
                    id:          *id,
                    compression: RAW,
                    samples:     (0..count).map(|p| (p as u8).wrapping_mul(7) ^ base).collect()
                }
            })
            .collect();

        TestLayer {
            top: 1,
            left: 2,
            bottom: 1 + height,
            right: 2 + width,
            channels,
            ..TestLayer::new(LayerKind::Normal, name)
        }
    }

    pub fn with_compression(mut self, compression: u16) -> TestLayer {
        for channel in &mut self.channels {
            channel.compression = compression;
        }
        self
    }

    pub fn width(&self) -> usize {
        (self.right - self.left).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.bottom - self.top).max(0) as usize
    }

    /// The RGBA buffer the decoder should produce for this layer
    pub fn expected_rgba(&self, grayscale: bool) -> Vec<u8> {
        let mut pixels = vec![0_u8; self.width() * self.height() * 4];
        pixels.iter_mut().skip(3).step_by(4).for_each(|a| *a = 255);

        for channel in self.channels.iter().filter(|c| c.compression != ZIP) {
            let targets: &[usize] = match (grayscale, channel.id) {
                (_, -1) => &[3],
                (true, 0) => &[0, 1, 2],
                (false, 0) => &[0],
                (false, 1) => &[1],
                (false, 2) => &[2],
                _ => &[]
            };
            for (px, value) in pixels.chunks_exact_mut(4).zip(&channel.samples) {
                for target in targets {
                    px[*target] = *value;
                }
            }
        }
        pixels
    }
}

/// A PSD file under construction
#[derive(Clone, Debug)]
pub struct PsdWriter {
    pub width:         u32,
    pub height:        u32,
    pub depth:         u16,
    pub color_mode:    u16,
    pub layers:        Vec<TestLayer>,
    /// Write this count instead of the number of layers
    pub layer_count:   Option<i16>,
    /// Leave out the layer and mask information section
    pub no_layer_info: bool
}

impl PsdWriter {
    pub fn new(layers: Vec<TestLayer>) -> PsdWriter {
        PsdWriter {
            width: 16,
            height: 8,
            depth: 8,
            color_mode: RGB,
            layers,
            layer_count: None,
            no_layer_info: false
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"8BPS");
        put_u16(&mut out, 1);
        out.extend_from_slice(&[0; 6]);
        put_u16(&mut out, if self.color_mode == GRAYSCALE { 1 } else { 3 });
        put_u32(&mut out, self.height);
        put_u32(&mut out, self.width);
        put_u16(&mut out, self.depth);
        put_u16(&mut out, self.color_mode);
        // color mode data, image resources
        put_u32(&mut out, 0);
        put_u32(&mut out, 0);

        if self.no_layer_info {
            put_u32(&mut out, 0);
            return out;
        }

        let count = self.layer_count.unwrap_or(self.layers.len() as i16);

        let mut info = Vec::new();
        put_u16(&mut info, count as u16);

        let channel_data: Vec<Vec<Vec<u8>>> = self
            .layers
            .iter()
            .map(|layer| {
                layer
                    .channels
                    .iter()
                    .map(|c| self.encode_channel(layer, c))
                    .collect()
            })
            .collect();

        for (layer, data) in self.layers.iter().zip(&channel_data) {
            write_record(&mut info, layer, data);
        }
        for data in channel_data.iter().flatten() {
            info.extend_from_slice(data);
        }

        // info length, info, global mask length
        put_u32(&mut out, (info.len() + 8) as u32);
        put_u32(&mut out, info.len() as u32);
        out.extend_from_slice(&info);
        put_u32(&mut out, 0);

        out
    }

    fn encode_channel(&self, layer: &TestLayer, channel: &TestChannel) -> Vec<u8> {
        let samples: Vec<u8> = if self.depth == 16 {
            channel.samples.iter().flat_map(|v| [*v, !*v]).collect()
        } else {
            channel.samples.clone()
        };
        let mut out = Vec::new();
        put_u16(&mut out, channel.compression);

        match channel.compression {
            RLE => {
                let row_bytes = samples.len() / layer.height().max(1);
                let rows: Vec<Vec<u8>> = samples.chunks(row_bytes.max(1)).map(pack_bits).collect();

                for row in &rows {
                    put_u16(&mut out, row.len() as u16);
                }
                for row in &rows {
                    out.extend_from_slice(row);
                }
            }
            // raw, and bytes standing in for deflate streams
            _ => out.extend_from_slice(&samples)
        }
        out
    }
}

fn write_record(out: &mut Vec<u8>, layer: &TestLayer, channel_data: &[Vec<u8>]) {
    put_u32(out, layer.top as u32);
    put_u32(out, layer.left as u32);
    put_u32(out, layer.bottom as u32);
    put_u32(out, layer.right as u32);

    put_u16(out, layer.channels.len() as u16);

    for (channel, data) in layer.channels.iter().zip(channel_data) {
        put_u16(out, channel.id as u16);
        put_u32(out, data.len() as u32);
    }
    out.extend_from_slice(b"8BIMnorm");
    out.push(layer.opacity);
    // clipping, flags, filler
    out.push(0);
    out.push(if layer.hidden { 0x02 } else { 0x00 });
    out.push(0);

    let mut extra = Vec::new();
    // layer mask, blending ranges
    put_u32(&mut extra, 0);
    put_u32(&mut extra, 0);

    let pascal: Vec<u8> = layer
        .name
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .take(255)
        .collect();
    extra.push(pascal.len() as u8);
    extra.extend_from_slice(&pascal);
    while extra.len() % 4 != 0 {
        extra.push(0);
    }

    if !layer.name.is_ascii() {
        let units: Vec<u16> = layer.name.encode_utf16().collect();
        let mut block = Vec::new();
        put_u32(&mut block, units.len() as u32);
        units.iter().for_each(|u| put_u16(&mut block, *u));
        tagged_block(&mut extra, b"luni", &block);
    }

    match layer.kind {
        LayerKind::Folder => tagged_block(&mut extra, b"lsct", &1_u32.to_be_bytes()),
        LayerKind::ClosedFolder => tagged_block(&mut extra, b"lsct", &2_u32.to_be_bytes()),
        LayerKind::GroupEnd | LayerKind::Divider => {
            tagged_block(&mut extra, b"lsct", &3_u32.to_be_bytes())
        }
        LayerKind::Adjustment => tagged_block(&mut extra, b"levl", &[0; 4]),
        LayerKind::Normal => ()
    }

    put_u32(out, extra.len() as u32);
    out.extend_from_slice(&extra);
}

fn tagged_block(out: &mut Vec<u8>, key: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(b"8BIM");
    out.extend_from_slice(key);
    put_u32(out, data.len() as u32);
    out.extend_from_slice(data);
}

/// PackBits, repeats of two or more bytes become runs
pub fn pack_bits(row: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < row.len() {
        let mut run = 1;
        while i + run < row.len() && run < 128 && row[i + run] == row[i] {
            run += 1;
        }
        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(row[i]);
            i += run;
        } else {
            let start = i;
            while i < row.len() && i - start < 128 && (i + 1 == row.len() || row[i] != row[i + 1])
            {
                i += 1;
            }
            out.push((i - start - 1) as u8);
            out.extend_from_slice(&row[start..i]);
        }
    }
    out
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[test]
fn pack_bits_runs_and_literals() {
    assert_eq!(pack_bits(&[7, 7, 7, 1, 2]), [254, 7, 1, 1, 2]);
    assert_eq!(pack_bits(&[5]), [0, 5]);
    assert_eq!(pack_bits(&[9; 130]), [129, 9, 255, 9]);
}
