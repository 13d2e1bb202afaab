/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Record streams shaped like the documents we care about
use zune_psd_layers::{LayerRecord, LayerType};

/// `groups` top level groups of `frames` layers each, the way sprite sheets are laid out
pub fn sprite_sheet(groups: usize, frames: usize) -> Vec<LayerRecord> {
    let mut records = Vec::with_capacity(groups * (frames + 2));

    for group in 0..groups {
        records.push(LayerRecord::group_end());
        for frame in (0..frames).rev() {
            records.push(LayerRecord::with_pixels(
                &format!("anim {group} frame {frame}"),
                0,
                0,
                1,
                1,
                vec![0, 0, 0, 255]
            ));
        }
        records.push(LayerRecord::new(LayerType::Folder, &format!("anim {group}")));
    }
    records
}

/// A single chain of `depth` nested groups with one layer at the bottom
pub fn deep_nesting(depth: usize) -> Vec<LayerRecord> {
    let mut records = Vec::with_capacity(depth * 2 + 1);

    records.extend((0..depth).map(|_| LayerRecord::group_end()));
    records.push(LayerRecord::new(LayerType::Normal, "leaf"));
    records.extend((0..depth).map(|i| LayerRecord::new(LayerType::Folder, &format!("g{i}"))));

    records
}
