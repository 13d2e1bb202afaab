#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = zune_psd::PSDDecoder::new(data);

    if let Ok(records) = decoder.decode_layers() {
        // any record stream, however malformed, must build
        let tree = zune_psd_layers::LayerTree::build(&records);
        let _ = tree.max_depth();
    }
});
