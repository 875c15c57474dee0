#![no_main]

use libfuzzer_sys::fuzz_target;
use mokapot_remap::mapping::{MappingFormat, parse_detected};

const FORMATS: [MappingFormat; 6] = [
    MappingFormat::Proguard,
    MappingFormat::TinyV1(None),
    MappingFormat::TinyV2(None),
    MappingFormat::Srg,
    MappingFormat::Tsrg,
    MappingFormat::Retroguard,
];

fuzz_target!(|data: &[u8]| {
    let _ = parse_detected(data);
    for format in &FORMATS {
        if let Ok(mappings) = format.parse(data) {
            for (key, _) in mappings.methods() {
                let _ = mappings.map_method_descriptor(&key.descriptor);
            }
        }
    }
});
