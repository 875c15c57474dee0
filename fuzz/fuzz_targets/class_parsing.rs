#![no_main]

use libfuzzer_sys::fuzz_target;
use mokapot_remap::jvm::ClassInfo;

fuzz_target!(|data: &[u8]| {
    let _ = ClassInfo::from_bytes(data);
});
