#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if xmlobj::parse_bytes(data).is_ok() {
        if let Ok(s) = std::str::from_utf8(data) {
            let _ = xmlobj::xml_to_json(s);
        }
    }
});
