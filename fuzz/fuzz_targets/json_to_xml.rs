#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(xml) = xmlobj::json_to_xml(s) {
            let _ = xmlobj::validate(&xml);
        }
    }
});
