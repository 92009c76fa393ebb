#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let cui = facturi::core::normalize_cui(s);
        assert_eq!(facturi::core::normalize_cui(&cui), cui);
        let _ = facturi::core::validate_cui(&cui);
    }
});
