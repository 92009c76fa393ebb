#![no_main]

use facturi::core::{LayoutVariant, check_marker, extract_amount_rows, extract_identifiers};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    let Ok(sheet) = facturi::xlsx::read_sheet_from_bytes(data) else {
        return;
    };
    for variant in [
        LayoutVariant::Simple,
        LayoutVariant::PurchaseJournal,
        LayoutVariant::SalesJournal,
    ] {
        let _ = check_marker(&sheet, variant);
        let _ = extract_identifiers(&sheet, variant);
        let _ = extract_amount_rows(&sheet, variant, |_| true);
    }
});
