//! Romanian fiscal code (CUI / CIF) normalization and checksum validation.

/// Country prefix carried by VAT-registered fiscal codes.
pub const VAT_PREFIX: &str = "RO";

/// Control key weights, applied to the body left-padded to 9 digits.
const WEIGHTS: [u32; 9] = [7, 5, 3, 2, 1, 7, 5, 3, 2];

/// Normalize a fiscal code to its grouping key.
///
/// Trims, uppercases and strips the `RO` prefix and leading zeros, the
/// way the lookup service echoes codes back. Idempotent:
/// `normalize_cui(&normalize_cui(x)) == normalize_cui(x)`.
///
/// ```
/// use facturi::core::normalize_cui;
///
/// assert_eq!(normalize_cui(" ro14399840 "), "14399840");
/// assert_eq!(normalize_cui("RO 014399840"), "14399840");
/// ```
pub fn normalize_cui(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let mut cui = upper.as_str();
    loop {
        let unpadded = cui.trim_start_matches('0').trim_start();
        let rest = unpadded
            .strip_prefix(VAT_PREFIX)
            .map_or(unpadded, str::trim_start);
        if rest.len() == cui.len() {
            break;
        }
        cui = rest;
    }
    cui.to_string()
}

/// Validate a normalized fiscal code against the CIF control digit.
///
/// Returns `false` for anything that is not 2 to 10 ASCII digits.
pub fn validate_cui(cui: &str) -> bool {
    if !(2..=10).contains(&cui.len()) || !cui.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = cui.bytes().map(|b| u32::from(b - b'0')).collect();
    let (body, control) = digits.split_at(digits.len() - 1);

    // Left-pad the body to the width of the weight vector.
    let pad = WEIGHTS.len() - body.len();
    let sum: u32 = body
        .iter()
        .zip(&WEIGHTS[pad..])
        .map(|(d, w)| d * w)
        .sum();

    let key = match (sum * 10) % 11 {
        10 => 0,
        k => k,
    };
    key == control[0]
}

/// Fiscal code as displayed on invoices: `RO`-prefixed when VAT-registered.
pub fn display_cui(cui: &str, vat_registered: bool) -> String {
    if vat_registered {
        format!("{VAT_PREFIX}{cui}")
    } else {
        cui.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_valid_codes() {
        for cui in ["14399840", "18547290", "1590082", "13548146", "33034700", "361757"] {
            assert!(validate_cui(cui), "{cui} should be valid");
        }
    }

    #[test]
    fn control_key_ten_maps_to_zero() {
        // weighted sum 23, 230 % 11 == 10
        assert!(validate_cui("11111110"));
        assert!(!validate_cui("11111111"));
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert!(!validate_cui(""));
        assert!(!validate_cui("1"));
        assert!(!validate_cui("12345678901"));
        assert!(!validate_cui("RO14399840"));
        assert!(!validate_cui("1439984O"));
        assert!(!validate_cui("١٤٣٩٩٨٤٠"));
    }

    #[test]
    fn normalize_strips_repeated_prefix() {
        assert_eq!(normalize_cui("roRO 123"), "123");
        assert_eq!(normalize_cui("  "), "");
        assert_eq!(normalize_cui("RO"), "");
    }

    #[test]
    fn normalize_drops_zero_padding() {
        assert!(validate_cui("014399840"));
        assert_eq!(normalize_cui("014399840"), "14399840");
        assert_eq!(normalize_cui("RO 00014399840"), "14399840");
        assert_eq!(normalize_cui("0RO14399840"), "14399840");
        let once = normalize_cui("0 0 RO 0 14399840");
        assert_eq!(once, "14399840");
        assert_eq!(normalize_cui(&once), once);
        assert_eq!(normalize_cui("000"), "");
    }

    #[test]
    fn display_prefixes_only_vat_payers() {
        assert_eq!(display_cui("14399840", true), "RO14399840");
        assert_eq!(display_cui("14399840", false), "14399840");
    }
}
