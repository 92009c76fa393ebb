use facturi::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn company(name: &str, tax_id: &str) -> Company {
    Company {
        legal_name: name.into(),
        tax_id: tax_id.into(),
        registration_number: "J40/372/2002".into(),
        address: "Sos. Virtutii 148".into(),
        county: "B".into(),
        locality: "Sector 6".into(),
    }
}

fn own() -> Company {
    company("Contabil SRL", "RO18547290")
}

fn journal_sheet(marker: &str, rows: &[(&str, f64, f64, f64)]) -> Sheet {
    let mut sheet = Sheet::new();
    sheet.set(1, 2, Cell::from(marker));
    sheet.set(1, 3, Cell::from("cod fiscal"));
    sheet.set(1, 4, Cell::from("baza"));
    sheet.set(1, 5, Cell::from("tva"));
    sheet.set(1, 6, Cell::from("cota"));
    for (i, (cui, base, tax, rate)) in rows.iter().enumerate() {
        let row = i + 2;
        sheet.set(row, 3, Cell::from(*cui));
        sheet.set(row, 4, Cell::Number(*base));
        sheet.set(row, 5, Cell::Number(*tax));
        sheet.set(row, 6, Cell::Number(*rate));
    }
    sheet
}

fn raw(cui: &str, rate: Decimal, gross: Decimal) -> RawAmountRow {
    RawAmountRow {
        row: 2,
        counterparty: cui.into(),
        tax_rate: rate,
        gross,
    }
}

// ---------------------------------------------------------------------------
// Identifier validation
// ---------------------------------------------------------------------------

#[test]
fn reference_codes_validate() {
    for cui in ["14399840", "18547290", "1590082", "13548146", "14186770", "4221306"] {
        assert!(validate_cui(cui), "{cui}");
    }
}

#[test]
fn single_digit_alterations_fail() {
    for cui in ["14399841", "14399740", "18547299", "1590083", "13548147"] {
        assert!(!validate_cui(cui), "{cui}");
    }
}

#[test]
fn prefixed_or_padded_input_must_be_normalized_first() {
    assert!(!validate_cui(" 14399840"));
    assert!(validate_cui(&normalize_cui(" ro14399840")));
}

// ---------------------------------------------------------------------------
// Extraction: journal layouts
// ---------------------------------------------------------------------------

#[test]
fn purchase_journal_marker() {
    let sheet = journal_sheet("Furnizor", &[]);
    assert!(check_marker(&sheet, LayoutVariant::PurchaseJournal).is_ok());
    assert!(matches!(
        check_marker(&sheet, LayoutVariant::SalesJournal),
        Err(ConvertError::Layout { expected: "client", .. })
    ));
    assert!(check_marker(&sheet, LayoutVariant::Simple).is_err());
}

#[test]
fn journal_gross_is_base_plus_tax() {
    let sheet = journal_sheet("client", &[("RO14399840", 100.0, 19.0, 19.0), ("14399840", 100.0, 9.0, 9.0)]);
    let rows = extract_amount_rows(&sheet, LayoutVariant::SalesJournal, |_| true).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].gross, dec!(119));
    assert_eq!(rows[0].tax_rate, dec!(19));
    assert_eq!(rows[1].gross, dec!(109));
    assert_eq!(rows[1].tax_rate, dec!(9));
    assert_eq!(rows[1].counterparty, "14399840");
}

#[test]
fn journal_rate_out_of_range() {
    let sheet = journal_sheet("furnizor", &[("14399840", 100.0, 19.0, 119.0)]);
    let err = extract_amount_rows(&sheet, LayoutVariant::PurchaseJournal, |_| true).unwrap_err();
    assert!(matches!(err, ConvertError::Data { ref column, .. } if column == "G"));
}

#[test]
fn journal_missing_rate() {
    let mut sheet = journal_sheet("furnizor", &[("14399840", 100.0, 19.0, 19.0)]);
    sheet.set(2, 6, Cell::Empty);
    let err = extract_amount_rows(&sheet, LayoutVariant::PurchaseJournal, |_| true).unwrap_err();
    assert!(err.to_string().contains("missing tax rate"));
}

#[test]
fn journal_decimal_rate() {
    let sheet = journal_sheet("furnizor", &[("14399840", 200.0, 11.0, 5.5)]);
    let rows = extract_amount_rows(&sheet, LayoutVariant::PurchaseJournal, |_| true).unwrap();
    assert_eq!(rows[0].tax_rate, dec!(5.5));
    assert_eq!(rows[0].gross, dec!(211));
}

#[test]
fn boolean_amount_is_rejected() {
    let mut sheet = journal_sheet("furnizor", &[("14399840", 1.0, 1.0, 19.0)]);
    sheet.set(2, 4, Cell::Bool(true));
    let err = extract_amount_rows(&sheet, LayoutVariant::PurchaseJournal, |_| true).unwrap_err();
    assert!(err.to_string().contains("found boolean"));
}

#[test]
fn filtered_rows_are_not_parsed() {
    let mut sheet = journal_sheet("furnizor", &[("14399840", 1.0, 1.0, 19.0)]);
    sheet.set(2, 4, Cell::Error("#DIV/0!".into()));
    let rows =
        extract_amount_rows(&sheet, LayoutVariant::PurchaseJournal, |cui| cui != "14399840").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn blank_identifier_rows_are_skipped() {
    let mut sheet = journal_sheet("furnizor", &[("14399840", 1.0, 1.0, 19.0)]);
    sheet.set(3, 3, Cell::from("   "));
    sheet.set(3, 4, Cell::from("total"));
    let ids = extract_identifiers(&sheet, LayoutVariant::PurchaseJournal).unwrap();
    assert_eq!(ids.len(), 1);
    let rows = extract_amount_rows(&sheet, LayoutVariant::PurchaseJournal, |_| true).unwrap();
    assert_eq!(rows.len(), 1);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn different_rates_make_separate_invoices() {
    let companies = HashMap::from([("14399840".to_string(), company("A SRL", "RO14399840"))]);
    let rows = [
        raw("14399840", dec!(19), dec!(119)),
        raw("14399840", dec!(9), dec!(109)),
        raw("14399840", dec!(19), dec!(238)),
    ];
    let records = aggregate(
        &companies,
        &rows,
        &own(),
        ImportDirection::Intrari,
        UnmatchedPolicy::Skip,
    )
    .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].tax_rate, dec!(19));
    assert_eq!(records[0].gross_value, dec!(357));
    assert_eq!(records[1].tax_rate, dec!(9));
    assert_eq!(records[1].gross_value, dec!(109));
}

#[test]
fn same_rate_rows_sum_into_one() {
    let companies = HashMap::from([("14399840".to_string(), company("A SRL", "RO14399840"))]);
    let rows = [
        raw("14399840", dec!(19), dec!(100)),
        raw("14399840", dec!(19), dec!(200)),
    ];
    let records = aggregate(
        &companies,
        &rows,
        &own(),
        ImportDirection::Iesiri,
        UnmatchedPolicy::Skip,
    )
    .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].gross_value, dec!(300));
}

#[test]
fn intrari_makes_counterparty_supplier() {
    let counterparty = company("Furnizor SRL", "RO14399840");
    let companies = HashMap::from([("14399840".to_string(), counterparty.clone())]);
    let rows = [raw("14399840", dec!(19), dec!(10))];
    let records = aggregate(
        &companies,
        &rows,
        &own(),
        ImportDirection::Intrari,
        UnmatchedPolicy::Skip,
    )
    .unwrap();
    assert_eq!(records[0].supplier, counterparty);
    assert_eq!(records[0].client, own());
    assert_eq!(records[0].account_code, "628");
}

#[test]
fn iesiri_makes_counterparty_client() {
    let counterparty = company("Client SRL", "14399840");
    let companies = HashMap::from([("14399840".to_string(), counterparty.clone())]);
    let rows = [raw("14399840", dec!(19), dec!(10))];
    let records = aggregate(
        &companies,
        &rows,
        &own(),
        ImportDirection::Iesiri,
        UnmatchedPolicy::Skip,
    )
    .unwrap();
    assert_eq!(records[0].supplier, own());
    assert_eq!(records[0].client, counterparty);
    assert_eq!(records[0].account_code, "704");
}

#[test]
fn sequence_numbers_run_across_counterparties_in_sheet_order() {
    let companies = HashMap::from([
        ("14399840".to_string(), company("A", "RO14399840")),
        ("1590082".to_string(), company("B", "RO1590082")),
    ]);
    let rows = [
        raw("1590082", dec!(19), dec!(1)),
        raw("14399840", dec!(19), dec!(2)),
        raw("1590082", dec!(9), dec!(3)),
        raw("1590082", dec!(19), dec!(4)),
    ];
    let records = aggregate(
        &companies,
        &rows,
        &own(),
        ImportDirection::Iesiri,
        UnmatchedPolicy::Skip,
    )
    .unwrap();
    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.sequence_number, r.client.legal_name.as_str(), r.gross_value))
        .collect();
    assert_eq!(
        summary,
        vec![(1, "B", dec!(5)), (2, "A", dec!(2)), (3, "B", dec!(3))]
    );
    assert_eq!(records[2].invoice_number(), "FR3");
}

#[test]
fn no_rows_no_records() {
    let records = aggregate(
        &HashMap::new(),
        &[],
        &own(),
        ImportDirection::Iesiri,
        UnmatchedPolicy::Fail,
    )
    .unwrap();
    assert!(records.is_empty());
}
