use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use facturi::core::*;
use facturi::saga::{DocumentOptions, serialize};

const CODES: [&str; 5] = ["14399840", "18547290", "1590082", "13548146", "33034700"];

fn company(cui: &str) -> Company {
    Company {
        legal_name: format!("Firma {cui} & Asociatii SRL"),
        tax_id: format!("RO{cui}"),
        registration_number: "J40/372/2002".into(),
        address: "Str. Lunga 1".into(),
        county: "B".into(),
        locality: "Bucuresti".into(),
    }
}

fn companies() -> HashMap<String, Company> {
    CODES.iter().map(|c| (c.to_string(), company(c))).collect()
}

fn journal_sheet(rows: usize) -> Sheet {
    let mut sheet = Sheet::new();
    sheet.set(1, 2, Cell::from("furnizor"));
    for i in 0..rows {
        let row = i + 2;
        let (base, rate) = if i % 3 == 0 { (100.0, 9.0) } else { (250.5, 19.0) };
        sheet.set(row, 3, Cell::from(format!("RO{}", CODES[i % CODES.len()])));
        sheet.set(row, 4, Cell::Number(base));
        sheet.set(row, 5, Cell::Number(base * rate / 100.0));
        sheet.set(row, 6, Cell::Number(rate));
    }
    sheet
}

fn raw_rows(n: usize) -> Vec<RawAmountRow> {
    (0..n)
        .map(|i| RawAmountRow {
            row: i + 2,
            counterparty: CODES[i % CODES.len()].to_string(),
            tax_rate: if i % 2 == 0 { dec!(19) } else { dec!(9) },
            gross: Decimal::new(11_900 + i as i64, 2),
        })
        .collect()
}

fn bench_validate_cui(c: &mut Criterion) {
    c.bench_function("normalize_and_validate_cui", |b| {
        b.iter(|| {
            for raw in [" ro14399840 ", "RO1590082", "12345678"] {
                black_box(validate_cui(&normalize_cui(black_box(raw))));
            }
        });
    });
}

fn bench_extract_1000_rows(c: &mut Criterion) {
    let sheet = journal_sheet(1000);
    c.bench_function("extract_amount_rows_1000", |b| {
        b.iter(|| {
            black_box(extract_amount_rows(
                black_box(&sheet),
                LayoutVariant::PurchaseJournal,
                |_| true,
            ))
        });
    });
}

fn bench_aggregate_1000_rows(c: &mut Criterion) {
    let companies = companies();
    let rows = raw_rows(1000);
    let own = company("4221306");
    c.bench_function("aggregate_1000_rows", |b| {
        b.iter(|| {
            black_box(aggregate(
                black_box(&companies),
                black_box(&rows),
                &own,
                ImportDirection::Intrari,
                UnmatchedPolicy::Skip,
            ))
        });
    });
}

fn bench_serialize(c: &mut Criterion) {
    let own = company("4221306");
    let records: Vec<InvoiceRecord> = (1..=500)
        .map(|n| InvoiceRecord {
            sequence_number: n,
            supplier: company(CODES[n as usize % CODES.len()]),
            client: own.clone(),
            gross_value: Decimal::new(11_900 * n as i64, 2),
            tax_rate: dec!(19),
            account_code: ImportDirection::Intrari.account_code().to_string(),
        })
        .collect();

    c.bench_function("serialize_500_invoices_minimal", |b| {
        b.iter(|| black_box(serialize(black_box(&records), DocumentOptions::default())));
    });

    let strict = DocumentOptions {
        escape_mode: EscapeMode::Strict,
        ..Default::default()
    };
    c.bench_function("serialize_500_invoices_strict", |b| {
        b.iter(|| black_box(serialize(black_box(&records), strict)));
    });
}

criterion_group!(
    benches,
    bench_validate_cui,
    bench_extract_1000_rows,
    bench_aggregate_1000_rows,
    bench_serialize,
);
criterion_main!(benches);
