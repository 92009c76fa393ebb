//! Positional extraction of fiscal codes and amounts from a worksheet.
//!
//! No business validation happens here beyond layout sanity and cell types.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::collections::BTreeSet;
use std::str::FromStr;

use super::error::{ConvertError, Result};
use super::identifier::normalize_cui;
use super::sheet::{Cell, Sheet, cell_ref, column_letter};
use super::types::{AmountColumns, LayoutVariant, RawAmountRow};

/// Confirm the marker cell of `variant` holds its sentinel.
///
/// The comparison ignores surrounding whitespace and case.
pub fn check_marker(sheet: &Sheet, variant: LayoutVariant) -> Result<()> {
    let layout = variant.layout();
    let marker = sheet.cell(1, layout.marker_column);
    let matches = match marker {
        Cell::Text(s) => s.trim().eq_ignore_ascii_case(layout.sentinel),
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(ConvertError::Layout {
            cell: cell_ref(1, layout.marker_column),
            expected: layout.sentinel,
        })
    }
}

/// Collect the distinct normalized fiscal codes referenced by data rows.
pub fn extract_identifiers(sheet: &Sheet, variant: LayoutVariant) -> Result<BTreeSet<String>> {
    let column = variant.layout().identifier_column;
    let mut cuis = BTreeSet::new();
    for row in sheet.data_rows() {
        if let Some(cui) = identifier_at(sheet, row, column)? {
            cuis.insert(cui);
        }
    }
    tracing::debug!(count = cuis.len(), %variant, "extracted fiscal codes");
    Ok(cuis)
}

/// Read the amounts of every data row whose fiscal code passes `filter`.
///
/// Rows come back in sheet order.
pub fn extract_amount_rows<F>(
    sheet: &Sheet,
    variant: LayoutVariant,
    filter: F,
) -> Result<Vec<RawAmountRow>>
where
    F: Fn(&str) -> bool,
{
    let layout = variant.layout();
    let mut rows = Vec::new();

    for row in sheet.data_rows() {
        let Some(cui) = identifier_at(sheet, row, layout.identifier_column)? else {
            continue;
        };
        if !filter(&cui) {
            continue;
        }

        let (tax_rate, gross) = match layout.amounts {
            AmountColumns::Gross { column, rate } => {
                (rate, amount_at(sheet, row, column, &cui)?)
            }
            AmountColumns::Split { base, tax, rate } => {
                let base_amount = amount_at(sheet, row, base, &cui)?;
                let tax_amount = amount_at(sheet, row, tax, &cui)?;
                let gross = base_amount.checked_add(tax_amount).ok_or_else(|| {
                    ConvertError::data(
                        row,
                        &column_letter(tax),
                        Some(&cui),
                        format!("{base_amount} + {tax_amount} is out of range"),
                    )
                })?;
                (rate_at(sheet, row, rate, &cui)?, gross)
            }
        };

        rows.push(RawAmountRow {
            row,
            counterparty: cui,
            tax_rate,
            gross,
        });
    }

    tracing::debug!(count = rows.len(), %variant, "extracted amount rows");
    Ok(rows)
}

fn identifier_at(sheet: &Sheet, row: usize, column: usize) -> Result<Option<String>> {
    match sheet.cell(row, column) {
        cell if cell.is_empty() => Ok(None),
        Cell::Text(s) => {
            let cui = normalize_cui(s);
            Ok((!cui.is_empty()).then_some(cui))
        }
        other => Err(ConvertError::data(
            row,
            &column_letter(column),
            None,
            format!("fiscal code must be text, found {} \"{other}\"", other.kind()),
        )),
    }
}

/// Empty amount cells count as zero.
fn amount_at(sheet: &Sheet, row: usize, column: usize, cui: &str) -> Result<Decimal> {
    match sheet.cell(row, column) {
        cell if cell.is_empty() => Ok(Decimal::ZERO),
        cell => number(cell).ok_or_else(|| not_a_number(row, column, cui, cell)),
    }
}

fn rate_at(sheet: &Sheet, row: usize, column: usize, cui: &str) -> Result<Decimal> {
    let cell = sheet.cell(row, column);
    if cell.is_empty() {
        return Err(ConvertError::data(
            row,
            &column_letter(column),
            Some(cui),
            "missing tax rate",
        ));
    }
    let rate = number(cell).ok_or_else(|| not_a_number(row, column, cui, cell))?;
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(ConvertError::data(
            row,
            &column_letter(column),
            Some(cui),
            format!("tax rate {rate} outside 0..100"),
        ));
    }
    Ok(rate.normalize())
}

fn number(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Decimal::from_f64(*n),
        Cell::Text(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn not_a_number(row: usize, column: usize, cui: &str, cell: &Cell) -> ConvertError {
    ConvertError::data(
        row,
        &column_letter(column),
        Some(cui),
        format!("expected a number, found {} \"{cell}\"", cell.kind()),
    )
}
