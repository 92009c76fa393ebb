//! Grouping of extracted rows into SAGA invoice records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::{ConvertError, Result};
use super::types::{Company, ImportDirection, InvoiceRecord, RawAmountRow};

/// What to do with rows whose counterparty has no resolved company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Drop the rows and log a warning.
    #[default]
    Skip,
    /// Abort the conversion.
    Fail,
}

type GroupKey = (String, Decimal);

/// Build one invoice record per (counterparty, tax rate) group.
///
/// Groups keep the order in which they first appear in `rows`; sequence
/// numbers start at 1 and run across the whole document.
pub fn aggregate(
    companies: &HashMap<String, Company>,
    rows: &[RawAmountRow],
    saga_company: &Company,
    direction: ImportDirection,
    unmatched: UnmatchedPolicy,
) -> Result<Vec<InvoiceRecord>> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut sums: HashMap<GroupKey, Decimal> = HashMap::new();
    let mut skipped: Vec<&str> = Vec::new();

    for row in rows {
        if !companies.contains_key(&row.counterparty) {
            match unmatched {
                UnmatchedPolicy::Fail => {
                    return Err(ConvertError::UnmatchedCounterparty(row.counterparty.clone()));
                }
                UnmatchedPolicy::Skip => {
                    if !skipped.contains(&row.counterparty.as_str()) {
                        tracing::warn!(cui = %row.counterparty, "no resolved company, dropping rows");
                        skipped.push(&row.counterparty);
                    }
                    continue;
                }
            }
        }

        let key = (row.counterparty.clone(), row.tax_rate);
        match sums.get_mut(&key) {
            Some(sum) => {
                *sum = sum.checked_add(row.gross).ok_or_else(|| ConvertError::TotalOverflow {
                    counterparty: row.counterparty.clone(),
                    tax_rate: row.tax_rate,
                    row: row.row,
                })?;
            }
            None => {
                sums.insert(key.clone(), row.gross);
                order.push(key);
            }
        }
    }

    let account_code = direction.account_code();
    let mut records = Vec::with_capacity(order.len());
    for (sequence, key) in (1u64..).zip(order) {
        let gross_value = sums[&key];
        let (cui, tax_rate) = key;
        if gross_value < Decimal::ZERO {
            return Err(ConvertError::NegativeTotal {
                counterparty: cui,
                tax_rate,
                total: gross_value,
            });
        }

        let counterparty = &companies[&cui];
        let (supplier, client) = match direction {
            ImportDirection::Intrari => (counterparty.clone(), saga_company.clone()),
            ImportDirection::Iesiri => (saga_company.clone(), counterparty.clone()),
        };
        tracing::debug!(%cui, %tax_rate, %gross_value, sequence, "invoice group");

        records.push(InvoiceRecord {
            sequence_number: sequence,
            supplier,
            client,
            gross_value,
            tax_rate,
            account_code: account_code.to_string(),
        });
    }

    Ok(records)
}
