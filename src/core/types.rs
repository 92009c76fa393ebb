use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConvertError;
use super::identifier::normalize_cui;

/// A company as registered with ANAF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Registered name (denumire).
    pub legal_name: String,
    /// Display fiscal code, `RO`-prefixed when VAT-registered.
    pub tax_id: String,
    /// Trade register number (e.g. "J40/8302/1997").
    pub registration_number: String,
    /// Registered office address, single line.
    pub address: String,
    /// County code (e.g. "B", "CJ").
    pub county: String,
    /// Locality name.
    pub locality: String,
}

impl Company {
    /// Grouping key: the fiscal code without the `RO` prefix.
    pub fn cui(&self) -> String {
        normalize_cui(&self.tax_id)
    }
}

/// Import direction selected in SAGA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportDirection {
    /// Purchases: the counterparty is the supplier.
    Intrari,
    /// Sales: the counterparty is the client.
    Iesiri,
}

impl ImportDirection {
    /// SAGA direction keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intrari => "intrari",
            Self::Iesiri => "iesiri",
        }
    }

    /// Expense or revenue account booked on the invoice line.
    pub fn account_code(&self) -> &'static str {
        match self {
            Self::Intrari => "628",
            Self::Iesiri => "704",
        }
    }
}

impl fmt::Display for ImportDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportDirection {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intrari" => Ok(Self::Intrari),
            "iesiri" => Ok(Self::Iesiri),
            other => Err(ConvertError::Config(format!(
                "unknown import direction \"{other}\", expected \"intrari\" or \"iesiri\""
            ))),
        }
    }
}

/// Supported spreadsheet layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutVariant {
    /// Tax-inclusive amounts in one column, implicit 19% rate.
    Simple,
    /// Purchase journal (jurnal de cumpărări) with explicit base, tax and rate.
    PurchaseJournal,
    /// Sales journal (jurnal de vânzări) with explicit base, tax and rate.
    SalesJournal,
}

/// Where the amounts of a data row live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// One tax-inclusive amount column at a fixed rate.
    Gross { column: usize, rate: Decimal },
    /// Base, tax and rate columns; gross = base + tax.
    Split {
        base: usize,
        tax: usize,
        rate: usize,
    },
}

/// Fixed cell positions of a layout. Columns are 0-based, rows 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Header row (1) column of the marker cell.
    pub marker_column: usize,
    /// Text the marker cell must contain.
    pub sentinel: &'static str,
    /// Column holding the counterparty fiscal code.
    pub identifier_column: usize,
    /// Where the amounts and the tax rate of a row are read from.
    pub amounts: AmountColumns,
}

/// Rate applied when the layout carries no explicit rate column.
pub const IMPLICIT_TAX_RATE: Decimal = dec!(19);

const SIMPLE: SheetLayout = SheetLayout {
    marker_column: 2,
    sentinel: "tert",
    identifier_column: 3,
    amounts: AmountColumns::Gross {
        column: 5,
        rate: IMPLICIT_TAX_RATE,
    },
};

const PURCHASE_JOURNAL: SheetLayout = SheetLayout {
    marker_column: 2,
    sentinel: "furnizor",
    identifier_column: 3,
    amounts: AmountColumns::Split {
        base: 4,
        tax: 5,
        rate: 6,
    },
};

const SALES_JOURNAL: SheetLayout = SheetLayout {
    marker_column: 2,
    sentinel: "client",
    identifier_column: 3,
    amounts: AmountColumns::Split {
        base: 4,
        tax: 5,
        rate: 6,
    },
};

impl LayoutVariant {
    /// Cell positions for this variant.
    pub fn layout(&self) -> &'static SheetLayout {
        match self {
            Self::Simple => &SIMPLE,
            Self::PurchaseJournal => &PURCHASE_JOURNAL,
            Self::SalesJournal => &SALES_JOURNAL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::PurchaseJournal => "purchase-journal",
            Self::SalesJournal => "sales-journal",
        }
    }
}

impl fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutVariant {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "purchase-journal" => Ok(Self::PurchaseJournal),
            "sales-journal" => Ok(Self::SalesJournal),
            other => Err(ConvertError::Config(format!(
                "unknown layout \"{other}\", expected simple, purchase-journal or sales-journal"
            ))),
        }
    }
}

/// One extracted data row, before grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAmountRow {
    /// 1-based spreadsheet row the values came from.
    pub row: usize,
    /// Normalized counterparty fiscal code.
    pub counterparty: String,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// Tax-inclusive amount.
    pub gross: Decimal,
}

/// One SAGA invoice, built per (counterparty, tax rate) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Position in the document, starting at 1.
    pub sequence_number: u64,
    /// Issuer: the counterparty for purchases, the SAGA company for sales.
    pub supplier: Company,
    /// Recipient: the SAGA company for purchases, the counterparty for sales.
    pub client: Company,
    /// Tax-inclusive total of the group.
    pub gross_value: Decimal,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// SAGA account code, see [`ImportDirection::account_code`].
    pub account_code: String,
}

impl InvoiceRecord {
    /// SAGA invoice number.
    pub fn invoice_number(&self) -> String {
        format!("FR{}", self.sequence_number)
    }
}

/// Fiscal codes that failed checksum validation and were not looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Normalized fiscal codes that failed the control digit, in sorted order.
    pub invalid: Vec<String>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.invalid.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.invalid.join(", "))
    }
}
