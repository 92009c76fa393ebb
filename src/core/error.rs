use rust_decimal::Decimal;
use thiserror::Error;

use super::resolve::LookupError;

/// Errors that abort a conversion.
///
/// Every variant is fatal for the whole run; there is no partial output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The marker cell does not hold the sentinel expected for the selected layout.
    #[error("invalid spreadsheet layout: cell {cell} must contain \"{expected}\"")]
    Layout {
        /// Marker cell reference (e.g. "C1").
        cell: String,
        /// Sentinel text for the selected layout.
        expected: &'static str,
    },

    /// A cell holds a value of the wrong type, or a value out of range.
    #[error("row {row}, column {column}{}: {message}", counterparty_suffix(.counterparty))]
    Data {
        /// 1-based spreadsheet row.
        row: usize,
        /// Column letter.
        column: String,
        /// Normalized counterparty identifier, when already known.
        counterparty: Option<String>,
        /// Human-readable description.
        message: String,
    },

    /// A (counterparty, tax rate) group sums to less than zero.
    #[error("negative total {total} for CUI {counterparty} at {tax_rate}% VAT")]
    NegativeTotal {
        counterparty: String,
        tax_rate: Decimal,
        total: Decimal,
    },

    /// A (counterparty, tax rate) group sums beyond the decimal range.
    #[error("total overflows for CUI {counterparty} at {tax_rate}% VAT (row {row})")]
    TotalOverflow {
        counterparty: String,
        tax_rate: Decimal,
        /// Row whose amount no longer fits.
        row: usize,
    },

    /// Invalid configuration (unknown direction, unknown layout, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// Valid identifiers the lookup service did not return.
    #[error("not all identifiers were found, missing: {}", .missing.join(", "))]
    Shortfall {
        /// Normalized identifiers missing from the lookup response.
        missing: Vec<String>,
    },

    /// The lookup service is down or in maintenance. Safe to retry later.
    #[error("company lookup unavailable: {0}")]
    LookupUnavailable(String),

    /// Any other lookup failure.
    #[error("company lookup failed: {0}")]
    Lookup(String),

    /// A counterparty referenced by the sheet has no resolved company.
    #[error("no resolved company for counterparty {0}")]
    UnmatchedCounterparty(String),

    /// An identifier that fails validation where a valid one is required.
    #[error("invalid fiscal code: {0}")]
    InvalidIdentifier(String),

    /// The spreadsheet could not be read.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Input file rejected by the file-type gate.
    #[error("unsupported file: {0}")]
    UnsupportedFile(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn counterparty_suffix(counterparty: &Option<String>) -> String {
    match counterparty {
        Some(cui) => format!(" (CUI {cui})"),
        None => String::new(),
    }
}

impl ConvertError {
    /// Whether the failure is transient and the conversion may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupUnavailable(_))
    }

    pub(crate) fn data(
        row: usize,
        column: &str,
        counterparty: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::Data {
            row,
            column: column.to_string(),
            counterparty: counterparty.map(str::to_string),
            message: message.into(),
        }
    }
}

impl From<LookupError> for ConvertError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Unavailable(msg) => Self::LookupUnavailable(msg),
            other => Self::Lookup(other.to_string()),
        }
    }
}

/// Result alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, ConvertError>;
