//! Conversion settings.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::aggregate::UnmatchedPolicy;

/// Escaping applied to interpolated values in the SAGA document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Only `&` is escaped, in one pass over the finished document.
    /// Byte-compatible with existing SAGA imports.
    #[default]
    Minimal,
    /// Full XML entity escaping of every value.
    Strict,
}

/// Configuration for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Escaping of company data in the output.
    pub escape_mode: EscapeMode,
    /// Handling of sheet rows whose counterparty was not resolved.
    pub unmatched_policy: UnmatchedPolicy,
    /// Skip the lookup for codes failing the CIF control digit.
    pub verify_checksum: bool,
    /// Issue and due date written on every invoice.
    pub invoice_date: NaiveDate,
    /// Date sent with the lookup request.
    pub request_date: NaiveDate,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            escape_mode: EscapeMode::Minimal,
            unmatched_policy: UnmatchedPolicy::Skip,
            verify_checksum: true,
            invoice_date: default_invoice_date(),
            request_date: Local::now().date_naive(),
        }
    }
}

/// Placeholder date SAGA imports carry: 31.12.2023.
pub fn default_invoice_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default()
}

/// Builder for [`ConversionConfig`].
///
/// # Example
///
/// ```
/// use facturi::core::*;
///
/// let config = ConversionConfigBuilder::new()
///     .escape_mode(EscapeMode::Strict)
///     .unmatched_policy(UnmatchedPolicy::Fail)
///     .build();
/// assert!(config.verify_checksum);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn escape_mode(mut self, mode: EscapeMode) -> Self {
        self.config.escape_mode = mode;
        self
    }

    pub fn unmatched_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.config.unmatched_policy = policy;
        self
    }

    /// Disable to send every code to the lookup service unchecked.
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.config.verify_checksum = verify;
        self
    }

    pub fn invoice_date(mut self, date: NaiveDate) -> Self {
        self.config.invoice_date = date;
        self
    }

    pub fn request_date(mut self, date: NaiveDate) -> Self {
        self.config.request_date = date;
        self
    }

    pub fn build(self) -> ConversionConfig {
        self.config
    }
}
