//! # facturi
//!
//! Converts spreadsheet invoice registers into the SAGA accounting XML
//! import format, enriching every counterparty with company data from the
//! ANAF VAT-payer lookup service.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Spreadsheet floats are converted once, at extraction.
//!
//! ## Quick Start
//!
//! ```rust
//! use facturi::core::*;
//! use rust_decimal_macros::dec;
//!
//! assert!(validate_cui("14399840"));
//! assert_eq!(normalize_cui(" ro14399840 "), "14399840");
//!
//! let (net, tax) = facturi::saga::split_gross(dec!(119), dec!(19));
//! assert_eq!((net, tax), (dec!(100.00), dec!(19.00)));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Identifiers, cell grid, extraction, resolution, aggregation |
//! | `saga` (default) | SAGA XML document builder and the conversion pipeline |
//! | `xlsx` | `.xlsx` reading into the cell grid |
//! | `anaf` | ANAF VAT-payer REST client |
//! | `cli` | `facturi` command-line front end |
//! | `all` | Every library feature |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "saga")]
pub mod saga;

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "anaf")]
pub mod anaf;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
