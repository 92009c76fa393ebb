//! Core types and the network-free stages of the conversion.
//!
//! Fiscal code validation, the worksheet grid, positional extraction,
//! company resolution against a [`CompanyLookup`] and grouping into
//! [`InvoiceRecord`]s.

mod aggregate;
mod config;
mod error;
mod extract;
mod identifier;
mod resolve;
pub mod sheet;
mod types;

pub use aggregate::*;
pub use config::*;
pub use error::*;
pub use extract::*;
pub use identifier::*;
pub use resolve::*;
pub use sheet::{Cell, Sheet};
pub use types::*;
