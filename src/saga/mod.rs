//! SAGA XML import generation.
//!
//! Renders [`InvoiceRecord`](crate::core::InvoiceRecord)s into the
//! `<Facturi>` document SAGA imports, and wires the whole pipeline from
//! worksheet to document.
//!
//! # Example
//!
//! ```ignore
//! use facturi::saga::*;
//!
//! let conversion = convert(&sheet, &own_company, direction, layout, &client, &config).await?;
//! std::fs::write(output_file_name(&own_company, direction, today), &conversion.document)?;
//! println!("invalid codes: {}", conversion.diagnostics);
//! ```

mod document;
mod pipeline;

pub use document::{DocumentOptions, SagaDocument, serialize, split_gross};
pub use pipeline::{Conversion, convert, output_file_name};
