//! ANAF VAT-payer lookup.
//!
//! Implements [`CompanyLookup`](crate::core::CompanyLookup) over the public
//! ANAF REST service, with a fixed-count, fixed-delay retry on outages.
//!
//! # Example
//!
//! ```ignore
//! use facturi::anaf::*;
//! use facturi::core::resolve_company;
//!
//! let client = AnafClient::new(AnafConfig::default())?;
//! let own = resolve_company(&client, "RO14399840", today).await?;
//! ```

mod client;

pub use client::{ANAF_URL, AnafClient, AnafConfig, AnafConfigBuilder};
