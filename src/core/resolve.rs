//! Company resolution through an external lookup service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;

use super::error::{ConvertError, Result};
use super::identifier::{display_cui, normalize_cui, validate_cui};
use super::types::{Company, Diagnostics};

/// Company data as returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    /// Bare fiscal code, without the `RO` prefix.
    pub cui: String,
    /// Active VAT registration (scop TVA).
    pub vat_registered: bool,
    pub legal_name: String,
    pub registration_number: String,
    pub address: String,
    pub county: String,
    pub locality: String,
}

impl LookupRecord {
    /// Convert into a [`Company`], prefixing the fiscal code with `RO`
    /// when the company is VAT-registered.
    pub fn into_company(self) -> Company {
        Company {
            tax_id: display_cui(&normalize_cui(&self.cui), self.vat_registered),
            legal_name: self.legal_name,
            registration_number: self.registration_number,
            address: self.address,
            county: self.county,
            locality: self.locality,
        }
    }
}

/// Error from a lookup service.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum LookupError {
    /// Service down or in maintenance; the request may be retried later.
    Unavailable(String),
    /// Network or HTTP transport error.
    Network(String),
    /// The service answered with an error.
    Api(String),
    /// Failed to parse the response.
    Parse(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(e) => write!(f, "lookup service unavailable: {e}"),
            Self::Network(e) => write!(f, "lookup network error: {e}"),
            Self::Api(e) => write!(f, "lookup API error: {e}"),
            Self::Parse(e) => write!(f, "lookup parse error: {e}"),
        }
    }
}

impl std::error::Error for LookupError {}

/// A service that returns registration data for fiscal codes.
///
/// Identifiers the service does not know are simply absent from the
/// returned records; callers compute the difference themselves.
pub trait CompanyLookup {
    fn lookup(
        &self,
        cuis: &[String],
        request_date: NaiveDate,
    ) -> impl Future<Output = std::result::Result<Vec<LookupRecord>, LookupError>> + Send;
}

/// Outcome of resolving a set of fiscal codes.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Resolved companies keyed by normalized fiscal code.
    pub companies: HashMap<String, Company>,
    /// Codes that failed checksum validation and were never sent.
    pub invalid: Vec<String>,
    /// Valid codes the service did not return.
    pub unresolved: Vec<String>,
}

impl Resolution {
    /// Fail when any valid code was not returned by the service.
    pub fn require_complete(&self) -> Result<()> {
        if self.unresolved.is_empty() {
            Ok(())
        } else {
            Err(ConvertError::Shortfall {
                missing: self.unresolved.clone(),
            })
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            invalid: self.invalid.clone(),
        }
    }
}

/// Resolve fiscal codes into companies with a single lookup request.
///
/// Codes failing [`validate_cui`] are reported as `invalid` and never sent.
/// With `verify_checksum` off every code is sent as-is.
pub async fn resolve<L>(
    lookup: &L,
    cuis: &BTreeSet<String>,
    request_date: NaiveDate,
    verify_checksum: bool,
) -> Result<Resolution>
where
    L: CompanyLookup,
{
    let mut resolution = Resolution::default();
    let mut valid = Vec::with_capacity(cuis.len());
    for cui in cuis {
        if !verify_checksum || validate_cui(cui) {
            valid.push(cui.clone());
        } else {
            resolution.invalid.push(cui.clone());
        }
    }

    if !resolution.invalid.is_empty() {
        tracing::warn!(invalid = %resolution.invalid.join(", "), "skipping invalid fiscal codes");
    }
    if valid.is_empty() {
        return Ok(resolution);
    }

    tracing::info!(count = valid.len(), %request_date, "looking up companies");
    let records = lookup.lookup(&valid, request_date).await?;

    for record in records {
        let company = record.into_company();
        resolution.companies.insert(company.cui(), company);
    }
    resolution.unresolved = valid
        .into_iter()
        .filter(|cui| !resolution.companies.contains_key(cui))
        .collect();

    tracing::info!(
        resolved = resolution.companies.len(),
        unresolved = resolution.unresolved.len(),
        "lookup finished"
    );
    Ok(resolution)
}

/// Look up a single company, e.g. the company the SAGA import belongs to.
pub async fn resolve_company<L>(lookup: &L, cui: &str, request_date: NaiveDate) -> Result<Company>
where
    L: CompanyLookup,
{
    let cui = normalize_cui(cui);
    if !validate_cui(&cui) {
        return Err(ConvertError::InvalidIdentifier(cui));
    }
    let mut resolution = resolve(lookup, &BTreeSet::from([cui.clone()]), request_date, true).await?;
    resolution.require_complete()?;
    resolution
        .companies
        .remove(&cui)
        .ok_or(ConvertError::Shortfall { missing: vec![cui] })
}
