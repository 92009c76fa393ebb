//! End-to-end conversion of one worksheet into one SAGA document.

use chrono::NaiveDate;

use super::document::{DocumentOptions, SagaDocument};
use crate::core::{
    Company, CompanyLookup, ConversionConfig, ConvertError, Diagnostics, ImportDirection,
    LayoutVariant, Sheet, UnmatchedPolicy, aggregate, check_marker, extract_amount_rows,
    extract_identifiers, resolve,
};

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The SAGA XML document.
    pub document: Vec<u8>,
    /// Fiscal codes skipped for failing validation.
    pub diagnostics: Diagnostics,
    /// Number of `<Factura>` elements in `document`.
    pub invoice_count: usize,
}

/// Convert a worksheet into a SAGA import document.
///
/// Stages run strictly in sequence and the first failure aborts the whole
/// conversion. The company lookup is the only await point and is issued at
/// most once.
pub async fn convert<L>(
    sheet: &Sheet,
    saga_company: &Company,
    direction: ImportDirection,
    layout: LayoutVariant,
    lookup: &L,
    config: &ConversionConfig,
) -> Result<Conversion, ConvertError>
where
    L: CompanyLookup,
{
    check_marker(sheet, layout)?;

    let cuis = extract_identifiers(sheet, layout)?;
    tracing::info!(count = cuis.len(), %layout, %direction, "processing fiscal codes");

    let resolution = resolve(lookup, &cuis, config.request_date, config.verify_checksum).await?;
    resolution.require_complete()?;

    // Under `Fail`, rows of unresolved codes must reach the aggregator to abort it.
    let keep_unmatched = config.unmatched_policy == UnmatchedPolicy::Fail;
    let rows = extract_amount_rows(sheet, layout, |cui| {
        keep_unmatched || resolution.companies.contains_key(cui)
    })?;
    let records = aggregate(
        &resolution.companies,
        &rows,
        saga_company,
        direction,
        config.unmatched_policy,
    )?;

    let mut document = SagaDocument::new(DocumentOptions {
        escape_mode: config.escape_mode,
        invoice_date: config.invoice_date,
    });
    for record in &records {
        document.push(record);
    }
    let invoice_count = document.len();
    tracing::info!(invoices = invoice_count, "conversion finished");

    Ok(Conversion {
        document: document.finish(),
        diagnostics: resolution.diagnostics(),
        invoice_count,
    })
}

/// Conventional output file name: `F_{tax_id}_{direction}_{yyyy-mm-dd}.xml`.
pub fn output_file_name(saga_company: &Company, direction: ImportDirection, date: NaiveDate) -> String {
    format!(
        "F_{}_{}_{}.xml",
        saga_company.tax_id,
        direction,
        date.format("%Y-%m-%d")
    )
}
