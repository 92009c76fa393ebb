//! SAGA `<Facturi>` document generation.

use quick_xml::escape::escape;
use rust_decimal::{Decimal, RoundingStrategy};
use std::borrow::Cow;

use chrono::NaiveDate;

use crate::core::{Company, EscapeMode, InvoiceRecord, default_invoice_date};

/// Output options for a [`SagaDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    pub escape_mode: EscapeMode,
    /// Issue and due date of every invoice.
    pub invoice_date: NaiveDate,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            escape_mode: EscapeMode::Minimal,
            invoice_date: default_invoice_date(),
        }
    }
}

/// Incrementally built SAGA import document.
///
/// The root element is opened on construction and closed by
/// [`finish`](Self::finish), which consumes the builder.
///
/// ```
/// use facturi::saga::{DocumentOptions, SagaDocument};
///
/// let xml = SagaDocument::new(DocumentOptions::default()).finish();
/// assert_eq!(xml, b"<Facturi>\n</Facturi>\n");
/// ```
#[derive(Debug)]
pub struct SagaDocument {
    options: DocumentOptions,
    content: String,
    invoices: usize,
}

impl SagaDocument {
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            options,
            content: String::from("<Facturi>\n"),
            invoices: 0,
        }
    }

    /// Number of invoices written so far.
    pub fn len(&self) -> usize {
        self.invoices
    }

    pub fn is_empty(&self) -> bool {
        self.invoices == 0
    }

    /// Append one `<Factura>` element.
    pub fn push(&mut self, record: &InvoiceRecord) -> &mut Self {
        let mode = self.options.escape_mode;
        let date = self.options.invoice_date.format("%d.%m.%Y").to_string();
        let (net, tax) = split_gross(record.gross_value, record.tax_rate);
        let rate = record.tax_rate.normalize().to_string();

        self.content.push_str("<Factura>\n");
        self.content.push_str("    <Antet>\n");
        push_supplier(&mut self.content, &record.supplier, mode);
        self.content.push_str(&format!(
            "        <ClientNume>{}</ClientNume>
        <ClientInformatiiSuplimentare></ClientInformatiiSuplimentare>
        <ClientCIF>{}</ClientCIF>
        <ClientNrRegCom>{}</ClientNrRegCom>
        <ClientJudet>{}</ClientJudet>
        <ClientTara>RO</ClientTara>
        <ClientLocalitate>{}</ClientLocalitate>
        <ClientAdresa>{}</ClientAdresa>
        <ClientBanca></ClientBanca>
        <ClientIBAN></ClientIBAN>
        <ClientTelefon></ClientTelefon>
        <ClientMail></ClientMail>
        <FacturaNumar>{}</FacturaNumar>
        <FacturaData>{date}</FacturaData>
        <FacturaScadenta>{date}</FacturaScadenta>
        <FacturaTaxareInversa>Nu</FacturaTaxareInversa>
        <FacturaTVAIncasare>Nu</FacturaTVAIncasare>
        <FacturaTip></FacturaTip>
        <FacturaInformatiiSuplimentare></FacturaInformatiiSuplimentare>
        <FacturaMoneda>RON</FacturaMoneda>
        <FacturaGreutate>0.000</FacturaGreutate>
",
            value(&record.client.legal_name, mode),
            value(&record.client.tax_id, mode),
            value(&record.client.registration_number, mode),
            value(&record.client.county, mode),
            value(&record.client.locality, mode),
            value(&record.client.address, mode),
            record.invoice_number(),
        ));
        self.content.push_str("    </Antet>\n");

        self.content.push_str("    <Detalii>\n        <Continut>\n");
        self.content.push_str(&format!(
            "            <Linie>
                <LinieNrCrt>1</LinieNrCrt>
                <Gestiune></Gestiune>
                <Activitate></Activitate>
                <Descriere>PRELUARE DATE</Descriere>
                <CodArticolFurnizor></CodArticolFurnizor>
                <CodArticolClient></CodArticolClient>
                <CodBare></CodBare>
                <InformatiiSuplimentare></InformatiiSuplimentare>
                <UM>BUC</UM>
                <Cantitate>1</Cantitate>
                <Pret>{net}</Pret>
                <Valoare>{net}</Valoare>
                <ProcTVA>{rate}</ProcTVA>
                <CotaTVA>{rate}</CotaTVA>
                <TVA>{tax}</TVA>
                <Cont>{}</Cont>
            </Linie>
",
            value(&record.account_code, mode),
        ));
        self.content.push_str("        </Continut>\n    </Detalii>\n");
        self.content.push_str("</Factura>\n");

        self.invoices += 1;
        self
    }

    /// Close the root element and return the document bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut content = self.content;
        content.push_str("</Facturi>\n");
        match self.options.escape_mode {
            EscapeMode::Minimal => content.replace('&', "&amp;").into_bytes(),
            EscapeMode::Strict => content.into_bytes(),
        }
    }
}

fn push_supplier(out: &mut String, company: &Company, mode: EscapeMode) {
    out.push_str(&format!(
        "        <FurnizorNume>{}</FurnizorNume>
        <FurnizorCIF>{}</FurnizorCIF>
        <FurnizorNrRegCom>{}</FurnizorNrRegCom>
        <FurnizorCapital></FurnizorCapital>
        <FurnizorTara>RO</FurnizorTara>
        <FurnizorLocalitate>{}</FurnizorLocalitate>
        <FurnizorJudet>{}</FurnizorJudet>
        <FurnizorAdresa>{}</FurnizorAdresa>
        <FurnizorTelefon></FurnizorTelefon>
        <FurnizorMail></FurnizorMail>
        <FurnizorBanca></FurnizorBanca>
        <FurnizorIBAN></FurnizorIBAN>
        <FurnizorInformatiiSuplimentare></FurnizorInformatiiSuplimentare>
",
        value(&company.legal_name, mode),
        value(&company.tax_id, mode),
        value(&company.registration_number, mode),
        value(&company.locality, mode),
        value(&company.county, mode),
        value(&company.address, mode),
    ));
}

fn value(text: &str, mode: EscapeMode) -> Cow<'_, str> {
    match mode {
        EscapeMode::Minimal => Cow::Borrowed(text),
        EscapeMode::Strict => escape(text),
    }
}

/// Split a tax-inclusive amount into (net, tax), each rounded to 2 places
/// half away from zero.
///
/// The tax is taken from the unrounded net, so rounding happens once.
pub fn split_gross(gross: Decimal, rate: Decimal) -> (Decimal, Decimal) {
    let net = gross / (Decimal::ONE + rate / Decimal::ONE_HUNDRED);
    let tax = gross - net;
    (round_money(net), round_money(tax))
}

fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Render records into one document.
pub fn serialize(records: &[InvoiceRecord], options: DocumentOptions) -> Vec<u8> {
    let mut document = SagaDocument::new(options);
    for record in records {
        document.push(record);
    }
    document.finish()
}
