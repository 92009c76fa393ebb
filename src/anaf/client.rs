//! ANAF VAT-payer REST API client.

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{CompanyLookup, LookupError, LookupRecord};

/// VAT-payer lookup endpoint (synchronous API, version 8).
pub const ANAF_URL: &str = "https://webservicesp.anaf.ro/PlatitorTvaRest/api/v8/ws/tva";

/// Connection and retry settings for [`AnafClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnafConfig {
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts for transient failures, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
}

impl Default for AnafConfig {
    fn default() -> Self {
        Self {
            endpoint: ANAF_URL.into(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Builder for [`AnafConfig`].
///
/// # Example
///
/// ```
/// use facturi::anaf::AnafConfigBuilder;
/// use std::time::Duration;
///
/// let config = AnafConfigBuilder::new()
///     .max_attempts(5)
///     .retry_delay(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.max_attempts, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnafConfigBuilder {
    config: AnafConfig,
}

impl AnafConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the service URL (e.g. a newer API version or a local mock).
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// At least one attempt is always made.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts.max(1);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    pub fn build(self) -> AnafConfig {
        self.config
    }
}

#[derive(Serialize)]
struct AnafRequest<'a> {
    cui: u64,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnafResponse {
    #[serde(default)]
    found: Vec<AnafFound>,
}

#[derive(Debug, Deserialize)]
struct AnafFound {
    date_generale: GeneralData,
    #[serde(rename = "inregistrare_scop_Tva", default)]
    vat_registration: VatRegistration,
    #[serde(default)]
    adresa_sediu_social: RegisteredOffice,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneralData {
    cui: CuiField,
    #[serde(default)]
    denumire: String,
    #[serde(default)]
    adresa: String,
    #[serde(default)]
    nr_reg_com: String,
}

#[derive(Debug, Default, Deserialize)]
struct VatRegistration {
    #[serde(rename = "scpTVA", default)]
    scp_tva: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RegisteredOffice {
    #[serde(rename = "sdenumire_Localitate", default)]
    locality: String,
    #[serde(rename = "scod_JudetAuto", default)]
    county: String,
}

/// The API answers with numeric codes; older mirrors send strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CuiField {
    Number(u64),
    Text(String),
}

impl CuiField {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl From<AnafFound> for LookupRecord {
    fn from(f: AnafFound) -> Self {
        LookupRecord {
            cui: f.date_generale.cui.into_string(),
            vat_registered: f.vat_registration.scp_tva,
            legal_name: f.date_generale.denumire,
            registration_number: f.date_generale.nr_reg_com,
            address: f.date_generale.adresa,
            county: f.adresa_sediu_social.county,
            locality: f.adresa_sediu_social.locality,
        }
    }
}

/// Client for the ANAF VAT-payer lookup.
///
/// Every [`lookup`](CompanyLookup::lookup) issues one POST carrying all
/// codes. Outages and transport errors are retried with a fixed delay.
#[derive(Debug, Clone)]
pub struct AnafClient {
    http: reqwest::Client,
    config: AnafConfig,
}

impl AnafClient {
    pub fn new(config: AnafConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AnafConfig {
        &self.config
    }

    async fn post(&self, body: &str) -> Result<Vec<LookupRecord>, LookupError> {
        let resp = self
            .http
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        check_status(status, &text)?;
        parse_response(&text)
    }
}

impl CompanyLookup for AnafClient {
    async fn lookup(
        &self,
        cuis: &[String],
        request_date: NaiveDate,
    ) -> Result<Vec<LookupRecord>, LookupError> {
        let body = request_body(cuis, request_date)?;
        let attempts = self.config.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            match self.post(&body).await {
                Err(e @ (LookupError::Unavailable(_) | LookupError::Network(_)))
                    if attempt < attempts =>
                {
                    tracing::warn!(attempt, max = attempts, error = %e, "ANAF request failed, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(LookupError::Network(e)) => return Err(LookupError::Unavailable(e)),
                result => return result,
            }
        }
    }
}

fn request_body(cuis: &[String], request_date: NaiveDate) -> Result<String, LookupError> {
    let date = request_date.format("%Y-%m-%d").to_string();
    let entries: Vec<AnafRequest<'_>> = cuis
        .iter()
        .filter_map(|cui| match cui.parse::<u64>() {
            Ok(n) => Some(AnafRequest { cui: n, data: &date }),
            Err(_) => {
                tracing::debug!(%cui, "not numeric, left out of the ANAF request");
                None
            }
        })
        .collect();
    serde_json::to_string(&entries).map_err(|e| LookupError::Parse(e.to_string()))
}

fn check_status(status: StatusCode, body: &str) -> Result<(), LookupError> {
    if status.is_success() {
        Ok(())
    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        Err(LookupError::Unavailable(format!("HTTP {status}")))
    } else {
        Err(LookupError::Api(format!("HTTP {status}: {body}")))
    }
}

fn parse_response(body: &str) -> Result<Vec<LookupRecord>, LookupError> {
    // Maintenance windows serve an HTML page with a success status.
    if body.trim_start().starts_with('<') {
        return Err(LookupError::Unavailable("service returned an HTML page".into()));
    }
    let resp: AnafResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;
    Ok(resp.found.into_iter().map(LookupRecord::from).collect())
}
