//! World Bank API integration for country metadata and WDI observations.
//!
//! The v2 REST API wraps every listing in a two-element JSON array:
//! `[page-info, rows]`. Rows are `null` when a query matches nothing, and
//! error responses come back as a one-element array carrying a `message`
//! list instead. All of that is normalized here so the pipeline only sees
//! `CountryRecord` / `RawObservation` values or an `AppError`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::IncomeTier;
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";
const PER_PAGE: usize = 1000;

/// The three call shapes the pipeline needs from the provider.
///
/// `WbClient` implements this over HTTP; tests substitute an in-memory
/// source.
pub trait WdiSource {
    /// Country metadata filtered to one income classification tier.
    fn countries_by_income(&self, tier: IncomeTier) -> Result<Vec<CountryRecord>, AppError>;

    /// The full country catalog (includes aggregates and non-country
    /// regions; callers filter by id).
    fn all_countries(&self) -> Result<Vec<CountryRecord>, AppError>;

    /// Observations for one indicator across `country_ids` and the
    /// inclusive year range.
    fn indicator_observations(
        &self,
        indicator_code: &str,
        country_ids: &[String],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<RawObservation>, AppError>;
}

/// Country metadata as consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    pub id: String,
    pub name: String,
    pub region: String,
}

/// One (country, date, value) observation as returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub country_id: String,
    pub date: String,
    pub value: Option<f64>,
}

pub struct WbClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WbClient {
    /// Build a client against the public API host, honoring a
    /// `WDI_API_BASE` override from the environment (or a `.env` file) for
    /// tests and mirrors.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("WDI_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch every page of a listing endpoint and accumulate the rows.
    fn get_all_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let mut rows = Vec::new();
        let mut page = 1u32;

        loop {
            let resp = self
                .client
                .get(url)
                .query(query)
                .query(&[
                    ("format", "json".to_string()),
                    ("per_page", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ])
                .send()
                .map_err(|e| AppError::new(4, format!("Request to {url} failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(AppError::new(
                    4,
                    format!("Request to {url} failed with status {}.", resp.status()),
                ));
            }

            let body = resp
                .text()
                .map_err(|e| AppError::new(4, format!("Failed to read response body: {e}")))?;

            let (info, mut batch) = parse_envelope::<T>(&body)?;
            rows.append(&mut batch);

            if page >= info.pages.max(1) {
                break;
            }
            page += 1;
        }

        Ok(rows)
    }
}

impl WdiSource for WbClient {
    fn countries_by_income(&self, tier: IncomeTier) -> Result<Vec<CountryRecord>, AppError> {
        let url = format!("{}/country", self.base_url);
        let query = [("incomeLevel", tier.api_code().to_string())];
        let raw: Vec<ApiCountry> = self.get_all_pages(&url, &query)?;
        Ok(raw.into_iter().map(ApiCountry::into_record).collect())
    }

    fn all_countries(&self) -> Result<Vec<CountryRecord>, AppError> {
        let url = format!("{}/country", self.base_url);
        let raw: Vec<ApiCountry> = self.get_all_pages(&url, &[])?;
        Ok(raw.into_iter().map(ApiCountry::into_record).collect())
    }

    fn indicator_observations(
        &self,
        indicator_code: &str,
        country_ids: &[String],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<RawObservation>, AppError> {
        let url = format!(
            "{}/country/{}/indicator/{}",
            self.base_url,
            country_ids.join(";"),
            indicator_code
        );
        let query = [("date", format!("{start_year}:{end_year}"))];
        let raw: Vec<ApiObservation> = self.get_all_pages(&url, &query)?;
        Ok(raw.into_iter().map(ApiObservation::into_record).collect())
    }
}

/// Parse one `[page-info, rows]` envelope.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<(PageInfo, Vec<T>), AppError> {
    match serde_json::from_str::<(PageInfo, Option<Vec<T>>)>(body) {
        Ok((info, rows)) => Ok((info, rows.unwrap_or_default())),
        Err(envelope_err) => {
            // Error responses are a one-element array with a `message` list.
            if let Ok(errors) = serde_json::from_str::<Vec<ApiErrorBody>>(body) {
                if let Some(msg) = errors.iter().flat_map(|e| e.message.iter()).next() {
                    return Err(AppError::new(
                        4,
                        format!("Provider error {}: {}", msg.key, msg.value),
                    ));
                }
            }
            Err(AppError::new(
                4,
                format!("Malformed provider response: {envelope_err}"),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(default, deserialize_with = "lenient_u32")]
    pages: u32,
}

/// Some endpoints emit paging counters as JSON strings, others as numbers.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u32),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.parse::<u32>().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct ApiCountry {
    id: String,
    name: String,
    #[serde(default)]
    region: Option<ApiRef>,
}

impl ApiCountry {
    fn into_record(self) -> CountryRecord {
        CountryRecord {
            id: self.id,
            name: self.name,
            region: self.region.map(|r| r.value).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiObservation {
    #[serde(rename = "countryiso3code")]
    country_iso3: String,
    date: String,
    value: Option<f64>,
}

impl ApiObservation {
    fn into_record(self) -> RawObservation {
        RawObservation {
            country_id: self.country_iso3,
            date: self.date,
            value: self.value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Vec<ApiErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
}
