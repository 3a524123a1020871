//! Ocean data source clients.
//!
//! [`OceanDataClient`] is the contract the aggregator calls; [`HttpOceanClient`]
//! implements it over plain JSON GET requests. Payloads are passed through as
//! opaque `serde_json::Value`s.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use seachat_core::config::{EndpointConfig, SourcesConfig};
use seachat_core::types::{Coordinates, DateRange};
use seachat_core::SourceError;

/// User-Agent header sent to every source.
const USER_AGENT: &str = concat!("seachat/", env!("CARGO_PKG_VERSION"));

/// Max chars of an error body kept in a `SourceError`.
const MAX_ERROR_BODY: usize = 500;

/// Calls to the upstream ocean data providers.
///
/// Any transport failure, non-2xx status or unparsable body is an `Err`.
#[async_trait]
pub trait OceanDataClient: Send + Sync {
    /// Argo float profiles within `radius_km` of `at`.
    async fn argo_profiles(&self, at: Coordinates, radius_km: f64) -> Result<Value, SourceError>;

    /// Satellite chlorophyll concentration at `at`.
    async fn chlorophyll(
        &self,
        at: Coordinates,
        range: Option<DateRange>,
    ) -> Result<Value, SourceError>;

    /// Ocean current forecast at `at`.
    async fn currents(
        &self,
        at: Coordinates,
        range: Option<DateRange>,
    ) -> Result<Value, SourceError>;

    /// 24 hours of tide predictions for `station_id` starting on `date`.
    async fn tide_predictions(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> Result<Value, SourceError>;
}

// ─────────────────────────────────────────────
// HttpOceanClient
// ─────────────────────────────────────────────

/// HTTP implementation of [`OceanDataClient`].
#[derive(Debug, Clone)]
pub struct HttpOceanClient {
    client: Client,
    argo: EndpointConfig,
    nasa: EndpointConfig,
    copernicus: EndpointConfig,
    tides_base: String,
}

impl HttpOceanClient {
    pub fn new(config: &SourcesConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(config.call_timeout())
                .build()
                .unwrap_or_default(),
            argo: config.argo.clone(),
            nasa: config.nasa.clone(),
            copernicus: config.copernicus.clone(),
            tides_base: config.tides.api_base.clone(),
        }
    }

    /// Send `request` and decode a successful body as JSON.
    async fn get_json(
        &self,
        source_name: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, SourceError> {
        let resp = request.send().await.map_err(|e| SourceError::Http {
            source_name,
            message: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                source_name,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        resp.json::<Value>().await.map_err(|e| SourceError::Parse {
            source_name,
            message: e.to_string(),
        })
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn location_query(at: Coordinates, range: Option<DateRange>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("lat", at.latitude.to_string()),
        ("lon", at.longitude.to_string()),
    ];
    if let Some(range) = range {
        query.push(("start", range.start.format("%Y-%m-%d").to_string()));
        query.push(("end", range.end.format("%Y-%m-%d").to_string()));
    }
    query
}

#[async_trait]
impl OceanDataClient for HttpOceanClient {
    async fn argo_profiles(&self, at: Coordinates, radius_km: f64) -> Result<Value, SourceError> {
        let url = endpoint(&self.argo.api_base, "argo");
        debug!(url = %url, at = %at, radius_km, "fetching argo profiles");

        let mut request = self.client.get(&url).query(&[
            ("center", format!("{},{}", at.longitude, at.latitude)),
            ("radius", radius_km.to_string()),
            ("data", "temperature,salinity".to_string()),
        ]);
        if let Some(ref key) = self.argo.api_key {
            request = request.header("x-argokey", key);
        }

        self.get_json("argo", request).await
    }

    async fn chlorophyll(
        &self,
        at: Coordinates,
        range: Option<DateRange>,
    ) -> Result<Value, SourceError> {
        let url = endpoint(&self.nasa.api_base, "chlorophyll");
        debug!(url = %url, at = %at, "fetching chlorophyll");

        let mut query = location_query(at, range);
        if let Some(ref key) = self.nasa.api_key {
            query.push(("api_key", key.clone()));
        }

        let request = self.client.get(&url).query(&query);
        self.get_json("nasa", request).await
    }

    async fn currents(
        &self,
        at: Coordinates,
        range: Option<DateRange>,
    ) -> Result<Value, SourceError> {
        let url = endpoint(&self.copernicus.api_base, "currents");
        debug!(url = %url, at = %at, "fetching currents");

        let mut request = self.client.get(&url).query(&location_query(at, range));
        if let Some(ref key) = self.copernicus.api_key {
            request = request.bearer_auth(key);
        }

        self.get_json("copernicus", request).await
    }

    async fn tide_predictions(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> Result<Value, SourceError> {
        let url = endpoint(&self.tides_base, "datagetter");
        debug!(url = %url, station = station_id, %date, "fetching tide predictions");

        let begin_date = date.format("%Y%m%d").to_string();
        let request = self.client.get(&url).query(&[
            ("product", "predictions"),
            ("station", station_id),
            ("begin_date", begin_date.as_str()),
            ("range", "24"),
            ("datum", "MLLW"),
            ("units", "metric"),
            ("time_zone", "gmt"),
            ("format", "json"),
            ("application", "seachat"),
        ]);

        let body = self.get_json("tides", request).await?;

        // CO-OPS reports bad stations and dates as 200 with an "error" object.
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(SourceError::Parse {
                source_name: "tides",
                message,
            });
        }

        Ok(body)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
