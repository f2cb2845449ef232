//! The fetch pipeline: query, retrieve, filter, correct, aggregate, convert.

use reqwest::Url;
use tracing::{debug, info};

use crate::aggregate;
use crate::aqi::{self, Category};
use crate::config::AqiConfig;
use crate::error::FetchError;
use crate::fetch::{self, ApiKey, HttpClient};
use crate::parser::{self, SensorPayload};
use crate::query::build_query;
use crate::report::AqiReport;

pub const BASE_URL: &str = "https://api.purpleair.com/v1/sensors";

/// A configured handle on the sensors endpoint.
///
/// Holds no state between fetches; every call runs the whole pipeline on
/// fresh data and either returns a complete [`AqiReport`] or a single
/// [`FetchError`].
pub struct PurpleAirClient<C> {
    http: ApiKey<C>,
    config: AqiConfig,
}

impl<C: HttpClient> PurpleAirClient<C> {
    pub fn new(http: C, config: AqiConfig) -> Self {
        let http = ApiKey::x_api_key(http, config.api_key.clone());
        Self { http, config }
    }

    pub fn config(&self) -> &AqiConfig {
        &self.config
    }

    /// Tears the client down, handing back the underlying transport.
    pub fn into_http(self) -> C {
        self.http.inner
    }

    /// Runs one fetch.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self) -> Result<AqiReport, FetchError> {
        let params = build_query(&self.config);
        let url = Url::parse_with_params(BASE_URL, &params).map_err(|e| {
            FetchError::Transport {
                status: None,
                reason: format!("invalid request url: {e}"),
            }
        })?;
        debug!(%url, "Querying sensors endpoint");

        let bytes = fetch::fetch_bytes(&self.http, url).await?;
        let payload = parser::parse_payload(&bytes)?;

        let report = process_payload(&payload, &self.config)?;
        let category = report
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "undetermined".to_string());
        info!(
            aqi = report.aqi,
            category = %category,
            sites = report.sites.len(),
            "Fetch complete"
        );
        Ok(report)
    }
}

/// The synchronous tail of the pipeline, from decoded payload to report.
pub fn process_payload(
    payload: &SensorPayload,
    config: &AqiConfig,
) -> Result<AqiReport, FetchError> {
    let weighted = config.weighted_search();
    let center = config.search.center();

    let readings = parser::extract_readings(
        payload,
        config.correction.pm25_field(),
        weighted,
        center,
    )?;
    debug!(readings = readings.len(), "Qualified readings extracted");

    let mut sites: Vec<String> = readings.iter().map(|r| r.site.clone()).collect();
    sites.sort();

    let corrected = aggregate::correct_readings(readings, config.correction);

    let concentration = match (weighted, center) {
        (true, Some(center)) => aggregate::weighted_mean(&corrected, center),
        _ => aggregate::mean(&corrected),
    };
    debug!(concentration, "Aggregate concentration");

    let aqi = aqi::pm25_aqi(concentration);
    let category = aqi.map(Category::from_aqi);

    Ok(AqiReport {
        aqi,
        category,
        sites,
        correction: config.correction,
        weighted,
    })
}
