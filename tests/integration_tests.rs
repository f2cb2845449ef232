use async_trait::async_trait;
use purpleair_aqi::aqi::Category;
use purpleair_aqi::client::PurpleAirClient;
use purpleair_aqi::config::{AqiConfig, DistanceUnit, SearchMode};
use purpleair_aqi::correction::Correction;
use purpleair_aqi::error::FetchError;
use purpleair_aqi::fetch::HttpClient;
use purpleair_aqi::geo::Coordinates;
use serde_json::json;
use std::sync::Mutex;

/// Serves a fixed status and body, recording what was requested.
struct CannedClient {
    status: u16,
    body: String,
    seen_url: Mutex<Option<String>>,
    seen_api_key: Mutex<Option<String>>,
}

impl CannedClient {
    fn ok(body: serde_json::Value) -> Self {
        Self::with_status(200, body.to_string())
    }

    fn with_status(status: u16, body: String) -> Self {
        CannedClient {
            status,
            body,
            seen_url: Mutex::new(None),
            seen_api_key: Mutex::new(None),
        }
    }
}

#[async_trait]
impl HttpClient for CannedClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        *self.seen_url.lock().unwrap() = Some(req.url().to_string());
        *self.seen_api_key.lock().unwrap() = req
            .headers()
            .get("X-API-Key")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let resp = http::Response::builder()
            .status(self.status)
            .body(self.body.clone())
            .unwrap();
        Ok(reqwest::Response::from(resp))
    }
}

fn region_config(weighted: bool, correction: Correction) -> AqiConfig {
    AqiConfig {
        api_key: "test-api-key".to_string(),
        search: SearchMode::Region {
            center: Coordinates {
                latitude: 40.0,
                longitude: -105.0,
            },
            radius: 1.5,
            unit: DistanceUnit::Miles,
        },
        weighted,
        correction,
        update_interval_minutes: 10,
    }
}

#[tokio::test]
async fn test_single_sensor_fetch() {
    let http = CannedClient::ok(json!({
        "fields": ["name", "confidence", "pm2.5", "humidity"],
        "data": [["Backyard", 95, 10.0, null]]
    }));
    let client = PurpleAirClient::new(http, region_config(false, Correction::None));

    let report = client.fetch().await.unwrap();
    assert_eq!(report.aqi, Some(42));
    assert_eq!(report.category, Some(Category::Good));
    assert_eq!(report.sites, vec!["Backyard"]);
    assert_eq!(report.correction, Correction::None);
    assert!(!report.weighted);
}

#[tokio::test]
async fn test_weighted_fetch_equal_distance_sensors() {
    let http = CannedClient::ok(json!({
        "fields": ["name", "confidence", "pm2.5", "humidity",
                   "latitude", "longitude", "position_rating"],
        "data": [
            ["East", 99, 20.0, null, 40.0, -104.9, 5],
            ["West", 99, 30.0, null, 40.0, -105.1, 5]
        ]
    }));
    let client = PurpleAirClient::new(http, region_config(true, Correction::None));

    let report = client.fetch().await.unwrap();
    assert_eq!(report.aqi, Some(78));
    assert_eq!(report.category, Some(Category::Moderate));
    assert!(report.weighted);
}

#[tokio::test]
async fn test_low_confidence_sensor_rejected() {
    let http = CannedClient::ok(json!({
        "fields": ["name", "confidence", "pm2.5", "humidity"],
        "data": [["Backyard", 80, 10.0, null]]
    }));
    let client = PurpleAirClient::new(http, region_config(false, Correction::None));

    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::NoQualifiedSensors));
}

#[tokio::test]
async fn test_upstream_503_is_transport_error() {
    let http = CannedClient::with_status(503, "service unavailable".to_string());
    let client = PurpleAirClient::new(http, region_config(false, Correction::None));

    let err = client.fetch().await.unwrap_err();
    match err {
        FetchError::Transport { status, reason } => {
            assert_eq!(status, Some(503));
            assert_eq!(reason, "service unavailable");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let http = CannedClient::with_status(200, "<html>rate limited</html>".to_string());
    let client = PurpleAirClient::new(http, region_config(false, Correction::None));

    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_request_carries_api_key_and_bounding_box() {
    let http = CannedClient::ok(json!({
        "fields": ["name", "confidence", "pm2.5", "humidity"],
        "data": [["Backyard", 95, 10.0, null]]
    }));
    let client = PurpleAirClient::new(http, region_config(false, Correction::None));
    client.fetch().await.unwrap();

    let http = client.into_http();
    let url = http.seen_url.lock().unwrap().clone().unwrap();
    assert!(url.starts_with("https://api.purpleair.com/v1/sensors"));
    assert!(url.contains("nwlat="));
    assert!(url.contains("selng="));
    assert!(url.contains("max_age=3600"));
    assert!(url.contains("location_type=0"));

    let key = http.seen_api_key.lock().unwrap().clone();
    assert_eq!(key.as_deref(), Some("test-api-key"));
}

#[tokio::test]
async fn test_direct_mode_request() {
    let http = CannedClient::ok(json!({
        "fields": ["name", "confidence", "pm2.5", "humidity"],
        "data": [["Solo", 95, 12.0, null]]
    }));
    let config = AqiConfig {
        search: SearchMode::Direct {
            sensor_index: Some(98765),
            read_key: None,
        },
        ..region_config(false, Correction::None)
    };
    let client = PurpleAirClient::new(http, config);

    let report = client.fetch().await.unwrap();
    assert_eq!(report.aqi, Some(50));

    let http = client.into_http();
    let url = http.seen_url.lock().unwrap().clone().unwrap();
    assert!(url.contains("show_only=98765"));
    assert!(!url.contains("nwlat="));
}
