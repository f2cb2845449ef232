//! Parses the sensors endpoint payload into qualified readings.
//!
//! The upstream body is columnar: a `fields` array of names and a `data`
//! array of rows positionally aligned with it. Column positions are resolved
//! once up front; a payload missing a required column fails as a whole
//! rather than row by row.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::geo::Coordinates;
use crate::query::{
    FIELD_CONFIDENCE, FIELD_HUMIDITY, FIELD_LATITUDE, FIELD_LONGITUDE, FIELD_NAME,
    FIELD_POSITION_RATING,
};

/// Rows at or above this confidence are considered reliable.
pub const CONFIDENCE_THRESHOLD: i64 = 90;

/// The raw upstream response shape.
#[derive(Debug, Deserialize)]
pub struct SensorPayload {
    pub fields: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

/// One qualified sensor row.
#[derive(Debug, Clone)]
pub struct RawReading {
    pub site: String,
    pub confidence: i64,
    pub pm25: f64,
    pub humidity: Option<f64>,
    /// The sensor's own location when weighting requested it, otherwise the
    /// configured search center (absent in direct mode).
    pub coordinates: Option<Coordinates>,
    /// Upstream placement-quality rating; `None` means unknown and carries
    /// zero weight in weighted aggregation.
    pub position_rating: Option<u32>,
}

/// Decodes the response body.
pub fn parse_payload(bytes: &[u8]) -> Result<SensorPayload, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

/// Resolved column positions for one payload.
struct Columns {
    name: usize,
    confidence: usize,
    pm25: usize,
    humidity: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    position_rating: Option<usize>,
}

impl Columns {
    fn resolve(fields: &[String], pm25_field: &str) -> Result<Self, FetchError> {
        let find = |name: &str| fields.iter().position(|f| f == name);
        let require = |name: &str| {
            find(name)
                .ok_or_else(|| FetchError::MalformedResponse(format!("missing field `{name}`")))
        };
        Ok(Columns {
            name: require(FIELD_NAME)?,
            confidence: require(FIELD_CONFIDENCE)?,
            pm25: require(pm25_field)?,
            humidity: find(FIELD_HUMIDITY),
            latitude: find(FIELD_LATITUDE),
            longitude: find(FIELD_LONGITUDE),
            position_rating: find(FIELD_POSITION_RATING),
        })
    }
}

/// Filters rows and builds [`RawReading`]s.
///
/// Rows below the confidence threshold are dropped first; if none survive
/// the fetch fails with [`FetchError::NoQualifiedSensors`]. Confident rows
/// without a PM2.5 value are dropped next; if none survive the fetch fails
/// with [`FetchError::NoPollutantData`].
pub fn extract_readings(
    payload: &SensorPayload,
    pm25_field: &str,
    use_sensor_coords: bool,
    center: Option<Coordinates>,
) -> Result<Vec<RawReading>, FetchError> {
    let columns = Columns::resolve(&payload.fields, pm25_field)?;
    let width = payload.fields.len();

    let mut confident = Vec::new();
    for row in &payload.data {
        if row.len() != width {
            return Err(FetchError::MalformedResponse(format!(
                "row has {} values, expected {width}",
                row.len()
            )));
        }
        // Confidence may arrive as an integer or a float; truncate before
        // comparing so 95.0 qualifies and 89.9 does not.
        match row[columns.confidence].as_f64().map(|c| c as i64) {
            Some(c) if c >= CONFIDENCE_THRESHOLD => confident.push((row, c)),
            _ => {}
        }
    }
    if confident.is_empty() {
        return Err(FetchError::NoQualifiedSensors);
    }

    let mut readings = Vec::new();
    for (row, confidence) in confident {
        let Some(pm25) = row[columns.pm25].as_f64() else {
            continue;
        };
        let site = row[columns.name]
            .as_str()
            .ok_or_else(|| FetchError::MalformedResponse("row missing sensor name".to_string()))?
            .to_string();

        let humidity = columns.humidity.and_then(|i| row[i].as_f64());

        let coordinates = if use_sensor_coords {
            match (columns.latitude, columns.longitude) {
                (Some(lat), Some(lon)) => match (row[lat].as_f64(), row[lon].as_f64()) {
                    (Some(latitude), Some(longitude)) => Some(Coordinates {
                        latitude,
                        longitude,
                    }),
                    _ => center,
                },
                _ => center,
            }
        } else {
            center
        };

        let position_rating = columns
            .position_rating
            .and_then(|i| row[i].as_i64())
            .and_then(|r| u32::try_from(r).ok());

        readings.push(RawReading {
            site,
            confidence,
            pm25,
            humidity,
            coordinates,
            position_rating,
        });
    }

    if readings.is_empty() {
        return Err(FetchError::NoPollutantData);
    }
    Ok(readings)
}
