//! Builds the upstream query parameters for a fetch.

use crate::config::{AqiConfig, DistanceUnit, SearchMode};
use crate::geo::{self, BoundingBox};

/// Upstream field names we always request.
pub const FIELD_NAME: &str = "name";
pub const FIELD_CONFIDENCE: &str = "confidence";
pub const FIELD_HUMIDITY: &str = "humidity";

/// Requested only when distance weighting is on.
pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_POSITION_RATING: &str = "position_rating";

/// Seconds; readings older than this are excluded upstream.
const MAX_AGE_SECS: u32 = 3600;

/// `location_type=0` restricts to outdoor registered stations.
const LOCATION_TYPE_OUTDOOR: &str = "0";

/// Produces the query parameters for the sensors endpoint.
///
/// Region searches carry a bounding box around the center; direct searches
/// carry a sensor selector and/or read key instead.
pub fn build_query(config: &AqiConfig) -> Vec<(String, String)> {
    let mut fields = vec![
        FIELD_NAME.to_string(),
        FIELD_CONFIDENCE.to_string(),
        config.correction.pm25_field().to_string(),
        // Always requested so switching to US EPA stays a config-only change.
        FIELD_HUMIDITY.to_string(),
    ];
    if config.weighted_search() {
        fields.push(FIELD_LATITUDE.to_string());
        fields.push(FIELD_LONGITUDE.to_string());
        fields.push(FIELD_POSITION_RATING.to_string());
    }

    let mut params = vec![("fields".to_string(), fields.join(","))];

    match &config.search {
        SearchMode::Region {
            center,
            radius,
            unit,
        } => {
            let radius_miles = match unit {
                DistanceUnit::Miles => *radius,
                DistanceUnit::Kilometers => geo::km_to_miles(*radius),
            };
            let bbox = BoundingBox::around(*center, radius_miles);
            params.push(("location_type".to_string(), LOCATION_TYPE_OUTDOOR.to_string()));
            params.push(("max_age".to_string(), MAX_AGE_SECS.to_string()));
            params.push(("nwlat".to_string(), bbox.nwlat.to_string()));
            params.push(("nwlng".to_string(), bbox.nwlng.to_string()));
            params.push(("selat".to_string(), bbox.selat.to_string()));
            params.push(("selng".to_string(), bbox.selng.to_string()));
        }
        SearchMode::Direct {
            sensor_index,
            read_key,
        } => {
            if let Some(index) = sensor_index {
                params.push(("show_only".to_string(), index.to_string()));
            }
            if let Some(key) = read_key {
                params.push(("read_key".to_string(), key.clone()));
            }
        }
    }

    params
}
