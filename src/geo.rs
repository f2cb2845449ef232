//! Geographic primitives: coordinates, bounding boxes, and distance.

/// Miles per degree of latitude at the equator.
const MILES_PER_DEGREE_LAT: f64 = 69.172;

/// Miles per degree of longitude, treated as a constant rather than
/// latitude-corrected. Intentional: correcting it would change the search
/// area shape relative to the original driver.
const MILES_PER_DEGREE_LON: f64 = 68.972;

const KM_PER_MILE: f64 = 1.609;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Named fields so that callers can never transpose the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A search rectangle expressed as its north-west and south-east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub nwlat: f64,
    pub nwlng: f64,
    pub selat: f64,
    pub selng: f64,
}

impl BoundingBox {
    /// Builds the box spanning `radius_miles` in every direction around
    /// `center`, using the latitude-dependent degree scale.
    pub fn around(center: Coordinates, radius_miles: f64) -> Self {
        let lat_delta = radius_miles / miles_per_degree_lat(center.latitude);
        let lon_delta = radius_miles / MILES_PER_DEGREE_LON;
        BoundingBox {
            nwlat: center.latitude + lat_delta,
            nwlng: center.longitude - lon_delta,
            selat: center.latitude - lat_delta,
            selng: center.longitude + lon_delta,
        }
    }
}

fn miles_per_degree_lat(latitude: f64) -> f64 {
    MILES_PER_DEGREE_LAT * latitude.to_radians().cos()
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

/// Great-circle distance between two points in miles (haversine).
pub fn distance_miles(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    let meters = EARTH_RADIUS_M * c;
    meters / 1000.0 / KM_PER_MILE
}
