//! Reduces a set of corrected readings to one representative concentration.

use crate::correction::Correction;
use crate::geo::{self, Coordinates};
use crate::parser::RawReading;

/// Distances of exactly zero are floored to avoid dividing by zero.
const MIN_DISTANCE_MILES: f64 = 0.001;

/// A qualified reading with its correction applied.
#[derive(Debug, Clone)]
pub struct CorrectedReading {
    pub reading: RawReading,
    pub corrected: f64,
}

/// Applies `correction` to each reading.
pub fn correct_readings(readings: Vec<RawReading>, correction: Correction) -> Vec<CorrectedReading> {
    readings
        .into_iter()
        .map(|reading| {
            let corrected = correction.apply(reading.pm25, reading.humidity);
            CorrectedReading { reading, corrected }
        })
        .collect()
}

/// Arithmetic mean of the corrected concentrations.
pub fn mean(readings: &[CorrectedReading]) -> f64 {
    if readings.is_empty() {
        return 0.0;
    }
    readings.iter().map(|r| r.corrected).sum::<f64>() / readings.len() as f64
}

/// Distance-weighted mean around `center`.
///
/// Each reading's weight is `nearest / sqrt(distance)` scaled by its
/// position rating plus one, so closer and better-placed sensors dominate.
/// A reading with an unknown rating contributes nothing.
pub fn weighted_mean(readings: &[CorrectedReading], center: Coordinates) -> f64 {
    let distances: Vec<f64> = readings
        .iter()
        .map(|r| {
            let coords = r.reading.coordinates.unwrap_or(center);
            let d = geo::distance_miles(center, coords);
            // Only an exactly-zero distance is floored; genuinely tiny
            // distances keep their true weight.
            if d > 0.0 { d } else { MIN_DISTANCE_MILES }
        })
        .collect();

    let Some(nearest) = distances.iter().copied().reduce(f64::min) else {
        return 0.0;
    };

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (r, d) in readings.iter().zip(&distances) {
        let rating_factor = match r.reading.position_rating {
            Some(rating) => (rating + 1) as f64,
            None => 0.0,
        };
        let weight = nearest / d.sqrt() * rating_factor;
        weighted_sum += r.corrected * weight;
        weight_total += weight;
    }

    if weight_total <= 0.0 {
        return 0.0;
    }
    weighted_sum / weight_total
}
