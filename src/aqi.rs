//! PM2.5 concentration to AQI conversion and category labeling.

use serde::Serialize;
use std::fmt;

/// EPA PM2.5 breakpoints: (conc_low, conc_high, aqi_low, aqi_high).
const PM25_BREAKPOINTS: [(f64, f64, u32, u32); 7] = [
    (0.0, 12.0, 0, 50),
    (12.1, 35.4, 51, 100),
    (35.5, 55.4, 101, 150),
    (55.5, 150.4, 151, 200),
    (150.5, 250.4, 201, 300),
    (250.5, 350.4, 301, 400),
    (350.5, 500.4, 401, 500),
];

/// Converts a PM2.5 concentration (µg/m³) to an AQI value.
///
/// The concentration is truncated to one decimal place before lookup, per
/// the EPA procedure. Above the top breakpoint the rounded concentration
/// itself is used. Returns `None` for negative (undeterminable) input.
pub fn pm25_aqi(concentration: f64) -> Option<u32> {
    let c = (concentration * 10.0).floor() / 10.0;
    if c < 0.0 {
        return None;
    }
    for &(conc_low, conc_high, aqi_low, aqi_high) in &PM25_BREAKPOINTS {
        if c >= conc_low && c <= conc_high {
            return Some(linear(c, conc_low, conc_high, aqi_low, aqi_high));
        }
    }
    // Beyond 500.4 there is no defined segment.
    Some(c.round() as u32)
}

fn linear(c: f64, conc_low: f64, conc_high: f64, aqi_low: u32, aqi_high: u32) -> u32 {
    let span = (aqi_high - aqi_low) as f64;
    let a = (c - conc_low) / (conc_high - conc_low) * span + aqi_low as f64;
    a.round() as u32
}

/// The EPA category an AQI value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthySensitive,
    #[serde(rename = "Unhealthy")]
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    #[serde(rename = "Hazardous")]
    Hazardous,
    #[serde(rename = "Extremely Hazardous")]
    ExtremelyHazardous,
}

impl Category {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthySensitive,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            301..=500 => Category::Hazardous,
            _ => Category::ExtremelyHazardous,
        }
    }

    /// Severity level 1 (Good) through 7 (Extremely Hazardous).
    pub fn level(&self) -> u8 {
        match self {
            Category::Good => 1,
            Category::Moderate => 2,
            Category::UnhealthySensitive => 3,
            Category::Unhealthy => 4,
            Category::VeryUnhealthy => 5,
            Category::Hazardous => 6,
            Category::ExtremelyHazardous => 7,
        }
    }

    /// Conventional AQI display color.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Good => "Green",
            Category::Moderate => "Yellow",
            Category::UnhealthySensitive => "Orange",
            Category::Unhealthy => "Red",
            Category::VeryUnhealthy => "Purple",
            Category::Hazardous | Category::ExtremelyHazardous => "Maroon",
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            Category::Good => "Air quality is good. Enjoy your day!",
            Category::Moderate => "Sensitive individuals should limit prolonged outdoor exertion.",
            Category::UnhealthySensitive => "Reduce prolonged outdoor exertion if sensitive.",
            Category::Unhealthy => "Everyone may begin to experience health effects.",
            Category::VeryUnhealthy => "Health alert: avoid outdoor exertion.",
            Category::Hazardous | Category::ExtremelyHazardous => {
                "Emergency conditions. Stay indoors."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
            Category::ExtremelyHazardous => "Extremely Hazardous",
        };
        f.write_str(name)
    }
}
