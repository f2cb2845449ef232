//! Fetch configuration.
//!
//! One [`AqiConfig`] describes everything a single fetch needs. It is
//! immutable for the duration of the call; the polling interval is carried
//! only so the surrounding scheduler can read it back.

use clap::ValueEnum;

use crate::correction::Correction;
use crate::geo::Coordinates;

#[derive(Debug, Clone)]
pub struct AqiConfig {
    /// PurpleAir API read key, sent as the `X-API-Key` header.
    pub api_key: String,
    pub search: SearchMode,
    /// Distance-weight readings by proximity to the search center.
    pub weighted: bool,
    pub correction: Correction,
    /// Minutes between scheduled refreshes. Owned by the scheduler; the
    /// fetch itself never reads it.
    pub update_interval_minutes: u64,
}

/// How sensors are selected upstream.
#[derive(Debug, Clone)]
pub enum SearchMode {
    /// All outdoor registered stations within `radius` of `center`.
    Region {
        center: Coordinates,
        radius: f64,
        unit: DistanceUnit,
    },
    /// One specific sensor by index, or the sensors behind a shared
    /// read key. No bounding box.
    Direct {
        sensor_index: Option<u32>,
        read_key: Option<String>,
    },
}

impl SearchMode {
    /// The configured center point, if this is a region search.
    pub fn center(&self) -> Option<Coordinates> {
        match self {
            SearchMode::Region { center, .. } => Some(*center),
            SearchMode::Direct { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl AqiConfig {
    /// Whether this fetch aggregates with distance weights. Weighting needs
    /// a center point, so it only applies to region searches.
    pub fn weighted_search(&self) -> bool {
        self.weighted && matches!(self.search, SearchMode::Region { .. })
    }
}
