//! The assembled result of one fetch.

use serde::Serialize;

use crate::aqi::Category;
use crate::correction::Correction;

/// Everything the caller gets back from a successful fetch.
///
/// `aqi` is `None` when the aggregate concentration falls outside the
/// breakpoint table (undetermined), in which case `category` is also `None`.
#[derive(Debug, Clone, Serialize)]
pub struct AqiReport {
    pub aqi: Option<u32>,
    pub category: Option<Category>,
    /// Contributing site names, sorted lexicographically. Upstream
    /// duplicates are passed through verbatim.
    pub sites: Vec<String>,
    pub correction: Correction,
    pub weighted: bool,
}
