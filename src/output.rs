//! Output formatting and persistence for AQI samples.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::report::AqiReport;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One flattened sample row, suitable for a CSV history file.
#[derive(Debug, Default, Serialize)]
pub struct AqiRecord {
    pub timestamp: DateTime<Utc>,
    pub aqi: Option<u32>,
    /// Change against the previous successful sample; 0 on the first.
    pub aqi_delta: Option<i64>,
    pub category: Option<String>,
    pub level: Option<u8>,
    pub color: Option<String>,
    pub sites: String,
    pub correction: String,
    pub weighted: bool,

    // error tracking
    pub error: Option<String>,
}

impl AqiRecord {
    /// Builds a row from a successful report. `previous_aqi` is the
    /// caller-retained AQI of the last good sample.
    pub fn from_report(report: &AqiReport, previous_aqi: Option<u32>) -> Self {
        let aqi_delta = report.aqi.map(|aqi| match previous_aqi {
            Some(prev) => aqi as i64 - prev as i64,
            None => 0,
        });
        AqiRecord {
            timestamp: Utc::now(),
            aqi: report.aqi,
            aqi_delta,
            category: report.category.map(|c| c.to_string()),
            level: report.category.map(|c| c.level()),
            color: report.category.map(|c| c.color().to_string()),
            sites: report.sites.join(", "),
            correction: report.correction.to_string(),
            weighted: report.weighted,
            error: None,
        }
    }

    /// Builds a row recording a failed refresh.
    pub fn from_error(err: &FetchError) -> Self {
        AqiRecord {
            timestamp: Utc::now(),
            error: Some(err.to_string()),
            ..Default::default()
        }
    }
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &AqiReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &AqiReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Appends an [`AqiRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &AqiRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
