//! CSV telemetry decoder.
//!
//! Expects a header row of `timestamp,speed,distance,power` with RFC 3339
//! timestamps, speed in m/s, cumulative distance in kilometers, and power in
//! watts. Empty cells mean the device did not report the field.

use std::fs::File;
use std::path::Path;

use crate::error::{DecodeError, Result};
use crate::import::TelemetryDecoder;
use crate::models::Sample;

pub struct CsvDecoder;

impl CsvDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryDecoder for CsvDecoder {
    fn can_decode(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }

    fn decode(&self, path: &Path) -> Result<Vec<Sample>> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut samples = Vec::new();
        for (record, row) in reader.deserialize::<Sample>().enumerate() {
            let sample = row.map_err(|e| DecodeError::Parse {
                format: "CSV".to_string(),
                reason: format!("record {}: {}", record + 1, e),
            })?;
            samples.push(sample);
        }
        Ok(samples)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}
