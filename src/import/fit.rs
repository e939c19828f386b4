//! FIT telemetry decoder built on `fitparser`.
//!
//! Extracts the four fields the analyses consume (timestamp, speed, distance,
//! power) from FIT `record` messages. Records without a timestamp are
//! skipped; other missing fields become `None`/carry-forward values.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use fitparser::profile::MesgNum;
use fitparser::{FitDataField, FitDataRecord, Value};

use crate::error::{DecodeError, Result};
use crate::import::TelemetryDecoder;
use crate::models::Sample;

pub struct FitDecoder;

impl FitDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FitDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryDecoder for FitDecoder {
    fn can_decode(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("fit"))
            .unwrap_or(false)
    }

    fn decode(&self, path: &Path) -> Result<Vec<Sample>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let records: Vec<FitDataRecord> =
            fitparser::from_reader(&mut reader).map_err(|e| DecodeError::Parse {
                format: "FIT".to_string(),
                reason: format!("{:?}", e),
            })?;

        let mut samples = Vec::new();
        let mut skipped = 0usize;
        for record in records
            .iter()
            .filter(|record| record.kind() == MesgNum::Record)
        {
            match sample_from_record(record) {
                Some(sample) => samples.push(sample),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "FIT records without usable timestamp/distance");
        }
        Ok(samples)
    }

    fn format_name(&self) -> &'static str {
        "FIT"
    }
}

fn sample_from_record(record: &FitDataRecord) -> Option<Sample> {
    let mut timestamp: Option<DateTime<Utc>> = None;
    let mut speed: Option<Decimal> = None;
    let mut distance: Option<Decimal> = None;
    let mut power: Option<u16> = None;

    for field in record.fields() {
        match field.name() {
            "timestamp" => timestamp = field_timestamp(field),
            // enhanced_speed supersedes the legacy 16-bit field when present
            "enhanced_speed" => speed = field_decimal(field),
            "speed" => {
                if speed.is_none() {
                    speed = field_decimal(field);
                }
            }
            // FIT distance is meters; the stream carries kilometers
            "distance" => {
                distance = field_decimal(field).map(|m| m / Decimal::from(1000));
            }
            "power" => power = field_u16(field),
            _ => {}
        }
    }

    Some(Sample::new(timestamp?, speed, distance?, power))
}

fn field_timestamp(field: &FitDataField) -> Option<DateTime<Utc>> {
    match field.value() {
        Value::Timestamp(ts) => Some(ts.with_timezone(&Utc)),
        _ => None,
    }
}

fn field_decimal(field: &FitDataField) -> Option<Decimal> {
    match field.value() {
        Value::Float64(v) => Decimal::from_f64(*v),
        Value::Float32(v) => Decimal::from_f32(*v),
        Value::UInt16(v) => Some(Decimal::from(*v)),
        Value::UInt32(v) => Some(Decimal::from(*v)),
        Value::SInt32(v) => Some(Decimal::from(*v)),
        _ => None,
    }
}

fn field_u16(field: &FitDataField) -> Option<u16> {
    match field.value() {
        Value::UInt16(v) => Some(*v),
        Value::UInt32(v) => u16::try_from(*v).ok(),
        Value::SInt32(v) => u16::try_from(*v).ok(),
        Value::Float64(v) if *v >= 0.0 => Some(*v as u16),
        _ => None,
    }
}
