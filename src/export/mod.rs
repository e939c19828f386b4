//! Sub-activity encoders.
//!
//! An encoder persists one contiguous sub-sequence of samples as an
//! independent activity recording under a target name. Recomputing the
//! per-segment summary metadata (total distance, elapsed time) is the
//! encoder's contract; the splitter only hands over raw samples.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{EncodeError, Result};
use crate::models::Sample;

pub mod csv;
pub mod json;

/// Trait for persisting a sub-sequence as an independent activity
pub trait ActivityEncoder {
    /// Persist `samples` under `name` (extension chosen by the encoder).
    fn encode(&self, samples: &[Sample], name: &str) -> Result<()>;
}

/// Summary metadata recomputed per segment by the encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// Number of samples in the segment
    pub samples: usize,

    /// Distance covered in kilometers (cumulative delta across the segment)
    pub total_distance: Decimal,

    /// Elapsed time in seconds from first to last sample
    pub elapsed_time: i64,
}

impl SegmentSummary {
    /// Recompute the summary from the segment's raw samples.
    pub fn compute(samples: &[Sample]) -> Self {
        let (total_distance, elapsed_time) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (
                last.distance - first.distance,
                (last.timestamp - first.timestamp)
                    .max(Duration::zero())
                    .num_seconds(),
            ),
            _ => (Decimal::ZERO, 0),
        };
        Self {
            samples: samples.len(),
            total_distance,
            elapsed_time,
        }
    }
}

/// Build an encoder for the named output format.
pub fn encoder_for(format: &str, output_dir: PathBuf) -> Result<Box<dyn ActivityEncoder>> {
    match format.to_lowercase().as_str() {
        "csv" => Ok(Box::new(csv::CsvEncoder::new(output_dir))),
        "json" => Ok(Box::new(json::JsonEncoder::new(output_dir))),
        other => Err(EncodeError::UnsupportedFormat {
            format: other.to_string(),
        }
        .into()),
    }
}
