//! JSON sub-activity encoder.
//!
//! Persists each segment as `<name>.json` with its recomputed summary
//! alongside the raw samples.

use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

use crate::error::{EncodeError, Result};
use crate::export::{ActivityEncoder, SegmentSummary};
use crate::models::Sample;

#[derive(Serialize)]
struct SegmentDocument<'a> {
    name: &'a str,
    summary: SegmentSummary,
    samples: &'a [Sample],
}

pub struct JsonEncoder {
    output_dir: PathBuf,
}

impl JsonEncoder {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl ActivityEncoder for JsonEncoder {
    fn encode(&self, samples: &[Sample], name: &str) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.json", name));

        let summary = SegmentSummary::compute(samples);
        let document = SegmentDocument {
            name,
            summary: summary.clone(),
            samples,
        };

        let file = File::create(&path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &document).map_err(|e| {
            EncodeError::WriteFailed {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        info!(
            file = %path.display(),
            samples = summary.samples,
            distance_km = %summary.total_distance,
            elapsed_s = summary.elapsed_time,
            "encoded sub-activity"
        );
        Ok(())
    }
}
