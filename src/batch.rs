//! Batch analysis across many activity files using rayon.
//!
//! Activities are independent; each file is decoded and analyzed on its own
//! worker with no shared mutable state. A failure in one activity is
//! collected and reported without aborting the rest of the batch.

use chrono::Duration;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::import::DecoderRegistry;
use crate::segmenter::StopSegmenter;
use crate::zones::ZoneClassifier;

/// Result of analyzing a single activity file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Path to the file that was processed
    pub file_path: PathBuf,
    /// Number of samples decoded
    pub samples: usize,
    /// Number of merged stops found
    pub stops: usize,
    /// Total counted zone time in seconds, when an FTP was supplied
    pub zone_time: Option<i64>,
}

/// Summary of a batch analysis run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Total files considered
    pub total_files: usize,
    /// Per-file results for the successful ones
    pub outcomes: Vec<FileOutcome>,
    /// Errors encountered, per file
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn is_fully_successful(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Analyze every decodable activity file in `dir`.
///
/// Runs stop segmentation on each file and, when `ftp` is given, zone
/// classification as well. Work is spread across rayon workers.
pub fn analyze_directory(
    dir: &Path,
    config: &AnalysisConfig,
    min_stop: Duration,
    ftp: Option<u16>,
) -> Result<BatchSummary> {
    config.validate()?;
    let registry = DecoderRegistry::new();

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && registry.supports(path))
        .collect();
    files.sort();

    if files.is_empty() {
        warn!(dir = %dir.display(), "no decodable activity files found");
        return Ok(BatchSummary {
            total_files: 0,
            outcomes: Vec::new(),
            errors: Vec::new(),
        });
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let results: Vec<std::result::Result<FileOutcome, (PathBuf, String)>> = files
        .par_iter()
        .map(|path| {
            let outcome = analyze_file(path, config, min_stop, ftp);
            pb.inc(1);
            match outcome {
                Ok(outcome) => {
                    pb.println(format!(
                        "✓ {}: {} samples, {} stops",
                        path.display(),
                        outcome.samples,
                        outcome.stops
                    ));
                    Ok(outcome)
                }
                Err(e) => {
                    pb.println(format!("✗ {}: {}", path.display(), e.user_message()));
                    Err((path.clone(), e.to_string()))
                }
            }
        })
        .collect();
    pb.finish_with_message("batch complete");

    let mut outcomes = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) => errors.push(error),
        }
    }

    info!(
        total = files.len(),
        ok = outcomes.len(),
        failed = errors.len(),
        "batch analysis finished"
    );
    Ok(BatchSummary {
        total_files: files.len(),
        outcomes,
        errors,
    })
}

fn analyze_file(
    path: &Path,
    config: &AnalysisConfig,
    min_stop: Duration,
    ftp: Option<u16>,
) -> Result<FileOutcome> {
    let registry = DecoderRegistry::new();
    let samples = registry.decode_file(path)?;

    let segmenter = StopSegmenter::new(config)?;
    let stops = segmenter.segment(&samples, min_stop)?;

    let zone_time = match ftp {
        Some(ftp) => {
            let classifier = ZoneClassifier::new(config)?;
            Some(classifier.classify(&samples, ftp)?.total_time)
        }
        None => None,
    };

    Ok(FileOutcome {
        file_path: path.to_path_buf(),
        samples: samples.len(),
        stops: stops.len(),
        zone_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_activity(dir: &Path, name: &str, rows: &[&str]) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        writeln!(file, "timestamp,speed,distance,power").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
    }

    #[test]
    fn test_batch_isolates_per_file_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_activity(
            dir.path(),
            "good.csv",
            &[
                "2024-05-01T10:00:00Z,5.0,0.0,150",
                "2024-05-01T10:00:01Z,0.0,0.005,150",
                "2024-05-01T10:00:02Z,5.0,0.005,150",
            ],
        );
        write_activity(dir.path(), "bad.csv", &["garbage,,,"]);

        let summary = analyze_directory(
            dir.path(),
            &AnalysisConfig::default(),
            Duration::seconds(1),
            Some(200),
        )
        .unwrap();

        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.outcomes.len(), 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(!summary.is_fully_successful());

        let outcome = &summary.outcomes[0];
        assert_eq!(outcome.samples, 3);
        assert_eq!(outcome.stops, 1);
        assert_eq!(outcome.zone_time, Some(2));
    }

    #[test]
    fn test_empty_directory_yields_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = analyze_directory(
            dir.path(),
            &AnalysisConfig::default(),
            Duration::seconds(1),
            None,
        )
        .unwrap();
        assert_eq!(summary.total_files, 0);
        assert!(summary.is_fully_successful());
    }
}
