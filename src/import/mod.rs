//! Telemetry decoders producing the sample stream from activity files.
//!
//! Decoders are collaborators at the analysis boundary: they own all file
//! format concerns and hand the analyses an ordered, immutable `Vec<Sample>`.

use std::path::Path;
use tracing::info;

use crate::error::{DecodeError, Result};
use crate::models::Sample;

pub mod csv;
pub mod fit;

/// Trait for decoding telemetry samples from different file formats
pub trait TelemetryDecoder {
    /// Check if this decoder can handle the given file
    fn can_decode(&self, path: &Path) -> bool;

    /// Decode the sample stream from the file
    fn decode(&self, path: &Path) -> Result<Vec<Sample>>;

    /// Get the format name for this decoder
    fn format_name(&self) -> &'static str;
}

/// Registry coordinating the available decoders with format auto-detection
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn TelemetryDecoder>>,
}

impl DecoderRegistry {
    /// Create a registry with all available decoders
    pub fn new() -> Self {
        let decoders: Vec<Box<dyn TelemetryDecoder>> = vec![
            Box::new(fit::FitDecoder::new()),
            Box::new(csv::CsvDecoder::new()),
        ];
        Self { decoders }
    }

    /// Decode a single file, auto-detecting the format.
    pub fn decode_file(&self, path: &Path) -> Result<Vec<Sample>> {
        if !path.exists() {
            return Err(DecodeError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        for decoder in &self.decoders {
            if decoder.can_decode(path) {
                info!(
                    file = %path.display(),
                    format = decoder.format_name(),
                    "decoding telemetry"
                );
                return decoder.decode(path);
            }
        }

        Err(DecodeError::UnsupportedFormat {
            path: path.to_path_buf(),
        }
        .into())
    }

    /// Whether any decoder recognizes the file extension.
    pub fn supports(&self, path: &Path) -> bool {
        self.decoders.iter().any(|d| d.can_decode(path))
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_registry_supports_known_extensions() {
        let registry = DecoderRegistry::new();
        assert!(registry.supports(Path::new("ride.fit")));
        assert!(registry.supports(Path::new("ride.csv")));
        assert!(!registry.supports(Path::new("ride.gpx")));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let registry = DecoderRegistry::new();
        let result = registry.decode_file(&PathBuf::from("/nonexistent/ride.csv"));
        assert!(matches!(
            result,
            Err(crate::error::RideSplitError::Decode(
                DecodeError::FileNotFound { .. }
            ))
        ));
    }
}
