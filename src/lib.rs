// Library interface for RideSplit modules
// This allows integration tests to access the core functionality

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod report;
pub mod segmenter;
pub mod splitter;
pub mod zones;

// Re-export commonly used types for convenience
pub use models::{Leg, PowerZone, Sample, Stop, Units};
pub use segmenter::StopSegmenter;
pub use splitter::{split, split_activity};
pub use zones::{ZoneClassifier, ZoneSummary};
pub use config::{AnalysisConfig, MergeRules, SegmenterConfig, ZoneConfig};
pub use error::{DecodeError, EncodeError, Result, RideSplitError};
pub use logging::{LogConfig, LogFormat, LogLevel};
