use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RideSplitError};

/// A single telemetry sample from an activity recording.
///
/// Samples are owned by the stream and immutable once decoded. Timestamps are
/// monotonically non-decreasing across a valid stream, and `distance` is the
/// cumulative distance in kilometers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Absolute timestamp of the sample
    pub timestamp: DateTime<Utc>,

    /// Instantaneous speed in meters per second, if the device reported one
    pub speed: Option<Decimal>,

    /// Cumulative distance in kilometers
    pub distance: Decimal,

    /// Power output in watts, if a power meter was present
    pub power: Option<u16>,
}

impl Sample {
    pub fn new(
        timestamp: DateTime<Utc>,
        speed: Option<Decimal>,
        distance: Decimal,
        power: Option<u16>,
    ) -> Self {
        Self {
            timestamp,
            speed,
            distance,
            power,
        }
    }
}

/// A detected interval where the athlete stopped moving.
///
/// Produced by the segmenter per invocation; mutated only during the merge
/// pass, then frozen. Stops are ordered by increasing `start_time` and do not
/// overlap after merging.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Index of the sample that triggered this stop
    pub index: usize,

    /// Timestamp of the triggering sample
    pub start_time: DateTime<Utc>,

    /// Length of the stop (`end_time - start_time` after merging)
    pub duration: Duration,

    /// Timestamp at which motion resumed
    pub end_time: DateTime<Utc>,

    /// Speed reported at the triggering sample, if any
    pub speed: Option<Decimal>,

    /// Cumulative distance at the stop in kilometers, one decimal place
    pub distance: Decimal,

    /// Average travel speed over the leg leading into this stop, in the
    /// caller's display unit. `None` for a zero-duration leg.
    pub leg_speed: Option<Decimal>,
}

/// A power-training zone with the elapsed time classified into it.
///
/// Bounds are absolute watts derived from the breakpoint table and the
/// caller's FTP. Zone 4 (sweet spot) intentionally overlaps its neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerZone {
    /// Zone index, 0..=8
    pub index: u8,

    /// Lower bound in watts (inclusive)
    pub low: u16,

    /// Upper bound in watts (inclusive)
    pub high: u16,

    /// Seconds of counted elapsed time spent inside this zone
    pub time_in_zone: i64,

    /// `time_in_zone` as a rounded percentage of the counted total
    pub percent_in_zone: u32,
}

/// Travel segment between two consecutive stops (or activity start/end).
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// Distance covered in kilometers
    pub distance: Decimal,

    /// Elapsed time of the leg
    pub duration: Duration,

    /// Average speed in the caller's display unit; `None` when the leg has
    /// zero duration
    pub speed: Option<Decimal>,
}

/// Unit preferences for displayed speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Default for Units {
    fn default() -> Self {
        Units::Metric
    }
}

impl Units {
    /// Label for displayed speeds
    pub fn speed_label(&self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "mph",
        }
    }

    /// Convert a speed expressed in km/h to this unit system.
    pub fn speed_from_kmh(&self, kmh: Decimal) -> Decimal {
        match self {
            Units::Metric => kmh,
            Units::Imperial => kmh * rust_decimal_macros::dec!(0.62137119),
        }
    }
}

/// Validate the shared stream preconditions both analyses rely on.
///
/// Timestamps must be monotonically non-decreasing; streams above
/// `max_samples` are rejected before scanning.
pub fn validate_stream(samples: &[Sample], max_samples: usize) -> Result<()> {
    if samples.len() > max_samples {
        return Err(RideSplitError::Validation(format!(
            "stream has {} samples, exceeding the configured bound of {}",
            samples.len(),
            max_samples
        )));
    }

    for (index, pair) in samples.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(RideSplitError::UnsortedInput { index: index + 1 });
        }
    }

    Ok(())
}
