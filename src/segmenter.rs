//! Stop detection, merging, and leg-speed analysis.
//!
//! The segmenter scans a telemetry stream for intervals where the athlete
//! stopped moving (zero or missing speed, or a recording gap), merges
//! adjacent and near-by candidates, filters by a caller-supplied minimum
//! duration, and derives the average travel speed of each leg between stops.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::config::{AnalysisConfig, MergeRules, SegmenterConfig};
use crate::error::{Result, RideSplitError};
use crate::models::{validate_stream, Leg, Sample, Stop, Units};

/// Detects stop intervals in a telemetry stream.
///
/// Pure and deterministic over an immutable snapshot of the stream; a fresh
/// stop list is produced per invocation.
pub struct StopSegmenter {
    config: SegmenterConfig,
    units: Units,
    max_samples: usize,
}

impl StopSegmenter {
    /// Build a segmenter from validated configuration.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.segmenter.clone(),
            units: config.units,
            max_samples: config.max_samples,
        })
    }

    /// Detect, merge, and filter stops, then derive leg speeds.
    ///
    /// `min_stop` is the selection threshold: only merged stops at least this
    /// long are reported (and later used as split points).
    pub fn segment(&self, samples: &[Sample], min_stop: Duration) -> Result<Vec<Stop>> {
        if samples.is_empty() {
            return Err(RideSplitError::EmptyInput);
        }
        if min_stop <= Duration::zero() {
            return Err(RideSplitError::InvalidConfiguration(format!(
                "stop selection duration must be positive, got {}s",
                min_stop.num_seconds()
            )));
        }
        validate_stream(samples, self.max_samples)?;

        let candidates = self.candidates(samples);
        let mut stops = self.merge(candidates);
        stops.retain(|stop| stop.duration >= min_stop);
        self.apply_leg_speeds(samples, &mut stops);

        debug!(stops = stops.len(), "stop segmentation complete");
        Ok(stops)
    }

    /// Walk the stream from the most recent sample backward and emit a stop
    /// candidate wherever the athlete was not demonstrably moving.
    ///
    /// A sample triggers when its speed is exactly zero, its speed is
    /// unknown, or the time to the next (more recent) sample reaches the
    /// configured gap threshold. The returned list is in chronological order.
    fn candidates(&self, samples: &[Sample]) -> Vec<Stop> {
        let gap = Duration::seconds(self.config.stop_gap_threshold);
        let mut last_timestamp = samples[samples.len() - 1].timestamp;
        let mut candidates = Vec::new();

        for (index, sample) in samples.iter().enumerate().rev() {
            let delta_t = last_timestamp - sample.timestamp;
            let stationary = sample.speed.map_or(true, |s| s == Decimal::ZERO);
            if stationary || delta_t >= gap {
                if !stationary {
                    debug!(
                        index,
                        gap_s = delta_t.num_seconds(),
                        "recording gap triggered stop candidate"
                    );
                }
                candidates.push(Stop {
                    index,
                    start_time: sample.timestamp,
                    duration: delta_t,
                    end_time: last_timestamp,
                    speed: sample.speed,
                    distance: sample.distance.round_dp(1),
                    leg_speed: None,
                });
            }
            last_timestamp = sample.timestamp;
        }

        candidates.reverse();
        candidates
    }

    /// Merge adjacent candidates under the active rules, building a new list
    /// rather than shifting elements in place.
    ///
    /// Each candidate is checked against the most recently merged stop, so a
    /// run of mergeable candidates cascades into one. Extending a stop only
    /// moves its `end_time` forward, so already-merged output is a fixpoint:
    /// re-running this pass is a no-op.
    pub(crate) fn merge(&self, candidates: Vec<Stop>) -> Vec<Stop> {
        let mut merged: Vec<Stop> = Vec::with_capacity(candidates.len());
        for stop in candidates {
            match merged.last_mut() {
                Some(prev) if self.should_merge(prev, &stop) => {
                    debug!(
                        prev_index = prev.index,
                        next_index = stop.index,
                        "merging adjacent stops"
                    );
                    prev.end_time = stop.end_time;
                    prev.duration = prev.end_time - prev.start_time;
                }
                _ => merged.push(stop),
            }
        }
        merged
    }

    fn should_merge(&self, prev: &Stop, next: &Stop) -> bool {
        let rules: &MergeRules = &self.config.merge_rules;
        if rules.contiguous_index && next.index == prev.index + 1 {
            return true;
        }
        if rules.shared_boundary && next.start_time == prev.end_time {
            return true;
        }
        if rules.distance_proximity
            && (next.distance - prev.distance).abs() <= self.config.merge_distance
        {
            return true;
        }
        false
    }

    /// Derive the average travel speed of the leg leading into each stop.
    ///
    /// Strictly sequential: each leg starts at the distance baseline left by
    /// the previous stop's end (the first sample for the first leg).
    fn apply_leg_speeds(&self, samples: &[Sample], stops: &mut [Stop]) {
        let first = &samples[0];
        let mut baseline_distance = first.distance;
        let mut previous_end = first.timestamp;

        for stop in stops.iter_mut() {
            let at_start = distance_at(samples, stop.start_time).unwrap_or(stop.distance);
            let leg_distance = at_start - baseline_distance;
            let leg_duration = stop.start_time - previous_end;
            stop.leg_speed = self.leg_speed(leg_distance, leg_duration);

            baseline_distance = distance_at(samples, stop.end_time).unwrap_or(at_start);
            previous_end = stop.end_time;
        }
    }

    /// The conceptual finish leg from the last stop's end to the final
    /// sample. Reported by the renderer, never stored as a `Stop`.
    pub fn final_leg(&self, samples: &[Sample], stops: &[Stop]) -> Option<Leg> {
        let last = samples.last()?;
        let (from_time, from_distance) = match stops.last() {
            Some(stop) => (stop.end_time, distance_at(samples, stop.end_time)?),
            None => {
                let first = samples.first()?;
                (first.timestamp, first.distance)
            }
        };

        let duration = last.timestamp - from_time;
        let distance = last.distance - from_distance;
        Some(Leg {
            distance,
            duration,
            speed: self.leg_speed(distance, duration),
        })
    }

    /// Leg speed in the display unit; `None` for a zero-duration leg.
    fn leg_speed(&self, distance_km: Decimal, duration: Duration) -> Option<Decimal> {
        let secs = duration.num_seconds();
        if secs <= 0 {
            debug!("zero-duration leg, speed undefined");
            return None;
        }
        let kmh = distance_km * dec!(3600) / Decimal::from(secs);
        Some(self.units.speed_from_kmh(kmh))
    }
}

/// Cumulative distance at the first sample whose timestamp is not before
/// `timestamp`, in kilometers.
fn distance_at(samples: &[Sample], timestamp: DateTime<Utc>) -> Option<Decimal> {
    samples
        .iter()
        .find(|sample| sample.timestamp >= timestamp)
        .map(|sample| sample.distance)
}
