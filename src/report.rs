//! Table rendering for stop and zone results.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tabled::{settings::Style, Table, Tabled};

use crate::models::{Leg, Sample, Stop, Units};
use crate::zones::{zone_name, ZoneSummary};

#[derive(Tabled)]
struct StopRow {
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "Start time")]
    start: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "End time")]
    end: String,
    #[tabled(rename = "Dist")]
    distance: String,
    #[tabled(rename = "Leg speed")]
    leg_speed: String,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone: u8,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Percent")]
    percent: String,
}

/// Render the stop table, including the activity start row and the finish
/// leg from the last stop to the final sample.
pub fn render_stops(
    samples: &[Sample],
    stops: &[Stop],
    final_leg: Option<&Leg>,
    units: Units,
) -> String {
    let mut rows = Vec::with_capacity(stops.len() + 2);

    if let Some(first) = samples.first() {
        rows.push(StopRow {
            index: "Start".to_string(),
            start: format_time(first.timestamp),
            duration: "-".to_string(),
            end: "-".to_string(),
            distance: format_distance(first.distance),
            leg_speed: "-".to_string(),
        });
    }

    for stop in stops {
        rows.push(StopRow {
            index: stop.index.to_string(),
            start: format_time(stop.start_time),
            duration: format_hms(stop.duration),
            end: format_time(stop.end_time),
            distance: format_distance(stop.distance),
            leg_speed: format_speed(stop.leg_speed, units),
        });
    }

    if let Some(last) = samples.last() {
        rows.push(StopRow {
            index: "Finish".to_string(),
            start: format_time(last.timestamp),
            duration: "-".to_string(),
            end: "-".to_string(),
            distance: format_distance(last.distance),
            leg_speed: format_speed(final_leg.and_then(|leg| leg.speed), units),
        });
    }

    Table::new(rows).with(Style::sharp()).to_string()
}

/// Render the zone table with a totals line underneath.
pub fn render_zones(summary: &ZoneSummary) -> String {
    let rows: Vec<ZoneRow> = summary
        .zones
        .iter()
        .map(|zone| ZoneRow {
            zone: zone.index,
            name: zone_name(zone.index),
            band: format!("{}-{} W", zone.low, zone.high),
            time: format_hms(Duration::seconds(zone.time_in_zone)),
            percent: format!("{}%", zone.percent_in_zone),
        })
        .collect();

    let mut out = Table::new(rows).with(Style::sharp()).to_string();
    out.push_str(&format!(
        "\nTotal counted time: {}",
        format_hms(Duration::seconds(summary.total_time))
    ));
    if summary.excluded_intervals > 0 {
        out.push_str(&format!(
            " ({} gap-excluded intervals)",
            summary.excluded_intervals
        ));
    }
    out
}

fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_hms(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

fn format_distance(km: Decimal) -> String {
    format!("{} km", km.round_dp(1))
}

fn format_speed(speed: Option<Decimal>, units: Units) -> String {
    match speed {
        Some(speed) => format!("{} {}", speed.round_dp(1), units.speed_label()),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::segmenter::StopSegmenter;
    use crate::zones::ZoneClassifier;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_stop_table_has_start_and_finish_rows() {
        let samples = vec![
            Sample::new(ts(0), Some(dec!(10)), dec!(0.00), None),
            Sample::new(ts(1), Some(dec!(10)), dec!(0.01), None),
            Sample::new(ts(2), Some(dec!(0)), dec!(0.02), None),
            Sample::new(ts(3), Some(dec!(10)), dec!(0.02), None),
        ];
        let segmenter = StopSegmenter::new(&AnalysisConfig::default()).unwrap();
        let stops = segmenter.segment(&samples, Duration::seconds(1)).unwrap();
        let final_leg = segmenter.final_leg(&samples, &stops);

        let table = render_stops(&samples, &stops, final_leg.as_ref(), Units::Metric);
        assert!(table.contains("Start"));
        assert!(table.contains("Finish"));
        assert!(table.contains("km/h"));
    }

    #[test]
    fn test_zone_table_lists_all_zones() {
        let samples = vec![
            Sample::new(ts(0), None, dec!(0.0), Some(150)),
            Sample::new(ts(10), None, dec!(0.1), Some(150)),
        ];
        let classifier = ZoneClassifier::new(&AnalysisConfig::default()).unwrap();
        let summary = classifier.classify(&samples, 200).unwrap();

        let table = render_zones(&summary);
        assert!(table.contains("Sweet Spot"));
        assert!(table.contains("Neuromuscular Power"));
        assert!(table.contains("Total counted time: 0:00:10"));
    }

    #[test]
    fn test_hms_formatting() {
        assert_eq!(format_hms(Duration::seconds(0)), "0:00:00");
        assert_eq!(format_hms(Duration::seconds(75)), "0:01:15");
        assert_eq!(format_hms(Duration::seconds(3661)), "1:01:01");
    }
}
