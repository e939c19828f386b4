//! Property tests for activity splitting.
//!
//! Whatever the stop positions, concatenating the split segments must
//! reproduce the original stream sample for sample.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use ridesplit::splitter::split;
use ridesplit::Sample;

fn stream_strategy() -> impl Strategy<Value = Vec<Sample>> {
    // Strictly increasing timestamps built from positive step sizes.
    prop::collection::vec((1i64..30, 0u16..400, prop::option::of(0u32..1500)), 2..80).prop_map(
        |rows| {
            let mut t = 1_715_000_000i64;
            let mut distance = Decimal::ZERO;
            rows.into_iter()
                .map(|(step, power, speed_cms)| {
                    t += step;
                    distance += Decimal::new(step * 5, 3);
                    Sample::new(
                        Utc.timestamp_opt(t, 0).unwrap(),
                        speed_cms.map(|s| Decimal::new(i64::from(s), 2)),
                        distance,
                        Some(power),
                    )
                })
                .collect()
        },
    )
}

fn cut_points(len: usize) -> impl Strategy<Value = Vec<usize>> {
    // Stop indices must be strictly increasing and leave room for a
    // sample after the last cut.
    prop::collection::btree_set(0..len - 1, 0..4.min(len - 1))
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn split_segments_reassemble_to_original(
        (samples, stops) in stream_strategy().prop_flat_map(|samples| {
            let len = samples.len();
            (Just(samples), cut_points(len))
        })
    ) {
        let stop_markers: Vec<ridesplit::Stop> = stops
            .iter()
            .map(|&index| ridesplit::Stop {
                index,
                start_time: samples[index].timestamp,
                duration: chrono::Duration::seconds(1),
                end_time: samples[index].timestamp + chrono::Duration::seconds(1),
                speed: samples[index].speed,
                distance: samples[index].distance,
                leg_speed: None,
            })
            .collect();

        let segments = split(&samples, &stop_markers).unwrap();
        prop_assert_eq!(segments.len(), stops.len() + 1);

        // Every segment except possibly the last is non-empty, and the
        // pieces concatenate back to the input.
        for segment in &segments[..segments.len() - 1] {
            prop_assert!(!segment.is_empty());
        }
        let rejoined: Vec<Sample> = segments.concat();
        prop_assert_eq!(rejoined, samples);
    }
}
