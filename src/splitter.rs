//! Splitting an activity recording into sub-activities at detected stops.
//!
//! The splitter partitions the sample stream into `stops + 1` contiguous
//! sub-sequences, cut immediately after each stop's ending index, and hands
//! each in order to an encoder collaborator. Concatenating the sub-sequences
//! reproduces the original stream exactly.

use tracing::info;

use crate::error::{Result, RideSplitError};
use crate::export::ActivityEncoder;
use crate::models::{Sample, Stop};

/// Partition `samples` into contiguous slices, one cut after each stop.
///
/// Returns `stops.len() + 1` slices; the trailing slice may be empty when the
/// final stop ends at the last sample. Stop indices must be strictly
/// increasing and within the stream.
pub fn split<'a>(samples: &'a [Sample], stops: &[Stop]) -> Result<Vec<&'a [Sample]>> {
    if samples.is_empty() {
        return Err(RideSplitError::EmptyInput);
    }

    let mut previous = None;
    for stop in stops {
        if stop.index >= samples.len() {
            return Err(RideSplitError::Validation(format!(
                "stop index {} outside stream of {} samples",
                stop.index,
                samples.len()
            )));
        }
        if let Some(previous) = previous {
            if stop.index <= previous {
                return Err(RideSplitError::Validation(format!(
                    "stop indices must be strictly increasing, got {} after {}",
                    stop.index, previous
                )));
            }
        }
        previous = Some(stop.index);
    }

    let mut segments = Vec::with_capacity(stops.len() + 1);
    let mut start = 0;
    for stop in stops {
        segments.push(&samples[start..=stop.index]);
        start = stop.index + 1;
    }
    segments.push(&samples[start..]);
    Ok(segments)
}

/// Split the stream and hand each sub-sequence, in order, to the encoder.
///
/// Segment names carry a deterministic zero-based suffix on `base_name`. The
/// encoder recomputes per-segment summary metadata itself; that is its
/// contract, not the splitter's. Returns the encoded segment names.
pub fn split_activity(
    samples: &[Sample],
    stops: &[Stop],
    base_name: &str,
    encoder: &dyn ActivityEncoder,
) -> Result<Vec<String>> {
    let segments = split(samples, stops)?;

    let mut names = Vec::with_capacity(segments.len());
    for (ordinal, segment) in segments.iter().enumerate() {
        let name = format!("{}_{}", base_name, ordinal);
        encoder.encode(segment, &name)?;
        names.push(name);
    }

    info!(
        segments = names.len(),
        base = base_name,
        "split activity into sub-activities"
    );
    Ok(names)
}
