// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synthetic annotation data.
//!
//! Produces a random number of annotations whose start times are spread at an
//! equal interval over the source duration, in shuffled order, each ending
//! somewhere between one interval later and the end of the source. This is the
//! near-uniform distribution the proportional search strategy expects.

use cuesync_core::AnnotationSpec;
use rand::seq::SliceRandom;
use rand::Rng;

/// Upper bound (exclusive) on generated annotations per track
pub const MAX_GENERATED_ANNOTATIONS: usize = 200;

/// Round to hundredths of a second
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate annotations for a source of `duration` seconds.
///
/// At most `limit.min(MAX_GENERATED_ANNOTATIONS) - 1` annotations are produced.
pub fn generate_track<R: Rng>(rng: &mut R, duration: f64, limit: usize) -> Vec<AnnotationSpec> {
    let cap = limit.min(MAX_GENERATED_ANNOTATIONS);
    if cap == 0 || !(duration.is_finite() && duration > 0.0) {
        return Vec::new();
    }

    let total = rng.random_range(0..cap);
    if total == 0 {
        return Vec::new();
    }

    let mut slots: Vec<usize> = (0..total).collect();
    slots.shuffle(rng);

    let interval = round2(duration / total as f64).max(0.01);
    let mut annotations = Vec::with_capacity(total);
    for slot in slots {
        let offset = slot as f64 * interval;
        let start_time = if offset > duration {
            round2(duration - interval)
        } else {
            round2(offset)
        };
        let end_time = if start_time + interval > duration {
            round2(duration)
        } else {
            round2(rng.random_range(start_time + interval..=duration))
        };

        if end_time > start_time && start_time >= 0.0 {
            let label = format!("cue-{slot}");
            annotations.push(AnnotationSpec::new(start_time, end_time).with_label(label));
        }
    }

    annotations
}
