// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tracks: the annotations bound to one playable source.

use crate::annotation::{Annotation, DisplayId, Overlay};
/// Ordered annotations for one media source.
///
/// A track starts out raw, in whatever order the caller supplied. Scheduling
/// requires a prepared track: sorted ascending by start time, with each
/// annotation's [`DisplayId`] equal to its index.
#[derive(Debug)]
pub struct Track<O> {
    annotations: Vec<Annotation<O>>,
    /// `max_end[i]` is the largest end time among `annotations[..=i]`
    max_end: Vec<f64>,
    prepared: bool,
}

impl<O: Overlay> Track<O> {
    /// Create an unprepared track
    pub fn new(annotations: Vec<Annotation<O>>) -> Self {
        Self {
            annotations,
            max_end: Vec::new(),
            prepared: false,
        }
    }

    /// Create and prepare a track in one step
    pub fn prepared(annotations: Vec<Annotation<O>>) -> Self {
        let mut track = Self::new(annotations);
        track.prepare();
        track
    }

    /// Stable-sort by start time and assign display IDs in sorted order.
    ///
    /// Equal start times keep their relative input order. Calling this twice
    /// is harmless.
    pub fn prepare(&mut self) {
        if self.prepared {
            return;
        }

        self.annotations
            .sort_by(|a, b| a.start_time().total_cmp(&b.start_time()));

        let mut running = f64::NEG_INFINITY;
        self.max_end.clear();
        self.max_end.reserve(self.annotations.len());
        for (i, annotation) in self.annotations.iter_mut().enumerate() {
            annotation.assign_display_id(DisplayId(i));
            running = running.max(annotation.end_time());
            self.max_end.push(running);
        }

        self.prepared = true;
    }

    /// Containment predicate by index. Out-of-range indices never contain `time`.
    pub fn contains_at(&self, index: usize, time: f64) -> bool {
        self.annotations
            .get(index)
            .is_some_and(|a| a.contains(time))
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Annotation<O>> {
        self.annotations.get_mut(index)
    }
}

impl<O> Track<O> {
    /// Whether [`Track::prepare`] has run
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Annotation at a position
    pub fn get(&self, index: usize) -> Option<&Annotation<O>> {
        self.annotations.get(index)
    }

    /// All annotations, in sorted order once prepared
    pub fn annotations(&self) -> &[Annotation<O>] {
        &self.annotations
    }

    /// Annotation count
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the track has no annotations
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Number of leading annotations with `start_time <= time`. Requires a prepared track.
    pub fn started_by(&self, time: f64) -> usize {
        self.annotations.partition_point(|a| a.start_time() <= time)
    }

    /// Largest end time among the first `index + 1` annotations
    pub fn max_end_through(&self, index: usize) -> Option<f64> {
        self.max_end.get(index).copied()
    }

    /// Latest end time in the track
    pub fn span(&self) -> f64 {
        self.max_end.last().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Overlay for Noop {
        fn show(&mut self) {}
        fn hide(&mut self) {}
    }

    fn annotation(start: f64, end: f64, label: &str) -> Annotation<Noop> {
        Annotation::new(start, end, Noop).with_label(label)
    }

    #[test]
    fn test_prepare_sorts_and_assigns_ids() {
        let track = Track::prepared(vec![
            annotation(5.0, 6.0, "c"),
            annotation(1.0, 2.0, "a"),
            annotation(3.0, 9.0, "b"),
        ]);

        assert!(track.is_prepared());
        for (i, a) in track.annotations().iter().enumerate() {
            assert_eq!(a.display_id(), Some(DisplayId(i)));
        }
        for pair in track.annotations().windows(2) {
            assert!(pair[0].start_time() <= pair[1].start_time());
        }
        let labels: Vec<_> = track.annotations().iter().filter_map(|a| a.label()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn test_prepare_is_stable() {
        let track = Track::prepared(vec![
            annotation(2.0, 3.0, "first"),
            annotation(1.0, 3.0, "early"),
            annotation(2.0, 4.0, "second"),
            annotation(2.0, 5.0, "third"),
        ]);

        let labels: Vec<_> = track.annotations().iter().filter_map(|a| a.label()).collect();
        assert_eq!(labels, ["early", "first", "second", "third"]);
    }

    #[test]
    fn test_unprepared_track_has_no_ids() {
        let track = Track::new(vec![annotation(0.0, 1.0, "x")]);
        assert!(!track.is_prepared());
        assert_eq!(track.get(0).and_then(Annotation::display_id), None);
    }

    #[test]
    fn test_contains_at_out_of_range() {
        let track = Track::prepared(vec![annotation(0.0, 10.0, "x")]);
        assert!(track.contains_at(0, 5.0));
        assert!(!track.contains_at(1, 5.0));
        assert!(!track.contains_at(usize::MAX, 5.0));
    }

    #[test]
    fn test_prefix_max_end() {
        let track = Track::prepared(vec![
            annotation(0.0, 8.0, "long"),
            annotation(1.0, 2.0, "short"),
            annotation(3.0, 4.0, "late"),
        ]);

        assert_eq!(track.max_end_through(0), Some(8.0));
        assert_eq!(track.max_end_through(2), Some(8.0));
        assert_eq!(track.max_end_through(3), None);
        assert_eq!(track.span(), 8.0);
        assert_eq!(track.started_by(1.0), 2);
        assert_eq!(track.started_by(-1.0), 0);
        assert_eq!(track.started_by(100.0), 3);
    }
}
