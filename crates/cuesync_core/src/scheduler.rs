// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visibility scheduling.
//!
//! Each tick reconciles the display state of one prepared track against the
//! current playback time:
//! - a hide pass over what is currently shown
//! - a show pass that scans the neighbourhood of the current time instead of
//!   scanning the whole track
//!
//! After a successful tick the display state holds exactly the annotations
//! whose window contains the time (for [`SearchStrategy::Proportional`], under
//! its distribution assumption).

use crate::annotation::Overlay;
use crate::config::SearchStrategy;
use crate::display::DisplayState;
use crate::error::SyncError;
use crate::track::Track;

/// What a single tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Annotations shown this tick
    pub shown: usize,
    /// Annotations hidden this tick
    pub hidden: usize,
    /// Annotations examined by the show pass
    pub visited: usize,
}

impl TickReport {
    /// Whether the tick changed anything on screen
    pub fn changed(&self) -> bool {
        self.shown > 0 || self.hidden > 0
    }
}

/// Incremental show/hide scheduler for a single track
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityScheduler {
    strategy: SearchStrategy,
}

impl VisibilityScheduler {
    /// Create a scheduler using `strategy` for the show pass
    pub fn new(strategy: SearchStrategy) -> Self {
        Self { strategy }
    }

    /// Bring `display` in line with the annotations of `track` that contain `time`.
    ///
    /// `duration` is the length of the active source; only the proportional
    /// strategy uses it.
    pub fn reconcile<O: Overlay>(
        &self,
        track: &mut Track<O>,
        display: &mut DisplayState,
        time: f64,
        duration: f64,
    ) -> Result<TickReport, SyncError> {
        let mut report = TickReport {
            hidden: Self::hide_pass(track, display, time),
            ..TickReport::default()
        };

        match self.strategy {
            SearchStrategy::Proportional => {
                let start = estimate_index(track.len(), time, duration);

                let mut index = start;
                while track.contains_at(index, time) {
                    report.visited += 1;
                    report.shown += usize::from(show(track, display, index)?);
                    index += 1;
                }

                let mut index = start;
                while index > 0 && track.contains_at(index - 1, time) {
                    index -= 1;
                    report.visited += 1;
                    report.shown += usize::from(show(track, display, index)?);
                }
            }
            SearchStrategy::Bounded => {
                let mut index = track.started_by(time);
                while index > 0
                    && track
                        .max_end_through(index - 1)
                        .is_some_and(|end| end > time)
                {
                    index -= 1;
                    report.visited += 1;
                    if track.contains_at(index, time) {
                        report.shown += usize::from(show(track, display, index)?);
                    }
                }
            }
        }

        if report.changed() {
            let visible = display.len();
            tracing::debug!(
                time,
                shown = report.shown,
                hidden = report.hidden,
                visible,
                "Reconciled annotations"
            );
        }

        Ok(report)
    }

    /// Hide and forget every shown annotation that no longer contains `time`
    fn hide_pass<O: Overlay>(
        track: &mut Track<O>,
        display: &mut DisplayState,
        time: f64,
    ) -> usize {
        let expired: Vec<_> = display
            .display_ids()
            .filter(|id| !track.contains_at(id.index(), time))
            .collect();

        for display_id in &expired {
            display.remove(*display_id);
            if let Some(annotation) = track.get_mut(display_id.index()) {
                let index = display_id.index();
                tracing::trace!(id = ?annotation.id(), display_id = index, time, "hide");
                annotation.hide();
            }
        }

        expired.len()
    }
}

/// Proportional guess at where annotations active at `time` sit in a track of `len`
pub fn estimate_index(len: usize, time: f64, duration: f64) -> usize {
    if !(duration.is_finite() && duration > 0.0) || !time.is_finite() {
        return 0;
    }
    let progress = (time / duration).clamp(0.0, 1.0);
    ((len as f64 * progress).floor() as usize).min(len)
}

/// Show the annotation at `index` if it is not shown yet. Returns whether it was shown.
fn show<O: Overlay>(
    track: &mut Track<O>,
    display: &mut DisplayState,
    index: usize,
) -> Result<bool, SyncError> {
    let Some(annotation) = track.get_mut(index) else {
        return Ok(false);
    };
    let display_id = annotation
        .display_id()
        .ok_or(SyncError::MissingDisplayId { index })?;

    if !display.insert(display_id, annotation.id()) {
        return Ok(false);
    }
    tracing::trace!(id = ?annotation.id(), display_id = display_id.index(), "show");
    annotation.show();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, DisplayId};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Show(usize),
        Hide(usize),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    #[derive(Debug)]
    struct Recorder {
        tag: usize,
        log: Log,
    }

    impl Overlay for Recorder {
        fn show(&mut self) {
            self.log.borrow_mut().push(Call::Show(self.tag));
        }

        fn hide(&mut self) {
            self.log.borrow_mut().push(Call::Hide(self.tag));
        }
    }

    /// Build a track from `(start, end)` pairs; each overlay is tagged with its input position
    fn track(windows: &[(f64, f64)], log: &Log) -> Track<Recorder> {
        Track::new(
            windows
                .iter()
                .enumerate()
                .map(|(tag, &(start, end))| {
                    let log = log.clone();
                    Annotation::new(start, end, Recorder { tag, log })
                })
                .collect(),
        )
    }

    /// Evenly spread windows: annotation `i` covers `[i, i + width)`
    fn even_windows(count: usize, width: f64) -> Vec<(f64, f64)> {
        (0..count).map(|i| (i as f64, i as f64 + width)).collect()
    }

    fn expected_visible<O>(track: &Track<O>, time: f64) -> Vec<DisplayId> {
        let mut ids: Vec<_> = track
            .annotations()
            .iter()
            .filter(|a| a.start_time() <= time && time < a.end_time())
            .filter_map(Annotation::display_id)
            .collect();
        ids.sort();
        ids
    }

    fn visible(display: &DisplayState) -> Vec<DisplayId> {
        let mut ids: Vec<_> = display.display_ids().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_estimate_index() {
        assert_eq!(estimate_index(10, 5.0, 10.0), 5);
        assert_eq!(estimate_index(10, 0.0, 10.0), 0);
        assert_eq!(estimate_index(10, 10.0, 10.0), 10);
        assert_eq!(estimate_index(10, 15.0, 10.0), 10);
        assert_eq!(estimate_index(10, -1.0, 10.0), 0);
        assert_eq!(estimate_index(10, 5.0, 0.0), 0);
        assert_eq!(estimate_index(10, 5.0, f64::NAN), 0);
        assert_eq!(estimate_index(0, 5.0, 10.0), 0);
    }

    #[test]
    fn test_single_annotation_lifecycle() {
        let log = Log::default();
        let mut track = track(&[(1.0, 3.0)], &log);
        track.prepare();
        let mut display = DisplayState::new();
        let scheduler = VisibilityScheduler::default();

        scheduler.reconcile(&mut track, &mut display, 0.5, 10.0).unwrap();
        assert!(log.borrow().is_empty());

        let report = scheduler.reconcile(&mut track, &mut display, 1.5, 10.0).unwrap();
        assert_eq!(report.shown, 1);
        assert!(display.contains(DisplayId(0)));

        let report = scheduler.reconcile(&mut track, &mut display, 3.5, 10.0).unwrap();
        assert_eq!(report.hidden, 1);
        assert!(display.is_empty());

        assert_eq!(*log.borrow(), vec![Call::Show(0), Call::Hide(0)]);
    }

    #[test]
    fn test_first_display_id_is_shown() {
        let log = Log::default();
        let mut track = track(&[(0.0, 2.0), (5.0, 6.0)], &log);
        track.prepare();
        let mut display = DisplayState::new();

        VisibilityScheduler::default()
            .reconcile(&mut track, &mut display, 0.1, 10.0)
            .unwrap();
        assert_eq!(visible(&display), vec![DisplayId(0)]);
    }

    #[test]
    fn test_unprepared_track_is_rejected() {
        let log = Log::default();
        let mut track = track(&[(0.0, 5.0)], &log);
        let mut display = DisplayState::new();

        let err = VisibilityScheduler::default()
            .reconcile(&mut track, &mut display, 1.0, 10.0)
            .unwrap_err();
        assert_eq!(err, SyncError::MissingDisplayId { index: 0 });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_containment_over_forward_playback() {
        for strategy in [SearchStrategy::Proportional, SearchStrategy::Bounded] {
            let log = Log::default();
            let mut track = track(&even_windows(40, 2.5), &log);
            track.prepare();
            let mut display = DisplayState::new();
            let scheduler = VisibilityScheduler::new(strategy);

            let mut time = 0.05;
            while time < 40.0 {
                scheduler.reconcile(&mut track, &mut display, time, 40.0).unwrap();
                assert_eq!(
                    visible(&display),
                    expected_visible(&track, time),
                    "{} at t={time}",
                    strategy.name()
                );
                time += 0.37;
            }
        }
    }

    #[test]
    fn test_bounded_handles_skewed_start_times() {
        let log = Log::default();
        // Everything starts in the first second, one window spans the whole source
        let mut windows: Vec<_> = (0..30)
            .map(|i| (i as f64 * 0.03, 1.5 + i as f64 * 0.1))
            .collect();
        windows.push((0.5, 60.0));
        let mut track = track(&windows, &log);
        track.prepare();
        let mut display = DisplayState::new();
        let scheduler = VisibilityScheduler::new(SearchStrategy::Bounded);

        for time in [0.0, 0.2, 0.9, 1.7, 2.6, 3.3, 4.4, 10.0, 45.0, 59.9, 60.0] {
            scheduler.reconcile(&mut track, &mut display, time, 60.0).unwrap();
            assert_eq!(visible(&display), expected_visible(&track, time), "t={time}");
        }
    }

    #[test]
    fn test_show_at_most_once() {
        let log = Log::default();
        let mut track = track(&even_windows(10, 3.0), &log);
        track.prepare();
        let mut display = DisplayState::new();
        let scheduler = VisibilityScheduler::default();

        for step in 0..100 {
            let time = step as f64 * 0.1;
            scheduler.reconcile(&mut track, &mut display, time, 10.0).unwrap();
        }

        let mut open = [false; 10];
        for call in log.borrow().iter() {
            match *call {
                Call::Show(tag) => {
                    assert!(!open[tag], "annotation {tag} shown twice");
                    open[tag] = true;
                }
                Call::Hide(tag) => {
                    assert!(open[tag], "annotation {tag} hidden while not shown");
                    open[tag] = false;
                }
            }
        }
    }

    #[test]
    fn test_same_time_is_idempotent() {
        let log = Log::default();
        let mut track = track(&even_windows(10, 3.0), &log);
        track.prepare();
        let mut display = DisplayState::new();
        let scheduler = VisibilityScheduler::default();

        let first = scheduler.reconcile(&mut track, &mut display, 4.2, 10.0).unwrap();
        assert_eq!(first.shown, 3);
        let calls = log.borrow().len();

        for _ in 0..5 {
            let report = scheduler.reconcile(&mut track, &mut display, 4.2, 10.0).unwrap();
            assert!(!report.changed());
        }
        assert_eq!(log.borrow().len(), calls);
    }

    #[test]
    fn test_hide_pass_ignores_search_window() {
        let log = Log::default();
        let mut track = track(&[(0.0, 1.0), (0.5, 9.0), (8.0, 9.5)], &log);
        track.prepare();
        let mut display = DisplayState::new();
        let scheduler = VisibilityScheduler::new(SearchStrategy::Bounded);

        scheduler.reconcile(&mut track, &mut display, 0.7, 10.0).unwrap();
        assert_eq!(display.len(), 2);

        // Jump past everything: the hide pass alone must clear the state
        let report = scheduler.reconcile(&mut track, &mut display, 9.8, 10.0).unwrap();
        assert_eq!(report.hidden, 2);
        assert!(display.is_empty());
    }
}
