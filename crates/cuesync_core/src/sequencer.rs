// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequential playback of tracks and the session that ties everything together.
//!
//! | State        | Event        | Action                                      | Next           |
//! |--------------|--------------|---------------------------------------------|----------------|
//! | `Playing(i)` | `TimeUpdate` | skip first after attach, else reconcile `i` | `Playing(i)`   |
//! | `Playing(i)` | `Ended`      | last track: force-clear display state       | `Ended`        |
//! | `Playing(i)` | `Ended`      | else retire display, attach next, autoplay  | `Playing(i+1)` |
//! | `Ended`      | any          | nothing                                     | `Ended`        |

use crate::annotation::{Annotation, AnnotationId, DisplayId, Overlay};
use crate::config::SyncConfig;
use crate::display::DisplayState;
use crate::error::SyncError;
use crate::scheduler::{TickReport, VisibilityScheduler};
use crate::track::Track;

/// Playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Playing the track at this index
    Playing(usize),
    /// The final track finished; nothing more is scheduled
    Ended,
}

impl PlaybackState {
    /// Index of the active track, if still playing
    pub fn track_index(&self) -> Option<usize> {
        match self {
            Self::Playing(index) => Some(*index),
            Self::Ended => None,
        }
    }

    /// Check if playback has finished
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// Notifications emitted by a media element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// The playback time advanced
    TimeUpdate,
    /// The attached source finished playing
    Ended,
}

/// The playback element a session is attached to
pub trait MediaElement<S> {
    /// Current playback position of the attached source, in seconds
    fn current_time(&self) -> f64;

    /// Duration of the attached source, in seconds
    fn duration(&self) -> f64;

    /// Load `source`, replacing whatever was attached
    fn attach(&mut self, source: &S);

    /// Start playback as soon as the attached source is ready
    fn set_autoplay(&mut self, autoplay: bool);
}

/// Result of handling one media event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The update was the zero-time update after an attach and was ignored
    Skipped,
    /// A tick ran
    Tick(TickReport),
    /// Playback moved on to the track at this index
    Advanced(usize),
    /// The final track finished
    Finished,
    /// Playback had already ended; nothing happened
    Idle,
}

/// Annotations, sources and display state for one playlist.
///
/// Tracks play strictly one after another. Only the active track is ever
/// scheduled, and only through `&mut self`, so a tick always runs to
/// completion before the next event is handled.
#[derive(Debug)]
pub struct AnnotationSession<O, S> {
    tracks: Vec<Track<O>>,
    sources: Vec<S>,
    state: PlaybackState,
    display: DisplayState,
    /// Entries left over from a finished track, hidden on the next real tick
    retired: Vec<(usize, DisplayId, AnnotationId)>,
    scheduler: VisibilityScheduler,
    awaiting_first_update: bool,
    config: SyncConfig,
}

impl<O: Overlay, S> AnnotationSession<O, S> {
    /// Validate and prepare the playlist, then attach the first source to `element`.
    pub fn new<M: MediaElement<S>>(
        tracks: Vec<Vec<Annotation<O>>>,
        sources: Vec<S>,
        config: SyncConfig,
        element: &mut M,
    ) -> Result<Self, SyncError> {
        validate(&tracks, sources.len(), &config)?;

        let tracks: Vec<_> = tracks.into_iter().map(Track::prepared).collect();
        tracing::info!(
            tracks = tracks.len(),
            annotations = tracks.iter().map(Track::len).sum::<usize>(),
            strategy = config.search_strategy.name(),
            "Prepared annotation session"
        );

        element.attach(&sources[0]);

        Ok(Self {
            tracks,
            sources,
            state: PlaybackState::Playing(0),
            display: DisplayState::new(),
            retired: Vec::new(),
            scheduler: VisibilityScheduler::new(config.search_strategy),
            awaiting_first_update: config.skip_first_update,
            config,
        })
    }

    /// Dispatch a media event
    pub fn handle<M: MediaElement<S>>(
        &mut self,
        event: MediaEvent,
        element: &mut M,
    ) -> Result<EventOutcome, SyncError> {
        match event {
            MediaEvent::TimeUpdate => self.on_time_update(&*element),
            MediaEvent::Ended => Ok(self.on_ended(element)),
        }
    }

    /// Handle a time update from `element`
    pub fn on_time_update<M: MediaElement<S>>(
        &mut self,
        element: &M,
    ) -> Result<EventOutcome, SyncError> {
        let PlaybackState::Playing(index) = self.state else {
            tracing::trace!("Time update after playback ended");
            return Ok(EventOutcome::Idle);
        };

        if self.awaiting_first_update {
            self.awaiting_first_update = false;
            tracing::trace!(track = index, "Skipping first time update after attach");
            return Ok(EventOutcome::Skipped);
        }

        let time = element.current_time();
        let hidden = self.hide_retired(time);

        let mut report = self.scheduler.reconcile(
            &mut self.tracks[index],
            &mut self.display,
            time,
            element.duration(),
        )?;
        report.hidden += hidden;

        Ok(EventOutcome::Tick(report))
    }

    /// Handle the attached source finishing
    pub fn on_ended<M: MediaElement<S>>(&mut self, element: &mut M) -> EventOutcome {
        let PlaybackState::Playing(index) = self.state else {
            return EventOutcome::Idle;
        };

        if index + 1 == self.tracks.len() {
            self.display.clear();
            self.retired.clear();
            self.state = PlaybackState::Ended;
            tracing::info!(track = index, "Final track ended");
            return EventOutcome::Finished;
        }

        let shown = self.display.take().into_iter();
        self.retired.extend(shown.map(|(id, annotation)| (index, id, annotation)));

        let next = index + 1;
        self.state = PlaybackState::Playing(next);
        self.awaiting_first_update = self.config.skip_first_update;
        element.set_autoplay(true);
        element.attach(&self.sources[next]);
        tracing::info!(
            from = index,
            to = next,
            retired = self.retired.len(),
            "Advanced to next track"
        );

        EventOutcome::Advanced(next)
    }

    /// Hide annotations retired by a track change that are still on screen
    fn hide_retired(&mut self, time: f64) -> usize {
        let retired = std::mem::take(&mut self.retired);
        let count = retired.len();
        for (track, display_id, id) in retired {
            if let Some(annotation) = self.tracks[track].get_mut(display_id.index()) {
                tracing::trace!(?id, track, display_id = display_id.index(), time, "hide retired");
                annotation.hide();
            }
        }
        count
    }
}

impl<O, S> AnnotationSession<O, S> {
    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Display state of the active track
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// All prepared tracks
    pub fn tracks(&self) -> &[Track<O>] {
        &self.tracks
    }

    /// All sources, parallel to [`tracks`](Self::tracks)
    pub fn sources(&self) -> &[S] {
        &self.sources
    }

    /// The active track, if still playing
    pub fn active_track(&self) -> Option<&Track<O>> {
        self.state.track_index().map(|i| &self.tracks[i])
    }

    /// The active source, if still playing
    pub fn active_source(&self) -> Option<&S> {
        self.state.track_index().map(|i| &self.sources[i])
    }

    /// Number of annotations retired by the last track change and not yet hidden
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Session configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

/// Check playlist shape and annotation windows against `config`
fn validate<O: Overlay>(
    tracks: &[Vec<Annotation<O>>],
    sources: usize,
    config: &SyncConfig,
) -> Result<(), SyncError> {
    if tracks.len() != sources {
        return Err(SyncError::ArityMismatch {
            tracks: tracks.len(),
            sources,
        });
    }
    if tracks.len() > config.max_tracks {
        return Err(SyncError::TooManyTracks {
            count: tracks.len(),
            limit: config.max_tracks,
        });
    }
    if tracks.is_empty() {
        return Err(SyncError::EmptyPlaylist);
    }

    for (track, annotations) in tracks.iter().enumerate() {
        let limit = config.max_annotations_per_track;
        if annotations.len() > limit {
            return Err(SyncError::TooManyAnnotations {
                track,
                count: annotations.len(),
                excess: annotations.len() - limit,
                limit,
            });
        }
        if let Some(index) = annotations.iter().position(|a| !a.is_valid_interval()) {
            let bad = &annotations[index];
            return Err(SyncError::InvalidInterval {
                track,
                index,
                start: bad.start_time(),
                end: bad.end_time(),
            });
        }
    }

    Ok(())
}
