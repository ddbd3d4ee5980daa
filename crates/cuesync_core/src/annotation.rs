// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interval annotations and the show/hide capability they carry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationId(pub Uuid);

impl AnnotationId {
    /// Create a new random annotation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of an annotation within its prepared track.
///
/// Assigned by [`Track::prepare`](crate::track::Track::prepare) and used as the
/// display state key. `DisplayId(0)` is a valid, present ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub usize);

impl DisplayId {
    /// Index into the prepared track
    pub fn index(self) -> usize {
        self.0
    }
}

/// Presentation capability of an annotation.
///
/// Implemented by whatever owns rendering. The scheduler only decides *when*
/// to call these; it never looks at how they are carried out.
pub trait Overlay {
    /// Make the annotation visible
    fn show(&mut self);

    /// Make the annotation invisible
    fn hide(&mut self);
}

impl<T: Overlay + ?Sized> Overlay for Box<T> {
    fn show(&mut self) {
        (**self).show();
    }

    fn hide(&mut self) {
        (**self).hide();
    }
}

/// Overlay backed by a pair of closures
pub struct Callbacks<S, H> {
    on_show: S,
    on_hide: H,
}

impl<S: FnMut(), H: FnMut()> Callbacks<S, H> {
    /// Wrap a show closure and a hide closure
    pub fn new(on_show: S, on_hide: H) -> Self {
        Self { on_show, on_hide }
    }
}

impl<S: FnMut(), H: FnMut()> Overlay for Callbacks<S, H> {
    fn show(&mut self) {
        (self.on_show)();
    }

    fn hide(&mut self) {
        (self.on_hide)();
    }
}

impl<S, H> std::fmt::Debug for Callbacks<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Serializable timing data for an annotation, without its overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSpec {
    /// Start time in seconds (inclusive)
    pub start_time: f64,
    /// End time in seconds (exclusive)
    pub end_time: f64,
    /// Optional label for logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AnnotationSpec {
    /// Create timing data for the window `[start_time, end_time)`
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            label: None,
        }
    }

    /// Set a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Pair this timing data with an overlay
    pub fn into_annotation<O: Overlay>(self, overlay: O) -> Annotation<O> {
        let mut annotation = Annotation::new(self.start_time, self.end_time, overlay);
        annotation.label = self.label;
        annotation
    }
}

/// A time-bounded overlay item shown while playback is inside `[start_time, end_time)`
#[derive(Debug)]
pub struct Annotation<O> {
    id: AnnotationId,
    start_time: f64,
    end_time: f64,
    display_id: Option<DisplayId>,
    label: Option<String>,
    overlay: O,
}

impl<O: Overlay> Annotation<O> {
    /// Create an annotation for the window `[start_time, end_time)`
    pub fn new(start_time: f64, end_time: f64, overlay: O) -> Self {
        Self {
            id: AnnotationId::new(),
            start_time,
            end_time,
            display_id: None,
            label: None,
            overlay,
        }
    }

    /// Set a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Containment predicate: `start_time <= time < end_time`
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time < self.end_time
    }

    /// Whether the window is a finite, non-negative, non-empty interval
    pub fn is_valid_interval(&self) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.end_time > self.start_time
    }

    pub(crate) fn show(&mut self) {
        self.overlay.show();
    }

    pub(crate) fn hide(&mut self) {
        self.overlay.hide();
    }

    pub(crate) fn assign_display_id(&mut self, display_id: DisplayId) {
        self.display_id = Some(display_id);
    }
}

impl<O> Annotation<O> {
    /// Stable identity
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// Start time in seconds
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End time in seconds
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Display ID, once the owning track has been prepared
    pub fn display_id(&self) -> Option<DisplayId> {
        self.display_id
    }

    /// Label, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Timing data without the overlay
    pub fn spec(&self) -> AnnotationSpec {
        AnnotationSpec {
            start_time: self.start_time,
            end_time: self.end_time,
            label: self.label.clone(),
        }
    }
}
