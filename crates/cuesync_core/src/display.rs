// SPDX-License-Identifier: MIT OR Apache-2.0
//! Display state: which annotations of the active track are on screen.

use crate::annotation::{AnnotationId, DisplayId};
use indexmap::IndexMap;

/// The authoritative record of shown annotations for the active track.
///
/// Keys are display IDs, values the identity of the annotation that was shown.
/// Entries are kept in the order they were shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    shown: IndexMap<DisplayId, AnnotationId>,
}

impl DisplayState {
    /// Create an empty display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an annotation as shown. Returns `false` if it was already shown.
    pub fn insert(&mut self, display_id: DisplayId, annotation: AnnotationId) -> bool {
        if self.shown.contains_key(&display_id) {
            return false;
        }
        self.shown.insert(display_id, annotation);
        true
    }

    /// Forget a shown annotation
    pub fn remove(&mut self, display_id: DisplayId) -> Option<AnnotationId> {
        self.shown.shift_remove(&display_id)
    }

    /// Whether a display ID is currently shown
    pub fn contains(&self, display_id: DisplayId) -> bool {
        self.shown.contains_key(&display_id)
    }

    /// Identity of the annotation shown under `display_id`
    pub fn get(&self, display_id: DisplayId) -> Option<AnnotationId> {
        self.shown.get(&display_id).copied()
    }

    /// Shown display IDs, oldest first
    pub fn display_ids(&self) -> impl Iterator<Item = DisplayId> + '_ {
        self.shown.keys().copied()
    }

    /// Number of shown annotations
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// Whether nothing is shown
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Drop every entry without hiding anything
    pub fn clear(&mut self) {
        self.shown.clear();
    }

    /// Empty the state, returning what was shown
    pub fn take(&mut self) -> Vec<(DisplayId, AnnotationId)> {
        self.shown.drain(..).collect()
    }
}
