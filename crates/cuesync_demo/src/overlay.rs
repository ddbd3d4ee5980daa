// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logging overlay: stands in for a renderer by reporting show/hide calls.

use cuesync_core::Overlay;
use std::cell::Cell;
use std::rc::Rc;

/// Counters shared by every overlay of a run
#[derive(Debug, Default)]
pub struct OverlayStats {
    shows: Cell<usize>,
    hides: Cell<usize>,
    visible: Cell<usize>,
    peak_visible: Cell<usize>,
}

impl OverlayStats {
    /// Total show calls
    pub fn shows(&self) -> usize {
        self.shows.get()
    }

    /// Total hide calls
    pub fn hides(&self) -> usize {
        self.hides.get()
    }

    /// Overlays currently on screen
    pub fn visible(&self) -> usize {
        self.visible.get()
    }

    /// Most overlays on screen at once
    pub fn peak_visible(&self) -> usize {
        self.peak_visible.get()
    }
}

/// Overlay that logs its transitions
#[derive(Debug)]
pub struct LogOverlay {
    track: usize,
    label: String,
    stats: Rc<OverlayStats>,
}

impl LogOverlay {
    /// Create an overlay for an annotation of `track`
    pub fn new(track: usize, label: impl Into<String>, stats: Rc<OverlayStats>) -> Self {
        Self {
            track,
            label: label.into(),
            stats,
        }
    }
}

impl Overlay for LogOverlay {
    fn show(&mut self) {
        let stats = &self.stats;
        stats.shows.set(stats.shows.get() + 1);
        stats.visible.set(stats.visible.get() + 1);
        stats.peak_visible.set(stats.peak_visible.get().max(stats.visible.get()));
        tracing::info!(track = self.track, label = %self.label, "show");
    }

    fn hide(&mut self) {
        let stats = &self.stats;
        stats.hides.set(stats.hides.get() + 1);
        stats.visible.set(stats.visible.get().saturating_sub(1));
        tracing::info!(track = self.track, label = %self.label, "hide");
    }
}
