// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drives an annotation session from a simulated player until the playlist ends.

use crate::overlay::{LogOverlay, OverlayStats};
use crate::player::SimulatedPlayer;
use crate::playlist::{MediaSource, Playlist};
use cuesync_core::{Annotation, AnnotationSession, EventOutcome, SyncConfig, SyncError};
use rand::Rng;
use std::rc::Rc;

/// Totals for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Time updates that reached the scheduler
    pub ticks: usize,
    /// Time updates skipped after an attach
    pub skipped: usize,
    /// Track changes
    pub advances: usize,
    /// Show calls
    pub shown: usize,
    /// Hide calls
    pub hidden: usize,
    /// Whether the final track finished
    pub finished: bool,
}

/// Session type used by the demo
pub type DemoSession = AnnotationSession<LogOverlay, MediaSource>;

/// Build the session for `playlist`, attaching the first source to `player`.
///
/// Entries without annotations get none; call [`Playlist::fill_missing`] first
/// to generate them.
pub fn build_session(
    playlist: &Playlist,
    config: SyncConfig,
    stats: &Rc<OverlayStats>,
    player: &mut SimulatedPlayer,
) -> Result<DemoSession, SyncError> {
    let tracks = playlist
        .entries
        .iter()
        .enumerate()
        .map(|(track, entry)| {
            entry
                .annotations
                .iter()
                .flatten()
                .enumerate()
                .map(|(i, spec)| {
                    let label = spec.label.clone().unwrap_or_else(|| format!("annotation-{i}"));
                    let overlay = LogOverlay::new(track, label, stats.clone());
                    spec.clone().into_annotation(overlay)
                })
                .collect::<Vec<Annotation<LogOverlay>>>()
        })
        .collect();
    let sources = playlist.entries.iter().map(|e| e.source()).collect();

    AnnotationSession::new(tracks, sources, config, player)
}

/// Pump player events into the session until the player goes quiet or
/// `max_events` is reached.
pub fn run<R: Rng>(
    session: &mut DemoSession,
    player: &mut SimulatedPlayer,
    rng: &mut R,
    max_events: usize,
) -> Result<RunSummary, SyncError> {
    let mut summary = RunSummary::default();
    player.play();

    for _ in 0..max_events {
        let Some(event) = player.poll(rng) else {
            break;
        };

        match session.handle(event, player)? {
            EventOutcome::Tick(report) => {
                summary.ticks += 1;
                summary.shown += report.shown;
                summary.hidden += report.hidden;
            }
            EventOutcome::Skipped => summary.skipped += 1,
            EventOutcome::Advanced(track) => {
                summary.advances += 1;
                if let Some(source) = player.source() {
                    tracing::debug!(track, path = %source.path, "Now playing");
                }
            }
            EventOutcome::Finished => {
                summary.finished = true;
                break;
            }
            EventOutcome::Idle => {}
        }
    }

    if !summary.finished {
        tracing::warn!(max_events, "Stopped before the playlist finished");
    }
    Ok(summary)
}
