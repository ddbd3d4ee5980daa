// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for session construction, scheduling and configuration.

use std::path::PathBuf;

/// Errors raised while building or driving an annotation session.
///
/// Every variant is fatal for the operation that produced it. Construction
/// errors describe caller input that violates the session contract;
/// [`SyncError::MissingDisplayId`] means a track reached the scheduler without
/// going through preparation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// The track list and source list have different lengths
    #[error("tracks and sources lengths do not match ({tracks} tracks, {sources} sources)")]
    ArityMismatch {
        /// Number of tracks supplied
        tracks: usize,
        /// Number of sources supplied
        sources: usize,
    },

    /// More tracks than the configured maximum
    #[error("content with {count} tracks exceeds the maximum of {limit} tracks")]
    TooManyTracks {
        /// Number of tracks supplied
        count: usize,
        /// Configured `max_tracks`
        limit: usize,
    },

    /// A track holds more annotations than the configured maximum
    #[error(
        "track queued at index {track} with {count} annotations has {excess} more annotations \
         than the {limit} annotation maximum"
    )]
    TooManyAnnotations {
        /// Index of the offending track
        track: usize,
        /// Number of annotations in that track
        count: usize,
        /// How many annotations over the limit
        excess: usize,
        /// Configured `max_annotations_per_track`
        limit: usize,
    },

    /// An annotation window is not a valid `[start, end)` interval
    #[error("annotation {index} of track {track} has invalid interval [{start}, {end})")]
    InvalidInterval {
        /// Track index
        track: usize,
        /// Annotation index within the track, in input order
        index: usize,
        /// Supplied start time
        start: f64,
        /// Supplied end time
        end: f64,
    },

    /// No tracks were supplied
    #[error("a session needs at least one track")]
    EmptyPlaylist,

    /// An annotation reached the show path without a display ID
    #[error("annotation at index {index} has no display ID; the track was never prepared")]
    MissingDisplayId {
        /// Index of the annotation within its track
        index: usize,
    },
}

/// Errors from loading or saving a [`SyncConfig`](crate::config::SyncConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The RON text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The config could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}
