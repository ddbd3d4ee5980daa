// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playlist files: ordered sources with durations and optional annotations.
//!
//! Read from RON, or from JSON when the file extension is `.json`.

use crate::generator::generate_track;
use cuesync_core::AnnotationSpec;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error type for playlist loading
#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    /// Reading the file failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed RON
    #[error("Invalid RON playlist: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Malformed JSON
    #[error("Invalid JSON playlist: {0}")]
    Json(#[from] serde_json::Error),

    /// A source declares a duration that cannot be played
    #[error("source {path} has invalid duration {duration}")]
    InvalidDuration {
        /// Source path
        path: String,
        /// Declared duration
        duration: f64,
    },
}

/// A playable source as the simulated player sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Source location
    pub path: String,
    /// Length in seconds
    pub duration: f64,
}

/// One playlist entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Source location
    pub path: String,
    /// Length in seconds
    pub duration: f64,
    /// Annotations for this source; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<AnnotationSpec>>,
}

impl PlaylistEntry {
    /// The playable source of this entry
    pub fn source(&self) -> MediaSource {
        MediaSource {
            path: self.path.clone(),
            duration: self.duration,
        }
    }
}

/// Ordered sources played back-to-back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Entries in play order
    pub entries: Vec<PlaylistEntry>,
}

impl Playlist {
    /// `count` sources named `video-{i}.mp4`, each `duration` seconds, without annotations
    pub fn synthetic(count: usize, duration: f64) -> Self {
        Self {
            entries: (0..count)
                .map(|i| PlaylistEntry {
                    path: format!("video-{i}.mp4"),
                    duration,
                    annotations: None,
                })
                .collect(),
        }
    }

    /// Parse from RON text
    pub fn from_ron_str(source: &str) -> Result<Self, PlaylistError> {
        Self::checked(ron::from_str(source)?)
    }

    /// Parse from JSON text
    pub fn from_json_str(source: &str) -> Result<Self, PlaylistError> {
        Self::checked(serde_json::from_str(source)?)
    }

    /// Load from a file, picking the format by extension
    pub fn load(path: &Path) -> Result<Self, PlaylistError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlaylistError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_ron_str(&content)
        }
    }

    fn checked(playlist: Self) -> Result<Self, PlaylistError> {
        if let Some(bad) = playlist
            .entries
            .iter()
            .find(|e| !(e.duration.is_finite() && e.duration > 0.0))
        {
            return Err(PlaylistError::InvalidDuration {
                path: bad.path.clone(),
                duration: bad.duration,
            });
        }
        Ok(playlist)
    }

    /// Fill every entry that has no annotations with generated ones
    pub fn fill_missing<R: Rng>(&mut self, rng: &mut R, limit: usize) {
        for entry in &mut self.entries {
            if entry.annotations.is_none() {
                let generated = generate_track(rng, entry.duration, limit);
                tracing::debug!(
                    source = %entry.path,
                    count = generated.len(),
                    "Generated annotations"
                );
                entry.annotations = Some(generated);
            }
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
