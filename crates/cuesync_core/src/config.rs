// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session configuration.
//!
//! Stored as RON. Every field has a default, so a config file only needs the
//! values it overrides:
//!
//! ```ron
//! (
//!     max_tracks: 8,
//!     search_strategy: Bounded,
//! )
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upper bound on tracks per session
pub const DEFAULT_MAX_TRACKS: usize = 5;

/// Default upper bound on annotations per track
pub const DEFAULT_MAX_ANNOTATIONS_PER_TRACK: usize = 500;

/// How the show pass finds annotations that became visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Start at `floor(len * time / duration)` and scan outward while
    /// neighbours contain the current time.
    ///
    /// Assumes start times are spread roughly evenly over the source duration.
    /// With clustered or skewed start times the estimate can land outside the
    /// active window and visible annotations are missed.
    #[default]
    Proportional,
    /// Binary search the last started annotation, then walk backward until
    /// no earlier annotation can still be open. Correct for any distribution.
    Bounded,
}

impl SearchStrategy {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Proportional => "proportional",
            Self::Bounded => "bounded",
        }
    }
}

/// Limits and scheduling options for an annotation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Reject sessions with more tracks than this
    pub max_tracks: usize,
    /// Reject tracks with more annotations than this
    pub max_annotations_per_track: usize,
    /// Show-pass search strategy
    pub search_strategy: SearchStrategy,
    /// Ignore the zero-time update a media element emits right after a source is attached
    pub skip_first_update: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_tracks: DEFAULT_MAX_TRACKS,
            max_annotations_per_track: DEFAULT_MAX_ANNOTATIONS_PER_TRACK,
            search_strategy: SearchStrategy::default(),
            skip_first_update: true,
        }
    }
}

impl SyncConfig {
    /// Set the track limit
    pub fn with_max_tracks(mut self, max_tracks: usize) -> Self {
        self.max_tracks = max_tracks;
        self
    }

    /// Set the per-track annotation limit
    pub fn with_max_annotations_per_track(mut self, max: usize) -> Self {
        self.max_annotations_per_track = max;
        self
    }

    /// Set the search strategy
    pub fn with_search_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.search_strategy = strategy;
        self
    }

    /// Parse from RON text
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Render as pretty RON text
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded sync config");
        Ok(config)
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = SyncConfig::default();
        assert_eq!(config.max_tracks, 5);
        assert_eq!(config.max_annotations_per_track, 500);
        assert_eq!(config.search_strategy, SearchStrategy::Proportional);
        assert!(config.skip_first_update);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let source = "(max_tracks: 8, search_strategy: Bounded)";
        let config = SyncConfig::from_ron_str(source).unwrap();
        assert_eq!(config.max_tracks, 8);
        assert_eq!(config.search_strategy, SearchStrategy::Bounded);
        assert_eq!(config.max_annotations_per_track, 500);
        assert!(config.skip_first_update);
    }

    #[test]
    fn test_serialization() {
        let config = SyncConfig::default()
            .with_max_annotations_per_track(50)
            .with_search_strategy(SearchStrategy::Bounded);
        let ron_str = config.to_ron_string().unwrap();
        assert_eq!(SyncConfig::from_ron_str(&ron_str).unwrap(), config);
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = SyncConfig::from_ron_str("(max_tracks: \"five\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("/nonexistent/cuesync.ron");
        let err = SyncConfig::load(path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("cuesync-{}.ron", uuid::Uuid::new_v4()));
        let config = SyncConfig::default()
            .with_max_tracks(7)
            .with_search_strategy(SearchStrategy::Bounded);

        config.save(&path).unwrap();
        let loaded = SyncConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let path = Path::new("/nonexistent/cuesync.ron");
        let err = SyncConfig::default().save(path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { path: p, .. } if p.as_path() == path));
    }
}
