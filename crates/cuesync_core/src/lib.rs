// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback-synchronized annotation scheduling.
//!
//! This crate keeps time-interval annotations in step with a media clock:
//! - Interval annotations with a show/hide capability
//! - Tracks sorted by start time with dense display IDs
//! - Incremental visibility scheduling per time update
//! - Sequential playback across a playlist of sources
//!
//! ## Architecture
//!
//! An [`AnnotationSession`] owns the prepared tracks, the parallel sources and
//! the [`DisplayState`]. A [`MediaElement`] reports time and duration and
//! receives attach requests; the session turns its [`MediaEvent`]s into
//! [`Overlay::show`] and [`Overlay::hide`] calls through the
//! [`VisibilityScheduler`].

pub mod annotation;
pub mod config;
pub mod display;
pub mod error;
pub mod scheduler;
pub mod sequencer;
pub mod track;

pub use annotation::{Annotation, AnnotationId, AnnotationSpec, Callbacks, DisplayId, Overlay};
pub use config::{SearchStrategy, SyncConfig};
pub use display::DisplayState;
pub use error::{ConfigError, SyncError};
pub use scheduler::{TickReport, VisibilityScheduler};
pub use sequencer::{AnnotationSession, EventOutcome, MediaElement, MediaEvent, PlaybackState};
pub use track::Track;
