//! Pocket Player Core
//!
//! Platform-agnostic types, traits, and error handling for the Pocket Player
//! playback session.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackRef`, `PlaybackStatus`, `SessionState`, tokens and handles
//! - **Collaborator Traits**: `PlaybackEngine` (native audio bridge) and
//!   `NotificationSurface` (system notification bridge)
//! - **Error Handling**: `EngineError`, `SessionError`, `NotificationError`
//!
//! # Example
//!
//! ```rust
//! use pocket_core::{PlaybackStatus, SessionState, TrackRef};
//!
//! let track = TrackRef::new("file:///music/song.mp3", "song.mp3");
//! let state = SessionState::Active {
//!     track,
//!     status: PlaybackStatus::new(90_000, 180_000, true),
//!     seek_in_flight: false,
//! };
//!
//! assert!(state.is_playing());
//! assert_eq!(state.progress(), 0.5);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EngineError, NotificationError, Result, SessionError};
pub use traits::{NotificationSurface, PlaybackEngine, StatusSink};
pub use types::{
    format_millis, EngineHandle, Notification, NotificationTap, PlaybackStatus, SessionState,
    SessionToken, TrackRef,
};
