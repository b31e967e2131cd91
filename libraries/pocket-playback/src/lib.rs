//! Pocket Player - Playback Session
//!
//! Single-track playback session management for Pocket Player.
//!
//! This crate provides:
//! - `SessionController`: the current-track state machine (load, play/pause,
//!   stop, seek gestures) over a platform `PlaybackEngine`
//! - `SessionEvent`: transition and position events for UI rendering
//! - `NotificationSynchronizer`: mirrors the session into a system
//!   notification and routes taps back into the controller
//!
//! # Architecture
//!
//! `pocket-playback` is platform-agnostic:
//! - No dependency on a native audio framework
//! - No dependency on a notification framework
//!
//! Platform code (audio engine, notification bridge) is provided via the
//! traits in `pocket-core`.
//!
//! # Concurrency
//!
//! Commands are serialized; a command holds the session for its whole
//! duration, including the engine round-trips. Every `select_and_play`,
//! `stop` and `shutdown` moves the session to a new `SessionToken`, and any
//! asynchronous result tagged with an older token (status ticks, seeks,
//! notification taps) is dropped.
//!
//! # Example
//!
//! ```rust,no_run
//! use pocket_core::{PlaybackEngine, TrackRef};
//! use pocket_playback::{SessionConfig, SessionController};
//!
//! async fn play_one<E: PlaybackEngine>(engine: E) -> pocket_core::Result<()> {
//!     let controller = SessionController::new(engine, SessionConfig::default());
//!
//!     controller
//!         .select_and_play(TrackRef::new("file:///music/song.mp3", "song.mp3"))
//!         .await?;
//!
//!     // User drags the slider to the middle of the track
//!     controller.begin_seek(0.5);
//!     controller.commit_seek(0.5).await?;
//!
//!     controller.toggle_play_pause().await?;
//!     controller.stop().await
//! }
//! ```

mod config;
mod controller;
mod events;
mod notification;

// Public exports
pub use config::{NotificationConfig, SessionConfig};
pub use controller::SessionController;
pub use events::SessionEvent;
pub use notification::NotificationSynchronizer;
pub use pocket_core::{Result, SessionError};
