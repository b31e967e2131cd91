/// Collaborator traits for Pocket Player
use crate::error::{EngineError, NotificationError};
use crate::types::{EngineHandle, Notification, PlaybackStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// Callback receiving periodic status updates for one engine handle
pub type StatusSink = Arc<dyn Fn(PlaybackStatus) + Send + Sync>;

/// Native audio engine bridge
///
/// Implementers wrap the platform player (AVPlayer, ExoPlayer, a desktop
/// decoder...). Only the session controller calls these methods, and it owns
/// every handle it receives exclusively.
///
/// There is no ordering guarantee between `play` returning and the first
/// status callback.
#[async_trait]
pub trait PlaybackEngine: Send + Sync + 'static {
    /// Open the resource and return a handle to it
    ///
    /// # Errors
    /// `EngineError::ResourceUnavailable` if the locator cannot be opened
    async fn load(&self, locator: &str) -> Result<EngineHandle, EngineError>;

    /// Start or resume playback
    async fn play(&self, handle: EngineHandle) -> Result<(), EngineError>;

    /// Pause playback, keeping the position
    async fn pause(&self, handle: EngineHandle) -> Result<(), EngineError>;

    /// Stop playback
    async fn stop(&self, handle: EngineHandle) -> Result<(), EngineError>;

    /// Seek to `position_ms`
    ///
    /// Positions outside `[0, duration]` are clamped, never rejected.
    async fn seek(&self, handle: EngineHandle, position_ms: u64) -> Result<(), EngineError>;

    /// Free the underlying resource
    ///
    /// Idempotent: releasing an unknown or already-released handle succeeds.
    async fn release(&self, handle: EngineHandle) -> Result<(), EngineError>;

    /// Current status of the handle
    async fn status(&self, handle: EngineHandle) -> Result<PlaybackStatus, EngineError>;

    /// Register the status callback for a handle
    ///
    /// The sink fires at a steady cadence (at most one second apart) while
    /// the resource is loaded and stops firing after `release`. Registering
    /// again replaces the previous sink.
    fn on_status(&self, handle: EngineHandle, sink: StatusSink) -> Result<(), EngineError>;
}

/// System notification bridge
///
/// Publication is best-effort: callers log failures and move on.
#[async_trait]
pub trait NotificationSurface: Send + Sync + 'static {
    /// Show or replace the playback notification
    async fn publish(&self, notification: Notification) -> Result<(), NotificationError>;

    /// Remove the playback notification
    async fn dismiss(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}
