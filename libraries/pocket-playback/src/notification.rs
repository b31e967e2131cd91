//! Notification synchronization
//!
//! Mirrors the session into the system notification and routes taps on it
//! back into the controller.
//!
//! Only one interaction handler exists at a time: the token of the most
//! recently published session. Publishing for a new session replaces it, so
//! a tap on a notification left over from an earlier track, or arriving after
//! the session went idle, is dropped instead of toggling whatever is playing
//! now.

use crate::{config::NotificationConfig, controller::SessionController, events::SessionEvent};
use pocket_core::{
    Notification, NotificationSurface, NotificationTap, PlaybackEngine, Result, SessionState,
    SessionToken, TrackRef,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Keeps the playback notification in step with the session
pub struct NotificationSynchronizer<E: PlaybackEngine, N: NotificationSurface> {
    controller: SessionController<E>,
    surface: Arc<N>,
    config: NotificationConfig,
    /// Token the current interaction handler is bound to
    registered: Mutex<Option<SessionToken>>,
}

impl<E: PlaybackEngine, N: NotificationSurface> NotificationSynchronizer<E, N> {
    /// Create a synchronizer using the controller's notification settings
    pub fn new(controller: SessionController<E>, surface: N) -> Self {
        let config = controller.config().notification.clone();
        Self::with_config(controller, surface, config)
    }

    /// Create a synchronizer with explicit notification settings
    pub fn with_config(
        controller: SessionController<E>,
        surface: N,
        config: NotificationConfig,
    ) -> Self {
        Self {
            controller,
            surface: Arc::new(surface),
            config,
            registered: Mutex::new(None),
        }
    }

    /// Token the interaction handler is currently bound to
    pub fn registered_token(&self) -> Option<SessionToken> {
        *self.registered.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, token: Option<SessionToken>) {
        *self.registered.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Subscribe to the controller and follow its events on a tokio task
    ///
    /// The subscription is taken before this returns, so no event emitted
    /// afterwards is missed. The task runs until aborted.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let events = self.controller.subscribe();
        tokio::spawn(async move { self.run(events).await })
    }

    /// Follow an event stream until it closes
    pub async fn run(&self, mut events: broadcast::Receiver<SessionEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(&event).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Notification sync lagged; resynchronizing");
                    self.resync().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// React to one session event
    pub async fn handle_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Started {
                token,
                track,
                status,
            } => self.publish(*token, track, status.is_playing).await,
            SessionEvent::PlayStateChanged {
                token,
                track,
                is_playing,
            } => self.publish(*token, track, *is_playing).await,
            // The previous track's handle is already gone
            SessionEvent::Loading { .. } => {
                if self.registered_token().is_some() {
                    self.register(None);
                    self.remove().await;
                }
            }
            _ if event.is_terminal() => self.dismiss().await,
            _ => {}
        }
    }

    /// Publish the notification from the controller's current state
    pub async fn resync(&self) {
        let token = self.controller.token();
        match self.controller.status() {
            SessionState::Active { track, status, .. } => {
                self.publish(token, &track, status.is_playing).await;
            }
            SessionState::Idle => self.dismiss().await,
            SessionState::Loading { .. } => {}
        }
    }

    async fn publish(&self, token: SessionToken, track: &TrackRef, is_playing: bool) {
        if !self.config.enabled {
            return;
        }

        if token != self.controller.token() {
            debug!(%token, "Skipping notification for superseded session");
            return;
        }

        // Replaces the handler bound to any earlier track
        self.register(Some(token));

        let notification = Notification {
            token,
            title: track.display_name.clone(),
            body: self.config.label(is_playing).to_string(),
            is_playing,
        };

        if let Err(e) = self.surface.publish(notification).await {
            warn!(%token, error = %e, "Notification publish failed");
        }
    }

    async fn dismiss(&self) {
        self.register(None);

        if self.config.dismiss_on_stop {
            self.remove().await;
        }
    }

    async fn remove(&self) {
        if !self.config.enabled {
            return;
        }

        if let Err(e) = self.surface.dismiss().await {
            warn!(error = %e, "Notification dismiss failed");
        }
    }

    /// Handle a tap on the notification
    ///
    /// Toggles play/pause if the tap belongs to the current session. Returns
    /// whether it did; engine errors from the toggle are returned.
    pub async fn handle_tap(&self, tap: NotificationTap) -> Result<bool> {
        if self.registered_token() != Some(tap.token) {
            debug!(token = %tap.token, "Ignoring tap on superseded notification");
            return Ok(false);
        }

        let toggled = self.controller.toggle_if_current(tap.token).await?;
        if toggled {
            info!(token = %tap.token, "Toggled playback from notification");
        }
        Ok(toggled)
    }

    /// Handle a tap without waiting for the result
    pub fn dispatch_tap(self: &Arc<Self>, tap: NotificationTap) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.handle_tap(tap).await {
                warn!(token = %tap.token, error = %e, "Notification tap failed");
            }
        })
    }
}
