//! Session controller - core orchestration
//!
//! Owns the single current-track state machine and the one engine handle
//! behind it, serializes transport commands, and mediates seek gestures
//! against the engine's periodic status ticks.

use crate::{config::SessionConfig, events::SessionEvent};
use pocket_core::{
    EngineHandle, PlaybackEngine, PlaybackStatus, Result, SessionError, SessionState,
    SessionToken, StatusSink, TrackRef,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

/// Internal session representation
///
/// Same shape as `SessionState`, plus the engine handle, which never leaves
/// the controller.
#[derive(Debug)]
enum Session {
    Idle,
    Loading {
        track: TrackRef,
    },
    Active {
        track: TrackRef,
        handle: EngineHandle,
        /// What the UI shows; holds the dragged position during a gesture
        status: PlaybackStatus,
        /// Last status the engine reported, gesture or not
        reported: PlaybackStatus,
        seek_in_flight: bool,
    },
}

impl Session {
    fn handle(&self) -> Option<EngineHandle> {
        match self {
            Self::Active { handle, .. } => Some(*handle),
            Self::Idle | Self::Loading { .. } => None,
        }
    }

    fn view(&self) -> SessionState {
        match self {
            Self::Idle => SessionState::Idle,
            Self::Loading { track } => SessionState::Loading {
                track: track.clone(),
            },
            Self::Active {
                track,
                status,
                seek_in_flight,
                ..
            } => SessionState::Active {
                track: track.clone(),
                status: *status,
                seek_in_flight: *seek_in_flight,
            },
        }
    }
}

/// The single handle slot and the token indexing it
#[derive(Debug)]
struct SessionSlot {
    token: SessionToken,
    session: Session,
    /// Bumped by every `begin_seek`; a commit only ends the gesture it started from
    seek_generation: u64,
}

impl SessionSlot {
    /// Move to a new token and clear the slot, returning the handle it held
    fn supersede(&mut self, next: Session) -> (SessionToken, Option<EngineHandle>) {
        self.token = self.token.next();
        let previous = std::mem::replace(&mut self.session, next);
        (self.token, previous.handle())
    }

    fn active(&self) -> Option<(SessionToken, EngineHandle, bool)> {
        match &self.session {
            Session::Active { handle, status, .. } => {
                Some((self.token, *handle, status.is_playing))
            }
            Session::Idle | Session::Loading { .. } => None,
        }
    }
}

struct Inner<E: PlaybackEngine> {
    engine: Arc<E>,
    config: SessionConfig,
    /// Single-flight lock held for the whole duration of a command
    commands: tokio::sync::Mutex<()>,
    /// Never held across an `.await`
    slot: Mutex<SessionSlot>,
    events: broadcast::Sender<SessionEvent>,
}

impl<E: PlaybackEngine> Inner<E> {
    fn slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Broadcast an event
    ///
    /// Callers send while still holding the slot guard, so subscribers see
    /// events in the order the state changed. `send` never blocks.
    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn release_quietly(&self, handle: EngineHandle) {
        if let Err(e) = self.engine.release(handle).await {
            warn!(%handle, error = %e, "Failed to release engine handle");
        }
    }

    /// Apply a status tick registered under `token`
    fn apply_status(&self, token: SessionToken, incoming: PlaybackStatus) {
        let mut guard = self.slot();
        let slot = &mut *guard;

        if slot.token != token {
            trace!(%token, current = %slot.token, "Dropping stale status tick");
            return;
        }

        let Session::Active {
            track,
            status,
            reported,
            seek_in_flight,
            ..
        } = &mut slot.session
        else {
            return;
        };

        let incoming = incoming.clamped();
        let was_playing = status.is_playing;
        *reported = incoming;

        if *seek_in_flight {
            // The user owns the displayed position while dragging
            status.is_playing = incoming.is_playing;
            status.is_loaded = incoming.is_loaded;
        } else {
            *status = incoming;
            if self.config.position_events {
                self.emit(SessionEvent::Position {
                    token,
                    position_ms: status.position_ms,
                    duration_ms: status.duration_ms,
                });
            }
        }

        if status.is_playing != was_playing {
            self.emit(SessionEvent::PlayStateChanged {
                token,
                track: track.clone(),
                is_playing: status.is_playing,
            });
        }
    }
}

impl<E: PlaybackEngine> Drop for Inner<E> {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        let Some(handle) = slot.session.handle() else {
            return;
        };
        slot.session = Session::Idle;

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let engine = Arc::clone(&self.engine);
                runtime.spawn(async move {
                    if let Err(e) = engine.release(handle).await {
                        warn!(%handle, error = %e, "Failed to release engine handle on teardown");
                    }
                });
            }
            Err(_) => {
                warn!(%handle, "No async runtime during teardown; engine handle not released");
            }
        }
    }
}

/// Playback session controller
///
/// Cheap to clone; all clones drive the same session. The engine handle is
/// released on `stop`, on the next `select_and_play`, on `shutdown`, or
/// (best effort) when the last clone is dropped.
pub struct SessionController<E: PlaybackEngine> {
    inner: Arc<Inner<E>>,
}

impl<E: PlaybackEngine> Clone for SessionController<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: PlaybackEngine> SessionController<E> {
    /// Create a new session controller in the `Idle` state
    pub fn new(engine: E, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            inner: Arc::new(Inner {
                engine: Arc::new(engine),
                config,
                commands: tokio::sync::Mutex::new(()),
                slot: Mutex::new(SessionSlot {
                    token: SessionToken::default(),
                    session: Session::Idle,
                    seek_generation: 0,
                }),
                events,
            }),
        }
    }

    /// Controller configuration
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Current session snapshot
    pub fn status(&self) -> SessionState {
        self.inner.slot().session.view()
    }

    /// Current session token
    pub fn token(&self) -> SessionToken {
        self.inner.slot().token
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    // ===== Transport =====

    /// Load `track` and start playing it
    ///
    /// Any previously held handle is released first; release failures are
    /// logged, not returned. On failure the session is `Idle`.
    pub async fn select_and_play(&self, track: TrackRef) -> Result<()> {
        let _command = self.inner.commands.lock().await;

        let (token, previous) = {
            let mut slot = self.inner.slot();
            let (token, previous) = slot.supersede(Session::Loading {
                track: track.clone(),
            });
            self.inner.emit(SessionEvent::Loading {
                token,
                track: track.clone(),
            });
            (token, previous)
        };

        info!(track = %track.display_name, %token, "Loading track");

        if let Some(handle) = previous {
            debug!(%handle, "Releasing previous track");
            self.inner.release_quietly(handle).await;
        }

        match self.open(&track, token).await {
            Ok((handle, status)) => {
                let superseded = {
                    let mut slot = self.inner.slot();
                    if slot.token == token {
                        slot.session = Session::Active {
                            track: track.clone(),
                            handle,
                            status,
                            reported: status,
                            seek_in_flight: false,
                        };
                        // Ticks may already be arriving; Started must precede them
                        self.inner.emit(SessionEvent::Started {
                            token,
                            track: track.clone(),
                            status,
                        });
                        false
                    } else {
                        true
                    }
                };

                if superseded {
                    self.inner.release_quietly(handle).await;
                    return Err(SessionError::Superseded);
                }

                info!(
                    track = %track.display_name,
                    %handle,
                    duration_ms = status.duration_ms,
                    "Track playing"
                );
                Ok(())
            }
            Err(e) => {
                warn!(track = %track.display_name, error = %e, "Failed to play track");

                let mut slot = self.inner.slot();
                if slot.token == token {
                    slot.session = Session::Idle;
                }
                self.inner.emit(SessionEvent::Failed {
                    track,
                    message: e.to_string(),
                });
                drop(slot);

                Err(e)
            }
        }
    }

    /// Load, play and register the status sink; releases the handle on failure
    async fn open(
        &self,
        track: &TrackRef,
        token: SessionToken,
    ) -> Result<(EngineHandle, PlaybackStatus)> {
        let engine = &self.inner.engine;
        let handle = engine.load(&track.resource_locator).await?;

        let started = async {
            engine.play(handle).await?;
            engine.on_status(handle, self.status_sink(token))?;
            Ok::<_, SessionError>(())
        }
        .await;

        if let Err(e) = started {
            self.inner.release_quietly(handle).await;
            return Err(e);
        }

        let status = match engine.status(handle).await {
            Ok(status) => status.clamped(),
            Err(e) => {
                debug!(%handle, error = %e, "Initial status unavailable; waiting for first tick");
                PlaybackStatus {
                    is_playing: true,
                    is_loaded: true,
                    ..PlaybackStatus::zeroed()
                }
            }
        };

        Ok((handle, status))
    }

    /// Status callback bound to one session token
    fn status_sink(&self, token: SessionToken) -> StatusSink {
        let inner: Weak<Inner<E>> = Arc::downgrade(&self.inner);

        Arc::new(move |status| {
            if let Some(inner) = inner.upgrade() {
                inner.apply_status(token, status);
            }
        })
    }

    /// Pause if playing, play otherwise
    ///
    /// No-op while `Idle` or `Loading`. The playing flag flips only after the
    /// engine accepted the command.
    pub async fn toggle_play_pause(&self) -> Result<()> {
        let _command = self.inner.commands.lock().await;

        let Some((token, handle, is_playing)) = self.inner.slot().active() else {
            debug!("Toggle ignored: no active track");
            return Ok(());
        };

        self.set_playing(token, handle, !is_playing).await
    }

    /// Toggle only if `token` is still the current session
    ///
    /// Returns whether the toggle was applied.
    pub async fn toggle_if_current(&self, token: SessionToken) -> Result<bool> {
        let _command = self.inner.commands.lock().await;

        let Some((current, handle, is_playing)) = self.inner.slot().active() else {
            debug!(%token, "Toggle ignored: no active track");
            return Ok(false);
        };

        if current != token {
            debug!(%token, %current, "Toggle ignored: session superseded");
            return Ok(false);
        }

        self.set_playing(token, handle, !is_playing).await?;
        Ok(true)
    }

    /// Resume playback; no-op unless active and paused
    pub async fn play(&self) -> Result<()> {
        self.ensure_playing(true).await
    }

    /// Pause playback; no-op unless active and playing
    pub async fn pause(&self) -> Result<()> {
        self.ensure_playing(false).await
    }

    async fn ensure_playing(&self, play: bool) -> Result<()> {
        let _command = self.inner.commands.lock().await;

        let active = self.inner.slot().active();
        match active {
            Some((token, handle, is_playing)) if is_playing != play => {
                self.set_playing(token, handle, play).await
            }
            _ => Ok(()),
        }
    }

    async fn set_playing(&self, token: SessionToken, handle: EngineHandle, play: bool) -> Result<()> {
        let sent = if play {
            self.inner.engine.play(handle).await
        } else {
            self.inner.engine.pause(handle).await
        };

        if let Err(e) = sent {
            warn!(%handle, play, error = %e, "Engine rejected play/pause");
            return Err(e.into());
        }

        let mut guard = self.inner.slot();
        let slot = &mut *guard;
        if let Session::Active {
            track,
            status,
            reported,
            ..
        } = &mut slot.session
        {
            if slot.token == token {
                status.is_playing = play;
                reported.is_playing = play;
                debug!(%token, is_playing = play, "Play state changed");
                self.inner.emit(SessionEvent::PlayStateChanged {
                    token,
                    track: track.clone(),
                    is_playing: play,
                });
            }
        }

        Ok(())
    }

    /// Stop playback and release the engine handle
    ///
    /// No-op while `Idle`. The session is `Idle` when this returns, even if
    /// the engine's `stop` failed (that error is still returned).
    pub async fn stop(&self) -> Result<()> {
        let _command = self.inner.commands.lock().await;

        let (token, handle) = {
            let mut slot = self.inner.slot();
            if slot.session.handle().is_none() {
                return Ok(());
            }
            let (token, handle) = slot.supersede(Session::Idle);
            match handle {
                Some(handle) => (token, handle),
                None => return Ok(()),
            }
        };

        let stopped = self.inner.engine.stop(handle).await;
        if let Err(e) = &stopped {
            warn!(%handle, error = %e, "Engine stop failed; releasing anyway");
        }
        self.inner.release_quietly(handle).await;

        info!(%token, "Playback stopped");
        self.inner.emit(SessionEvent::Stopped { token });

        stopped.map_err(Into::into)
    }

    /// Release everything held by the controller
    ///
    /// Failures are logged. Subsequent commands start from `Idle`.
    pub async fn shutdown(&self) {
        let _command = self.inner.commands.lock().await;

        let (token, handle) = self.inner.slot().supersede(Session::Idle);

        if let Some(handle) = handle {
            self.inner.release_quietly(handle).await;
            info!(%token, "Session shut down");
            self.inner.emit(SessionEvent::Stopped { token });
        }
    }

    // ===== Seek =====

    /// Start (or continue) a seek gesture at slider `fraction`
    ///
    /// Moves the displayed position without touching the engine and
    /// suppresses position updates from status ticks until the gesture is
    /// committed. Returns `false` if no track is active.
    pub fn begin_seek(&self, fraction: f64) -> bool {
        let mut guard = self.inner.slot();
        let slot = &mut *guard;

        let Session::Active {
            status,
            seek_in_flight,
            ..
        } = &mut slot.session
        else {
            debug!(fraction, "Seek gesture ignored: no active track");
            return false;
        };

        status.position_ms = status.position_at(fraction);
        *seek_in_flight = true;
        slot.seek_generation += 1;

        self.inner.emit(SessionEvent::Position {
            token: slot.token,
            position_ms: status.position_ms,
            duration_ms: status.duration_ms,
        });
        true
    }

    /// Seek the engine to slider `fraction` and end the gesture
    ///
    /// The target is `floor(fraction * duration)` with `fraction` clamped to
    /// `[0, 1]`. Dropped without error if the track ended or was released
    /// during the gesture, or if the session moved on meanwhile.
    pub async fn commit_seek(&self, fraction: f64) -> Result<()> {
        let _command = self.inner.commands.lock().await;

        let (token, handle, target, generation) = {
            let mut guard = self.inner.slot();
            let slot = &mut *guard;
            let Session::Active {
                handle,
                status,
                reported,
                seek_in_flight,
                ..
            } = &mut slot.session
            else {
                debug!(fraction, "Seek commit dropped: no active track");
                return Ok(());
            };

            if reported.is_finished() {
                debug!(fraction, token = %slot.token, "Seek commit dropped: track ended");
                *seek_in_flight = false;
                *status = *reported;
                self.inner.emit(SessionEvent::Position {
                    token: slot.token,
                    position_ms: status.position_ms,
                    duration_ms: status.duration_ms,
                });
                return Ok(());
            }

            (
                slot.token,
                *handle,
                status.position_at(fraction),
                slot.seek_generation,
            )
        };

        let result = self.inner.engine.seek(handle, target).await;

        let mut guard = self.inner.slot();
        let slot = &mut *guard;

        if slot.token != token {
            debug!(%token, "Seek commit dropped: session superseded");
            return Ok(());
        }

        let Session::Active {
            status,
            reported,
            seek_in_flight,
            ..
        } = &mut slot.session
        else {
            return Ok(());
        };

        // A newer drag owns the slider; leave it alone
        let gesture_over = slot.seek_generation == generation;
        if gesture_over {
            *seek_in_flight = false;
        }

        match result {
            Ok(()) => {
                debug!(%handle, position_ms = target, "Seek committed");
                reported.position_ms = target;
                if gesture_over {
                    status.position_ms = target;
                }
                self.inner.emit(SessionEvent::SeekCommitted {
                    token,
                    position_ms: target,
                });
                Ok(())
            }
            Err(e) => {
                warn!(%handle, position_ms = target, error = %e, "Engine seek failed");
                Err(e.into())
            }
        }
    }
}
