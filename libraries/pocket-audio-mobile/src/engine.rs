//! Simulated playback engine
//!
//! Plays virtual tracks: each locator in the catalogue has a duration, and a
//! loaded handle advances its position in real (tokio) time while playing.

use async_trait::async_trait;
use pocket_core::{EngineError, EngineHandle, PlaybackEngine, PlaybackStatus, StatusSink};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Engine operations, for failure injection and call accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineCall {
    Load,
    Play,
    Pause,
    Stop,
    Seek,
    Release,
    Status,
    OnStatus,
}

impl EngineCall {
    fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Seek => "seek",
            Self::Release => "release",
            Self::Status => "status",
            Self::OnStatus => "on_status",
        }
    }
}

/// Configuration for the simulated engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedEngineConfig {
    /// Status cadence; `None` disables the ticker (drive it with `emit_status`)
    pub tick_interval: Option<Duration>,

    /// Artificial delay applied to every async command
    pub latency: Duration,
}

impl SimulatedEngineConfig {
    /// No ticker, no latency
    pub fn manual() -> Self {
        Self {
            tick_interval: None,
            latency: Duration::ZERO,
        }
    }
}

impl Default for SimulatedEngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Some(Duration::from_millis(500)),
            latency: Duration::ZERO,
        }
    }
}

/// One loaded resource
struct Voice {
    locator: String,
    status: PlaybackStatus,
    sink: Option<StatusSink>,
    ticker: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Book {
    catalogue: HashMap<String, u64>,
    voices: HashMap<EngineHandle, Voice>,
    next_handle: u64,
    failures: HashSet<EngineCall>,
    calls: Vec<(EngineCall, Option<EngineHandle>)>,
    peak_live: usize,
    last_seek: Option<u64>,
}

struct Shared {
    config: SimulatedEngineConfig,
    book: Mutex<Book>,
}

impl Shared {
    fn book(&self) -> MutexGuard<'_, Book> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process `PlaybackEngine`
///
/// Cheap to clone; clones share the same catalogue and handles, so a test can
/// keep one clone for inspection while the controller owns another.
#[derive(Clone)]
pub struct SimulatedEngine {
    shared: Arc<Shared>,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new(SimulatedEngineConfig::default())
    }
}

impl SimulatedEngine {
    /// Create an engine with an empty catalogue
    pub fn new(config: SimulatedEngineConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                book: Mutex::new(Book::default()),
            }),
        }
    }

    /// Make `locator` loadable with the given duration
    pub fn add_track(&self, locator: impl Into<String>, duration_ms: u64) {
        self.shared.book().catalogue.insert(locator.into(), duration_ms);
    }

    /// Make the next call of `call` fail
    pub fn fail_next(&self, call: EngineCall) {
        self.shared.book().failures.insert(call);
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<(EngineCall, Option<EngineHandle>)> {
        self.shared.book().calls.clone()
    }

    /// Number of calls of one kind
    pub fn call_count(&self, call: EngineCall) -> usize {
        self.shared
            .book()
            .calls
            .iter()
            .filter(|(c, _)| *c == call)
            .count()
    }

    /// Number of `release` calls
    pub fn release_count(&self) -> usize {
        self.call_count(EngineCall::Release)
    }

    /// Handles currently loaded
    pub fn live_handles(&self) -> usize {
        self.shared.book().voices.len()
    }

    /// Highest number of simultaneously loaded handles ever observed
    pub fn peak_live_handles(&self) -> usize {
        self.shared.book().peak_live
    }

    /// Target of the most recent successful `seek`
    pub fn last_seek(&self) -> Option<u64> {
        self.shared.book().last_seek
    }

    /// Engine-side status of a handle
    pub fn status_of(&self, handle: EngineHandle) -> Option<PlaybackStatus> {
        self.shared.book().voices.get(&handle).map(|v| v.status)
    }

    /// Handles currently loaded, oldest first
    pub fn handles(&self) -> Vec<EngineHandle> {
        let mut handles: Vec<_> = self.shared.book().voices.keys().copied().collect();
        handles.sort_by_key(|h| h.value());
        handles
    }

    /// Set a handle's status and deliver it to the registered sink
    ///
    /// Returns `false` if the handle is not loaded or has no sink.
    pub fn emit_status(&self, handle: EngineHandle, status: PlaybackStatus) -> bool {
        let sink = {
            let mut book = self.shared.book();
            let Some(voice) = book.voices.get_mut(&handle) else {
                return false;
            };
            voice.status = status;
            voice.sink.clone()
        };

        match sink {
            Some(sink) => {
                sink(status);
                true
            }
            None => false,
        }
    }

    async fn enter(&self, call: EngineCall, handle: Option<EngineHandle>) -> Result<(), EngineError> {
        let latency = self.shared.config.latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.record(call, handle)
    }

    fn record(&self, call: EngineCall, handle: Option<EngineHandle>) -> Result<(), EngineError> {
        let mut book = self.shared.book();
        book.calls.push((call, handle));
        if book.failures.remove(&call) {
            return Err(EngineError::command(call.name(), "injected failure"));
        }
        Ok(())
    }

    fn with_voice<T>(
        &self,
        call: EngineCall,
        handle: EngineHandle,
        f: impl FnOnce(&mut Voice) -> T,
    ) -> Result<T, EngineError> {
        let mut book = self.shared.book();
        let voice = book
            .voices
            .get_mut(&handle)
            .ok_or_else(|| EngineError::command(call.name(), format!("unknown {}", handle)))?;
        Ok(f(voice))
    }

    fn spawn_ticker(shared: Weak<Shared>, handle: EngineHandle, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(shared) = shared.upgrade() else {
                    break;
                };

                let update = {
                    let mut book = shared.book();
                    let Some(voice) = book.voices.get_mut(&handle) else {
                        break;
                    };

                    if voice.status.is_playing {
                        let elapsed = interval.as_millis() as u64;
                        let status = &mut voice.status;
                        status.position_ms = status
                            .position_ms
                            .saturating_add(elapsed)
                            .min(status.duration_ms);
                        if status.position_ms >= status.duration_ms {
                            status.is_playing = false;
                            debug!(%handle, locator = %voice.locator, "Reached end of track");
                        }
                    }

                    voice.sink.clone().map(|sink| (sink, voice.status))
                };

                if let Some((sink, status)) = update {
                    trace!(%handle, position_ms = status.position_ms, "Status tick");
                    sink(status);
                }
            }
        })
    }
}

#[async_trait]
impl PlaybackEngine for SimulatedEngine {
    async fn load(&self, locator: &str) -> Result<EngineHandle, EngineError> {
        self.enter(EngineCall::Load, None).await.map_err(|_| {
            EngineError::unavailable(locator, "injected failure")
        })?;

        let handle = {
            let mut book = self.shared.book();
            let duration_ms = *book
                .catalogue
                .get(locator)
                .ok_or_else(|| EngineError::unavailable(locator, "no such file"))?;

            book.next_handle += 1;
            let handle = EngineHandle::new(book.next_handle);
            book.voices.insert(
                handle,
                Voice {
                    locator: locator.to_string(),
                    status: PlaybackStatus::new(0, duration_ms, false),
                    sink: None,
                    ticker: None,
                },
            );
            book.peak_live = book.peak_live.max(book.voices.len());
            handle
        };

        if let Some(interval) = self.shared.config.tick_interval {
            let ticker = Self::spawn_ticker(Arc::downgrade(&self.shared), handle, interval);
            match self.shared.book().voices.get_mut(&handle) {
                Some(voice) => voice.ticker = Some(ticker),
                None => ticker.abort(),
            }
        }

        debug!(%handle, locator, "Loaded");
        Ok(handle)
    }

    async fn play(&self, handle: EngineHandle) -> Result<(), EngineError> {
        self.enter(EngineCall::Play, Some(handle)).await?;
        self.with_voice(EngineCall::Play, handle, |voice| {
            if voice.status.position_ms >= voice.status.duration_ms {
                voice.status.position_ms = 0;
            }
            voice.status.is_playing = true;
        })
    }

    async fn pause(&self, handle: EngineHandle) -> Result<(), EngineError> {
        self.enter(EngineCall::Pause, Some(handle)).await?;
        self.with_voice(EngineCall::Pause, handle, |voice| {
            voice.status.is_playing = false;
        })
    }

    async fn stop(&self, handle: EngineHandle) -> Result<(), EngineError> {
        self.enter(EngineCall::Stop, Some(handle)).await?;
        self.with_voice(EngineCall::Stop, handle, |voice| {
            voice.status.is_playing = false;
            voice.status.position_ms = 0;
        })
    }

    async fn seek(&self, handle: EngineHandle, position_ms: u64) -> Result<(), EngineError> {
        self.enter(EngineCall::Seek, Some(handle)).await?;
        let target = self.with_voice(EngineCall::Seek, handle, |voice| {
            voice.status.position_ms = position_ms.min(voice.status.duration_ms);
            voice.status.position_ms
        })?;
        self.shared.book().last_seek = Some(target);
        Ok(())
    }

    async fn release(&self, handle: EngineHandle) -> Result<(), EngineError> {
        self.enter(EngineCall::Release, Some(handle)).await?;

        let voice = self.shared.book().voices.remove(&handle);
        if let Some(voice) = voice {
            if let Some(ticker) = voice.ticker {
                ticker.abort();
            }
            debug!(%handle, locator = %voice.locator, "Released");
        }
        Ok(())
    }

    async fn status(&self, handle: EngineHandle) -> Result<PlaybackStatus, EngineError> {
        self.enter(EngineCall::Status, Some(handle)).await?;
        self.with_voice(EngineCall::Status, handle, |voice| voice.status)
    }

    fn on_status(&self, handle: EngineHandle, sink: StatusSink) -> Result<(), EngineError> {
        self.record(EngineCall::OnStatus, Some(handle))?;
        self.with_voice(EngineCall::OnStatus, handle, |voice| {
            voice.sink = Some(sink);
        })
    }
}
