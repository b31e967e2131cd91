/// Playback status reported by the engine
use serde::{Deserialize, Serialize};

/// Snapshot of one engine handle's playback
///
/// Produced by the engine. `position_ms` never exceeds `duration_ms` once the
/// duration is known (`duration_ms == 0` means "not known yet").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Current position in milliseconds
    pub position_ms: u64,

    /// Track duration in milliseconds (0 until known)
    pub duration_ms: u64,

    /// Whether audio is currently playing
    pub is_playing: bool,

    /// Whether the resource is loaded
    pub is_loaded: bool,
}

impl PlaybackStatus {
    /// Status of a loaded resource
    pub fn new(position_ms: u64, duration_ms: u64, is_playing: bool) -> Self {
        Self {
            position_ms,
            duration_ms,
            is_playing,
            is_loaded: true,
        }
    }

    /// Zeroed status used before a load completes
    pub const fn zeroed() -> Self {
        Self {
            position_ms: 0,
            duration_ms: 0,
            is_playing: false,
            is_loaded: false,
        }
    }

    /// Return a copy with `position_ms` clamped into `[0, duration_ms]`
    ///
    /// A zero duration is treated as unknown and leaves the position alone.
    #[must_use]
    pub fn clamped(self) -> Self {
        if self.duration_ms == 0 {
            return self;
        }

        Self {
            position_ms: self.position_ms.min(self.duration_ms),
            ..self
        }
    }

    /// Slider position in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let ratio = self.position_ms as f64 / self.duration_ms.max(1) as f64;
        ratio.clamp(0.0, 1.0)
    }

    /// Position for a slider fraction: `floor(fraction * duration)`
    ///
    /// Out-of-range and NaN fractions clamp to the nearest boundary.
    pub fn position_at(&self, fraction: f64) -> u64 {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };

        ((fraction * self.duration_ms as f64).floor() as u64).min(self.duration_ms)
    }

    /// Whether playback reached the end of the track
    pub fn is_finished(&self) -> bool {
        self.duration_ms > 0 && self.position_ms >= self.duration_ms && !self.is_playing
    }
}

/// Format milliseconds as `m:ss`, or `h:mm:ss` past one hour
pub fn format_millis(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
