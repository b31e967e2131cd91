/// Session state for the single current track
use super::{PlaybackStatus, TrackRef};
use serde::{Deserialize, Serialize};

/// Current-track state machine
///
/// One tagged value instead of independent flags, so combinations such as
/// "playing while idle" cannot be represented.
///
/// ```text
/// Idle --select--> Loading --ok--> Active --stop--> Idle
///                  Loading --fail--> Idle
///                  Active --select(other)--> Loading
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No track loaded
    #[default]
    Idle,

    /// Engine load in flight
    Loading {
        /// Track being loaded
        track: TrackRef,
    },

    /// Track loaded and under control
    Active {
        /// Loaded track
        track: TrackRef,
        /// Latest applied status
        status: PlaybackStatus,
        /// A user seek gesture is in progress
        seek_in_flight: bool,
    },
}

impl SessionState {
    /// Track currently loaded or loading
    pub fn track(&self) -> Option<&TrackRef> {
        match self {
            Self::Idle => None,
            Self::Loading { track } | Self::Active { track, .. } => Some(track),
        }
    }

    /// Playback status for display (zeroed unless active)
    pub fn playback(&self) -> PlaybackStatus {
        match self {
            Self::Active { status, .. } => *status,
            Self::Idle | Self::Loading { .. } => PlaybackStatus::zeroed(),
        }
    }

    /// Whether the session is idle
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a track is active
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Active { status, .. } if status.is_playing)
    }

    /// Whether a seek gesture is in progress
    pub fn is_seeking(&self) -> bool {
        matches!(
            self,
            Self::Active {
                seek_in_flight: true,
                ..
            }
        )
    }

    /// Slider position in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.playback().progress()
    }
}
