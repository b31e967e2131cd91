//! Session Events
//!
//! Event-based communication for UI and notification synchronization.
//! Events are emitted before the command that caused them returns:
//! - Transitions (loading, started, stopped, failed)
//! - Play/pause flips, whether from a command or from the engine
//! - Position updates (status ticks, seek gestures)

use pocket_core::{PlaybackStatus, SessionToken, TrackRef};
use serde::{Deserialize, Serialize};

/// Events emitted by the session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A track started loading; any previous track is gone
    Loading {
        /// Session the load belongs to
        token: SessionToken,
        /// Track being loaded
        track: TrackRef,
    },

    /// Load and play succeeded
    Started {
        /// Session now active
        token: SessionToken,
        /// Loaded track
        track: TrackRef,
        /// Initial status reported by the engine
        status: PlaybackStatus,
    },

    /// Playing flag flipped
    PlayStateChanged {
        /// Active session
        token: SessionToken,
        /// Loaded track
        track: TrackRef,
        /// New playing flag
        is_playing: bool,
    },

    /// Displayed position changed (status tick or seek gesture)
    Position {
        /// Active session
        token: SessionToken,
        /// Displayed position
        position_ms: u64,
        /// Track duration
        duration_ms: u64,
    },

    /// Engine seek completed
    SeekCommitted {
        /// Active session
        token: SessionToken,
        /// Position the engine seeked to
        position_ms: u64,
    },

    /// Session went idle after `stop` or teardown
    Stopped {
        /// Token of the idle session
        token: SessionToken,
    },

    /// Load failed; session is idle
    Failed {
        /// Track that could not be played
        track: TrackRef,
        /// Error message
        message: String,
    },
}

impl SessionEvent {
    /// Session token the event belongs to, if any
    pub fn token(&self) -> Option<SessionToken> {
        match self {
            Self::Loading { token, .. }
            | Self::Started { token, .. }
            | Self::PlayStateChanged { token, .. }
            | Self::Position { token, .. }
            | Self::SeekCommitted { token, .. }
            | Self::Stopped { token } => Some(*token),
            Self::Failed { .. } => None,
        }
    }

    /// Whether the session became idle with this event
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped { .. } | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_of_failed_is_none() {
        let event = SessionEvent::Failed {
            track: TrackRef::new("file:///missing.mp3", "missing.mp3"),
            message: "not found".to_string(),
        };
        assert_eq!(event.token(), None);
        assert!(event.is_terminal());
    }

    #[test]
    fn events_serialize_with_variant_name() {
        let event = SessionEvent::PlayStateChanged {
            token: SessionToken::new(3),
            track: TrackRef::new("file:///music/song.mp3", "song.mp3"),
            is_playing: false,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["PlayStateChanged"]["token"], 3);
        assert_eq!(json["PlayStateChanged"]["is_playing"], false);
        assert_eq!(event.token(), Some(SessionToken::new(3)));
        assert!(!event.is_terminal());
    }
}
