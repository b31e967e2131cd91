//! Configuration for the playback session

use serde::{Deserialize, Serialize};

/// Configuration for the session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the event broadcast channel (default: 64)
    pub event_capacity: usize,

    /// Emit `SessionEvent::Position` for every applied status tick (default: true)
    pub position_events: bool,

    /// Notification mirroring settings
    pub notification: NotificationConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            position_events: true,
            notification: NotificationConfig::default(),
        }
    }
}

/// Configuration for the notification synchronizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Publish notifications at all (default: true)
    pub enabled: bool,

    /// Body text while playing (default: "Playing")
    pub playing_label: String,

    /// Body text while paused (default: "Paused")
    pub paused_label: String,

    /// Remove the notification when the session goes idle (default: true)
    pub dismiss_on_stop: bool,
}

impl NotificationConfig {
    /// Body text for a playing flag
    pub fn label(&self, is_playing: bool) -> &str {
        if is_playing {
            &self.playing_label
        } else {
            &self.paused_label
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            playing_label: "Playing".to_string(),
            paused_label: "Paused".to_string(),
            dismiss_on_stop: true,
        }
    }
}
