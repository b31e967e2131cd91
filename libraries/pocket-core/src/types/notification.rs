/// Notification payloads exchanged with the system notification bridge
use super::SessionToken;
use serde::{Deserialize, Serialize};

/// Content of the playback notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Session the notification was published for; echoed back on tap
    pub token: SessionToken,

    /// Track display name
    pub title: String,

    /// "Playing" / "Paused" label
    pub body: String,

    /// Playing flag the body was rendered from
    pub is_playing: bool,
}

/// A user tap on the playback notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTap {
    /// Token carried by the tapped notification
    pub token: SessionToken,
}

impl NotificationTap {
    /// Tap on the notification published for `token`
    pub const fn new(token: SessionToken) -> Self {
        Self { token }
    }
}
