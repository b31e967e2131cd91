/// Track reference supplied by the media library
use serde::{Deserialize, Serialize};

/// What is loaded: a playable resource locator plus the name shown to the user
///
/// The locator is opaque to the core; only the engine interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackRef {
    /// URI-like locator handed to `PlaybackEngine::load`
    pub resource_locator: String,

    /// Display name (usually the file name)
    pub display_name: String,
}

impl TrackRef {
    /// Create a new track reference
    pub fn new(resource_locator: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            resource_locator: resource_locator.into(),
            display_name: display_name.into(),
        }
    }
}
