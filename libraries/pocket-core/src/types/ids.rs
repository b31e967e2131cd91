/// Identifier types for the playback session
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session token
///
/// Monotonically increasing. Every `select_and_play`, `stop` and teardown
/// moves the session to a new token; asynchronous results tagged with an
/// older token are stale and must be discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Create a token from its raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The token that supersedes this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Get the raw value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to one loaded, playable audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineHandle(u64);

impl EngineHandle {
    /// Create a handle from its raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle-{}", self.0)
    }
}
