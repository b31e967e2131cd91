/// Core error types for Pocket Player
use thiserror::Error;

/// Result type alias using `SessionError`
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors reported by a `PlaybackEngine` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The resource locator could not be opened
    #[error("Resource unavailable: {locator} ({reason})")]
    ResourceUnavailable { locator: String, reason: String },

    /// A transport command failed
    #[error("Engine {op} failed: {reason}")]
    Command { op: &'static str, reason: String },
}

impl EngineError {
    /// Create a resource unavailable error
    pub fn unavailable(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Create a command failure error
    pub fn command(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Command {
            op,
            reason: reason.into(),
        }
    }
}

/// Errors surfaced to callers of the session controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Track could not be opened; the session is back to idle
    #[error("Resource unavailable: {locator} ({reason})")]
    ResourceUnavailable { locator: String, reason: String },

    /// Engine command failed; session state is unchanged
    #[error("Engine error: {0}")]
    Engine(String),

    /// Another command replaced the session while this one was in flight
    #[error("Session was superseded")]
    Superseded,
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ResourceUnavailable { locator, reason } => {
                Self::ResourceUnavailable { locator, reason }
            }
            EngineError::Command { .. } => Self::Engine(err.to_string()),
        }
    }
}

/// Notification surface errors
///
/// These never reach session callers; the synchronizer logs them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Publishing the notification failed
    #[error("Failed to publish notification: {0}")]
    Publish(String),

    /// Dismissing the notification failed
    #[error("Failed to dismiss notification: {0}")]
    Dismiss(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_maps_to_session_unavailable() {
        let err: SessionError = EngineError::unavailable("file:///missing.mp3", "not found").into();
        assert_eq!(
            err,
            SessionError::ResourceUnavailable {
                locator: "file:///missing.mp3".to_string(),
                reason: "not found".to_string(),
            }
        );
    }

    #[test]
    fn command_failure_keeps_operation_in_message() {
        let err: SessionError = EngineError::command("pause", "device busy").into();
        assert_eq!(err.to_string(), "Engine error: Engine pause failed: device busy");
    }
}
