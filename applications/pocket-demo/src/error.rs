/// Demo error types
use pocket_core::SessionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl From<config::ConfigError> for DemoError {
    fn from(err: config::ConfigError) -> Self {
        DemoError::Config(err.to_string())
    }
}
