//! Pocket Demo Library
//!
//! Host wiring for the Pocket Player session: configuration loading and a
//! scripted session over the simulated engine.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod script;

pub use config::{DemoConfig, EngineSettings, ScriptSettings};
pub use error::{DemoError, Result};
pub use script::{run, Summary};
