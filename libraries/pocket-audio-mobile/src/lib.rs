//! Mobile audio bridges for Pocket Player
//!
//! Native iOS/Android players and notification managers plug into the
//! session through the `pocket-core` traits. This crate holds the shared
//! bridge code and an in-process implementation of both contracts:
//!
//! - `SimulatedEngine`: a timer-driven `PlaybackEngine` that plays a
//!   catalogue of virtual tracks, with failure injection and call accounting
//! - `LogSurface`: a `NotificationSurface` that logs and records what it was
//!   asked to show
//!
//! Both are used by the demo host and by the test suites.

#![forbid(unsafe_code)]

mod engine;
mod surface;

pub use engine::{EngineCall, SimulatedEngine, SimulatedEngineConfig};
pub use surface::LogSurface;
