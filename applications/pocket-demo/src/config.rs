/// Demo configuration
use crate::error::{DemoError, Result};
use pocket_audio_mobile::SimulatedEngineConfig;
use pocket_playback::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub script: ScriptSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineSettings {
    /// 0 disables status ticks
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScriptSettings {
    #[serde(default = "default_track")]
    pub track: String,

    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// How long each scripted step lets the track play
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            latency_ms: 0,
        }
    }
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            track: default_track(),
            duration_ms: default_duration_ms(),
            step_ms: default_step_ms(),
        }
    }
}

impl EngineSettings {
    pub fn engine_config(&self) -> SimulatedEngineConfig {
        SimulatedEngineConfig {
            tick_interval: (self.tick_interval_ms > 0)
                .then(|| Duration::from_millis(self.tick_interval_ms)),
            latency: Duration::from_millis(self.latency_ms),
        }
    }
}

impl DemoConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `pocket.toml` in the working
    /// directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("pocket.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. POCKET_SCRIPT__TRACK
        settings = settings.add_source(
            config::Environment::with_prefix("POCKET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.script.track.is_empty() {
            return Err(DemoError::Config("script.track must not be empty".to_string()));
        }

        if self.script.duration_ms == 0 {
            return Err(DemoError::Config(
                "script.duration_ms must be greater than zero".to_string(),
            ));
        }

        if self.session.event_capacity == 0 {
            return Err(DemoError::Config(
                "session.event_capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_tick_interval_ms() -> u64 {
    500
}

fn default_track() -> String {
    "file:///music/song.mp3".to_string()
}

fn default_duration_ms() -> u64 {
    180_000
}

fn default_step_ms() -> u64 {
    2_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.engine.engine_config().tick_interval,
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn zero_tick_interval_disables_ticker() {
        let settings = EngineSettings {
            tick_interval_ms: 0,
            latency_ms: 20,
        };
        let engine = settings.engine_config();
        assert_eq!(engine.tick_interval, None);
        assert_eq!(engine.latency, Duration::from_millis(20));
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[script]\ntrack = \"file:///music/other.mp3\"\n\n[session.notification]\npaused_label = \"On hold\""
        )
        .unwrap();

        let config = DemoConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.script.track, "file:///music/other.mp3");
        assert_eq!(config.script.duration_ms, 180_000);
        assert_eq!(config.session.notification.paused_label, "On hold");
        assert_eq!(config.session.notification.playing_label, "Playing");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = DemoConfig::load(Some(Path::new("/nonexistent/pocket.toml")));
        assert!(matches!(result, Err(DemoError::Config(_))));
    }

    #[test]
    fn empty_track_is_rejected() {
        let mut config = DemoConfig::default();
        config.script.track.clear();
        assert!(config.validate().is_err());
    }
}
