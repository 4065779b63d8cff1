use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use crate::general::instrument::Instrument;
use crate::general::layout::Layout;
use crate::general::transpose::{clamp_key_offset, Transpose};
use crate::general::{normalize_name, ParseNameError};
use crate::remote::osc_sender::DEFAULT_TARGET;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub instrument: Instrument,
    pub layout: Layout,
    pub transpose: Transpose,
    /// Semitones added to every incoming note before transposing.
    pub key_offset: i32,
    /// Hold keys while the MIDI note is held instead of tapping them.
    pub hold_notes: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            instrument: Instrument::default(),
            layout: Layout::default(),
            transpose: Transpose::Up,
            key_offset: 0,
            hold_notes: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    /// First input port whose name contains this is used.
    pub input_port: String,
    /// 1-based MIDI channel to listen on, all channels when unset.
    pub channel: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Console,
    Osc,
}

impl FromStr for Backend {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "console" | "print" | "dryrun" => Ok(Backend::Console),
            "osc" => Ok(Backend::Osc),
            _ => Err(ParseNameError::new("backend", s)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Backend::Console => f.write_str("console"),
            Backend::Osc => f.write_str("osc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub backend: Backend,
    pub osc_target: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { backend: Backend::Console, osc_target: DEFAULT_TARGET.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub midi: MidiConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: Config = serde_json::from_str(text)?;
        config.player.key_offset = clamp_key_offset(config.player.key_offset);
        config.midi.channel = config.midi.channel.filter(|c| (1..=16).contains(c));
        Ok(config)
    }

    /// Read the configuration file. A missing file gives the defaults, a
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Config::from_json(&text)
                    .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} not found, using defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Player settings shared between the forwarder and the console, changeable
/// while playing.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings(Arc<Mutex<PlayerConfig>>);

impl SharedSettings {
    pub fn new(config: PlayerConfig) -> Self {
        Self(Arc::new(Mutex::new(config)))
    }

    pub fn get(&self) -> PlayerConfig {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut PlayerConfig) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections() {
        let config = Config::from_json(
            r#"{
  "player": { "instrument": "vintage_lyre", "layout": "gamepad", "key_offset": 40 },
  "midi": { "input_port": "Keystation", "channel": 2 },
  "output": { "backend": "osc" }
}"#,
        )
        .unwrap();
        assert_eq!(config.player.instrument, Instrument::VintageLyre);
        assert_eq!(config.player.layout, Layout::Gamepad);
        assert_eq!(config.player.transpose, Transpose::Up);
        assert_eq!(config.player.key_offset, 27);
        assert_eq!(config.midi.input_port, "Keystation");
        assert_eq!(config.midi.channel, Some(2));
        assert_eq!(config.output.backend, Backend::Osc);
        assert_eq!(config.output.osc_target, DEFAULT_TARGET);
    }

    #[test]
    fn example_config_parses() {
        let config = Config::from_json(include_str!("../config.example.json")).unwrap();
        assert_eq!(config.player.layout, Layout::Qwerty);
        assert_eq!(config.midi.channel, None);
        assert_eq!(config.output.backend, Backend::Console);
    }

    #[test]
    fn out_of_range_channel_means_all() {
        let config = Config::from_json(r#"{ "midi": { "channel": 17 } }"#).unwrap();
        assert_eq!(config.midi.channel, None);
    }

    #[test]
    fn unknown_instrument_is_an_error() {
        assert!(Config::from_json(r#"{ "player": { "instrument": "banjo" } }"#).is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("lyre-transposer-does-not-exist.json");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn shared_settings_see_updates() {
        let settings = SharedSettings::new(PlayerConfig::default());
        let other = settings.clone();
        other.update(|s| s.layout = Layout::Dvorak);
        assert_eq!(settings.get().layout, Layout::Dvorak);
    }

    #[test]
    fn backend_names() {
        assert_eq!("OSC".parse(), Ok(Backend::Osc));
        assert_eq!("dry-run".parse(), Ok(Backend::Console));
        assert!("vigem".parse::<Backend>().is_err());
    }
}
