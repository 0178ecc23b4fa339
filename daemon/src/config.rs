use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub filter: FilterConfig,
    pub cooldowns: CooldownConfig,
    pub input: InputConfig,
    pub gestures: GestureConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    pub rate_limit: RateLimitConfig,
}

/// Geometry thresholds of the decision engine. Distances are in
/// normalized frame units.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Pinch gap below which a pinch is considered closed, before
    /// scale normalization.
    pub base_gap_threshold: f64,
    /// Calibration constant K: apparent wrist-to-middle-MCP distance
    /// of a reference hand at reference distance from the camera.
    pub hand_calibration: f64,
    /// Lower bound on the measured hand size, preventing division
    /// blow-up when landmarks collapse.
    pub hand_size_floor: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    /// Minimum pinch-center displacement before a drag fires. Fixed in
    /// frame units, deliberately not scale-adjusted.
    pub dead_zone: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_gap_threshold: 0.05,
            hand_calibration: 0.10,
            hand_size_floor: 0.1,
            scale_min: 0.5,
            scale_max: 5.0,
            dead_zone: 0.07,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Nominal sampling frequency (Hz), used when timestamps stall.
    pub freq: f64,
    pub gap_min_cutoff: f64,
    pub gap_beta: f64,
    pub center_min_cutoff: f64,
    pub center_beta: f64,
    pub derivative_cutoff: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            freq: 30.0,
            gap_min_cutoff: 1.5,
            gap_beta: 5.0,
            center_min_cutoff: 1.0,
            center_beta: 0.5,
            derivative_cutoff: 1.0,
        }
    }
}

/// Per-action-class debounce intervals, in seconds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CooldownConfig {
    pub toggle: f64,
    pub pinch: f64,
    pub seek: f64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            toggle: 0.6,
            pinch: 0.01,
            seek: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// "Left", "Right", or "Both / No Preference".
    pub hand_preference: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            hand_preference: "Left".to_string(),
        }
    }
}

/// Action-name → gesture-token mapping, parsed and validated by
/// `engine::settings` at startup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub map: HashMap<String, String>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert("System Toggle".to_string(), "Victory".to_string());
        map.insert("Play/Pause".to_string(), "Pointing_Up".to_string());
        map.insert("Mute Toggle".to_string(), "Closed_Fist".to_string());
        map.insert("Next Track".to_string(), "Thumb_Up".to_string());
        map.insert("Previous Track".to_string(), "Thumb_Down".to_string());
        map.insert("Volume up/down".to_string(), "Pinch up/down".to_string());
        map.insert(
            "Seek forward/backward".to_string(),
            "Pinch left/right".to_string(),
        );
        map.insert("Rest".to_string(), "Open_Palm".to_string());
        Self { map }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frame loop tick rate (frames per second).
    pub frame_rate: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { frame_rate: 30.0 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// "keyboard" (uinput virtual keyboard) or "http" (VLC web API).
    pub backend: String,
    pub http: HttpSinkConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backend: "keyboard".to_string(),
            http: HttpSinkConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HttpSinkConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    /// Volume step per fired pinch nudge, VLC units (256 = 100%).
    pub volume_step: u32,
    /// Seek step per fired pinch nudge, seconds.
    pub seek_step: u32,
}

impl Default for HttpSinkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            password: String::new(),
            volume_step: 13,
            seek_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub commands_per_second: u32,
    pub burst_capacity: u32,
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            commands_per_second: 20,
            burst_capacity: 40,
            enabled: true,
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &PathBuf) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    tracing::info!("Loading config from {:?}", config_path);
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

    tracing::info!("Config loaded successfully");
    Ok(config)
}

fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavectl")
        .join("config.toml")
}
