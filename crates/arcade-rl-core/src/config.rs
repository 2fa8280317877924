//! Configuration documents
//!
//! The on-disk format is a JSON object with an `environment` section, an
//! opaque `agent` section owned by the trainer, and capture periods.
//! `.jsonc` files may carry `//` and `/* */` comments.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ArcadeError, Result};

/// File name looked up inside a configuration directory
pub const CONFIG_FILE: &str = "config.json";

/// Arcade environment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// The location of the ROM file to load
    pub rom_file: String,
    /// End the episode when a life is lost, but don't reset the emulator until lives is 0
    #[serde(default)]
    pub end_episode_on_life_loss: bool,
    /// Bin reward to {+1, 0, -1} by its sign
    #[serde(default)]
    pub clip_reward: bool,
    /// Emulator ticks per agent decision
    #[serde(default = "default_one_u32")]
    pub frame_skip: u32,
    /// No-op ticks performed on a full reset
    #[serde(default)]
    pub noop_reset_max_frames: u32,
    /// Frames concatenated into one observation
    #[serde(default = "default_one_usize")]
    pub frame_stack: usize,
    /// Single channel observations
    #[serde(default)]
    pub grayscale: bool,
    /// Output (width, height); a component <= 0 keeps the native size
    #[serde(default)]
    pub output_resolution: [i32; 2],
    /// Observations in [0, 1] as f32 instead of raw bytes
    #[serde(default = "default_true")]
    pub use_float_observations: bool,
}

fn default_one_u32() -> u32 {
    1
}

fn default_one_usize() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl EnvironmentConfig {
    /// Configuration for `rom_file` with every option at its default
    pub fn new(rom_file: impl Into<String>) -> Self {
        Self {
            rom_file: rom_file.into(),
            end_episode_on_life_loss: false,
            clip_reward: false,
            frame_skip: 1,
            noop_reset_max_frames: 0,
            frame_stack: 1,
            grayscale: false,
            output_resolution: [0, 0],
            use_float_observations: true,
        }
    }

    /// Clamp frame_skip and frame_stack to at least 1
    pub fn normalize(&mut self) {
        self.frame_skip = self.frame_skip.max(1);
        self.frame_stack = self.frame_stack.max(1);
    }

    /// Channels per decoded frame
    pub fn channels(&self) -> usize {
        if self.grayscale { 1 } else { 3 }
    }

    /// Whether frames are resampled away from the native resolution
    pub fn resize_requested(&self) -> bool {
        self.output_resolution[0] > 0 || self.output_resolution[1] > 0
    }

    /// Output (width, height) given the emulator's native screen size
    pub fn output_size(&self, native_width: usize, native_height: usize) -> (usize, usize) {
        let pick = |requested: i32, native: usize| {
            if requested > 0 {
                requested as usize
            } else {
                native
            }
        };
        (
            pick(self.output_resolution[0], native_width),
            pick(self.output_resolution[1], native_height),
        )
    }
}

/// Top level configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    /// The arcade environment configuration
    pub environment: EnvironmentConfig,

    /// Trainer configuration, carried through untouched
    #[serde(default)]
    pub agent: serde_json::Value,

    /// Every n episodes save the final frame
    #[serde(default = "default_observation_save_period")]
    pub observation_save_period: u64,

    /// Every n episodes save the entire episode as an animation
    #[serde(default = "default_observation_gif_save_period")]
    pub observation_gif_save_period: u64,

    /// Every n train timesteps log any images from metrics
    #[serde(default = "default_metric_image_log_period")]
    pub metric_image_log_period: u64,
}

fn default_observation_save_period() -> u64 {
    1000
}

fn default_observation_gif_save_period() -> u64 {
    10000
}

fn default_metric_image_log_period() -> u64 {
    1000
}

impl ConfigData {
    /// Document wrapping `environment` with default periods
    pub fn new(environment: EnvironmentConfig) -> Self {
        Self {
            environment,
            agent: serde_json::Value::Null,
            observation_save_period: default_observation_save_period(),
            observation_gif_save_period: default_observation_gif_save_period(),
            metric_image_log_period: default_metric_image_log_period(),
        }
    }

    /// Parse a JSON (or JSON with comments) document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut config: ConfigData = serde_json::from_str(&strip_comments(text))?;
        if config.environment.rom_file.is_empty() {
            return Err(ArcadeError::InvalidConfig("rom_file is empty".into()));
        }
        config.environment.normalize();
        Ok(config)
    }

    /// Pretty printed JSON with two space indentation
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Record the timestep training should resume from.
    ///
    /// Only updates `agent.train_algorithm.start_timestep` when the trainer's
    /// section already declares it. Returns whether a value was written.
    pub fn set_start_timestep(&mut self, timestep: u64) -> bool {
        match self.agent.pointer_mut("/train_algorithm/start_timestep") {
            Some(slot) => {
                *slot = serde_json::Value::from(timestep);
                true
            }
            None => false,
        }
    }
}

/// Load a configuration from a `.json`/`.jsonc` file or a directory holding `config.json(c)`
pub fn load_config(config_path: &Path) -> Result<ConfigData> {
    let filename = resolve_config_path(config_path)?;
    if !filename.exists() {
        return Err(ArcadeError::ConfigNotFound(filename));
    }
    let text = fs::read_to_string(&filename)?;
    ConfigData::from_json_str(&text)
}

/// Write `config` to `config.json` inside `dir`
pub fn save_config(config: &ConfigData, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    fs::write(&path, config.to_json_string()?)?;
    Ok(path)
}

fn resolve_config_path(config_path: &Path) -> Result<PathBuf> {
    match config_path.extension().and_then(|e| e.to_str()) {
        Some("json") | Some("jsonc") => Ok(config_path.to_path_buf()),
        None if !config_path.as_os_str().is_empty() => {
            let filename = config_path.join(CONFIG_FILE);
            if filename.exists() {
                Ok(filename)
            } else {
                Ok(config_path.join("config.jsonc"))
            }
        }
        _ => Err(ArcadeError::ConfigNotFound(config_path.to_path_buf())),
    }
}

/// Remove `//` line and `/* */` block comments outside of string literals
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Current local time as `YYYYMMDDTHHMMSS`, usable in file paths
pub fn run_timestamp() -> String {
    Local::now().format("%Y%m%dT%H%M%S").to_string()
}
