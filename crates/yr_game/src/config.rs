//! Game configuration loaded from JSON.
//!
//! Every field has a default equal to the values the demo was tuned with, so
//! an empty object (`{}`) or a missing file yields the stock game. Unknown
//! fields are rejected to catch typos in hand-edited files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controller::PhysicsConfig;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/yobby_run.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub version: String,
    pub title: String,
    pub screen: ScreenConfig,
    pub target_fps: u32,
    pub max_frame_dt: f32,
    pub vsync: bool,
    pub icon_path: String,
    pub physics: PhysicsConfig,
    pub animation: AnimationConfig,
    pub audio: AudioConfig,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub sprite_path: String,
    /// Rendered frames per animation frame.
    pub frame_delay: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    pub music_path: String,
    pub jump_sound_path: String,
    pub music_volume: f32,
    pub sound_volume: f32,
    /// Seconds of playback after which the music jumps back to `loop_restart_secs`.
    pub loop_threshold_secs: f32,
    pub loop_restart_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            title: "Yobby Run".to_string(),
            screen: ScreenConfig::default(),
            target_fps: 60,
            max_frame_dt: 0.25,
            vsync: true,
            icon_path: "resources/icon.ico".to_string(),
            physics: PhysicsConfig::default(),
            animation: AnimationConfig::default(),
            audio: AudioConfig::default(),
            caption: "Yeaa".to_string(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            min_width: 320,
            min_height: 240,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            sprite_path: "resources/YobbyRun.gif".to_string(),
            frame_delay: 8,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_path: "resources/cruising-down-8bit-lane.mp3".to_string(),
            jump_sound_path: "resources/jump.mp3".to_string(),
            music_volume: 0.1,
            sound_volume: 0.1,
            loop_threshold_secs: 39.0,
            loop_restart_secs: 0.69,
        }
    }
}

/// Load and validate a config file. A missing file is not an error: the
/// defaults are returned and the fact is logged.
pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::info!(
            "Config '{}' not found, using built-in defaults",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config = parse_config(&raw)
        .map_err(|e| format!("Failed to load config {}: {e}", path.display()))?;
    log::info!("Config loaded from '{}'", path.display());
    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<GameConfig, String> {
    let config: GameConfig =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.version != "0.1" {
        return Err(format!(
            "Config validation failed: unsupported version '{}'",
            config.version
        ));
    }
    let screen = &config.screen;
    if screen.width == 0 || screen.height == 0 {
        return Err("Config validation failed: screen width and height must be > 0".to_string());
    }
    if screen.min_width > screen.width || screen.min_height > screen.height {
        return Err("Config validation failed: minimum window size exceeds screen size".to_string());
    }
    if !is_positive(config.max_frame_dt) {
        return Err("Config validation failed: max_frame_dt must be > 0".to_string());
    }
    let physics = &config.physics;
    if !is_positive(physics.gravity) {
        return Err("Config validation failed: gravity must be > 0".to_string());
    }
    if !is_positive(physics.jump_speed) {
        return Err("Config validation failed: jump_speed must be > 0".to_string());
    }
    if config.animation.frame_delay == 0 {
        return Err("Config validation failed: animation frame_delay must be > 0".to_string());
    }
    let audio = &config.audio;
    let volumes = [
        ("music_volume", audio.music_volume),
        ("sound_volume", audio.sound_volume),
    ];
    for (name, volume) in volumes {
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!(
                "Config validation failed: {} must be within [0, 1], got {}",
                name, volume
            ));
        }
    }
    if audio.loop_restart_secs < 0.0 || audio.loop_restart_secs >= audio.loop_threshold_secs {
        return Err(format!(
            "Config validation failed: loop restart ({}) must be >= 0 and below the threshold ({})",
            audio.loop_restart_secs, audio.loop_threshold_secs
        ));
    }
    Ok(())
}

/// False for NaN as well as for zero and negatives.
fn is_positive(value: f32) -> bool {
    value > 0.0
}
