use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::types::{FoodSpawnMode, ObstacleDensity, Theme, WallMode};

pub const SUPPORTED_GRID_SIZES: [u32; 3] = [15, 20, 25];
/// Floor for the tick period, including after golden food speed-ups.
pub const MIN_TICK_INTERVAL_MS: u32 = 50;
pub const MAX_TICK_INTERVAL_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedPreset {
    Slow,
    Normal,
    Fast,
}

impl SpeedPreset {
    pub fn interval_ms(self) -> u32 {
        match self {
            SpeedPreset::Slow => 200,
            SpeedPreset::Normal => 150,
            SpeedPreset::Fast => 100,
        }
    }
}

impl FromStr for SpeedPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(SpeedPreset::Slow),
            "normal" => Ok(SpeedPreset::Normal),
            "fast" => Ok(SpeedPreset::Fast),
            other => Err(format!("Unknown speed '{}', expected slow, normal or fast", other)),
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedPreset::Slow => write!(f, "slow"),
            SpeedPreset::Normal => write!(f, "normal"),
            SpeedPreset::Fast => write!(f, "fast"),
        }
    }
}

/// Everything a round is configured with. Passed in explicitly; the engine
/// never looks settings up on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameSettings {
    pub speed_ms: u32,
    pub grid_size: u32,
    pub wall_mode: WallMode,
    pub obstacles: ObstacleDensity,
    pub fruit_spawn_mode: FoodSpawnMode,
    pub theme: Theme,
}

impl GameSettings {
    pub fn grid_size(&self) -> usize {
        self.grid_size as usize
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed_ms as u64)
    }

    /// Board-shaping changes that cannot apply mid-round.
    pub fn requires_reset(&self, other: &GameSettings) -> bool {
        self.grid_size != other.grid_size || self.obstacles != other.obstacles
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            speed_ms: SpeedPreset::Normal.interval_ms(),
            grid_size: 20,
            wall_mode: WallMode::Portal,
            obstacles: ObstacleDensity::None,
            fruit_spawn_mode: FoodSpawnMode::Timed,
            theme: Theme::Colorful,
        }
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if !SUPPORTED_GRID_SIZES.contains(&self.grid_size) {
            return Err(format!(
                "grid_size must be one of {:?}, got {}",
                SUPPORTED_GRID_SIZES, self.grid_size
            ));
        }
        if self.speed_ms < MIN_TICK_INTERVAL_MS || self.speed_ms > MAX_TICK_INTERVAL_MS {
            return Err(format!(
                "speed_ms must be between {} and {}, got {}",
                MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS, self.speed_ms
            ));
        }
        Ok(())
    }
}
