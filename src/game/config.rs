use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the game
///
/// Coordinates are in board units (screen pixels); every
/// cell is `block_size` wide, so the grid is `width / block_size` columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board
    pub width: i32,
    /// Height of the board
    pub height: i32,
    /// Size of one cell
    pub block_size: i32,
    /// Initial length of the snake
    pub initial_length: usize,
    /// Autonomous episodes end once steps exceed `stall_factor * length`
    pub stall_factor: u32,

    // Rewards (autonomous mode)
    /// Reward for eating food
    pub food_reward: i32,
    /// Reward for dying
    pub death_penalty: i32,

    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            block_size: 20,
            initial_length: 3,
            stall_factor: 100,
            food_reward: 10,
            death_penalty: -10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// A 10x10 grid, handy for tests
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    pub fn large() -> Self {
        Self::new(1200, 800)
    }

    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Number of cell columns
    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Validate configuration parameters
    ///
    /// `Ok(())` if the board is usable, `Err(String)` with the reason otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.block_size <= 0 {
            return Err(format!(
                "block_size must be positive, got {}",
                self.block_size
            ));
        }

        if self.width <= 0 || self.width % self.block_size != 0 {
            return Err(format!(
                "width must be a positive multiple of block_size ({}), got {}",
                self.block_size, self.width
            ));
        }

        if self.height <= 0 || self.height % self.block_size != 0 {
            return Err(format!(
                "height must be a positive multiple of block_size ({}), got {}",
                self.block_size, self.height
            ));
        }

        if self.initial_length == 0 {
            return Err("initial_length must be at least 1".to_string());
        }

        // The body trails left of the centre column
        let room = (self.columns() / 2 + 1) as usize;
        if self.initial_length > room {
            return Err(format!(
                "initial_length ({}) does not fit on a board {} columns wide",
                self.initial_length,
                self.columns()
            ));
        }

        if self.stall_factor == 0 {
            return Err("stall_factor must be at least 1".to_string());
        }

        Ok(())
    }
}
