//! # Configuration
//!
//! Engine-wide constants and the runtime [`GameConfig`].
//!
//! The constants are the defaults; `GameConfig::from_env` lets a deployment
//! override the grid dimensions and boss chance without a rebuild.

use crate::generation::GenerationConfig;
use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default grid width in cells
pub const DEFAULT_GRID_WIDTH: u32 = 12;

/// Default grid height in cells
pub const DEFAULT_GRID_HEIGHT: u32 = 12;

/// Default number of dungeon levels
pub const DEFAULT_GRID_DEPTH: u32 = 3;

/// Flat max HP gained by each respawned NPC
pub const RESPAWN_MAX_HP_GROWTH: u32 = 10;

/// Upper bound of the random stat bump applied on respawn
pub const RESPAWN_MAX_STAT_BUMP: u32 = 3;

/// Credits an NPC is worth per level
pub const CREDITS_PER_LEVEL: u32 = 10;

/// Fractional stat growth per NPC level above 1
pub const LEVEL_STAT_GROWTH: f64 = 0.15;

/// Multiplier applied to boss stats and rewards
pub const BOSS_MULTIPLIER: u32 = 2;

/// Default probability that a generated NPC is a boss
pub const DEFAULT_BOSS_CHANCE: f64 = 0.1;

/// Number of exchanges after which a battle is called a stalemate
pub const MAX_BATTLE_ROUNDS: u32 = 200;

/// Default player starting health
pub const DEFAULT_PLAYER_HEALTH: u32 = 100;

/// Default player starting credits
pub const DEFAULT_PLAYER_CREDITS: u32 = 1000;

/// Share of the player's credits, in percent, taken by the NPC that kills them
pub const DEFEAT_CREDIT_PENALTY_PERCENT: u32 = 8;

/// Rules governing what happens after an NPC is defeated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespawnPolicy {
    /// Whether defeated bosses are replaced
    pub respawn_bosses: bool,
    /// Max HP added to each successor
    pub max_hp_growth: u32,
    /// Largest bump applied to the successor's boosted stat (at least 1)
    pub max_stat_bump: u32,
}

impl Default for RespawnPolicy {
    fn default() -> Self {
        Self {
            respawn_bosses: true,
            max_hp_growth: RESPAWN_MAX_HP_GROWTH,
            max_stat_bump: RESPAWN_MAX_STAT_BUMP,
        }
    }
}

/// Runtime configuration for a game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid width in cells
    pub grid_width: u32,
    /// Grid height in cells
    pub grid_height: u32,
    /// Number of levels
    pub grid_depth: u32,
    /// NPC generation parameters
    pub generation: GenerationConfig,
    /// Respawn rules
    pub respawn: RespawnPolicy,
}

impl GameConfig {
    /// Creates the default configuration for the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::GameConfig;
    ///
    /// let config = GameConfig::new(7);
    /// assert_eq!(config.grid_width, 12);
    /// assert_eq!(config.generation.seed, 7);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            grid_depth: DEFAULT_GRID_DEPTH,
            generation: GenerationConfig::new(seed),
            respawn: RespawnPolicy::default(),
        }
    }

    /// Creates a configuration for testing: no bosses, fixed base stats.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::for_testing(seed),
            ..Self::new(seed)
        }
    }

    /// Creates a configuration with overrides taken from the environment.
    ///
    /// Reads `GRID_WIDTH`, `GRID_HEIGHT`, `GRID_DEPTH` and `BOSS_CHANCE`.
    /// Unparseable values are logged and ignored.
    pub fn from_env(seed: u64) -> Self {
        Self::from_lookup(seed, |key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(seed: u64, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(seed);
        override_from(&lookup, "GRID_WIDTH", &mut config.grid_width);
        override_from(&lookup, "GRID_HEIGHT", &mut config.grid_height);
        override_from(&lookup, "GRID_DEPTH", &mut config.grid_depth);
        override_from(&lookup, "BOSS_CHANCE", &mut config.generation.boss_chance);
        config.generation.boss_chance = config.generation.boss_chance.clamp(0.0, 1.0);
        config
    }

    /// Number of cells on a single level.
    pub fn cells_per_level(&self) -> u32 {
        self.grid_width * self.grid_height
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!("Ignoring {}={:?}: not a valid value", key, raw),
        }
    }
}
