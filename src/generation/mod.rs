//! # Generation Module
//!
//! Procedural NPC generation and respawn derivation.
//!
//! Generators only produce values. Placing an NPC on the grid is the
//! lifecycle manager's job, so generators never mutate occupancy.

pub mod names;
pub mod npcs;
pub mod respawn;

pub use names::*;
pub use npcs::*;
pub use respawn::*;

use crate::config::{BOSS_MULTIPLIER, CREDITS_PER_LEVEL, DEFAULT_BOSS_CHANCE, LEVEL_STAT_GROWTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Inclusive range a base stat is rolled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: u32,
    pub max: u32,
}

impl StatRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    pub fn fixed(value: u32) -> Self {
        Self::new(value, value)
    }

    /// Rolls a value; a reversed range is treated as its lower bound.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Configuration for procedural NPC generation.
///
/// Controls the base stat ranges, how stats grow with level, boss odds and
/// how many NPCs a freshly populated level receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    pub base_hp: StatRange,
    pub base_attack: StatRange,
    pub base_defense: StatRange,
    pub base_agility: StatRange,
    /// Fractional stat growth per level above 1
    pub level_growth: f64,
    /// Probability (0.0 to 1.0) that a generated NPC is a boss
    pub boss_chance: f64,
    /// Stat and reward multiplier for bosses
    pub boss_multiplier: u32,
    /// Credits per NPC level
    pub credits_per_level: u32,
    /// Minimum number of NPCs placed on a populated level
    pub min_npcs_per_level: u32,
    /// Maximum number of NPCs placed on a populated level
    pub max_npcs_per_level: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert!(config.base_hp.min <= config.base_hp.max);
    /// assert!(config.min_npcs_per_level <= config.max_npcs_per_level);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            base_hp: StatRange::new(60, 90),
            base_attack: StatRange::new(8, 15),
            base_defense: StatRange::new(5, 8),
            base_agility: StatRange::new(5, 8),
            level_growth: LEVEL_STAT_GROWTH,
            boss_chance: DEFAULT_BOSS_CHANCE,
            boss_multiplier: BOSS_MULTIPLIER,
            credits_per_level: CREDITS_PER_LEVEL,
            min_npcs_per_level: 2,
            max_npcs_per_level: 4,
        }
    }

    /// Creates a configuration for testing: fixed base stats and no bosses.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            base_hp: StatRange::fixed(80),
            base_attack: StatRange::fixed(10),
            base_defense: StatRange::fixed(6),
            base_agility: StatRange::fixed(6),
            boss_chance: 0.0,
            ..Self::new(seed)
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}
