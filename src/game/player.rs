//! # Player
//!
//! The player-state seam consumed by the engine and its default implementation.

use crate::config::{DEFAULT_PLAYER_CREDITS, DEFAULT_PLAYER_HEALTH};
use crate::game::{CombatStat, Position, StatBlock};
use log::info;
use serde::{Deserialize, Serialize};

/// Player state as seen by the combat and lifecycle engine.
///
/// The engine reads position and HP, applies NPC damage and grants rewards.
/// It never owns the player's lifecycle.
pub trait PlayerState {
    /// Current grid position.
    fn position(&self) -> Position;

    /// Current combat stats.
    fn stats(&self) -> &StatBlock;

    /// Current HP.
    fn hp(&self) -> u32 {
        self.stats().current_hp
    }

    /// Whether the player can act (HP above zero).
    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Applies damage, clamped at 0. Returns the remaining HP.
    fn take_damage(&mut self, amount: u32) -> u32;

    /// Grants the rewards for a defeated NPC.
    fn apply_reward(&mut self, xp: u32, credits: u32);
}

/// The default player character.
///
/// Experience carries over between levels: every time it reaches
/// `experience_to_next_level` the player levels up and the threshold becomes
/// `level × 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub name: String,
    pub position: Position,
    pub stats: StatBlock,
    pub credits: u32,
    pub experience: u32,
    pub level: u32,
    pub experience_to_next_level: u32,
    pub highest_level: u32,
}

impl PlayerCharacter {
    /// Creates a level 1 player with the default starting stats.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::{PlayerCharacter, PlayerState, Position};
    ///
    /// let player = PlayerCharacter::new("Hero", Position::new(0, 3, 3));
    /// assert_eq!(player.hp(), 100);
    /// assert!(player.is_alive());
    /// ```
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            stats: StatBlock::new(DEFAULT_PLAYER_HEALTH, 10, 5, 5),
            credits: DEFAULT_PLAYER_CREDITS,
            experience: 0,
            level: 1,
            experience_to_next_level: 100,
            highest_level: 1,
        }
    }

    /// Replaces the stat block.
    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    /// Sets the position without touching the grid.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Sets current HP, clamped to max HP.
    pub fn set_hp(&mut self, hp: u32) {
        self.stats.current_hp = hp.min(self.stats.max_hp);
    }

    /// Adds experience and applies any level ups. Returns levels gained.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level {
            self.experience -= self.experience_to_next_level;
            self.level_up();
            self.experience_to_next_level = self.level.saturating_mul(100);
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
        self.stats.max_hp = self.stats.max_hp.saturating_add(20);
        self.stats.heal_full();
        self.stats.raise(CombatStat::Attack, 5);
        self.stats.raise(CombatStat::Defense, 3);
        self.stats.raise(CombatStat::Agility, 2);
        self.highest_level = self.highest_level.max(self.level);
        info!("{} reached level {}", self.name, self.level);
    }
}

impl PlayerState for PlayerCharacter {
    fn position(&self) -> Position {
        self.position
    }

    fn stats(&self) -> &StatBlock {
        &self.stats
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.stats.take_damage(amount)
    }

    fn apply_reward(&mut self, xp: u32, credits: u32) {
        self.credits = self.credits.saturating_add(credits);
        self.add_experience(xp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults() {
        let player = PlayerCharacter::new("Hero", Position::new(0, 6, 6));
        assert_eq!(player.level, 1);
        assert_eq!(player.credits, 1000);
        assert_eq!(player.stats, StatBlock::new(100, 10, 5, 5));
        assert_eq!(player.position(), Position::new(0, 6, 6));
    }

    #[test]
    fn test_dead_player() {
        let mut player = PlayerCharacter::new("Hero", Position::new(0, 3, 3));
        player.set_hp(0);
        assert_eq!(player.hp(), 0);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_reward_without_level_up() {
        let mut player = PlayerCharacter::new("Hero", Position::new(0, 0, 0));
        player.apply_reward(40, 25);
        assert_eq!(player.credits, 1025);
        assert_eq!(player.experience, 40);
        assert_eq!(player.level, 1);
    }

    #[test]
    fn test_multiple_level_ups() {
        let mut player = PlayerCharacter::new("Hero", Position::new(0, 0, 0));
        player.take_damage(50);

        // 100 for level 2, 200 for level 3, 50 left over
        let gained = player.add_experience(350);
        assert_eq!(gained, 2);
        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 50);
        assert_eq!(player.experience_to_next_level, 300);
        assert_eq!(player.stats.max_hp, 140);
        assert_eq!(player.stats.current_hp, 140);
        assert_eq!(player.stats.attack, 20);
        assert_eq!(player.stats.defense, 11);
        assert_eq!(player.stats.agility, 9);
        assert_eq!(player.highest_level, 3);
    }

    #[test]
    fn test_level_up_saturates() {
        let mut player = PlayerCharacter::new("Hero", Position::new(0, 0, 0))
            .with_stats(StatBlock::new(u32::MAX - 5, u32::MAX, u32::MAX - 1, 7));
        player.add_experience(100);
        assert_eq!(player.level, 2);
        assert_eq!(player.stats.max_hp, u32::MAX);
        assert_eq!(player.stats.current_hp, u32::MAX);
        assert_eq!(player.stats.attack, u32::MAX);
        assert_eq!(player.stats.defense, u32::MAX);
        assert_eq!(player.stats.agility, 9);
    }

    #[test]
    fn test_take_damage_clamps() {
        let mut player = PlayerCharacter::new("Hero", Position::new(0, 0, 0));
        assert_eq!(player.take_damage(30), 70);
        assert_eq!(player.take_damage(500), 0);
        assert!(!player.is_alive());
    }
}
