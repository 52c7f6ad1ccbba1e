//! # NPC Generation
//!
//! Produces level-scaled NPCs, with an occasional boss variant.

use crate::game::{new_entity_id, Npc, NpcKind, Position, StatBlock};
use crate::generation::{display_name, random_descriptor, random_title, GenerationConfig};
use crate::utils::{clamp_probability, scale_by_level};
use crate::{GridcrawlError, GridcrawlResult};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Procedural NPC generator.
///
/// Base stats are rolled from the configured ranges, then scaled by
/// `1 + growth × (level − 1)` and rounded. Bosses double every stat and
/// their credit reward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcGenerator {
    config: GenerationConfig,
}

impl NpcGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a new NPC for the given level.
    ///
    /// The NPC is not placed yet: its position is the origin of floor
    /// `level - 1` until the lifecycle manager registers it somewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::{GenerationConfig, NpcGenerator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let generator = NpcGenerator::new(GenerationConfig::for_testing(1));
    /// let mut rng = StdRng::seed_from_u64(1);
    ///
    /// let npc = generator.generate(3, 0.0, &mut rng).unwrap();
    /// assert_eq!(npc.level, 3);
    /// assert_eq!(npc.credits, 30);
    /// assert_eq!(npc.stats.current_hp, npc.stats.max_hp);
    ///
    /// assert!(generator.generate(0, 0.0, &mut rng).is_err());
    /// ```
    pub fn generate<R: Rng + ?Sized>(
        &self,
        level: u32,
        boss_chance: f64,
        rng: &mut R,
    ) -> GridcrawlResult<Npc> {
        if level < 1 {
            return Err(GridcrawlError::InvalidLevel(level));
        }

        let base = self.roll_base_stats(rng);
        let mut stats = self.scale_for_level(&base, level);

        let (kind, multiplier) = if rng.gen_bool(clamp_probability(boss_chance)) {
            (NpcKind::Boss, self.config.boss_multiplier)
        } else {
            (NpcKind::Regular, 1)
        };
        stats = stats.scaled(multiplier);

        let descriptor = random_descriptor(rng);
        let title = random_title(rng);
        let id = new_entity_id();

        let npc = Npc {
            id,
            lineage_id: id,
            generation: 0,
            display_name: display_name(kind, level, descriptor, title),
            kind,
            title: Some(title),
            level,
            stats,
            position: Position::new(level - 1, 0, 0),
            credits: self
                .config
                .credits_per_level
                .saturating_mul(level)
                .saturating_mul(multiplier),
            reward_multiplier: multiplier,
        };

        debug!(
            "Generated {} (hp {}, atk {}, def {}, agi {})",
            npc.display_name, stats.max_hp, stats.attack, stats.defense, stats.agility
        );
        Ok(npc)
    }

    /// Generates an NPC for a 0-based dungeon floor using the configured boss chance.
    pub fn generate_for_floor<R: Rng + ?Sized>(&self, floor: u32, rng: &mut R) -> GridcrawlResult<Npc> {
        let level = Position::new(floor, 0, 0).dungeon_level();
        self.generate(level, self.config.boss_chance, rng)
    }

    /// Rolls unscaled level 1 stats.
    pub fn roll_base_stats<R: Rng + ?Sized>(&self, rng: &mut R) -> StatBlock {
        StatBlock::new(
            self.config.base_hp.roll(rng),
            self.config.base_attack.roll(rng),
            self.config.base_defense.roll(rng),
            self.config.base_agility.roll(rng),
        )
    }

    /// Scales base stats for a level, each rounded and at least 1.
    pub fn scale_for_level(&self, base: &StatBlock, level: u32) -> StatBlock {
        let growth = self.config.level_growth;
        StatBlock::new(
            scale_by_level(base.max_hp, level, growth),
            scale_by_level(base.attack, level, growth),
            scale_by_level(base.defense, level, growth),
            scale_by_level(base.agility, level, growth),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::NpcTitle;
    use crate::generation::Descriptor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_generator() -> NpcGenerator {
        NpcGenerator::new(GenerationConfig::for_testing(1))
    }

    #[test]
    fn test_level_one_uses_base_stats() {
        let mut rng = StdRng::seed_from_u64(1);
        let npc = fixed_generator().generate(1, 0.0, &mut rng).unwrap();
        assert_eq!(npc.stats, StatBlock::new(80, 10, 6, 6));
        assert_eq!(npc.kind, NpcKind::Regular);
        assert_eq!(npc.credits, 10);
        assert!(npc.display_name.starts_with("Level 1 "));
    }

    #[test]
    fn test_stats_scale_with_level() {
        let mut rng = StdRng::seed_from_u64(2);
        // multiplier 1.3 at level 3
        let npc = fixed_generator().generate(3, 0.0, &mut rng).unwrap();
        assert_eq!(npc.stats, StatBlock::new(104, 13, 8, 8));
        assert_eq!(npc.position.level, 2);
    }

    #[test]
    fn test_boss_doubles_stats_and_credits() {
        let mut rng = StdRng::seed_from_u64(3);
        let boss = fixed_generator().generate(2, 1.0, &mut rng).unwrap();
        let regular = fixed_generator().scale_for_level(&StatBlock::new(80, 10, 6, 6), 2);
        assert!(boss.is_boss());
        assert_eq!(boss.stats, regular.scaled(2));
        assert_eq!(boss.credits, 40);
        assert!(boss.display_name.starts_with("Boss 2 "));
        assert_eq!(boss.reward_multiplier, 2);
    }

    #[test]
    fn test_custom_boss_multiplier_applies_to_every_reward() {
        let mut config = GenerationConfig::for_testing(8);
        config.boss_multiplier = 3;
        let generator = NpcGenerator::new(config);
        let mut rng = StdRng::seed_from_u64(8);

        let boss = generator.generate(1, 1.0, &mut rng).unwrap();
        let regular = generator.generate(1, 0.0, &mut rng).unwrap();
        assert_eq!(boss.stats, regular.stats.scaled(3));
        assert_eq!(boss.credits, regular.credits * 3);
        // 80 hp, 10 atk, 6 def, 6 agi: weight 54, above the 20 xp floor
        assert_eq!(regular.experience_value(), 54);
        assert_eq!(boss.experience_value(), 486);
    }

    #[test]
    fn test_invalid_level() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            fixed_generator().generate(0, 0.5, &mut rng),
            Err(GridcrawlError::InvalidLevel(0))
        ));
    }

    #[test]
    fn test_name_uses_vocabulary() {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = NpcGenerator::new(GenerationConfig::new(5));
        for _ in 0..30 {
            let npc = generator.generate(4, 0.5, &mut rng).unwrap();
            let words: Vec<&str> = npc.display_name.split(' ').collect();
            assert_eq!(words.len(), 4);
            assert_eq!(words[1], "4");
            assert!(Descriptor::ALL.iter().any(|d| d.name() == words[2]));
            assert!(NpcTitle::ALL.iter().any(|t| t.name() == words[3]));
            assert_eq!(npc.title.map(NpcTitle::name), Some(words[3]));
        }
    }

    #[test]
    fn test_random_stats_within_scaled_ranges() {
        let mut rng = StdRng::seed_from_u64(6);
        let generator = NpcGenerator::new(GenerationConfig::new(6));
        for _ in 0..50 {
            let npc = generator.generate(1, 0.0, &mut rng).unwrap();
            assert!((60..=90).contains(&npc.stats.max_hp));
            assert!((8..=15).contains(&npc.stats.attack));
            assert!((5..=8).contains(&npc.stats.defense));
            assert!((5..=8).contains(&npc.stats.agility));
        }
    }

    #[test]
    fn test_generate_for_floor() {
        let mut rng = StdRng::seed_from_u64(7);
        let npc = fixed_generator().generate_for_floor(0, &mut rng).unwrap();
        assert_eq!(npc.level, 1);
        assert_eq!(npc.position.level, 0);
    }
}
