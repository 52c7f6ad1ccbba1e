//! # Respawn Planning
//!
//! Derives a successor NPC from a defeated one and picks where it appears.

use crate::config::RespawnPolicy;
use crate::game::{new_entity_id, CombatStat, GridOccupancy, Npc, Position, StatBlock};
use crate::{GridcrawlError, GridcrawlResult};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Builds successors for defeated NPCs.
///
/// A successor gains a flat max HP increment, starts at full health and has
/// exactly one of attack, defense or agility raised by at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespawnPlanner {
    pub max_hp_growth: u32,
    pub max_stat_bump: u32,
}

impl Default for RespawnPlanner {
    fn default() -> Self {
        Self::from_policy(&RespawnPolicy::default())
    }
}

impl RespawnPlanner {
    pub fn from_policy(policy: &RespawnPolicy) -> Self {
        Self {
            max_hp_growth: policy.max_hp_growth,
            max_stat_bump: policy.max_stat_bump.max(1),
        }
    }

    /// Derives and places the successor of `defeated`.
    ///
    /// The new position is drawn uniformly from the empty cells of the
    /// defeated NPC's level, never its last position and never anything in
    /// `exclude` (callers pass the player's position there).
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::{Grid, Npc, Position, RespawnPlanner, StatBlock};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::collections::HashSet;
    ///
    /// let grid = Grid::new(12, 12, 1);
    /// let defeated = Npc::new("Respawn Candidate", 1, StatBlock::new(100, 10, 10, 10), Position::new(0, 6, 6));
    /// let mut rng = StdRng::seed_from_u64(9);
    ///
    /// let successor = RespawnPlanner::default()
    ///     .respawn(&defeated, &grid, &HashSet::new(), &mut rng)
    ///     .unwrap();
    /// assert_eq!(successor.stats.max_hp, 110);
    /// assert_eq!(successor.stats.current_hp, 110);
    /// assert_ne!(successor.position, defeated.position);
    /// assert_eq!(successor.lineage_id, defeated.lineage_id);
    /// ```
    pub fn respawn<G, R>(
        &self,
        defeated: &Npc,
        level_grid: &G,
        exclude: &HashSet<Position>,
        rng: &mut R,
    ) -> GridcrawlResult<Npc>
    where
        G: GridOccupancy + ?Sized,
        R: Rng + ?Sized,
    {
        let position = self.choose_cell(defeated, level_grid, exclude, rng)?;
        let (stats, boosted) = self.successor_stats(&defeated.stats, rng);

        debug!(
            "Successor of {} gains {} (max hp {} -> {})",
            defeated.display_name,
            boosted.name(),
            defeated.stats.max_hp,
            stats.max_hp
        );

        Ok(Npc {
            id: new_entity_id(),
            lineage_id: defeated.lineage_id,
            generation: defeated.generation + 1,
            display_name: defeated.display_name.clone(),
            kind: defeated.kind,
            title: defeated.title,
            level: defeated.level,
            stats,
            position,
            credits: defeated.credits,
            reward_multiplier: defeated.reward_multiplier,
        })
    }

    /// Grows max HP, heals fully and boosts one random combat stat.
    pub fn successor_stats<R: Rng + ?Sized>(&self, stats: &StatBlock, rng: &mut R) -> (StatBlock, CombatStat) {
        let mut next = *stats;
        next.max_hp = next.max_hp.saturating_add(self.max_hp_growth);
        next.heal_full();

        let boosted = *CombatStat::ALL.choose(rng).unwrap_or(&CombatStat::Attack);
        let bump = rng.gen_range(1..=self.max_stat_bump.max(1));
        next.raise(boosted, bump);
        (next, boosted)
    }

    /// Picks an eligible empty cell on the defeated NPC's level.
    pub fn choose_cell<G, R>(
        &self,
        defeated: &Npc,
        level_grid: &G,
        exclude: &HashSet<Position>,
        rng: &mut R,
    ) -> GridcrawlResult<Position>
    where
        G: GridOccupancy + ?Sized,
        R: Rng + ?Sized,
    {
        let level = defeated.position.level;
        let candidates: Vec<Position> = level_grid
            .empty_positions(level)
            .into_iter()
            .filter(|pos| *pos != defeated.position && !exclude.contains(pos))
            .collect();

        candidates
            .choose(rng)
            .copied()
            .ok_or(GridcrawlError::NoFreeCell { level })
    }
}
