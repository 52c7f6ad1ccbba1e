//! # NPC Lifecycle
//!
//! Ownership of the live NPC set and the grid it occupies.
//!
//! Every NPC goes Alive → Dying → Removed. The Dying step only exists inside
//! [`LifecycleManager::apply_damage`]: the HP update, the grid removal, the
//! reward grant and the defeat record happen in one call, so no caller can
//! observe an NPC at 0 HP that still has a grid cell.
//!
//! Invariant: every live NPC has exactly one `Cell::Npc(id)` cell at its
//! position, and every `Cell::Npc(id)` belongs to a live NPC.

use crate::config::{GameConfig, RespawnPolicy};
use crate::game::{Cell, EntityId, Grid, GridOccupancy, Npc, PlayerState, Position};
use crate::generation::{NpcGenerator, RespawnPlanner, StatRange};
use crate::{GridcrawlError, GridcrawlResult};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Rewards granted to the player for a kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub experience: u32,
    pub credits: u32,
}

/// Record of a defeated NPC, kept until its respawn is settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defeat {
    /// Final state of the NPC, with 0 HP and its last position
    pub npc: Npc,
    pub reward: Reward,
}

/// Outcome of a single [`LifecycleManager::apply_damage`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub npc_id: EntityId,
    pub damage: u32,
    pub remaining_hp: u32,
    /// Present when this call killed the NPC
    pub defeat: Option<Defeat>,
}

/// Owner of the live NPC set and the grid occupancy.
///
/// Nothing else mutates NPC HP or NPC grid cells. Generators and the respawn
/// planner only produce values that are handed back here for registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleManager<G = Grid> {
    grid: G,
    live: HashMap<EntityId, Npc>,
    defeated: HashMap<EntityId, Defeat>,
    /// Defeated NPCs whose respawn is settled, mapped to their successor
    #[serde(default)]
    retired: HashMap<EntityId, Option<EntityId>>,
    pending_respawns: Vec<EntityId>,
    generator: NpcGenerator,
    policy: RespawnPolicy,
}

impl LifecycleManager<Grid> {
    /// Creates a manager over an empty grid sized by the config.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            Grid::new(config.grid_width, config.grid_height, config.grid_depth),
            NpcGenerator::new(config.generation.clone()),
            config.respawn,
        )
    }
}

impl<G: GridOccupancy> LifecycleManager<G> {
    pub fn new(grid: G, generator: NpcGenerator, policy: RespawnPolicy) -> Self {
        Self {
            grid,
            live: HashMap::new(),
            defeated: HashMap::new(),
            retired: HashMap::new(),
            pending_respawns: Vec::new(),
            generator,
            policy,
        }
    }

    /// Read-only view of the grid.
    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn generator(&self) -> &NpcGenerator {
        &self.generator
    }

    pub fn policy(&self) -> &RespawnPolicy {
        &self.policy
    }

    /// Gets a live NPC.
    pub fn get(&self, npc_id: EntityId) -> Option<&Npc> {
        self.live.get(&npc_id)
    }

    /// The live NPC standing on `position`, if any.
    ///
    /// Movement uses this to turn a step onto an NPC into combat.
    pub fn is_occupying(&self, position: Position) -> Option<&Npc> {
        let npc_id = self.grid.get(position)?.npc_id()?;
        self.live.get(&npc_id)
    }

    /// Live NPCs on a level, ordered by position.
    pub fn live_npcs(&self, level: u32) -> Vec<&Npc> {
        let mut npcs: Vec<&Npc> = self
            .live
            .values()
            .filter(|npc| npc.position.level == level)
            .collect();
        npcs.sort_by_key(|npc| npc.position);
        npcs
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Whether the id belongs to an NPC that has died.
    pub fn is_defeated(&self, npc_id: EntityId) -> bool {
        self.defeated.contains_key(&npc_id) || self.retired.contains_key(&npc_id)
    }

    /// Defeat record for an NPC that died and has not been replaced yet.
    ///
    /// The record is dropped once the respawn settles; only the successor id
    /// is kept after that.
    pub fn defeat_record(&self, npc_id: EntityId) -> Option<&Defeat> {
        self.defeated.get(&npc_id)
    }

    /// Successor registered in place of a defeated NPC.
    pub fn successor_of(&self, npc_id: EntityId) -> Option<EntityId> {
        self.retired.get(&npc_id).copied().flatten()
    }

    /// Defeated NPCs still waiting for a free cell.
    pub fn pending_respawns(&self) -> &[EntityId] {
        &self.pending_respawns
    }

    /// Adds an NPC to the live set and marks its cell.
    ///
    /// Fails if the NPC is dead, its id is already known, or its cell is out
    /// of bounds or not empty.
    pub fn register(&mut self, npc: Npc) -> GridcrawlResult<EntityId> {
        if !npc.is_alive() {
            return Err(GridcrawlError::InvalidState(format!(
                "cannot register NPC {} with 0 HP",
                npc.id
            )));
        }
        if self.live.contains_key(&npc.id) || self.is_defeated(npc.id) {
            return Err(GridcrawlError::InvalidState(format!(
                "NPC id {} is already in use",
                npc.id
            )));
        }
        match self.grid.get(npc.position) {
            None => return Err(GridcrawlError::InvalidPosition(npc.position)),
            Some(cell) if !cell.is_empty() => return Err(GridcrawlError::CellOccupied(npc.position)),
            Some(_) => {}
        }

        let npc_id = npc.id;
        self.grid.set(npc.position, Cell::Npc(npc_id))?;
        debug!("Registered {} at {}", npc.display_name, npc.position);
        self.live.insert(npc_id, npc);
        self.debug_check();
        Ok(npc_id)
    }

    /// Generates an NPC for `floor` and places it on a random empty cell.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        floor: u32,
        exclude: &HashSet<Position>,
        rng: &mut R,
    ) -> GridcrawlResult<EntityId> {
        if floor >= self.grid.depth() {
            return Err(GridcrawlError::InvalidPosition(Position::new(floor, 0, 0)));
        }
        let npc = self.generator.generate_for_floor(floor, rng)?;
        let candidates: Vec<Position> = self
            .grid
            .empty_positions(floor)
            .into_iter()
            .filter(|pos| !exclude.contains(pos))
            .collect();
        let position = candidates
            .choose(rng)
            .copied()
            .ok_or(GridcrawlError::NoFreeCell { level: floor })?;
        self.register(npc.at(position))
    }

    /// Places the configured number of NPCs on a level.
    ///
    /// Stops early, with a warning, once the level has no free cell left.
    pub fn populate_level<R: Rng + ?Sized>(
        &mut self,
        floor: u32,
        exclude: &HashSet<Position>,
        rng: &mut R,
    ) -> GridcrawlResult<Vec<EntityId>> {
        let config = self.generator.config();
        let count = StatRange::new(config.min_npcs_per_level, config.max_npcs_per_level).roll(rng);

        let mut spawned = Vec::new();
        for i in 0..count {
            match self.spawn(floor, exclude, rng) {
                Ok(npc_id) => spawned.push(npc_id),
                Err(GridcrawlError::NoFreeCell { .. }) => {
                    warn!("Could not place NPC {}/{} on level {}", i + 1, count, floor);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        info!("Populated level {} with {} NPCs", floor, spawned.len());
        Ok(spawned)
    }

    /// Applies damage to a live NPC. This is the only mutator of NPC HP.
    ///
    /// A lethal hit clears the NPC's cell, grants its rewards to `player`,
    /// records the defeat and drops the NPC from the live set before
    /// returning. Damaging a defeated NPC fails with
    /// [`GridcrawlError::AlreadyDead`] and changes nothing.
    pub fn apply_damage<P: PlayerState + ?Sized>(
        &mut self,
        npc_id: EntityId,
        amount: u32,
        player: &mut P,
    ) -> GridcrawlResult<DamageReport> {
        if self.is_defeated(npc_id) {
            return Err(GridcrawlError::AlreadyDead(npc_id));
        }
        let npc = self
            .live
            .get_mut(&npc_id)
            .ok_or(GridcrawlError::NotFound(npc_id))?;
        debug_assert!(npc.is_alive(), "live NPC {} has 0 HP", npc_id);

        let remaining_hp = npc.stats.current_hp.saturating_sub(amount);
        if remaining_hp > 0 {
            npc.stats.current_hp = remaining_hp;
            debug!("{} takes {} damage ({} HP left)", npc.display_name, amount, remaining_hp);
            return Ok(DamageReport {
                npc_id,
                damage: amount,
                remaining_hp,
                defeat: None,
            });
        }

        // Check the cell before touching anything so a desynced grid leaves
        // the NPC untouched.
        let position = npc.position;
        if self.grid.get(position) != Some(Cell::Npc(npc_id)) {
            return Err(GridcrawlError::InvalidState(format!(
                "NPC {} is not on its cell {}",
                npc_id, position
            )));
        }
        let mut npc = self
            .live
            .remove(&npc_id)
            .ok_or(GridcrawlError::NotFound(npc_id))?;
        npc.stats.current_hp = 0;
        self.grid.clear(position)?;

        let reward = Reward {
            experience: npc.experience_value(),
            credits: npc.credits,
        };
        player.apply_reward(reward.experience, reward.credits);
        info!(
            "{} defeated at {} ({} xp, {} credits)",
            npc.display_name, position, reward.experience, reward.credits
        );

        let defeat = Defeat { npc, reward };
        self.defeated.insert(npc_id, defeat.clone());
        self.debug_check();

        Ok(DamageReport {
            npc_id,
            damage: amount,
            remaining_hp: 0,
            defeat: Some(defeat),
        })
    }

    /// Derives and registers the successor of a defeated NPC.
    ///
    /// Returns `Ok(None)` when the respawn policy suppresses it (a boss with
    /// `respawn_bosses` off). On [`GridcrawlError::NoFreeCell`] the NPC is
    /// queued and [`retry_pending_respawns`](Self::retry_pending_respawns)
    /// tries again later. Calling this again after a successful respawn
    /// returns the existing successor.
    pub fn respawn_defeated<R: Rng + ?Sized>(
        &mut self,
        defeated_id: EntityId,
        player_position: Position,
        rng: &mut R,
    ) -> GridcrawlResult<Option<EntityId>> {
        if let Some(successor) = self.retired.get(&defeated_id) {
            return Ok(*successor);
        }
        let defeat = self
            .defeated
            .get(&defeated_id)
            .ok_or(GridcrawlError::NotFound(defeated_id))?;
        if defeat.npc.is_boss() && !self.policy.respawn_bosses {
            info!("{} stays dead: boss respawn is disabled", defeat.npc.display_name);
            self.retire(defeated_id, None);
            return Ok(None);
        }

        let exclude: HashSet<Position> = [player_position].into_iter().collect();
        let planner = RespawnPlanner::from_policy(&self.policy);
        match planner.respawn(&defeat.npc, &self.grid, &exclude, rng) {
            Ok(successor) => {
                let position = successor.position;
                let name = successor.display_name.clone();
                let successor_id = self.register(successor)?;
                self.retire(defeated_id, Some(successor_id));
                info!("{} respawned at {}", name, position);
                Ok(Some(successor_id))
            }
            Err(GridcrawlError::NoFreeCell { level }) => {
                if !self.pending_respawns.contains(&defeated_id) {
                    self.pending_respawns.push(defeated_id);
                }
                warn!("No free cell on level {} to respawn NPC {}; deferring", level, defeated_id);
                Err(GridcrawlError::NoFreeCell { level })
            }
            Err(e) => Err(e),
        }
    }

    /// Replaces a defeat record with the settled successor id.
    fn retire(&mut self, defeated_id: EntityId, successor: Option<EntityId>) {
        self.defeated.remove(&defeated_id);
        self.pending_respawns.retain(|id| *id != defeated_id);
        self.retired.insert(defeated_id, successor);
    }

    /// Adds credits to a live NPC, such as the stake it wins from a
    /// defeated player. Returns the NPC's new credit total.
    pub fn award_credits(&mut self, npc_id: EntityId, amount: u32) -> GridcrawlResult<u32> {
        if self.is_defeated(npc_id) {
            return Err(GridcrawlError::AlreadyDead(npc_id));
        }
        let npc = self
            .live
            .get_mut(&npc_id)
            .ok_or(GridcrawlError::NotFound(npc_id))?;
        npc.credits = npc.credits.saturating_add(amount);
        debug!("{} now carries {} credits", npc.display_name, npc.credits);
        Ok(npc.credits)
    }

    /// Retries every deferred respawn. Returns `(defeated, successor)` pairs
    /// for the ones that found a cell.
    pub fn retry_pending_respawns<R: Rng + ?Sized>(
        &mut self,
        player_position: Position,
        rng: &mut R,
    ) -> Vec<(EntityId, EntityId)> {
        let mut placed = Vec::new();
        for defeated_id in self.pending_respawns.clone() {
            match self.respawn_defeated(defeated_id, player_position, rng) {
                Ok(Some(successor_id)) => placed.push((defeated_id, successor_id)),
                Ok(None) | Err(GridcrawlError::NoFreeCell { .. }) => {}
                Err(e) => {
                    warn!("Dropping respawn of {}: {}", defeated_id, e);
                    self.pending_respawns.retain(|id| *id != defeated_id);
                }
            }
        }
        placed
    }

    /// Sets a non-NPC cell such as the player marker, a portal or a store.
    ///
    /// NPC cells can only change through registration and death.
    pub fn place_feature(&mut self, position: Position, cell: Cell) -> GridcrawlResult<()> {
        if cell.npc_id().is_some() {
            return Err(GridcrawlError::InvalidState(
                "NPC cells are managed by registration".to_string(),
            ));
        }
        match self.grid.get(position) {
            None => Err(GridcrawlError::InvalidPosition(position)),
            Some(Cell::Npc(_)) => Err(GridcrawlError::CellOccupied(position)),
            Some(_) => self.grid.set(position, cell),
        }
    }

    /// Empties a non-NPC cell.
    pub fn clear_feature(&mut self, position: Position) -> GridcrawlResult<()> {
        self.place_feature(position, Cell::Empty)
    }

    /// Verifies that the grid and the live NPC set agree.
    pub fn check_consistency(&self) -> GridcrawlResult<()> {
        for npc in self.live.values() {
            if !npc.is_alive() {
                return Err(GridcrawlError::InvalidState(format!(
                    "live NPC {} has 0 HP",
                    npc.id
                )));
            }
            if self.grid.get(npc.position) != Some(Cell::Npc(npc.id)) {
                return Err(GridcrawlError::InvalidState(format!(
                    "live NPC {} has no cell at {}",
                    npc.id, npc.position
                )));
            }
        }
        for level in 0..self.grid.depth() {
            for (position, cell) in self.grid.occupants(level) {
                if let Some(npc_id) = cell.npc_id() {
                    match self.live.get(&npc_id) {
                        Some(npc) if npc.position == position => {}
                        _ => {
                            return Err(GridcrawlError::InvalidState(format!(
                                "stale NPC symbol for {} at {}",
                                npc_id, position
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_consistency().is_ok(),
            "grid and live NPC set out of sync: {:?}",
            self.check_consistency().err()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PlayerCharacter, StatBlock};
    use crate::generation::GenerationConfig;
    use crate::NpcKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn manager(width: u32, height: u32) -> LifecycleManager {
        let mut config = GameConfig::for_testing(1);
        config.grid_width = width;
        config.grid_height = height;
        config.grid_depth = 1;
        LifecycleManager::from_config(&config)
    }

    fn dummy(hp: u32, position: Position) -> Npc {
        Npc::new("Test Dummy", 1, StatBlock::new(hp, 5, 5, 5), position)
    }

    fn player() -> PlayerCharacter {
        PlayerCharacter::new("Hero", Position::new(0, 0, 0))
    }

    #[test]
    fn test_register_marks_cell() {
        let mut lifecycle = manager(12, 12);
        let pos = Position::new(0, 5, 5);
        let npc_id = lifecycle.register(dummy(10, pos)).unwrap();

        assert_eq!(lifecycle.grid().get(pos), Some(Cell::Npc(npc_id)));
        assert_eq!(lifecycle.is_occupying(pos).map(|npc| npc.id), Some(npc_id));
        assert_eq!(lifecycle.live_count(), 1);
        assert!(lifecycle.check_consistency().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_cells() {
        let mut lifecycle = manager(4, 4);
        let pos = Position::new(0, 1, 1);
        lifecycle.register(dummy(10, pos)).unwrap();

        assert!(matches!(
            lifecycle.register(dummy(10, pos)),
            Err(GridcrawlError::CellOccupied(_))
        ));
        assert!(matches!(
            lifecycle.register(dummy(10, Position::new(0, 9, 9))),
            Err(GridcrawlError::InvalidPosition(_))
        ));

        let mut dead = dummy(10, Position::new(0, 2, 2));
        dead.stats.current_hp = 0;
        assert!(matches!(lifecycle.register(dead), Err(GridcrawlError::InvalidState(_))));
        assert_eq!(lifecycle.live_count(), 1);
    }

    #[test]
    fn test_non_lethal_damage() {
        let mut lifecycle = manager(12, 12);
        let mut hero = player();
        let npc_id = lifecycle.register(dummy(10, Position::new(0, 5, 5))).unwrap();

        let report = lifecycle.apply_damage(npc_id, 4, &mut hero).unwrap();
        assert_eq!(report.remaining_hp, 6);
        assert!(report.defeat.is_none());
        assert_eq!(lifecycle.get(npc_id).map(|npc| npc.stats.current_hp), Some(6));
        assert_eq!(hero.credits, 1000);
    }

    #[test]
    fn test_lethal_damage_is_atomic() {
        let mut lifecycle = manager(12, 12);
        let mut hero = player();
        let pos = Position::new(0, 5, 5);
        let npc_id = lifecycle.register(dummy(10, pos)).unwrap();

        let report = lifecycle.apply_damage(npc_id, 15, &mut hero).unwrap();
        assert_eq!(report.remaining_hp, 0);
        let defeat = report.defeat.expect("lethal hit should report a defeat");
        assert_eq!(defeat.npc.position, pos);
        assert_eq!(defeat.reward, Reward { experience: 27, credits: 10 });

        assert_eq!(lifecycle.grid().get(pos), Some(Cell::Empty));
        assert!(lifecycle.is_occupying(pos).is_none());
        assert!(lifecycle.get(npc_id).is_none());
        assert_eq!(hero.credits, 1010);
        assert_eq!(hero.experience, 27);
        assert!(lifecycle.defeat_record(npc_id).is_some());
    }

    #[test]
    fn test_damage_on_dead_npc_has_no_side_effects() {
        let mut lifecycle = manager(12, 12);
        let mut hero = player();
        let pos = Position::new(0, 5, 5);
        let npc_id = lifecycle.register(dummy(10, pos)).unwrap();
        lifecycle.apply_damage(npc_id, 10, &mut hero).unwrap();

        let before = hero.clone();
        let grid_before = lifecycle.grid().clone();
        assert!(matches!(
            lifecycle.apply_damage(npc_id, 5, &mut hero),
            Err(GridcrawlError::AlreadyDead(id)) if id == npc_id
        ));
        assert_eq!(hero, before);
        assert_eq!(lifecycle.grid(), &grid_before);
    }

    #[test]
    fn test_unknown_npc() {
        let mut lifecycle = manager(4, 4);
        let mut hero = player();
        let stranger = crate::game::new_entity_id();
        assert!(matches!(
            lifecycle.apply_damage(stranger, 1, &mut hero),
            Err(GridcrawlError::NotFound(_))
        ));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            lifecycle.respawn_defeated(stranger, hero.position, &mut rng),
            Err(GridcrawlError::NotFound(_))
        ));
    }

    #[test]
    fn test_award_credits() {
        let mut lifecycle = manager(4, 4);
        let mut hero = player();
        let npc_id = lifecycle.register(dummy(10, Position::new(0, 1, 1))).unwrap();
        let base = lifecycle.get(npc_id).unwrap().credits;

        assert_eq!(lifecycle.award_credits(npc_id, 80).unwrap(), base + 80);
        assert_eq!(lifecycle.award_credits(npc_id, u32::MAX).unwrap(), u32::MAX);

        lifecycle.apply_damage(npc_id, 10, &mut hero).unwrap();
        assert!(matches!(
            lifecycle.award_credits(npc_id, 1),
            Err(GridcrawlError::AlreadyDead(_))
        ));
        assert!(matches!(
            lifecycle.award_credits(crate::game::new_entity_id(), 1),
            Err(GridcrawlError::NotFound(_))
        ));
    }

    #[test]
    fn test_spawn_and_populate() {
        let mut lifecycle = manager(12, 12);
        let mut rng = StdRng::seed_from_u64(2);
        let player_pos = Position::new(0, 6, 6);
        let exclude: HashSet<Position> = [player_pos].into_iter().collect();

        let spawned = lifecycle.populate_level(0, &exclude, &mut rng).unwrap();
        assert!((2..=4).contains(&spawned.len()));
        assert_eq!(lifecycle.live_npcs(0).len(), spawned.len());
        for npc in lifecycle.live_npcs(0) {
            assert_ne!(npc.position, player_pos);
            assert_eq!(npc.level, 1);
        }
        assert!(lifecycle.check_consistency().is_ok());

        assert!(matches!(
            lifecycle.spawn(3, &exclude, &mut rng),
            Err(GridcrawlError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_populate_stops_when_full() {
        let mut lifecycle = manager(1, 1);
        let mut rng = StdRng::seed_from_u64(3);
        let spawned = lifecycle.populate_level(0, &HashSet::new(), &mut rng).unwrap();
        assert_eq!(spawned.len(), 1);
    }

    #[test]
    fn test_respawn_registers_successor() {
        let mut lifecycle = manager(12, 12);
        let mut hero = player();
        let mut rng = StdRng::seed_from_u64(4);
        let pos = Position::new(0, 6, 6);
        let original = Npc::new("Respawn Candidate", 1, StatBlock::new(100, 10, 10, 10), pos);
        let npc_id = lifecycle.register(original.clone()).unwrap();

        lifecycle.apply_damage(npc_id, 100, &mut hero).unwrap();
        let successor_id = lifecycle
            .respawn_defeated(npc_id, hero.position, &mut rng)
            .unwrap()
            .expect("regular NPCs respawn");

        let successor = lifecycle.get(successor_id).unwrap();
        assert_eq!(successor.lineage_id, original.lineage_id);
        assert_eq!(successor.stats.max_hp, 110);
        assert_ne!(successor.position, pos);
        assert_ne!(successor.position, hero.position);
        assert_eq!(lifecycle.successor_of(npc_id), Some(successor_id));
        // Only the successor id outlives the respawn
        assert!(lifecycle.defeat_record(npc_id).is_none());
        assert!(lifecycle.is_defeated(npc_id));
        assert!(matches!(
            lifecycle.apply_damage(npc_id, 1, &mut hero),
            Err(GridcrawlError::AlreadyDead(_))
        ));
        let saved = serde_json::to_value(&lifecycle).unwrap();
        assert_eq!(saved["defeated"], serde_json::json!({}));
        assert_eq!(
            saved["retired"][npc_id.to_string()],
            serde_json::json!(successor_id.to_string())
        );

        // A second request returns the same successor
        assert_eq!(
            lifecycle.respawn_defeated(npc_id, hero.position, &mut rng).unwrap(),
            Some(successor_id)
        );
        assert_eq!(lifecycle.live_count(), 1);
    }

    #[test]
    fn test_respawn_deferred_until_cell_frees() {
        // 1x3 level: NPC in the middle, player on the left, store on the right
        let mut lifecycle = manager(3, 1);
        let mut rng = StdRng::seed_from_u64(5);
        let mut hero = player();
        lifecycle.place_feature(Position::new(0, 0, 0), Cell::Player).unwrap();
        lifecycle.place_feature(Position::new(0, 0, 2), Cell::Store).unwrap();
        let npc_id = lifecycle.register(dummy(5, Position::new(0, 0, 1))).unwrap();

        lifecycle.apply_damage(npc_id, 5, &mut hero).unwrap();
        assert!(matches!(
            lifecycle.respawn_defeated(npc_id, hero.position, &mut rng),
            Err(GridcrawlError::NoFreeCell { level: 0 })
        ));
        assert_eq!(lifecycle.pending_respawns(), &[npc_id]);
        assert!(lifecycle.retry_pending_respawns(hero.position, &mut rng).is_empty());

        lifecycle.clear_feature(Position::new(0, 0, 2)).unwrap();
        let placed = lifecycle.retry_pending_respawns(hero.position, &mut rng);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0, npc_id);
        assert!(lifecycle.pending_respawns().is_empty());
        assert_eq!(
            lifecycle.get(placed[0].1).map(|npc| npc.position),
            Some(Position::new(0, 0, 2))
        );
    }

    #[test]
    fn test_boss_respawn_policy() {
        let mut config = GameConfig::for_testing(1);
        config.respawn.respawn_bosses = false;
        let mut lifecycle = LifecycleManager::from_config(&config);
        let mut hero = player();
        let mut rng = StdRng::seed_from_u64(6);

        let boss = dummy(10, Position::new(0, 2, 2)).with_kind(NpcKind::Boss);
        let boss_id = lifecycle.register(boss).unwrap();
        lifecycle.apply_damage(boss_id, 99, &mut hero).unwrap();

        assert_eq!(lifecycle.respawn_defeated(boss_id, hero.position, &mut rng).unwrap(), None);
        assert_eq!(lifecycle.live_count(), 0);
        assert!(lifecycle.is_defeated(boss_id));
        assert!(lifecycle.defeat_record(boss_id).is_none());
        assert_eq!(lifecycle.successor_of(boss_id), None);
    }

    #[test]
    fn test_features_cannot_touch_npc_cells() {
        let mut lifecycle = manager(4, 4);
        let pos = Position::new(0, 1, 1);
        let npc_id = lifecycle.register(dummy(10, pos)).unwrap();

        assert!(matches!(
            lifecycle.place_feature(pos, Cell::Crop),
            Err(GridcrawlError::CellOccupied(_))
        ));
        assert!(lifecycle.clear_feature(pos).is_err());
        assert!(lifecycle.place_feature(Position::new(0, 2, 2), Cell::Npc(npc_id)).is_err());
        assert!(lifecycle.place_feature(Position::new(0, 2, 2), Cell::Portal).is_ok());
    }

    #[test]
    fn test_consistency_detects_stale_symbol() {
        let mut lifecycle = manager(4, 4);
        lifecycle
            .grid
            .set(Position::new(0, 3, 3), Cell::Npc(crate::game::new_entity_id()))
            .unwrap();
        assert!(lifecycle.check_consistency().is_err());
    }

    #[test]
    fn test_generator_config_is_used() {
        let lifecycle = manager(4, 4);
        assert_eq!(lifecycle.generator().config(), &GenerationConfig::for_testing(1));
    }
}
