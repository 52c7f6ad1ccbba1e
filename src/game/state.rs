//! # Game State Module
//!
//! Turn resolution, player movement and persistence.
//!
//! `GameState` owns the lifecycle manager (and through it the grid and the
//! live NPC set), the player and the seeded random number generator. Every
//! observable change is pushed onto an event queue that the presentation
//! layer drains with [`GameState::drain_events`].

use crate::config::{GameConfig, DEFEAT_CREDIT_PENALTY_PERCENT, MAX_BATTLE_ROUNDS};
use crate::game::{
    BattleOutcome, BattleRecord, Cell, CombatResolver, Direction, EntityId, ExchangeReport,
    GameEvent, GridOccupancy, LifecycleManager, PlayerCharacter, PlayerState, Position,
    TurnOrder,
};
use crate::{GridcrawlError, GridcrawlResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Result of a movement command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The player stepped onto an empty cell
    Moved(Position),
    /// The player is dead and cannot move
    DeathBlocked,
    /// The step would leave the grid
    OutOfBounds,
    /// A non-NPC feature occupies the target cell
    Blocked(Cell),
    /// The target cell holds an NPC; one exchange was fought instead of moving
    Engaged(ExchangeReport),
}

/// Running totals derived from the event stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub npcs_spawned: u32,
    pub npcs_defeated: u32,
    pub npcs_respawned: u32,
    pub respawns_deferred: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub deaths: u32,
    pub steps_taken: u64,
    pub moves_blocked: u32,
    pub battles_fought: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub credits_earned: u64,
    pub credits_lost: u64,
    pub experience_earned: u64,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::NpcSpawned { .. } => self.npcs_spawned += 1,
            GameEvent::NpcDamaged { damage, .. } => self.damage_dealt += u64::from(*damage),
            GameEvent::NpcDefeated {
                experience,
                credits,
                ..
            } => {
                self.npcs_defeated += 1;
                self.experience_earned += u64::from(*experience);
                self.credits_earned += u64::from(*credits);
            }
            GameEvent::NpcRespawned { .. } => self.npcs_respawned += 1,
            GameEvent::RespawnDeferred { .. } => self.respawns_deferred += 1,
            GameEvent::PlayerDamaged { damage, .. } => self.damage_taken += u64::from(*damage),
            GameEvent::PlayerDied { credits_lost, .. } => {
                self.deaths += 1;
                self.credits_lost += u64::from(*credits_lost);
            }
            GameEvent::PlayerMoved { .. } => self.steps_taken += 1,
            GameEvent::MoveBlockedByDeath { .. } => self.moves_blocked += 1,
        }
    }
}

/// Central game state.
///
/// The random number generator is not serialized; it is reseeded from
/// `rng_seed` and `turn_number` when a save is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    /// Owner of the grid and the live NPC set
    pub lifecycle: LifecycleManager,
    pub player: PlayerCharacter,
    /// Current game turn number
    pub turn_number: u64,
    pub statistics: GameStatistics,
    pub battle_history: Vec<BattleRecord>,
    /// Random number generator seed
    pub rng_seed: u64,
    #[serde(skip, default = "unseeded_rng")]
    rng: StdRng,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

fn unseeded_rng() -> StdRng {
    StdRng::seed_from_u64(0)
}

impl GameState {
    /// Creates a game with the default configuration and no NPCs.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::{GameState, Position};
    ///
    /// let state = GameState::new(42).unwrap();
    /// assert_eq!(state.player.position, Position::new(0, 6, 6));
    /// assert_eq!(state.lifecycle.live_count(), 0);
    /// ```
    pub fn new(seed: u64) -> GridcrawlResult<Self> {
        Self::with_config(GameConfig::new(seed))
    }

    /// Creates a game with the player on the center of level 0 and no NPCs.
    pub fn with_config(config: GameConfig) -> GridcrawlResult<Self> {
        let lifecycle = LifecycleManager::from_config(&config);
        let start = lifecycle.grid().center(0);
        let rng_seed = config.generation.seed;

        let mut state = Self {
            player: PlayerCharacter::new("Player", start),
            lifecycle,
            config,
            turn_number: 0,
            statistics: GameStatistics::new(),
            battle_history: Vec::new(),
            rng_seed,
            rng: StdRng::seed_from_u64(rng_seed),
            events: Vec::new(),
        };
        state.place_player(start)?;
        Ok(state)
    }

    /// Creates a game and populates every level with NPCs.
    pub fn new_populated(config: GameConfig) -> GridcrawlResult<Self> {
        let mut state = Self::with_config(config)?;
        let exclude: HashSet<Position> = [state.player.position].into_iter().collect();

        for floor in 0..state.config.grid_depth {
            let spawned = state
                .lifecycle
                .populate_level(floor, &exclude, &mut state.rng)?;
            for npc_id in spawned {
                if let Some(npc) = state.lifecycle.get(npc_id) {
                    let position = npc.position;
                    state.emit(GameEvent::NpcSpawned { npc_id, position });
                }
            }
        }
        info!(
            "New game (seed {}) with {} NPCs",
            state.rng_seed,
            state.lifecycle.live_count()
        );
        Ok(state)
    }

    /// Moves the player marker to `position`.
    ///
    /// The target must be in bounds and empty (or the player's own cell).
    pub fn place_player(&mut self, position: Position) -> GridcrawlResult<()> {
        match self.lifecycle.grid().get(position) {
            None => return Err(GridcrawlError::InvalidPosition(position)),
            Some(Cell::Empty) | Some(Cell::Player) => {}
            Some(_) => return Err(GridcrawlError::CellOccupied(position)),
        }
        let from = self.player.position;
        if self.lifecycle.grid().get(from) == Some(Cell::Player) {
            self.lifecycle.clear_feature(from)?;
        }
        self.lifecycle.place_feature(position, Cell::Player)?;
        self.player.set_position(position);
        Ok(())
    }

    /// Handles a movement command.
    ///
    /// A dead player stays put and a `MoveBlockedByDeath` event is emitted.
    /// Stepping onto an NPC fights one exchange instead of moving.
    pub fn move_player(&mut self, direction: Direction) -> GridcrawlResult<MoveOutcome> {
        let from = self.player.position;
        if !self.player.is_alive() {
            info!("Move {:?} refused: player is dead", direction);
            self.emit(GameEvent::MoveBlockedByDeath { position: from });
            return Ok(MoveOutcome::DeathBlocked);
        }

        let to = from.step(direction);
        match self.lifecycle.grid().get(to) {
            None => Ok(MoveOutcome::OutOfBounds),
            Some(Cell::Npc(npc_id)) => Ok(MoveOutcome::Engaged(self.player_attack(npc_id)?)),
            Some(Cell::Empty) => {
                self.place_player(to)?;
                self.emit(GameEvent::PlayerMoved { from, to });
                Ok(MoveOutcome::Moved(to))
            }
            Some(cell) => Ok(MoveOutcome::Blocked(cell)),
        }
    }

    /// Fights one exchange against an NPC.
    ///
    /// The first striker follows [`CombatResolver::turn_order`]; the second
    /// only strikes if both sides are still standing. A kill triggers the
    /// respawn immediately, and a missing free cell defers it.
    pub fn player_attack(&mut self, npc_id: EntityId) -> GridcrawlResult<ExchangeReport> {
        if self.lifecycle.is_defeated(npc_id) {
            return Err(GridcrawlError::AlreadyDead(npc_id));
        }
        let npc_stats = self
            .lifecycle
            .get(npc_id)
            .map(|npc| npc.stats)
            .ok_or(GridcrawlError::NotFound(npc_id))?;
        if !self.player.is_alive() {
            return Err(GridcrawlError::InvalidState(
                "a dead player cannot attack".to_string(),
            ));
        }

        let mut report = ExchangeReport {
            npc_id,
            damage_dealt: 0,
            damage_taken: 0,
            npc_remaining_hp: npc_stats.current_hp,
            player_remaining_hp: self.player.hp(),
            defeat: None,
            successor: None,
            credits_lost: 0,
        };

        match CombatResolver::turn_order(&self.player.stats, &npc_stats) {
            TurnOrder::PlayerFirst => {
                self.player_strike(&mut report)?;
                if report.defeat.is_none() {
                    self.npc_strike(&mut report);
                }
            }
            TurnOrder::NpcFirst => {
                self.npc_strike(&mut report);
                if self.player.is_alive() {
                    self.player_strike(&mut report)?;
                }
            }
        }

        report.player_remaining_hp = self.player.hp();
        Ok(report)
    }

    fn player_strike(&mut self, report: &mut ExchangeReport) -> GridcrawlResult<()> {
        let npc_id = report.npc_id;
        let npc_stats = self
            .lifecycle
            .get(npc_id)
            .map(|npc| npc.stats)
            .ok_or(GridcrawlError::NotFound(npc_id))?;
        let damage = CombatResolver::resolve_attack(&self.player.stats, &npc_stats);
        let damage_report = self.lifecycle.apply_damage(npc_id, damage, &mut self.player)?;

        report.damage_dealt += damage;
        report.npc_remaining_hp = damage_report.remaining_hp;
        self.emit(GameEvent::NpcDamaged {
            npc_id,
            damage,
            remaining_hp: damage_report.remaining_hp,
        });

        if let Some(defeat) = damage_report.defeat {
            self.emit(GameEvent::NpcDefeated {
                npc_id,
                position: defeat.npc.position,
                experience: defeat.reward.experience,
                credits: defeat.reward.credits,
            });
            report.defeat = Some(defeat);
            report.successor = self.respawn_after(npc_id);
        }
        Ok(())
    }

    fn npc_strike(&mut self, report: &mut ExchangeReport) {
        let Some(npc) = self.lifecycle.get(report.npc_id) else {
            return;
        };
        let damage = CombatResolver::resolve_attack(&npc.stats, &self.player.stats);
        let name = npc.display_name.clone();
        let remaining_hp = self.player.take_damage(damage);
        debug!("{} hits the player for {} ({} HP left)", name, damage, remaining_hp);

        report.damage_taken += damage;
        self.emit(GameEvent::PlayerDamaged {
            damage,
            remaining_hp,
        });
        if remaining_hp == 0 {
            warn!("The player was defeated by {}", name);
            let credits_lost = self.forfeit_credits(report.npc_id);
            report.credits_lost += credits_lost;
            self.emit(GameEvent::PlayerDied {
                killer: report.npc_id,
                credits_lost,
            });
        }
    }

    /// Moves the defeat penalty from the player's purse to the killer.
    fn forfeit_credits(&mut self, killer: EntityId) -> u32 {
        let penalty = u64::from(self.player.credits) * u64::from(DEFEAT_CREDIT_PENALTY_PERCENT) / 100;
        let penalty = u32::try_from(penalty).unwrap_or(self.player.credits);
        match self.lifecycle.award_credits(killer, penalty) {
            Ok(total) => {
                self.player.credits = self.player.credits.saturating_sub(penalty);
                info!("The player lost {} credits; the killer now carries {}", penalty, total);
                penalty
            }
            Err(e) => {
                warn!("Could not hand the defeat penalty to {}: {}", killer, e);
                0
            }
        }
    }

    /// Attempts the respawn of a freshly defeated NPC.
    fn respawn_after(&mut self, defeated_id: EntityId) -> Option<EntityId> {
        match self
            .lifecycle
            .respawn_defeated(defeated_id, self.player.position, &mut self.rng)
        {
            Ok(Some(npc_id)) => {
                if let Some(npc) = self.lifecycle.get(npc_id) {
                    let position = npc.position;
                    self.emit(GameEvent::NpcRespawned {
                        predecessor: defeated_id,
                        npc_id,
                        position,
                    });
                }
                Some(npc_id)
            }
            Ok(None) => None,
            Err(GridcrawlError::NoFreeCell { level }) => {
                self.emit(GameEvent::RespawnDeferred {
                    npc_id: defeated_id,
                    level,
                });
                None
            }
            Err(e) => {
                warn!("Respawn of {} failed: {}", defeated_id, e);
                None
            }
        }
    }

    /// Fights exchanges until one side falls or the round cap is reached.
    ///
    /// The result is appended to `battle_history`.
    pub fn battle(&mut self, npc_id: EntityId) -> GridcrawlResult<BattleRecord> {
        if self.lifecycle.is_defeated(npc_id) {
            return Err(GridcrawlError::AlreadyDead(npc_id));
        }
        let npc_name = self
            .lifecycle
            .get(npc_id)
            .map(|npc| npc.display_name.clone())
            .ok_or(GridcrawlError::NotFound(npc_id))?;

        let mut record = BattleRecord {
            npc_name,
            outcome: BattleOutcome::Stalemate,
            rounds: 0,
            damage_dealt: 0,
            damage_taken: 0,
            credits_gained: 0,
            experience_gained: 0,
            credits_lost: 0,
        };

        while record.rounds < MAX_BATTLE_ROUNDS {
            let exchange = self.player_attack(npc_id)?;
            record.rounds += 1;
            record.damage_dealt += exchange.damage_dealt;
            record.damage_taken += exchange.damage_taken;

            if let Some(defeat) = &exchange.defeat {
                record.outcome = BattleOutcome::Victory;
                record.credits_gained = defeat.reward.credits;
                record.experience_gained = defeat.reward.experience;
                break;
            }
            if exchange.player_defeated() {
                record.outcome = BattleOutcome::Defeat;
                record.credits_lost = exchange.credits_lost;
                break;
            }
        }

        info!(
            "Battle against {}: {:?} after {} rounds",
            record.npc_name, record.outcome, record.rounds
        );
        self.statistics.battles_fought += 1;
        match record.outcome {
            BattleOutcome::Victory => self.statistics.battles_won += 1,
            BattleOutcome::Defeat => self.statistics.battles_lost += 1,
            BattleOutcome::Stalemate => {}
        }
        self.battle_history.push(record.clone());
        Ok(record)
    }

    /// Advances the game by one turn and retries deferred respawns.
    ///
    /// Returns the number of NPCs that respawned this turn.
    pub fn advance_turn(&mut self) -> usize {
        self.turn_number += 1;
        let placed = self
            .lifecycle
            .retry_pending_respawns(self.player.position, &mut self.rng);
        for (predecessor, npc_id) in &placed {
            if let Some(npc) = self.lifecycle.get(*npc_id) {
                let position = npc.position;
                self.emit(GameEvent::NpcRespawned {
                    predecessor: *predecessor,
                    npc_id: *npc_id,
                    position,
                });
            }
        }
        placed.len()
    }

    /// Takes every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Renders the level the player is on.
    pub fn render_current_level(&self) -> String {
        self.lifecycle.grid().render_level(self.player.position.level)
    }

    fn emit(&mut self, event: GameEvent) {
        self.statistics.update_from_event(&event);
        self.events.push(event);
    }

    /// Saves the game state to JSON.
    pub fn save_to_json(&self) -> GridcrawlResult<String> {
        serde_json::to_string_pretty(self).map_err(GridcrawlError::from)
    }

    /// Loads game state from JSON and checks that it is consistent.
    pub fn load_from_json(json: &str) -> GridcrawlResult<Self> {
        let mut state: Self = serde_json::from_str(json)?;
        if !state.lifecycle.grid().is_well_formed() {
            return Err(GridcrawlError::InvalidState(
                "grid cells do not match its dimensions".to_string(),
            ));
        }
        state.lifecycle.check_consistency()?;
        if state.lifecycle.grid().get(state.player.position) != Some(Cell::Player) {
            return Err(GridcrawlError::InvalidState(format!(
                "player marker missing at {}",
                state.player.position
            )));
        }
        state.rng = StdRng::seed_from_u64(state.rng_seed ^ state.turn_number);
        Ok(state)
    }

    /// Writes the game state to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> GridcrawlResult<()> {
        fs::write(path, self.save_to_json()?)?;
        Ok(())
    }

    /// Reads the game state from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> GridcrawlResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::load_from_json(&json)
    }
}
