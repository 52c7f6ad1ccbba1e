//! # Combat
//!
//! Pure damage resolution plus the report types produced by turn resolution.

use crate::game::{Defeat, EntityId, StatBlock};
use serde::{Deserialize, Serialize};

/// Which side strikes first in an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOrder {
    PlayerFirst,
    NpcFirst,
}

/// Stateless damage calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Damage dealt by one attack: `attack - defense`, floored at 0.
    ///
    /// Neither stat block is modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::{CombatResolver, StatBlock};
    ///
    /// let attacker = StatBlock::new(100, 15, 5, 5);
    /// let defender = StatBlock::new(10, 5, 0, 5);
    /// assert_eq!(CombatResolver::resolve_attack(&attacker, &defender), 15);
    /// assert_eq!(CombatResolver::resolve_attack(&defender, &attacker), 0);
    /// ```
    pub fn resolve_attack(attacker: &StatBlock, defender: &StatBlock) -> u32 {
        attacker.attack.saturating_sub(defender.defense)
    }

    /// Turn order for a player-initiated exchange.
    ///
    /// The player always opens. Agility is passed in so a speed-based policy
    /// can replace this without changing callers.
    pub fn turn_order(_player: &StatBlock, _npc: &StatBlock) -> TurnOrder {
        TurnOrder::PlayerFirst
    }
}

/// Result of one player-versus-NPC exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeReport {
    pub npc_id: EntityId,
    /// Damage the player dealt to the NPC
    pub damage_dealt: u32,
    /// Damage the NPC dealt back (0 if it did not get to strike)
    pub damage_taken: u32,
    pub npc_remaining_hp: u32,
    pub player_remaining_hp: u32,
    /// Present when the exchange killed the NPC
    pub defeat: Option<Defeat>,
    /// Successor registered after the kill, if any
    pub successor: Option<EntityId>,
    /// Credits the player forfeited to the NPC by dying
    pub credits_lost: u32,
}

impl ExchangeReport {
    pub fn npc_defeated(&self) -> bool {
        self.defeat.is_some()
    }

    pub fn player_defeated(&self) -> bool {
        self.player_remaining_hp == 0
    }
}

/// How a full battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// Round cap reached with both sides standing
    Stalemate,
}

/// Summary of a battle, kept in the game's battle history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub npc_name: String,
    pub outcome: BattleOutcome,
    pub rounds: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub credits_gained: u32,
    pub experience_gained: u32,
    pub credits_lost: u32,
}
