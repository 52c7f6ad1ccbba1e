//! # Game Events
//!
//! Lifecycle notifications consumed by the presentation layer and statistics.

use crate::game::{EntityId, Position};
use serde::{Deserialize, Serialize};

/// Something observable that happened during turn resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    NpcSpawned {
        npc_id: EntityId,
        position: Position,
    },
    NpcDamaged {
        npc_id: EntityId,
        damage: u32,
        remaining_hp: u32,
    },
    NpcDefeated {
        npc_id: EntityId,
        position: Position,
        experience: u32,
        credits: u32,
    },
    NpcRespawned {
        predecessor: EntityId,
        npc_id: EntityId,
        position: Position,
    },
    /// No free cell was available; the respawn will be retried next turn
    RespawnDeferred {
        npc_id: EntityId,
        level: u32,
    },
    PlayerDamaged {
        damage: u32,
        remaining_hp: u32,
    },
    /// The player fell; `credits_lost` went to the killer
    PlayerDied {
        killer: EntityId,
        credits_lost: u32,
    },
    PlayerMoved {
        from: Position,
        to: Position,
    },
    /// A move was refused because the player is dead
    MoveBlockedByDeath {
        position: Position,
    },
}
