//! # NPCs
//!
//! Combat-capable grid entities and their category tags.

use crate::config::{BOSS_MULTIPLIER, CREDITS_PER_LEVEL};
use crate::game::{new_entity_id, EntityId, Position, StatBlock};
use serde::{Deserialize, Serialize};

/// Grid symbol used for every NPC.
pub const NPC_SYMBOL: char = 'E';

/// Whether an NPC is an ordinary monster or a boss variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcKind {
    Regular,
    Boss,
}

impl NpcKind {
    /// Default multiplier applied to stats and rewards.
    pub fn multiplier(self) -> u32 {
        match self {
            NpcKind::Regular => 1,
            NpcKind::Boss => BOSS_MULTIPLIER,
        }
    }

    /// Leading word of the display name.
    pub fn name_prefix(self) -> &'static str {
        match self {
            NpcKind::Regular => "Level",
            NpcKind::Boss => "Boss",
        }
    }
}

/// Fighting archetype shown in an NPC's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcTitle {
    Warrior,
    Hunter,
    Rogue,
    Brute,
    Knight,
    Guard,
}

impl NpcTitle {
    pub const ALL: [NpcTitle; 6] = [
        NpcTitle::Warrior,
        NpcTitle::Hunter,
        NpcTitle::Rogue,
        NpcTitle::Brute,
        NpcTitle::Knight,
        NpcTitle::Guard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NpcTitle::Warrior => "Warrior",
            NpcTitle::Hunter => "Hunter",
            NpcTitle::Rogue => "Rogue",
            NpcTitle::Brute => "Brute",
            NpcTitle::Knight => "Knight",
            NpcTitle::Guard => "Guard",
        }
    }
}

/// A single NPC instance.
///
/// Each instance has its own `id`. Respawned successors get a fresh id but
/// share `lineage_id` with the NPC they were derived from, and their
/// `generation` counts how many respawns separate them from the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: EntityId,
    pub lineage_id: EntityId,
    pub generation: u32,
    pub display_name: String,
    pub kind: NpcKind,
    pub title: Option<NpcTitle>,
    /// Generation level, 1 or higher
    pub level: u32,
    pub stats: StatBlock,
    pub position: Position,
    pub credits: u32,
    /// Boss multiplier this NPC was generated with, 1 for regular NPCs
    pub reward_multiplier: u32,
}

impl Npc {
    /// Creates a regular NPC that starts its own lineage.
    ///
    /// `current_hp` is kept as given so callers can stage wounded NPCs; it is
    /// clamped to `max_hp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::{Npc, Position, StatBlock};
    ///
    /// let npc = Npc::new("Test Dummy", 1, StatBlock::new(10, 5, 5, 5), Position::new(0, 5, 5));
    /// assert_eq!(npc.id, npc.lineage_id);
    /// assert_eq!(npc.credits, 10);
    /// assert!(!npc.is_boss());
    /// ```
    pub fn new(display_name: impl Into<String>, level: u32, stats: StatBlock, position: Position) -> Self {
        let id = new_entity_id();
        let mut stats = stats;
        stats.current_hp = stats.current_hp.min(stats.max_hp);
        Self {
            id,
            lineage_id: id,
            generation: 0,
            display_name: display_name.into(),
            kind: NpcKind::Regular,
            title: None,
            level,
            stats,
            position,
            credits: Self::credit_value_for(level, 1),
            reward_multiplier: 1,
        }
    }

    /// Credits an NPC of this level is worth under a reward multiplier.
    pub fn credit_value_for(level: u32, multiplier: u32) -> u32 {
        CREDITS_PER_LEVEL
            .saturating_mul(level)
            .saturating_mul(multiplier)
    }

    /// Sets the kind with its default multiplier, without touching stats.
    pub fn with_kind(self, kind: NpcKind) -> Self {
        self.with_multiplier(kind, kind.multiplier())
    }

    /// Sets the kind and the reward multiplier, recomputing credits.
    pub fn with_multiplier(mut self, kind: NpcKind, multiplier: u32) -> Self {
        self.kind = kind;
        self.reward_multiplier = multiplier;
        self.credits = Self::credit_value_for(self.level, multiplier);
        self
    }

    /// Moves the NPC to a new position before it is registered.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn is_boss(&self) -> bool {
        self.kind == NpcKind::Boss
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    /// Grid symbol for this NPC.
    pub fn symbol(&self) -> char {
        NPC_SYMBOL
    }

    /// Whether `other` belongs to the same lineage.
    pub fn shares_lineage(&self, other: &Npc) -> bool {
        self.lineage_id == other.lineage_id
    }

    /// Experience granted for defeating this NPC.
    ///
    /// The stat weight grows 10% per level above 1, never drops below
    /// `20 × level`, and is multiplied by `reward_multiplier`.
    pub fn experience_value(&self) -> u32 {
        let level_factor = 1.0 + f64::from(self.level.saturating_sub(1)) * 0.1;
        let mut xp = self.stats.experience_weight() * level_factor;
        xp = xp.max(20.0 * f64::from(self.level));
        xp *= f64::from(self.reward_multiplier);
        xp as u32
    }
}
