//! # Stat Blocks
//!
//! Numeric combat attributes shared by the player and NPCs.

use serde::{Deserialize, Serialize};

/// The three stats a respawn can boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatStat {
    Attack,
    Defense,
    Agility,
}

impl CombatStat {
    /// All boostable stats.
    pub const ALL: [CombatStat; 3] = [CombatStat::Attack, CombatStat::Defense, CombatStat::Agility];

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            CombatStat::Attack => "attack",
            CombatStat::Defense => "defense",
            CombatStat::Agility => "agility",
        }
    }
}

/// Combat attributes of a single combatant.
///
/// `current_hp` never exceeds `max_hp`; damage saturates at 0. Agility does
/// not take part in damage yet but grows on respawn like the other stats.
///
/// # Examples
///
/// ```
/// use gridcrawl::StatBlock;
///
/// let mut stats = StatBlock::new(10, 5, 5, 5);
/// assert_eq!(stats.current_hp, 10);
/// assert_eq!(stats.take_damage(15), 0);
/// assert!(!stats.is_alive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_hp: u32,
    pub current_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
}

impl StatBlock {
    /// Creates a stat block at full health.
    pub fn new(max_hp: u32, attack: u32, defense: u32, agility: u32) -> Self {
        Self {
            max_hp,
            current_hp: max_hp,
            attack,
            defense,
            agility,
        }
    }

    /// Whether the combatant still has HP left.
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Subtracts `amount` from current HP, clamped at 0. Returns the new HP.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.current_hp
    }

    /// Restores `amount` HP without exceeding max HP.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp
    }

    /// Restores current HP to max HP.
    pub fn heal_full(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Current HP as a fraction of max HP, 0.0 for a zero-HP block.
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.current_hp) / f64::from(self.max_hp)
    }

    /// Raw experience weight of these stats before level and boss modifiers.
    pub fn experience_weight(&self) -> f64 {
        f64::from(self.max_hp) * 0.2
            + f64::from(self.attack) * 2.0
            + f64::from(self.defense) * 2.0
            + f64::from(self.agility)
    }

    /// Returns a copy with every stat multiplied by `factor`, at full health.
    pub fn scaled(&self, factor: u32) -> Self {
        Self::new(
            self.max_hp.saturating_mul(factor),
            self.attack.saturating_mul(factor),
            self.defense.saturating_mul(factor),
            self.agility.saturating_mul(factor),
        )
    }

    /// Reads one of the boostable stats.
    pub fn stat(&self, stat: CombatStat) -> u32 {
        match stat {
            CombatStat::Attack => self.attack,
            CombatStat::Defense => self.defense,
            CombatStat::Agility => self.agility,
        }
    }

    /// Raises one of the boostable stats by `amount`.
    pub fn raise(&mut self, stat: CombatStat, amount: u32) {
        let slot = match stat {
            CombatStat::Attack => &mut self.attack,
            CombatStat::Defense => &mut self.defense,
            CombatStat::Agility => &mut self.agility,
        };
        *slot = slot.saturating_add(amount);
    }
}
