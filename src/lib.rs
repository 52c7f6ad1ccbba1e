//! # Gridcrawl
//!
//! The NPC combat-and-lifecycle engine of a turn-based exploration game played
//! on a multi-level 2D grid.
//!
//! ## Architecture Overview
//!
//! The engine is organised around a small number of owned components:
//!
//! - **StatBlock**: numeric attributes shared by the player and NPCs
//! - **NpcGenerator**: procedural NPCs scaled by dungeon level, with boss variants
//! - **CombatResolver**: pure damage computation for a single attack
//! - **LifecycleManager**: owner of the live NPC set and the grid occupancy;
//!   applies damage, detects death, grants rewards and triggers respawns
//! - **RespawnPlanner**: derives a stronger successor from a defeated NPC
//! - **GameState**: turn resolution, player movement and persistence
//!
//! Rendering, input, crops, stores and portals live outside this crate. The
//! engine talks to them through the [`GridOccupancy`] and [`PlayerState`]
//! traits and through the [`GameEvent`] stream.

pub mod config;
pub mod game;
pub mod generation;
pub mod utils;

pub use config::*;
pub use game::*;
pub use generation::*;
pub use utils::*;

/// Core error type for the Gridcrawl engine.
///
/// Every variant is recoverable by the surrounding game loop.
#[derive(thiserror::Error, Debug)]
pub enum GridcrawlError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// NPC generation was asked for a level below 1
    #[error("Invalid NPC level {0}: levels start at 1")]
    InvalidLevel(u32),

    /// No live or defeated NPC has this id
    #[error("NPC {0} not found")]
    NotFound(EntityId),

    /// The NPC was already defeated; no second kill is possible
    #[error("NPC {0} is already dead")]
    AlreadyDead(EntityId),

    /// The level has no cell an NPC may be placed on
    #[error("No free cell on level {level}")]
    NoFreeCell { level: u32 },

    /// The position lies outside the grid
    #[error("Position {0} is out of bounds")]
    InvalidPosition(Position),

    /// The target cell already holds something
    #[error("Cell {0} is already occupied")]
    CellOccupied(Position),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Gridcrawl codebase.
pub type GridcrawlResult<T> = Result<T, GridcrawlError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
