//! # Game Module
//!
//! Core game state, entities and the NPC lifecycle.
//!
//! This module contains the fundamental building blocks of the engine:
//! - Grid coordinates, directions and entity identifiers
//! - Stat blocks, NPCs and the player
//! - Grid occupancy, combat resolution and the lifecycle manager
//! - Turn resolution and persistence

pub mod combat;
pub mod events;
pub mod grid;
pub mod lifecycle;
pub mod npc;
pub mod player;
pub mod state;
pub mod stats;

pub use combat::*;
pub use events::*;
pub use grid::*;
pub use lifecycle::*;
pub use npc::*;
pub use player::*;
pub use state::*;
pub use stats::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A cell coordinate: dungeon level, row and column.
///
/// Rows and columns are signed so that offsets can step off the grid; the
/// grid decides whether a position is in bounds.
///
/// # Examples
///
/// ```
/// use gridcrawl::Position;
///
/// let pos = Position::new(0, 5, 5);
/// assert_eq!(pos.level, 0);
/// assert_eq!(pos.to_string(), "[0, 5, 5]");
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub level: u32,
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(level: u32, row: i32, col: i32) -> Self {
        Self { level, row, col }
    }

    /// Returns the position shifted by a row/column delta on the same level.
    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.level, self.row + d_row, self.col + d_col)
    }

    /// Returns the neighbouring position in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.to_delta();
        self.offset(d_row, d_col)
    }

    /// The NPC generation level for monsters spawned on this floor.
    ///
    /// Floors are 0-based, NPC levels start at 1.
    pub fn dungeon_level(self) -> u32 {
        self.level + 1
    }

    /// Calculates the Manhattan distance to another position on the same level.
    ///
    /// Returns `None` when the positions are on different levels.
    pub fn manhattan_distance(self, other: Position) -> Option<u32> {
        if self.level != other.level {
            return None;
        }
        Some(self.row.abs_diff(other.row) + self.col.abs_diff(other.col))
    }

    /// Whether `other` is one orthogonal step away on the same level.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == Some(1)
    }

    /// Returns the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::all().into_iter().map(|dir| self.step(dir)).collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.level, self.row, self.col)
    }
}

/// Directions for player movement within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts a direction to a (row, column) delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridcrawl::Direction;
    ///
    /// assert_eq!(Direction::Up.to_delta(), (-1, 0));
    /// assert_eq!(Direction::Right.to_delta(), (0, 1));
    /// ```
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Parses a movement command key (`w`, `a`, `s`, `d`).
    pub fn from_command(command: char) -> Option<Direction> {
        match command.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }
}

/// Unique identifier for game entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}
