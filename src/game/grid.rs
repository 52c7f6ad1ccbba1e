//! # Grid Occupancy
//!
//! The authoritative map of which cell holds which entity symbol.
//!
//! [`GridOccupancy`] is the seam the engine consumes; [`Grid`] is the
//! in-memory implementation used by [`crate::GameState`] and the tests.

use crate::game::{EntityId, Position, NPC_SYMBOL};
use crate::{GridcrawlError, GridcrawlResult};
use serde::{Deserialize, Serialize};

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Player,
    Npc(EntityId),
    Portal,
    Store,
    Crop,
}

impl Cell {
    /// Display symbol for the presentation layer.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Player => '@',
            Cell::Npc(_) => NPC_SYMBOL,
            Cell::Portal => 'P',
            Cell::Store => 'S',
            Cell::Crop => '*',
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The NPC id if this cell holds an NPC.
    pub fn npc_id(self) -> Option<EntityId> {
        match self {
            Cell::Npc(id) => Some(id),
            _ => None,
        }
    }
}

/// Read/write access to grid cells.
///
/// `get` returns `None` for out-of-bounds positions; `set` and `clear` fail
/// with [`GridcrawlError::InvalidPosition`] for them.
pub trait GridOccupancy {
    /// Gets the contents of a cell.
    fn get(&self, position: Position) -> Option<Cell>;

    /// Overwrites the contents of a cell.
    fn set(&mut self, position: Position, cell: Cell) -> GridcrawlResult<()>;

    /// Empties a cell.
    fn clear(&mut self, position: Position) -> GridcrawlResult<()> {
        self.set(position, Cell::Empty)
    }

    /// All empty cells on a level, in row-major order.
    fn empty_positions(&self, level: u32) -> Vec<Position>;

    /// All non-empty cells on a level, in row-major order.
    fn occupants(&self, level: u32) -> Vec<(Position, Cell)>;

    /// Number of levels.
    fn depth(&self) -> u32;

    /// Whether the position is inside the grid.
    fn contains(&self, position: Position) -> bool {
        self.get(position).is_some()
    }
}

/// A dense three-dimensional grid stored level by level, row by row.
///
/// # Examples
///
/// ```
/// use gridcrawl::{Cell, Grid, GridOccupancy, Position};
///
/// let mut grid = Grid::new(4, 4, 2);
/// let pos = Position::new(1, 2, 3);
/// grid.set(pos, Cell::Store).unwrap();
/// assert_eq!(grid.get(pos), Some(Cell::Store));
/// assert_eq!(grid.empty_positions(1).len(), 15);
/// assert_eq!(grid.get(Position::new(2, 0, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    depth: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        let size = width as usize * height as usize * depth as usize;
        Self {
            width,
            height,
            depth,
            cells: vec![Cell::Empty; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Center cell of a level.
    pub fn center(&self, level: u32) -> Position {
        Position::new(level, (self.height / 2) as i32, (self.width / 2) as i32)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.level >= self.depth
            || position.row < 0
            || position.col < 0
            || position.row as u32 >= self.height
            || position.col as u32 >= self.width
        {
            return None;
        }
        let level_size = self.width as usize * self.height as usize;
        Some(
            position.level as usize * level_size
                + position.row as usize * self.width as usize
                + position.col as usize,
        )
    }

    fn level_positions(&self, level: u32) -> impl Iterator<Item = Position> + '_ {
        let rows = if level < self.depth { self.height } else { 0 };
        (0..rows).flat_map(move |row| {
            (0..self.width).map(move |col| Position::new(level, row as i32, col as i32))
        })
    }

    /// Renders one level as rows of symbols, for logs and debugging.
    ///
    /// Empty cells are drawn as `.` so the layout stays visible.
    pub fn render_level(&self, level: u32) -> String {
        let mut out = String::new();
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = self
                    .get(Position::new(level, row as i32, col as i32))
                    .unwrap_or_default();
                out.push(if cell.is_empty() { '.' } else { cell.symbol() });
            }
            out.push('\n');
        }
        out
    }

    /// Whether the stored cell vector matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.cells.len() == self.width as usize * self.height as usize * self.depth as usize
    }
}

impl GridOccupancy for Grid {
    fn get(&self, position: Position) -> Option<Cell> {
        self.index(position).and_then(|i| self.cells.get(i).copied())
    }

    fn set(&mut self, position: Position, cell: Cell) -> GridcrawlResult<()> {
        let slot = self
            .index(position)
            .and_then(|i| self.cells.get_mut(i))
            .ok_or(GridcrawlError::InvalidPosition(position))?;
        *slot = cell;
        Ok(())
    }

    fn empty_positions(&self, level: u32) -> Vec<Position> {
        self.level_positions(level)
            .filter(|pos| self.get(*pos) == Some(Cell::Empty))
            .collect()
    }

    fn occupants(&self, level: u32) -> Vec<(Position, Cell)> {
        self.level_positions(level)
            .filter_map(|pos| match self.get(pos) {
                Some(cell) if !cell.is_empty() => Some((pos, cell)),
                _ => None,
            })
            .collect()
    }

    fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::new_entity_id;

    #[test]
    fn test_grid_starts_empty() {
        let grid = Grid::new(12, 12, 3);
        assert!(grid.is_well_formed());
        assert_eq!(grid.empty_positions(0).len(), 144);
        assert_eq!(grid.empty_positions(2).len(), 144);
        assert!(grid.occupants(0).is_empty());
    }

    #[test]
    fn test_bounds() {
        let mut grid = Grid::new(3, 2, 1);
        assert!(grid.contains(Position::new(0, 1, 2)));
        assert!(!grid.contains(Position::new(0, 2, 0)));
        assert!(!grid.contains(Position::new(0, 0, 3)));
        assert!(!grid.contains(Position::new(0, -1, 0)));
        assert!(!grid.contains(Position::new(1, 0, 0)));
        assert!(matches!(
            grid.set(Position::new(0, 5, 5), Cell::Crop),
            Err(GridcrawlError::InvalidPosition(_))
        ));
        assert!(grid.empty_positions(1).is_empty());
    }

    #[test]
    fn test_set_and_clear() {
        let mut grid = Grid::new(5, 5, 1);
        let id = new_entity_id();
        let pos = Position::new(0, 2, 2);

        grid.set(pos, Cell::Npc(id)).unwrap();
        assert_eq!(grid.get(pos).and_then(Cell::npc_id), Some(id));
        assert_eq!(grid.occupants(0), vec![(pos, Cell::Npc(id))]);
        assert!(!grid.empty_positions(0).contains(&pos));

        grid.clear(pos).unwrap();
        assert_eq!(grid.get(pos), Some(Cell::Empty));
    }

    #[test]
    fn test_levels_are_independent() {
        let mut grid = Grid::new(2, 2, 2);
        grid.set(Position::new(0, 0, 0), Cell::Portal).unwrap();
        assert_eq!(grid.get(Position::new(1, 0, 0)), Some(Cell::Empty));
        assert_eq!(grid.empty_positions(0).len(), 3);
        assert_eq!(grid.empty_positions(1).len(), 4);
    }

    #[test]
    fn test_render_level() {
        let mut grid = Grid::new(3, 2, 1);
        grid.set(Position::new(0, 0, 1), Cell::Player).unwrap();
        grid.set(Position::new(0, 1, 2), Cell::Npc(new_entity_id())).unwrap();
        assert_eq!(grid.render_level(0), ".@.\n..E\n");
    }

    #[test]
    fn test_cell_symbols() {
        assert_eq!(Cell::Empty.symbol(), ' ');
        assert_eq!(Cell::Player.symbol(), '@');
        assert_eq!(Cell::Portal.symbol(), 'P');
        assert_eq!(Cell::Store.symbol(), 'S');
        assert_eq!(Cell::Crop.symbol(), '*');
    }
}
