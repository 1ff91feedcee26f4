use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular matrix of cells together with the number of mines placed on it.
///
/// Mines only enter or leave the grid through [`Grid::place_mine`] and [`Grid::remove_mine`], which keep every
/// neighbor's adjacency count in step, so `adjacent_mines` never has to be recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Grid {
    /// Empty grid for a validated configuration.
    pub fn new(config: BoardConfig) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            cells: Array2::default(config.size().to_nd_index()),
            mine_count: 0,
        })
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.cells.dim();
        // dimensions come from a `Coord2`, so they always fit
        (x as Coord, y as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (x, y) = self.size();
        mult(x, y)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn iter_neighborhood(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighborhood(coords)
    }

    /// All coordinates in row-major order (`y` outer, `x` inner).
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Number of neighbors satisfying `predicate`.
    pub fn count_neighbors(&self, coords: Coord2, predicate: impl Fn(Cell) -> bool) -> u8 {
        // at most 8
        self.iter_neighbors(coords)
            .filter(|&pos| predicate(self[pos]))
            .count() as u8
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// Puts a mine on `coords` and bumps the adjacency of its neighbors, returns `false` if one was already there.
    pub(crate) fn place_mine(&mut self, coords: Coord2) -> bool {
        if self[coords].is_mine() {
            return false;
        }
        self.cell_mut(coords).set_mine(true);
        for pos in self.iter_neighbors(coords) {
            self.cell_mut(pos).add_adjacent_mine();
        }
        self.mine_count += 1;
        true
    }

    /// Inverse of [`Grid::place_mine`], returns `false` if there was no mine.
    pub(crate) fn remove_mine(&mut self, coords: Coord2) -> bool {
        if !self[coords].is_mine() {
            return false;
        }
        self.cell_mut(coords).set_mine(false);
        for pos in self.iter_neighbors(coords) {
            self.cell_mut(pos).remove_adjacent_mine();
        }
        self.mine_count -= 1;
        true
    }

    /// Moves the mine at `from` onto the first mine-free cell in row-major order, skipping `from` itself.
    ///
    /// Returns where the mine landed. Nothing changes when there is no mine at `from` or no free cell to take it.
    pub(crate) fn relocate_mine(&mut self, from: Coord2) -> Result<Coord2> {
        let target = self
            .iter_coords()
            .find(|&pos| pos != from && !self[pos].is_mine())
            .ok_or(GameError::GenerationCapacityExceeded {
                requested: self.mine_count,
                capacity: self.total_cells() - 1,
            })?;

        if self.remove_mine(from) {
            self.place_mine(target);
        }
        Ok(target)
    }

    /// Mine count among the neighbors, computed from scratch.
    pub fn live_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Cell::is_mine)
    }

    /// Whether every stored adjacency count matches the live mine layout.
    pub fn is_consistent(&self) -> bool {
        let mines = self.iter_coords().filter(|&pos| self[pos].is_mine()).count();
        usize::from(self.mine_count) == mines
            && self
                .iter_coords()
                .all(|pos| self[pos].adjacent_mines() == self.live_adjacent_mines(pos))
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
