use alloc::vec::Vec;

use super::*;

/// Places mines on an explicit list of cells, used for scripted boards.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl IntoIterator<Item = Coord2>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(self, grid: &mut Grid, mines: CellCount) -> Result<()> {
        check_capacity(grid, mines)?;

        for coords in self.mines {
            let coords = grid.validate_coords(coords)?;
            if !grid.place_mine(coords) {
                log::warn!("Duplicate mine at {:?} ignored", coords);
            }
        }

        if grid.mine_count() != mines {
            return Err(GameError::InvalidMineCount {
                mines: grid.mine_count(),
                max: mines,
            });
        }
        Ok(())
    }
}
