use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Places mines on a freshly created, fully closed grid.
pub trait MineGenerator {
    fn generate(self, grid: &mut Grid, mines: CellCount) -> Result<()>;
}

/// How many more mines `grid` can take while still leaving one cell free.
fn free_capacity(grid: &Grid) -> CellCount {
    grid.safe_cell_count().saturating_sub(1)
}

/// Fails up front when `mines` would not fit, so sampling always terminates.
fn check_capacity(grid: &Grid, mines: CellCount) -> Result<()> {
    let capacity = free_capacity(grid);
    if mines > capacity {
        log::warn!(
            "Refusing to generate {} mines, only {} free cells can take one",
            mines,
            capacity
        );
        return Err(GameError::GenerationCapacityExceeded {
            requested: mines,
            capacity,
        });
    }
    Ok(())
}
