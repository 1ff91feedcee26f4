use rand::prelude::*;

use super::*;

/// Uniform placement by rejection sampling: draw a random cell and retry whenever it already holds a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, grid: &mut Grid, mines: CellCount) -> Result<()> {
        check_capacity(grid, mines)?;

        let (width, height) = grid.size();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed = 0;
        let mut rejected = 0u32;
        while placed < mines {
            let coords = (rng.random_range(0..width), rng.random_range(0..height));
            if grid.place_mine(coords) {
                placed += 1;
            } else {
                rejected += 1;
            }
        }

        log::debug!(
            "Generated {} mines on {}x{} (seed {}, {} rejected samples)",
            placed,
            width,
            height,
            self.seed,
            rejected
        );
        Ok(())
    }
}
