use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board size {width}x{height}, both sides must be at least 9")]
    InvalidDimensions { width: Coord, height: Coord },
    #[error("Invalid mine count {mines}, expected at least 10 and at most {max}")]
    InvalidMineCount { mines: CellCount, max: CellCount },
    #[error("Cannot place {requested} mines, only {capacity} cells are available")]
    GenerationCapacityExceeded {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Invalid coordinates")]
    InvalidCoords,
}

pub type Result<T> = core::result::Result<T, GameError>;
