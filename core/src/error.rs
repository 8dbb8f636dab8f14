use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: a board of size {size:?} cannot hold {hazards} hazards")]
    InvalidConfig { size: Coord2, hazards: CellCount },
    #[error("Coordinates {coords:?} are outside the board of size {size:?}")]
    OutOfBounds { coords: Coord2, size: Coord2 },
    #[error("Board state does not match its hazard layout")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
