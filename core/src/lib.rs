//! Rule engine for a minesweeper-style board game.
//!
//! The engine owns the board state, places hidden hazards, reveals cells with flood propagation across safe
//! regions, and decides when a session is won or lost. Drawing and input translation belong to the caller,
//! which only talks to [`Game`] (or [`SharedGame`]) and reads [`CellView`]s back.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use shared::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod game;
mod generator;
mod shared;
mod types;

/// Board dimensions plus the number of hazards to hide in it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub hazards: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, hazards: CellCount) -> Self {
        Self { size, hazards }
    }

    pub fn new(size: Coord2, hazards: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, hazards);
        config.validate()?;
        Ok(config)
    }

    /// A board needs at least one cell of each kind: `0 < hazards < width * height`.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 || self.hazards == 0 || self.hazards >= self.total_cells() {
            return Err(GameError::InvalidConfig {
                size: self.size,
                hazards: self.hazards,
            });
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.hazards)
    }

    /// The 10x10 board with 10 hazards the game ships with.
    pub const fn classic() -> Self {
        Self::new_unchecked((10, 10), 10)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked((30, 16), 99)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Which positions of a board hold a hazard.
///
/// Serialized as the bare hazard mask. Size and hazard count are always derived from the mask, so a snapshot
/// cannot make them disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<bool>", into = "Array2<bool>")]
pub struct HazardLayout {
    size: Coord2,
    hazard_mask: Array2<bool>,
    hazard_count: CellCount,
}

impl HazardLayout {
    /// Builds a layout from a `height × width` mask, checking it describes a playable board.
    pub fn from_hazard_mask(hazard_mask: Array2<bool>) -> Result<Self> {
        let (rows, columns) = hazard_mask.dim();
        let hazards = hazard_mask.iter().filter(|&&is_hazard| is_hazard).count();
        let hazard_count = CellCount::try_from(hazards).unwrap_or(CellCount::MAX);

        let (Ok(width), Ok(height)) = (Coord::try_from(columns), Coord::try_from(rows)) else {
            return Err(GameError::InvalidConfig {
                size: (Coord::MAX, Coord::MAX),
                hazards: hazard_count,
            });
        };

        let layout = Self {
            size: (width, height),
            hazard_mask,
            hazard_count,
        };
        layout.game_config().validate()?;
        Ok(layout)
    }

    /// Builds a layout from explicit hazard positions. Duplicates collapse into one hazard.
    pub fn from_hazard_coords(size: Coord2, hazard_coords: &[Coord2]) -> Result<Self> {
        let mut hazard_mask: Array2<bool> = Array2::default(grid_shape(size));

        for &coords in hazard_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::OutOfBounds { coords, size });
            }
            hazard_mask[coords.to_nd_index()] = true;
        }

        Self::from_hazard_mask(hazard_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size, self.hazard_count)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn contains_hazard(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size) && self.hazard_mask[coords.to_nd_index()]
    }

    pub fn adjacent_hazard_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self.hazard_mask[pos.to_nd_index()])
            .count() as u8
    }

    pub fn hazard_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_positions(self.size).filter(|&pos| self.hazard_mask[pos.to_nd_index()])
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }
}

impl TryFrom<Array2<bool>> for HazardLayout {
    type Error = GameError;

    fn try_from(hazard_mask: Array2<bool>) -> Result<Self> {
        Self::from_hazard_mask(hazard_mask)
    }
}

impl From<HazardLayout> for Array2<bool> {
    fn from(layout: HazardLayout) -> Self {
        layout.hazard_mask
    }
}

/// Result of a reveal request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Nothing changed: the cell was already revealed, flagged, or the board is finished.
    NoOp,
    /// The revealed cell held a hazard.
    Hazard,
    /// Every position that went from hidden to revealed, starting with the requested one.
    Opened(Vec<Coord2>),
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoOp)
    }

    pub fn opened(&self) -> &[Coord2] {
        match self {
            Self::Opened(positions) => positions,
            _ => &[],
        }
    }
}

/// Result of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoOp,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoOp)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}
