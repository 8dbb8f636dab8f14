use serde::{Deserialize, Serialize};

use crate::Coord2;

/// State of a single board position.
///
/// `has_hazard` and `adjacent_count` are fixed when the board is built. `revealed` only ever goes from
/// `false` to `true`, and `flagged` can only change while the cell is hidden.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Coord2,
    has_hazard: bool,
    adjacent_count: u8,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub(crate) const fn new(position: Coord2, has_hazard: bool, adjacent_count: u8) -> Self {
        Self {
            position,
            has_hazard,
            adjacent_count,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn position(&self) -> Coord2 {
        self.position
    }

    pub const fn has_hazard(&self) -> bool {
        self.has_hazard
    }

    pub const fn adjacent_count(&self) -> u8 {
        self.adjacent_count
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Hidden, unflagged cells are the only ones a reveal can open.
    pub const fn is_openable(&self) -> bool {
        !self.revealed && !self.flagged
    }

    pub const fn view(&self) -> CellView {
        match (self.revealed, self.flagged) {
            (false, false) => CellView::Hidden,
            (false, true) => CellView::Flagged,
            (true, _) if self.has_hazard => CellView::Hazard,
            (true, _) if self.adjacent_count == 0 => CellView::Empty,
            (true, _) => CellView::Count(self.adjacent_count),
        }
    }

    pub(crate) fn mark_revealed(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn toggle_flag(&mut self) -> bool {
        self.flagged = !self.flagged;
        self.flagged
    }
}

/// What a player is allowed to see of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Empty,
    Count(u8),
    Hazard,
}

impl CellView {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Empty | Self::Count(_) | Self::Hazard)
    }
}
