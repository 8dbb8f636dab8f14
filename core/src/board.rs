use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size grid of [`Cell`]s, stored row-major and addressed by `(x, y)`.
///
/// A board stops accepting moves once it is finished: either a hazard was revealed or every hazard is flagged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot", into = "BoardSnapshot")]
pub struct Board {
    layout: HazardLayout,
    cells: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    flagged_hazards: CellCount,
    triggered_hazard: Option<Coord2>,
}

impl Board {
    pub fn new(layout: HazardLayout) -> Self {
        let size = layout.size();
        let cells = Array2::from_shape_fn(grid_shape(size), |(y, x)| {
            let coords = (x as Coord, y as Coord);
            Cell::new(
                coords,
                layout.contains_hazard(coords),
                layout.adjacent_hazard_count(coords),
            )
        });

        Self {
            layout,
            cells,
            revealed_count: 0,
            flagged_count: 0,
            flagged_hazards: 0,
            triggered_hazard: None,
        }
    }

    pub fn generate(config: GameConfig, generator: impl LayoutGenerator) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn config(&self) -> GameConfig {
        self.layout.game_config()
    }

    pub fn layout(&self) -> &HazardLayout {
        &self.layout
    }

    pub fn hazard_count(&self) -> CellCount {
        self.layout.hazard_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Hazards not yet accounted for by a flag. Goes negative when more cells are flagged than there are hazards.
    pub fn hazards_left(&self) -> i32 {
        i32::from(self.hazard_count()) - i32::from(self.flagged_count)
    }

    pub fn triggered_hazard(&self) -> Option<Coord2> {
        self.triggered_hazard
    }

    pub fn is_detonated(&self) -> bool {
        self.triggered_hazard.is_some()
    }

    /// Every hazard-bearing cell is flagged. Revealing the safe cells is not required.
    pub fn is_cleared(&self) -> bool {
        self.flagged_hazards == self.hazard_count()
    }

    pub fn is_terminal(&self) -> bool {
        self.is_detonated() || self.is_cleared()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                coords,
                size: self.size(),
            })
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn view_at(&self, coords: Coord2) -> Option<CellView> {
        self.cell_at(coords).map(Cell::view)
    }

    /// All cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn hazard_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.layout.hazard_positions()
    }

    /// In-bounds positions at Chebyshev distance 1, in a fixed order.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.is_terminal() {
            return Ok(FlagOutcome::NoOp);
        }

        if self.cells[coords.to_nd_index()].is_revealed() {
            return Ok(FlagOutcome::NoOp);
        }

        Ok(self.toggle_flag_unchecked(coords))
    }

    fn toggle_flag_unchecked(&mut self, coords: Coord2) -> FlagOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        let has_hazard = cell.has_hazard();
        if cell.toggle_flag() {
            self.flagged_count += 1;
            if has_hazard {
                self.flagged_hazards += 1;
            }
            FlagOutcome::Flagged
        } else {
            self.flagged_count -= 1;
            if has_hazard {
                self.flagged_hazards -= 1;
            }
            FlagOutcome::Unflagged
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.is_terminal() || !self.cells[coords.to_nd_index()].is_openable() {
            return Ok(RevealOutcome::NoOp);
        }

        self.open_cell(coords);

        let cell = self.cells[coords.to_nd_index()];
        if cell.has_hazard() {
            self.triggered_hazard = Some(coords);
            return Ok(RevealOutcome::Hazard);
        }

        let mut opened = vec![coords];
        if cell.adjacent_count() == 0 {
            self.flood_reveal(coords, &mut opened);
        }
        log::trace!("reveal at {coords:?} opened {} cells", opened.len());

        Ok(RevealOutcome::Opened(opened))
    }

    /// Opens the region reachable from the zero-count cell at `origin`.
    ///
    /// Zero-count cells keep spreading, any other cell is opened and stops there. Every position is queued at
    /// most once, so the walk is bounded by the board area.
    fn flood_reveal(&mut self, origin: Coord2, opened: &mut Vec<Coord2>) {
        let mut visited: Array2<bool> = Array2::default(self.cells.raw_dim());
        visited[origin.to_nd_index()] = true;
        let mut to_visit: Vec<Coord2> = Vec::new();
        self.queue_neighbors(origin, &mut visited, &mut to_visit);

        while let Some(visit_coords) = to_visit.pop() {
            let cell = self.cells[visit_coords.to_nd_index()];
            if !cell.is_openable() {
                continue;
            }

            self.open_cell(visit_coords);
            opened.push(visit_coords);

            if !cell.has_hazard() && cell.adjacent_count() == 0 {
                self.queue_neighbors(visit_coords, &mut visited, &mut to_visit);
            }
        }
    }

    fn queue_neighbors(
        &self,
        coords: Coord2,
        visited: &mut Array2<bool>,
        to_visit: &mut Vec<Coord2>,
    ) {
        for pos in self.neighbors(coords) {
            let seen = &mut visited[pos.to_nd_index()];
            if !*seen && self.cells[pos.to_nd_index()].is_openable() {
                *seen = true;
                to_visit.push(pos);
            }
        }
    }

    fn open_cell(&mut self, coords: Coord2) {
        self.cells[coords.to_nd_index()].mark_revealed();
        self.revealed_count += 1;
    }
}

/// Serialized form of a [`Board`]: the layout plus which cells are open or flagged.
///
/// Everything else is rebuilt from these on load, so counters and adjacency cannot drift from the cells.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct BoardSnapshot {
    layout: HazardLayout,
    revealed: Array2<bool>,
    flagged: Array2<bool>,
}

impl From<Board> for BoardSnapshot {
    fn from(board: Board) -> Self {
        Self {
            revealed: board.cells.map(Cell::is_revealed),
            flagged: board.cells.map(Cell::is_flagged),
            layout: board.layout,
        }
    }
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = GameError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self> {
        let BoardSnapshot {
            layout,
            revealed,
            flagged,
        } = snapshot;
        let shape = grid_shape(layout.size());
        if revealed.shape() != &shape[..] || flagged.shape() != &shape[..] {
            return Err(GameError::InvalidBoardShape);
        }

        let mut board = Board::new(layout);
        for coords in iter_positions(board.size()) {
            let index = coords.to_nd_index();
            match (revealed[index], flagged[index]) {
                (true, true) => return Err(GameError::InvalidBoardShape),
                (true, false) => {
                    if board.layout.contains_hazard(coords) {
                        // only the move that ends the game can open a hazard
                        if board.triggered_hazard.is_some() {
                            return Err(GameError::InvalidBoardShape);
                        }
                        board.triggered_hazard = Some(coords);
                    }
                    board.open_cell(coords);
                }
                (false, true) => {
                    board.toggle_flag_unchecked(coords);
                }
                (false, false) => {}
            }
        }
        Ok(board)
    }
}
