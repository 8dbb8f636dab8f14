use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One play session: a [`Board`] plus the overall status.
///
/// Once the status is [`GameStatus::Won`] or [`GameStatus::Lost`] every move is a no-op until [`Game::reset`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "GameSnapshot", into = "GameSnapshot")]
pub struct Game {
    board: Board,
    status: GameStatus,
    seed: Option<u64>,
}

/// Starts a session on a `width × height` board. Without a seed a fresh one is drawn.
pub fn new_game(width: Coord, height: Coord, hazards: CellCount, seed: Option<u64>) -> Result<Game> {
    Game::new(GameConfig::new((width, height), hazards)?, seed)
}

impl Game {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let (board, seed) = Self::generate_board(config, seed)?;
        Ok(Self {
            board,
            status: GameStatus::Playing,
            seed: Some(seed),
        })
    }

    /// Starts a session on a known layout.
    pub fn from_layout(layout: HazardLayout) -> Self {
        Self {
            board: Board::new(layout),
            status: GameStatus::Playing,
            seed: None,
        }
    }

    fn generate_board(config: GameConfig, seed: Option<u64>) -> Result<(Board, u64)> {
        let generator = match seed {
            Some(seed) => RandomLayoutGenerator::new(seed),
            None => RandomLayoutGenerator::from_entropy(),
        };
        let board = Board::generate(config, generator)?;
        Ok((board, generator.seed()))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    /// Seed the current board was generated from, `None` for boards built from an explicit layout.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn view_at(&self, coords: Coord2) -> Option<CellView> {
        self.board.view_at(coords)
    }

    pub fn hazards_left(&self) -> i32 {
        self.board.hazards_left()
    }

    pub fn reveal_at(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.status.is_terminal() {
            return Ok(RevealOutcome::NoOp);
        }

        let outcome = self.board.reveal(coords)?;
        if outcome == RevealOutcome::Hazard {
            self.finish(GameStatus::Lost);
        }
        Ok(outcome)
    }

    pub fn flag_at(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.status.is_terminal() {
            return Ok(FlagOutcome::NoOp);
        }

        let outcome = self.board.toggle_flag(coords)?;
        if self.board.is_cleared() {
            self.finish(GameStatus::Won);
        }
        Ok(outcome)
    }

    /// Replaces the board with a freshly generated one. On error the current session is left untouched.
    pub fn reset(&mut self, config: GameConfig, seed: Option<u64>) -> Result<()> {
        let (board, seed) = Self::generate_board(config, seed)?;
        self.replace_board(board, Some(seed));
        Ok(())
    }

    /// Starts over on a known layout, e.g. one taken from an earlier session's snapshot.
    pub fn replay(&mut self, layout: HazardLayout) -> Result<()> {
        let config = layout.game_config();
        let board = Board::generate(config, FixedLayoutGenerator::new(layout))?;
        self.replace_board(board, None);
        Ok(())
    }

    fn replace_board(&mut self, board: Board, seed: Option<u64>) {
        let config = board.config();
        log::debug!(
            "Reset to {}x{} board with {} hazards",
            config.size.0,
            config.size.1,
            config.hazards
        );
        self.board = board;
        self.status = GameStatus::Playing;
        self.seed = seed;
    }

    /// Resets with the current board dimensions and hazard count.
    pub fn restart(&mut self, seed: Option<u64>) -> Result<()> {
        self.reset(self.config(), seed)
    }

    fn finish(&mut self, status: GameStatus) {
        if self.status.is_terminal() {
            return;
        }
        log::info!(
            "Game {:?} with {} cells revealed and {} flags placed",
            status,
            self.board.revealed_count(),
            self.board.flagged_count()
        );
        self.status = status;
    }
}

/// Serialized form of a [`Game`]. The status is not stored; it follows from the restored board.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct GameSnapshot {
    board: Board,
    seed: Option<u64>,
}

impl From<Game> for GameSnapshot {
    fn from(game: Game) -> Self {
        Self {
            board: game.board,
            seed: game.seed,
        }
    }
}

impl From<GameSnapshot> for Game {
    fn from(snapshot: GameSnapshot) -> Self {
        let board = snapshot.board;
        let status = if board.is_detonated() {
            GameStatus::Lost
        } else if board.is_cleared() {
            GameStatus::Won
        } else {
            GameStatus::Playing
        };
        Self {
            board,
            status,
            seed: snapshot.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, hazards: &[Coord2]) -> Game {
        Game::from_layout(HazardLayout::from_hazard_coords(size, hazards).unwrap())
    }

    #[test]
    fn new_game_rejects_invalid_config() {
        assert_eq!(
            new_game(3, 3, 9, Some(1)),
            Err(GameError::InvalidConfig {
                size: (3, 3),
                hazards: 9
            })
        );
        assert!(new_game(0, 3, 1, None).is_err());
        assert!(new_game(3, 3, 0, None).is_err());
    }

    #[test]
    fn new_game_starts_playing_with_hidden_board() {
        let game = new_game(9, 9, 10, Some(3)).unwrap();

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.seed(), Some(3));
        assert_eq!(game.board().hazard_positions().count(), 10);
        assert!(game.board().iter_cells().all(|cell| cell.view() == CellView::Hidden));
    }

    #[test]
    fn unseeded_games_record_their_seed() {
        let game = new_game(9, 9, 10, None).unwrap();
        let seed = game.seed().unwrap();

        let replay = new_game(9, 9, 10, Some(seed)).unwrap();

        assert_eq!(game.board(), replay.board());
    }

    #[test]
    fn two_by_two_scenario() {
        let mut game = game((2, 2), &[(0, 0)]);

        assert_eq!(game.reveal_at((1, 1)).unwrap(), RevealOutcome::Opened(vec![(1, 1)]));
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.board().revealed_count(), 1);

        assert_eq!(game.reveal_at((0, 0)).unwrap(), RevealOutcome::Hazard);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn lost_game_ignores_moves() {
        let mut game = game((3, 3), &[(1, 1)]);
        game.reveal_at((1, 1)).unwrap();
        let snapshot = game.clone();

        assert_eq!(game.reveal_at((0, 0)).unwrap(), RevealOutcome::NoOp);
        assert_eq!(game.flag_at((2, 2)).unwrap(), FlagOutcome::NoOp);
        assert_eq!(game, snapshot);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn flagging_the_hazard_wins() {
        let mut game = game((3, 3), &[(2, 0)]);

        assert_eq!(game.flag_at((0, 0)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.status(), GameStatus::Playing);

        assert_eq!(game.flag_at((2, 0)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.board().revealed_count(), 0);

        assert_eq!(game.flag_at((2, 0)).unwrap(), FlagOutcome::NoOp);
        assert_eq!(game.reveal_at((1, 1)).unwrap(), RevealOutcome::NoOp);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn unflagging_before_the_last_hazard_keeps_playing() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);

        game.flag_at((0, 0)).unwrap();
        game.flag_at((0, 0)).unwrap();
        game.flag_at((2, 2)).unwrap();

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.hazards_left(), 1);
    }

    #[test]
    fn revealing_every_safe_cell_does_not_win() {
        let mut game = game((2, 1), &[(0, 0)]);

        assert_eq!(game.reveal_at((1, 0)).unwrap(), RevealOutcome::Opened(vec![(1, 0)]));

        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn flag_on_revealed_cell_and_reveal_on_flag_are_noops() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.reveal_at((1, 1)).unwrap();
        assert_eq!(game.flag_at((1, 1)).unwrap(), FlagOutcome::NoOp);

        game.flag_at((2, 2)).unwrap();
        assert_eq!(game.reveal_at((2, 2)).unwrap(), RevealOutcome::NoOp);
        assert_eq!(game.view_at((2, 2)), Some(CellView::Flagged));
    }

    #[test]
    fn out_of_bounds_moves_are_errors_even_when_finished() {
        let mut game = game((2, 2), &[(0, 0)]);

        assert!(matches!(game.reveal_at((2, 2)), Err(GameError::OutOfBounds { .. })));
        game.reveal_at((0, 0)).unwrap();
        assert!(matches!(game.flag_at((9, 0)), Err(GameError::OutOfBounds { .. })));
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn reset_after_loss_starts_fresh_board() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal_at((0, 0)).unwrap();

        let config = GameConfig::classic();
        game.reset(config, Some(99)).unwrap();

        let expected = Board::generate(config, RandomLayoutGenerator::new(99)).unwrap();
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.board(), &expected);
        assert_eq!(game.seed(), Some(99));
        assert!(game.board().iter_cells().all(|cell| !cell.is_revealed() && !cell.is_flagged()));
    }

    #[test]
    fn restart_after_win_keeps_config() {
        let mut game = game((3, 3), &[(1, 1)]);
        game.flag_at((1, 1)).unwrap();
        assert_eq!(game.status(), GameStatus::Won);

        game.restart(None).unwrap();

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.config(), GameConfig::new_unchecked((3, 3), 1));
        assert_eq!(game.board().flagged_count(), 0);
        assert!(game.seed().is_some());
    }

    #[test]
    fn invalid_reset_keeps_current_session() {
        let mut game = game((3, 3), &[(1, 1)]);
        game.reveal_at((0, 0)).unwrap();
        let snapshot = game.clone();

        let result = game.reset(GameConfig::new_unchecked((3, 3), 9), None);

        assert!(result.is_err());
        assert_eq!(game, snapshot);
    }

    #[test]
    fn replay_restores_layout_after_loss() {
        let mut game = new_game(9, 9, 10, Some(11)).unwrap();
        let layout = game.board().layout().clone();
        let hazard = layout.hazard_positions().next().unwrap();
        game.reveal_at(hazard).unwrap();
        assert_eq!(game.status(), GameStatus::Lost);

        game.replay(layout.clone()).unwrap();

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.board(), &Board::new(layout));
        assert_eq!(game.seed(), None);
    }

    #[test]
    fn snapshot_layout_cannot_overstate_hazards() {
        // the layout carries no separate count, so one hazard in the mask means one flag wins
        let layout = HazardLayout::from_hazard_coords((3, 3), &[(1, 1)]).unwrap();
        let json = serde_json::to_value(&layout).unwrap();
        assert!(json.get("hazard_count").is_none());
        let restored: HazardLayout = serde_json::from_value(json).unwrap();

        let mut game = game((2, 2), &[(0, 0)]);
        game.replay(restored).unwrap();
        game.flag_at((1, 1)).unwrap();

        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn snapshot_with_mismatched_grids_is_rejected() {
        let game = game((3, 3), &[(1, 1)]);
        let mut json = serde_json::to_value(&game).unwrap();
        json["board"]["revealed"] = serde_json::json!({
            "v": 1,
            "dim": [2, 2],
            "data": [false, false, false, false]
        });

        assert!(serde_json::from_value::<Game>(json).is_err());
    }

    #[test]
    fn snapshot_with_flagged_open_cell_is_rejected() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal_at((1, 1)).unwrap();
        let mut json = serde_json::to_value(&game).unwrap();
        json["board"]["flagged"]["data"] = serde_json::json!([false, false, false, true]);

        assert!(serde_json::from_value::<Game>(json).is_err());
    }

    #[test]
    fn restored_game_status_follows_board() {
        let mut lost = game((2, 2), &[(0, 0)]);
        lost.reveal_at((0, 0)).unwrap();
        let mut json = serde_json::to_value(&lost).unwrap();
        json["status"] = serde_json::json!("Playing");

        let restored: Game = serde_json::from_value(json).unwrap();

        assert_eq!(restored.status(), GameStatus::Lost);
        assert_eq!(restored.board().triggered_hazard(), Some((0, 0)));
        assert_eq!(restored, lost);

        let mut won = game((2, 2), &[(0, 0)]);
        won.flag_at((0, 0)).unwrap();
        let restored: Game = serde_json::from_str(&serde_json::to_string(&won).unwrap()).unwrap();
        assert_eq!(restored.status(), GameStatus::Won);
    }

    #[test]
    fn snapshot_roundtrip_preserves_session() {
        let mut game = new_game(16, 16, 40, Some(5)).unwrap();
        let safe = game
            .board()
            .iter_cells()
            .find(|cell| !cell.has_hazard())
            .map(Cell::position)
            .unwrap();
        game.reveal_at(safe).unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let restored: Game = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, game);
    }
}
