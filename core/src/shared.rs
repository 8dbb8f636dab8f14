use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::*;

/// A [`Game`] that can be driven from several threads.
///
/// All mutating calls go through one lock. The status is mirrored into an atomic so a renderer can poll it
/// without contending with input handling.
#[derive(Debug)]
pub struct SharedGame {
    game: Mutex<Game>,
    status: AtomicU8,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        let status = AtomicU8::new(encode_status(game.status()));
        Self {
            game: Mutex::new(game),
            status,
        }
    }

    /// Last published status. May lag a move that is still holding the lock.
    pub fn status(&self) -> GameStatus {
        decode_status(self.status.load(Ordering::Acquire))
    }

    pub fn reveal_at(&self, coords: Coord2) -> Result<RevealOutcome> {
        self.update(|game| game.reveal_at(coords))
    }

    pub fn flag_at(&self, coords: Coord2) -> Result<FlagOutcome> {
        self.update(|game| game.flag_at(coords))
    }

    pub fn reset(&self, config: GameConfig, seed: Option<u64>) -> Result<()> {
        self.update(|game| game.reset(config, seed))
    }

    /// Runs `f` against a consistent view of the game.
    pub fn with_game<T>(&self, f: impl FnOnce(&Game) -> T) -> T {
        f(&self.lock())
    }

    pub fn into_inner(self) -> Game {
        self.game.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<T>(&self, f: impl FnOnce(&mut Game) -> T) -> T {
        let mut game = self.lock();
        let result = f(&mut game);
        self.status
            .store(encode_status(game.status()), Ordering::Release);
        result
    }

    // game operations never leave a half-applied move behind, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Game> for SharedGame {
    fn from(game: Game) -> Self {
        Self::new(game)
    }
}

const fn encode_status(status: GameStatus) -> u8 {
    match status {
        GameStatus::Playing => 0,
        GameStatus::Won => 1,
        GameStatus::Lost => 2,
    }
}

const fn decode_status(value: u8) -> GameStatus {
    match value {
        1 => GameStatus::Won,
        2 => GameStatus::Lost,
        _ => GameStatus::Playing,
    }
}
