use tracing::trace;

use super::board::{Board, BoardError, Cell, CONNECT};
use super::player::Player;

/// Terminal evaluation of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win(Player),
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error(transparent)]
    OutOfRange(#[from] BoardError),
}

/// Owns the canonical board: applies moves and detects wins and draws.
///
/// Wins are found by brute force over every run of four or more cells, which
/// keeps the check independent of how the position was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
}

impl GameEngine {
    pub fn new(board: Board) -> Self {
        GameEngine { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Drop a chip for `player` into `column`, returning the row it landed on.
    /// The board is untouched on error.
    pub fn apply_move(&mut self, player: Player, column: usize) -> Result<usize, MoveError> {
        let row = self
            .board
            .landing_row(column)?
            .ok_or(MoveError::ColumnFull { column })?;
        self.board.set(row, column, player.to_cell());
        trace!(player = player.name(), column, row, "chip placed");
        Ok(row)
    }

    /// First player found owning four identical cells in a row, scanning
    /// lines, then columns, then diagonals.
    pub fn evaluate_win(&self) -> Option<Player> {
        self.board.all_runs().iter().find_map(|run| winner_in_run(run))
    }

    /// Numeric form of [`GameEngine::evaluate_win`]: 0 when nobody has won
    pub fn winner_id(&self) -> u8 {
        self.evaluate_win().map_or(0, Player::id)
    }

    /// The board is full and nobody has four in a row
    pub fn evaluate_draw(&self) -> bool {
        self.board.is_full() && self.evaluate_win().is_none()
    }

    pub fn evaluate(&self) -> Outcome {
        if let Some(player) = self.evaluate_win() {
            Outcome::Win(player)
        } else if self.board.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(Board::standard())
    }
}

/// Owner of the first window of four identical non-empty cells in `run`
pub fn winner_in_run(run: &[Cell]) -> Option<Player> {
    run.windows(CONNECT).find_map(|window| {
        let first = window[0];
        if !first.is_empty() && window.iter().all(|&cell| cell == first) {
            first.player()
        } else {
            None
        }
    })
}
