use super::board::{Board, BoardError};
use super::engine::{GameEngine, MoveError, Outcome};
use super::player::Player;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("the game is over")]
    GameOver,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// A move that was applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    pub outcome: Outcome,
}

/// One game: the board, whose turn it is, and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    engine: GameEngine,
    current_player: Player,
    outcome: Outcome,
}

impl GameSession {
    /// Create a fresh session; Red moves first
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        Ok(Self::from_board(Board::new(height, width)?, Player::Red))
    }

    /// Resume from an existing position
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let engine = GameEngine::new(board);
        let outcome = engine.evaluate();
        GameSession {
            engine,
            current_player: to_move,
            outcome,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Play `column` for the player to move.
    ///
    /// The outcome is evaluated right after the chip lands; the turn passes to
    /// the other player only while the game is still in progress. On error
    /// nothing changes.
    pub fn play(&mut self, column: usize) -> Result<PlayedMove, SessionError> {
        if self.is_terminal() {
            return Err(SessionError::GameOver);
        }

        let player = self.current_player;
        let row = self.engine.apply_move(player, column)?;
        self.outcome = self.engine.evaluate();
        if !self.outcome.is_terminal() {
            self.current_player = player.other();
        }

        Ok(PlayedMove {
            player,
            column,
            row,
            outcome: self.outcome,
        })
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::from_board(Board::standard(), Player::Red)
    }
}
