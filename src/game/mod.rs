//! Core Connect Four rules: board geometry, move legality, win and draw
//! detection, and the turn state machine that alternates human and automated
//! seats.

mod board;
mod controller;
mod engine;
mod player;
mod scoreboard;
mod session;

pub use board::{Board, BoardError, Cell, COLS, CONNECT, ROWS};
pub use controller::{HumanInput, SessionEvent, TurnController, TurnError, TurnReport, TurnState};
pub use engine::{winner_in_run, GameEngine, MoveError, Outcome};
pub use player::Player;
pub use scoreboard::Scoreboard;
pub use session::{GameSession, PlayedMove, SessionError};
