use std::sync::mpsc::{self, Receiver, Sender};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::board::{Board, BoardError};
use super::engine::{MoveError, Outcome};
use super::player::Player;
use super::scoreboard::Scoreboard;
use super::session::{GameSession, PlayedMove, SessionError};
use crate::ai::MoveProposer;
use crate::error::PolicyError;

/// Where the turn state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Awaiting(Player),
    Terminal(Outcome),
}

/// What happened during one half-move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub player: Player,
    /// Column first asked for (the human's pick or the policy's argmax)
    pub proposed: usize,
    /// Column the chip actually went into
    pub column: usize,
    pub row: usize,
    /// Random columns drawn after the policy's pick was rejected
    pub fallback_draws: usize,
    pub outcome: Outcome,
}

impl TurnReport {
    fn new(played: PlayedMove, proposed: usize, fallback_draws: usize) -> Self {
        TurnReport {
            player: played.player,
            proposed,
            column: played.column,
            row: played.row,
            fallback_draws,
            outcome: played.outcome,
        }
    }
}

/// Notifications sent to subscribers once a state change is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MovePlayed(TurnReport),
    /// A human picked a full column
    MoveRejected { player: Player, column: usize },
    GameOver(Outcome),
    SessionReset,
}

/// Result of a human click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanInput {
    /// The human's move, then any automated replies
    Played {
        human: TurnReport,
        replies: Vec<TurnReport>,
    },
    /// The game was over; the click started a new one
    Reset,
}

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("the game is over")]
    GameOver,

    #[error("{} is not played by a human", .player.name())]
    NotHumanTurn { player: Player },

    #[error("{} is not played by a policy", .player.name())]
    NotAutomatedTurn { player: Player },

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("policy failed: {0}")]
    Policy(#[from] PolicyError),
}

impl From<SessionError> for TurnError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::GameOver => TurnError::GameOver,
            SessionError::Move(err) => TurnError::Move(err),
        }
    }
}

/// Alternates the two seats over a [`GameSession`], asks automated seats for
/// their moves and reports terminal outcomes.
///
/// A policy pick that cannot be played is replaced by uniformly random columns
/// until one lands. A human pick that cannot be played is rejected and the
/// human keeps the turn.
pub struct TurnController {
    session: GameSession,
    red: MoveProposer,
    yellow: MoveProposer,
    scoreboard: Scoreboard,
    rng: StdRng,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl TurnController {
    pub fn new(
        height: usize,
        width: usize,
        red: MoveProposer,
        yellow: MoveProposer,
    ) -> Result<Self, BoardError> {
        Ok(Self::from_session(GameSession::new(height, width)?, red, yellow))
    }

    /// Start from an existing position
    pub fn from_session(session: GameSession, red: MoveProposer, yellow: MoveProposer) -> Self {
        TurnController {
            session,
            red,
            yellow,
            scoreboard: Scoreboard::default(),
            rng: StdRng::from_os_rng(),
            subscribers: Vec::new(),
        }
    }

    /// Seed the fallback column generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> TurnState {
        match self.session.outcome() {
            Outcome::InProgress => TurnState::Awaiting(self.session.current_player()),
            outcome => TurnState::Terminal(outcome),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn proposer(&self, player: Player) -> &MoveProposer {
        match player {
            Player::Red => &self.red,
            Player::Yellow => &self.yellow,
        }
    }

    /// Replace the proposer of one seat. A new game starts.
    pub fn set_proposer(&mut self, player: Player, proposer: MoveProposer) {
        info!(player = player.name(), proposer = proposer.label(), "seat reassigned");
        match player {
            Player::Red => self.red = proposer,
            Player::Yellow => self.yellow = proposer,
        }
        self.reset();
    }

    /// Receive a [`SessionEvent`] for every subsequent state change
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Throw the current game away and start a new one, Red to move.
    pub fn reset(&mut self) {
        self.session = GameSession::from_board(self.session.board().cleared(), Player::Red);
        info!("new game started");
        self.notify(SessionEvent::SessionReset);
    }

    /// Play `column` for the human whose turn it is.
    pub fn submit_human_move(&mut self, column: usize) -> Result<TurnReport, TurnError> {
        let player = self.awaiting()?;
        if !self.proposer(player).is_human() {
            return Err(TurnError::NotHumanTurn { player });
        }

        match self.session.play(column) {
            Ok(played) => {
                let report = TurnReport::new(played, column, 0);
                self.finish_turn(report);
                Ok(report)
            }
            Err(err) => {
                debug!(player = player.name(), column, %err, "human move rejected");
                if matches!(err, SessionError::Move(MoveError::ColumnFull { .. })) {
                    self.notify(SessionEvent::MoveRejected { player, column });
                }
                Err(err.into())
            }
        }
    }

    /// Let the automated seat whose turn it is pick and play a column.
    pub fn play_automated_turn(&mut self) -> Result<TurnReport, TurnError> {
        let player = self.awaiting()?;
        let MoveProposer::Automated(policy) = self.proposer(player) else {
            return Err(TurnError::NotAutomatedTurn { player });
        };
        let proposed = policy.propose(self.session.board(), player)?;

        let width = self.session.board().width();
        let mut column = proposed;
        let mut fallback_draws = 0;
        let played = loop {
            match self.session.play(column) {
                Ok(played) => break played,
                Err(SessionError::Move(err)) => {
                    fallback_draws += 1;
                    column = self.rng.random_range(0..width);
                    debug!(player = player.name(), %err, retry = column, "policy move rejected");
                }
                Err(SessionError::GameOver) => return Err(TurnError::GameOver),
            }
        };

        let report = TurnReport::new(played, proposed, fallback_draws);
        self.finish_turn(report);
        Ok(report)
    }

    /// Play automated turns until a human is to move or the game ends.
    pub fn advance(&mut self) -> Result<Vec<TurnReport>, TurnError> {
        let mut reports = Vec::new();
        while let TurnState::Awaiting(player) = self.state() {
            if self.proposer(player).is_human() {
                break;
            }
            reports.push(self.play_automated_turn()?);
        }
        Ok(reports)
    }

    /// Handle a human click on `column`.
    ///
    /// After a finished game the click starts a new one. Otherwise the human's
    /// move is played and automated seats answer.
    pub fn human_input(&mut self, column: usize) -> Result<HumanInput, TurnError> {
        if self.session.is_terminal() {
            self.reset();
            return Ok(HumanInput::Reset);
        }
        let human = self.submit_human_move(column)?;
        let replies = self.advance()?;
        Ok(HumanInput::Played { human, replies })
    }

    fn awaiting(&self) -> Result<Player, TurnError> {
        match self.state() {
            TurnState::Awaiting(player) => Ok(player),
            TurnState::Terminal(_) => Err(TurnError::GameOver),
        }
    }

    fn finish_turn(&mut self, report: TurnReport) {
        debug!(
            player = report.player.name(),
            column = report.column,
            row = report.row,
            fallback_draws = report.fallback_draws,
            "move played"
        );
        if report.fallback_draws > 0 {
            info!(
                proposed = report.proposed,
                played = report.column,
                "policy proposed an unplayable column, played a random one"
            );
        }
        self.notify(SessionEvent::MovePlayed(report));

        if report.outcome.is_terminal() {
            self.scoreboard.record(report.outcome);
            info!(outcome = ?report.outcome, games = self.scoreboard.played, "game over");
            self.notify(SessionEvent::GameOver(report.outcome));
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FixedScores;
    use crate::game::{Cell, COLS, ROWS};

    fn humans() -> TurnController {
        TurnController::new(ROWS, COLS, MoveProposer::Human, MoveProposer::Human)
            .unwrap()
            .with_seed(7)
    }

    fn human_vs(scores: Vec<f32>) -> TurnController {
        TurnController::new(
            ROWS,
            COLS,
            MoveProposer::Human,
            MoveProposer::automated(FixedScores::new(scores)),
        )
        .unwrap()
        .with_seed(7)
    }

    /// Column 1 full with alternating chips, everything else empty.
    fn board_with_full_column_one() -> Board {
        let mut cells = vec![Cell::Empty; ROWS * COLS];
        for row in 0..ROWS {
            cells[row * COLS + 1] = if row % 2 == 0 { Cell::Yellow } else { Cell::Red };
        }
        Board::from_cells(ROWS, COLS, cells).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let controller = humans();
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
        assert_eq!(controller.board().chip_count(), 0);
    }

    #[test]
    fn test_human_moves_alternate() {
        let mut controller = humans();
        let report = controller.submit_human_move(3).unwrap();
        assert_eq!(report.player, Player::Red);
        assert_eq!(report.column, 3);
        assert_eq!(report.row, ROWS - 1);
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Yellow));

        controller.submit_human_move(3).unwrap();
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
        assert_eq!(controller.board().get(ROWS - 2, 3), Cell::Yellow);
    }

    #[test]
    fn test_human_full_column_is_rejected_without_change() {
        let mut controller = humans();
        for _ in 0..ROWS {
            controller.submit_human_move(0).unwrap();
        }
        let before = controller.session().clone();
        let events = controller.subscribe();

        let err = controller.submit_human_move(0).unwrap_err();
        assert!(matches!(err, TurnError::Move(MoveError::ColumnFull { column: 0 })));
        assert_eq!(controller.session(), &before);
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::MoveRejected {
                player: Player::Red,
                column: 0
            }
        );
    }

    #[test]
    fn test_human_off_board_column_is_not_reported_as_full() {
        let mut controller = humans();
        let events = controller.subscribe();

        let err = controller.submit_human_move(COLS + 92).unwrap_err();
        assert!(matches!(err, TurnError::Move(MoveError::OutOfRange(_))));
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
        assert_eq!(controller.board().chip_count(), 0);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_human_cannot_move_for_policy() {
        let mut controller = human_vs(vec![0.0; COLS]);
        controller.submit_human_move(2).unwrap();
        assert!(matches!(
            controller.submit_human_move(2),
            Err(TurnError::NotHumanTurn {
                player: Player::Yellow
            })
        ));
    }

    #[test]
    fn test_policy_cannot_move_for_human() {
        let mut controller = human_vs(vec![0.0; COLS]);
        assert!(matches!(
            controller.play_automated_turn(),
            Err(TurnError::NotAutomatedTurn { player: Player::Red })
        ));
    }

    #[test]
    fn test_policy_plays_argmax() {
        let mut controller = human_vs(vec![0.1, 0.2, 0.3, 0.4, 0.9, 0.3, 0.2]);
        controller.submit_human_move(0).unwrap();
        let report = controller.play_automated_turn().unwrap();
        assert_eq!(report.player, Player::Yellow);
        assert_eq!(report.proposed, 4);
        assert_eq!(report.column, 4);
        assert_eq!(report.fallback_draws, 0);
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
    }

    #[test]
    fn test_policy_full_column_falls_back_to_random() {
        for seed in 0..20 {
            let session = GameSession::from_board(board_with_full_column_one(), Player::Red);
            let mut controller = TurnController::from_session(
                session,
                MoveProposer::automated(FixedScores::new(vec![
                    0.1, 0.9, 0.2, 0.1, 0.1, 0.1, 0.1,
                ])),
                MoveProposer::Human,
            )
            .with_seed(seed);
            let column_one = controller.board().column(1).unwrap();

            let report = controller.play_automated_turn().unwrap();
            assert_eq!(report.proposed, 1);
            assert_ne!(report.column, 1);
            assert!(report.fallback_draws >= 1);
            assert_eq!(controller.board().column(1).unwrap(), column_one);
            assert_eq!(controller.board().chip_count(), ROWS + 1);
            assert_eq!(controller.state(), TurnState::Awaiting(Player::Yellow));
        }
    }

    #[test]
    fn test_policy_error_leaves_state_unchanged() {
        let mut controller = human_vs(vec![1.0; COLS - 1]);
        controller.submit_human_move(0).unwrap();
        let before = controller.session().clone();
        assert!(matches!(
            controller.play_automated_turn(),
            Err(TurnError::Policy(PolicyError::ScoreCount { .. }))
        ));
        assert_eq!(controller.session(), &before);
    }

    #[test]
    fn test_human_input_gets_reply() {
        let mut controller = human_vs(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        match controller.human_input(2).unwrap() {
            HumanInput::Played { human, replies } => {
                assert_eq!(human.column, 2);
                assert_eq!(replies.len(), 1);
                assert_eq!(replies[0].column, 6);
                assert_eq!(replies[0].player, Player::Yellow);
            }
            HumanInput::Reset => panic!("game should not have been reset"),
        }
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
    }

    #[test]
    fn test_win_is_terminal_and_click_resets() {
        let mut controller = human_vs(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        for _ in 0..3 {
            controller.human_input(0).unwrap();
        }
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
        controller.human_input(0).unwrap();
        assert_eq!(
            controller.state(),
            TurnState::Terminal(Outcome::Win(Player::Red))
        );
        assert_eq!(controller.scoreboard().red_wins, 1);

        assert!(matches!(
            controller.submit_human_move(3),
            Err(TurnError::GameOver)
        ));

        assert_eq!(controller.human_input(3).unwrap(), HumanInput::Reset);
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
        assert_eq!(controller.board().chip_count(), 0);
        assert_eq!(controller.scoreboard().played, 1);
    }

    #[test]
    fn test_automated_game_always_finishes() {
        for seed in 0..10 {
            let mut controller = TurnController::new(
                ROWS,
                COLS,
                MoveProposer::automated(FixedScores::new(vec![0.0; COLS])),
                MoveProposer::automated(FixedScores::new(vec![0.0; COLS])),
            )
            .unwrap()
            .with_seed(seed);

            let reports = controller.advance().unwrap();
            assert!(matches!(controller.state(), TurnState::Terminal(_)));
            assert_eq!(reports.len(), controller.board().chip_count());
            assert!(reports.iter().any(|r| r.fallback_draws > 0));
            assert_eq!(controller.scoreboard().played, 1);
        }
    }

    #[test]
    fn test_events_follow_state_changes() {
        let mut controller = human_vs(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let events = controller.subscribe();

        controller.human_input(1).unwrap();
        controller.reset();

        let received: Vec<SessionEvent> = events.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(
            received[0],
            SessionEvent::MovePlayed(TurnReport { player: Player::Red, column: 1, .. })
        ));
        assert!(matches!(
            received[1],
            SessionEvent::MovePlayed(TurnReport { player: Player::Yellow, column: 6, .. })
        ));
        assert_eq!(received[2], SessionEvent::SessionReset);
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let mut controller = humans();
        drop(controller.subscribe());
        let events = controller.subscribe();
        controller.submit_human_move(0).unwrap();
        assert_eq!(controller.subscribers.len(), 1);
        assert!(events.try_recv().is_ok());
    }

    #[test]
    fn test_set_proposer_starts_new_game() {
        let mut controller = humans();
        controller.submit_human_move(0).unwrap();
        controller.set_proposer(
            Player::Yellow,
            MoveProposer::automated(FixedScores::new(vec![0.0; COLS])),
        );
        assert_eq!(controller.board().chip_count(), 0);
        assert_eq!(controller.proposer(Player::Yellow).label(), "Fixed");
        assert_eq!(controller.state(), TurnState::Awaiting(Player::Red));
    }

    #[test]
    fn test_draw_is_terminal() {
        let mut cells: Vec<Cell> = (0..ROWS)
            .flat_map(|row| {
                (0..COLS).map(move |col| {
                    if ((col % 4) / 2 + row) % 2 == 0 {
                        Cell::Red
                    } else {
                        Cell::Yellow
                    }
                })
            })
            .collect();
        // Leave the top of the last column open; that cell is Yellow in the
        // finished pattern.
        let last = COLS - 1;
        assert_eq!(cells[last], Cell::Yellow);
        cells[last] = Cell::Empty;
        let session =
            GameSession::from_board(Board::from_cells(ROWS, COLS, cells).unwrap(), Player::Yellow);
        let mut controller =
            TurnController::from_session(session, MoveProposer::Human, MoveProposer::Human);

        let report = controller.submit_human_move(last).unwrap();
        assert_eq!(report.outcome, Outcome::Draw);
        assert_eq!(controller.state(), TurnState::Terminal(Outcome::Draw));
        assert_eq!(controller.scoreboard().draws, 1);
    }
}
