use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::Receiver;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::{error, info};

use super::display::DisplayBoard;
use super::game_view::{self, GameView};
use crate::ai::{build_policy, MoveProposer};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::game::{
    HumanInput, MoveError, Outcome, Player, SessionEvent, TurnController, TurnError, TurnState,
};

const HISTORY_LEN: usize = 10;

pub struct App {
    controller: TurnController,
    events: Receiver<SessionEvent>,
    config: AppConfig,
    human: Player,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    history: VecDeque<String>,
}

impl App {
    /// Build the game described by `config`: the human in one seat and the
    /// configured network in the other.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let human = config.session.human.player();
        let bot = MoveProposer::Automated(build_policy(
            &config.bot,
            config.board.height,
            config.board.width,
        )?);
        let (red, yellow) = match human {
            Player::Red => (MoveProposer::Human, bot),
            Player::Yellow => (bot, MoveProposer::Human),
        };
        let mut controller =
            TurnController::new(config.board.height, config.board.width, red, yellow)?;
        if let Some(seed) = config.session.seed {
            controller = controller.with_seed(seed);
        }
        Self::with_controller(controller, config, human)
    }

    /// Wrap an existing controller. Automated seats move right away if it is
    /// their turn.
    pub fn with_controller(
        mut controller: TurnController,
        config: AppConfig,
        human: Player,
    ) -> Result<Self, AppError> {
        let events = controller.subscribe();
        let selected_column = controller.board().width() / 2;
        let mut app = App {
            controller,
            events,
            config,
            human,
            selected_column,
            should_quit: false,
            message: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
        };
        app.controller.advance()?;
        app.drain_events();
        Ok(app)
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            self.drain_events();
            terminal.draw(|f| self.render(f)).map_err(Into::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Messages go away on the next key, except the end-of-game one.
        if !self.controller.session().is_terminal() {
            self.message = None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.controller.board().width() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_chip();
            }
            KeyCode::Char('r') => {
                self.controller.reset();
                self.message = Some("New game started!".to_string());
                self.advance_bot();
            }
            KeyCode::Char('b') => {
                self.switch_bot();
            }
            _ => {}
        }
        self.drain_events();
    }

    /// Drop a chip in the selected column, or start over after a finished game
    fn drop_chip(&mut self) {
        match self.controller.human_input(self.selected_column) {
            Ok(HumanInput::Reset) => {
                self.message = None;
                self.advance_bot();
            }
            Ok(HumanInput::Played { .. }) => {
                self.message = self.outcome_message();
            }
            Err(TurnError::Move(MoveError::ColumnFull { .. })) => {
                self.message = Some("This column is full!".to_string());
            }
            Err(err) => {
                error!(%err, "move failed");
                self.message = Some(err.to_string());
            }
        }
    }

    /// Let the bot move if it is its turn (it opens when the human plays Yellow)
    fn advance_bot(&mut self) {
        if let Err(err) = self.controller.advance() {
            error!(%err, "automated move failed");
            self.message = Some(err.to_string());
            return;
        }
        if let Some(message) = self.outcome_message() {
            self.message = Some(message);
        }
    }

    /// Swap the dense and convolutional networks. Starts a new game.
    fn switch_bot(&mut self) {
        let kind = self.config.bot.kind.other();
        let mut bot_config = self.config.bot.clone();
        bot_config.kind = kind;

        let board = self.controller.board();
        match build_policy(&bot_config, board.height(), board.width()) {
            Ok(policy) => {
                self.controller
                    .set_proposer(self.human.other(), MoveProposer::Automated(policy));
                self.config.bot.kind = kind;
                info!(bot = %kind, "switched automated opponent");
                self.message = Some(format!("Now playing against the {}", kind.label()));
                self.advance_bot();
            }
            Err(err) => {
                error!(%err, bot = %kind, "could not switch bot");
                self.message = Some(format!("Could not load the {}: {err}", kind.label()));
            }
        }
    }

    fn outcome_message(&self) -> Option<String> {
        match self.controller.state() {
            TurnState::Awaiting(_) => None,
            TurnState::Terminal(Outcome::Win(player)) if player == self.human => {
                Some("You won :) Press Enter to play again!".to_string())
            }
            TurnState::Terminal(Outcome::Win(_)) => {
                Some("The machine won :( Press Enter to play again!".to_string())
            }
            TurnState::Terminal(_) => Some("Draw! Press Enter to play again!".to_string()),
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let line = match event {
                SessionEvent::MovePlayed(report) if report.fallback_draws > 0 => format!(
                    "{} -> column {} (wanted {})",
                    report.player.name(),
                    report.column + 1,
                    report.proposed + 1
                ),
                SessionEvent::MovePlayed(report) => {
                    format!("{} -> column {}", report.player.name(), report.column + 1)
                }
                SessionEvent::MoveRejected { player, column } => {
                    format!("{} tried full column {}", player.name(), column + 1)
                }
                SessionEvent::GameOver(Outcome::Win(player)) => format!("{} wins", player.name()),
                SessionEvent::GameOver(_) => "Draw".to_string(),
                SessionEvent::SessionReset => "New game".to_string(),
            };
            if self.history.len() == HISTORY_LEN {
                self.history.pop_front();
            }
            self.history.push_back(line);
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let hover = match self.controller.state() {
            TurnState::Awaiting(player) if player == self.human => {
                Some((self.selected_column, player))
            }
            _ => None,
        };
        let display = DisplayBoard::project(self.controller.board(), hover);
        let bot = self.controller.proposer(self.human.other()).label();

        game_view::render(
            frame,
            &GameView {
                state: self.controller.state(),
                display: &display,
                human: self.human,
                bot,
                selected_column: self.selected_column,
                score: self.controller.scoreboard(),
                message: self.message.as_deref(),
                history: &self.history,
            },
        );
    }
}
