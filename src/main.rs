use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use neural_connect_four::ai::BotKind;
use neural_connect_four::config::{AppConfig, HumanSeat, LoggingConfig};
use neural_connect_four::ui::App;

/// Play Connect Four against a neural network.
#[derive(Parser)]
#[command(name = "neural_connect_four", about = "Play Connect Four against a neural network")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "neural_connect_four.toml")]
    config: PathBuf,

    /// Network to play against: dense or convolutional
    #[arg(long)]
    bot: Option<String>,

    /// Seat for the human player: red (moves first) or yellow
    #[arg(long)]
    human: Option<String>,

    /// Seed for the random fallback moves
    #[arg(long)]
    seed: Option<u64>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let loaded = AppConfig::load_if_present(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let config_found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();

    // Apply CLI overrides
    if let Some(bot) = &cli.bot {
        config.bot.kind = bot.parse::<BotKind>().map_err(anyhow::Error::msg)?;
    }
    if let Some(human) = &cli.human {
        config.session.human = match human.as_str() {
            "red" => HumanSeat::Red,
            "yellow" => HumanSeat::Yellow,
            other => bail!("unknown seat '{}' (expected 'red' or 'yellow')", other),
        };
    }
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }

    init_logging(&config.logging)?;
    if !config_found {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }
    info!(
        bot = %config.bot.kind,
        height = config.board.height,
        width = config.board.width,
        "starting game"
    );

    run(config)
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let log_file = std::fs::File::create(&logging.file)
        .with_context(|| format!("creating log file {}", logging.file.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .with_context(|| format!("invalid log filter '{}'", logging.filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("installing the log subscriber")
}

fn run(config: AppConfig) -> Result<()> {
    // Build the bot before touching the terminal so errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running the game")
}
