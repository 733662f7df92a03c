use std::path::{Path, PathBuf};

use crate::ai::BotConfig;
use crate::error::ConfigError;
use crate::game::{Player, COLS, CONNECT, ROWS};

/// Board dimensions.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub height: usize,
    pub width: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            height: ROWS,
            width: COLS,
        }
    }
}

/// Seat the human plays. Red always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanSeat {
    Red,
    Yellow,
}

impl HumanSeat {
    pub fn player(self) -> Player {
        match self {
            HumanSeat::Red => Player::Red,
            HumanSeat::Yellow => Player::Yellow,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub human: HumanSeat,
    /// Seed for the random fallback moves; fresh entropy when unset
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            human: HumanSeat::Red,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
    /// The terminal belongs to the UI, so logs go to a file
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            file: PathBuf::from("neural_connect_four.log"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub bot: BotConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or `None` if the file does not
    /// exist. Runs before logging is set up, so reporting a missing file is
    /// left to the caller.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>, ConfigError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.height < CONNECT {
            return Err(ConfigError::Validation(format!(
                "board.height must be >= {CONNECT}"
            )));
        }
        if self.board.width < CONNECT {
            return Err(ConfigError::Validation(format!(
                "board.width must be >= {CONNECT}"
            )));
        }
        if self.bot.hidden_size == 0 {
            return Err(ConfigError::Validation(
                "bot.hidden_size must be > 0".into(),
            ));
        }
        if self.bot.conv_channels == 0 {
            return Err(ConfigError::Validation(
                "bot.conv_channels must be > 0".into(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
