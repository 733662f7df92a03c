use std::path::PathBuf;

/// Errors raised while asking an automated policy for column scores.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy returned {actual} scores for a board with {expected} columns")]
    ScoreCount { expected: usize, actual: usize },

    #[error("policy returned no finite score")]
    NoFiniteScore,

    #[error("network was built for a {expected_height}x{expected_width} board, got {height}x{width}")]
    BoardShape {
        expected_height: usize,
        expected_width: usize,
        height: usize,
        width: usize,
    },

    #[error("failed to load weights from {path}: {message}")]
    WeightsLoad { path: PathBuf, message: String },

    #[error("failed to save weights to {path}: {message}")]
    WeightsSave { path: PathBuf, message: String },

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Errors that can stop the interactive game from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid board: {0}")]
    Board(#[from] crate::game::BoardError),

    #[error("could not build the automated player: {0}")]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Turn(#[from] crate::game::TurnError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_error_display() {
        let err = PolicyError::ScoreCount {
            expected: 7,
            actual: 6,
        };
        assert_eq!(
            err.to_string(),
            "policy returned 6 scores for a board with 7 columns"
        );
    }

    #[test]
    fn test_weights_error_display() {
        let err = PolicyError::WeightsLoad {
            path: PathBuf::from("weights/conv"),
            message: "file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load weights from weights/conv: file not found"
        );
    }

    #[test]
    fn test_weights_save_error_display() {
        let err = PolicyError::WeightsSave {
            path: PathBuf::from("weights/dense"),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to save weights to weights/dense: permission denied"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("board.height must be >= 4".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: board.height must be >= 4"
        );
    }
}
