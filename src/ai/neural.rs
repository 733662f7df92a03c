use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use burn::backend::NdArray;
use burn::prelude::*;
use burn::record::DefaultRecorder;
use tracing::{info, warn};

use super::networks::{ConvNetwork, ConvNetworkConfig, DenseNetwork, DenseNetworkConfig};
use super::policy::{AutomatedPolicy, ScoringPolicy};
use super::state_encoding::{encode_dense, encode_planes};
use crate::error::PolicyError;
use crate::game::{Board, Player};

/// Inference runs on the CPU; the networks are small.
pub type InferBackend = NdArray<f32>;

/// Which network plays the automated seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    Dense,
    Convolutional,
}

impl BotKind {
    pub fn other(self) -> BotKind {
        match self {
            BotKind::Dense => BotKind::Convolutional,
            BotKind::Convolutional => BotKind::Dense,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BotKind::Dense => "Dense network",
            BotKind::Convolutional => "Convolutional network",
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BotKind::Dense => "dense",
            BotKind::Convolutional => "convolutional",
        })
    }
}

impl FromStr for BotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dense" | "nn" => Ok(BotKind::Dense),
            "convolutional" | "conv" | "cnn" => Ok(BotKind::Convolutional),
            other => Err(format!(
                "unknown bot '{other}' (expected 'dense' or 'convolutional')"
            )),
        }
    }
}

/// Automated opponent settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub kind: BotKind,
    /// Burn record of a trained dense network
    pub dense_weights: Option<PathBuf>,
    /// Burn record of a trained convolutional network
    pub conv_weights: Option<PathBuf>,
    pub hidden_size: usize,
    pub conv_channels: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            kind: BotKind::Convolutional,
            dense_weights: None,
            conv_weights: None,
            hidden_size: 128,
            conv_channels: 32,
        }
    }
}

/// Build the automated policy described by `config` for a board of the given size.
///
/// Without a weights path the network keeps its random initialisation, which
/// plays legal but aimless moves.
pub fn build_policy(
    config: &BotConfig,
    height: usize,
    width: usize,
) -> Result<AutomatedPolicy, PolicyError> {
    let device = Default::default();
    let policy = match config.kind {
        BotKind::Dense => {
            let net_config =
                DenseNetworkConfig::new(height, width).with_hidden_size(config.hidden_size);
            let policy = match &config.dense_weights {
                Some(path) => DensePolicy::<InferBackend>::load(&net_config, path, &device)?,
                None => {
                    warn!("no dense network weights configured, using an untrained network");
                    DensePolicy::new(&net_config, &device)
                }
            };
            AutomatedPolicy::new(policy)
        }
        BotKind::Convolutional => {
            let net_config = ConvNetworkConfig::new(height, width)
                .with_channels(config.conv_channels)
                .with_hidden_size(config.hidden_size);
            let policy = match &config.conv_weights {
                Some(path) => ConvPolicy::<InferBackend>::load(&net_config, path, &device)?,
                None => {
                    warn!("no convolutional network weights configured, using an untrained network");
                    ConvPolicy::new(&net_config, &device)
                }
            };
            AutomatedPolicy::new(policy)
        }
    };
    info!(bot = %config.kind, height, width, "automated policy ready");
    Ok(policy)
}

fn check_shape(board: &Board, height: usize, width: usize) -> Result<(), PolicyError> {
    if board.height() != height || board.width() != width {
        return Err(PolicyError::BoardShape {
            expected_height: height,
            expected_width: width,
            height: board.height(),
            width: board.width(),
        });
    }
    Ok(())
}

fn scores_from<B: Backend>(output: Tensor<B, 2>) -> Result<Vec<f32>, PolicyError> {
    output
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| PolicyError::Inference(format!("{e:?}")))
}

fn load_error(path: &Path, err: impl fmt::Display) -> PolicyError {
    PolicyError::WeightsLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn save_error(path: &Path, err: impl fmt::Display) -> PolicyError {
    PolicyError::WeightsSave {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// [`ScoringPolicy`] over a [`DenseNetwork`].
pub struct DensePolicy<B: Backend> {
    network: DenseNetwork<B>,
    height: usize,
    width: usize,
    device: B::Device,
}

impl<B: Backend> DensePolicy<B> {
    /// Fresh, untrained network
    pub fn new(config: &DenseNetworkConfig, device: &B::Device) -> Self {
        DensePolicy {
            network: config.init(device),
            height: config.height,
            width: config.width,
            device: device.clone(),
        }
    }

    /// Network with weights read from a burn record file.
    pub fn load(
        config: &DenseNetworkConfig,
        path: &Path,
        device: &B::Device,
    ) -> Result<Self, PolicyError> {
        let recorder = DefaultRecorder::default();
        let network = config
            .init(device)
            .load_file(path.to_path_buf(), &recorder, device)
            .map_err(|e| load_error(path, e))?;
        info!(path = %path.display(), "loaded dense network weights");
        Ok(DensePolicy {
            network,
            height: config.height,
            width: config.width,
            device: device.clone(),
        })
    }

    /// Write the network weights to a burn record file.
    pub fn save(&self, path: &Path) -> Result<(), PolicyError> {
        let recorder = DefaultRecorder::default();
        self.network
            .clone()
            .save_file(path.to_path_buf(), &recorder)
            .map_err(|e| save_error(path, e))
    }
}

impl<B: Backend> ScoringPolicy for DensePolicy<B> {
    fn score(&self, board: &Board, player: Player) -> Result<Vec<f32>, PolicyError> {
        check_shape(board, self.height, self.width)?;
        let input = encode_dense::<B>(board, player, &self.device);
        scores_from(self.network.forward(input))
    }

    fn name(&self) -> &str {
        "Dense network"
    }
}

/// [`ScoringPolicy`] over a [`ConvNetwork`].
pub struct ConvPolicy<B: Backend> {
    network: ConvNetwork<B>,
    height: usize,
    width: usize,
    device: B::Device,
}

impl<B: Backend> ConvPolicy<B> {
    /// Fresh, untrained network
    pub fn new(config: &ConvNetworkConfig, device: &B::Device) -> Self {
        ConvPolicy {
            network: config.init(device),
            height: config.height,
            width: config.width,
            device: device.clone(),
        }
    }

    /// Network with weights read from a burn record file.
    pub fn load(
        config: &ConvNetworkConfig,
        path: &Path,
        device: &B::Device,
    ) -> Result<Self, PolicyError> {
        let recorder = DefaultRecorder::default();
        let network = config
            .init(device)
            .load_file(path.to_path_buf(), &recorder, device)
            .map_err(|e| load_error(path, e))?;
        info!(path = %path.display(), "loaded convolutional network weights");
        Ok(ConvPolicy {
            network,
            height: config.height,
            width: config.width,
            device: device.clone(),
        })
    }

    /// Write the network weights to a burn record file.
    pub fn save(&self, path: &Path) -> Result<(), PolicyError> {
        let recorder = DefaultRecorder::default();
        self.network
            .clone()
            .save_file(path.to_path_buf(), &recorder)
            .map_err(|e| save_error(path, e))
    }
}

impl<B: Backend> ScoringPolicy for ConvPolicy<B> {
    fn score(&self, board: &Board, player: Player) -> Result<Vec<f32>, PolicyError> {
        check_shape(board, self.height, self.width)?;
        let input = encode_planes::<B>(board, player, &self.device);
        scores_from(self.network.forward(input))
    }

    fn name(&self) -> &str {
        "Convolutional network"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameEngine, COLS, ROWS};

    fn sample_board() -> Board {
        let mut engine = GameEngine::default();
        engine.apply_move(Player::Red, 3).unwrap();
        engine.apply_move(Player::Yellow, 2).unwrap();
        engine.board().clone()
    }

    #[test]
    fn test_dense_policy_scores_every_column() {
        let device = Default::default();
        let policy =
            DensePolicy::<InferBackend>::new(&DenseNetworkConfig::new(ROWS, COLS), &device);
        let scores = policy.score(&sample_board(), Player::Red).unwrap();
        assert_eq!(scores.len(), COLS);
        assert!(scores.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_conv_policy_scores_every_column() {
        let device = Default::default();
        let config = ConvNetworkConfig::new(ROWS, COLS)
            .with_channels(4)
            .with_hidden_size(16);
        let policy = ConvPolicy::<InferBackend>::new(&config, &device);
        let scores = policy.score(&sample_board(), Player::Yellow).unwrap();
        assert_eq!(scores.len(), COLS);
    }

    #[test]
    fn test_policy_is_deterministic() {
        let device = Default::default();
        let policy =
            DensePolicy::<InferBackend>::new(&DenseNetworkConfig::new(ROWS, COLS), &device);
        let board = sample_board();
        assert_eq!(
            policy.score(&board, Player::Red).unwrap(),
            policy.score(&board, Player::Red).unwrap()
        );
    }

    #[test]
    fn test_policy_rejects_other_board_size() {
        let device = Default::default();
        let policy =
            DensePolicy::<InferBackend>::new(&DenseNetworkConfig::new(ROWS, COLS), &device);
        let board = Board::new(4, 4).unwrap();
        assert!(matches!(
            policy.score(&board, Player::Red),
            Err(PolicyError::BoardShape { width: 4, .. })
        ));
    }

    #[test]
    fn test_saved_weights_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conv");
        let device = Default::default();
        let config = ConvNetworkConfig::new(ROWS, COLS)
            .with_channels(4)
            .with_hidden_size(16);

        let original = ConvPolicy::<InferBackend>::new(&config, &device);
        original.save(&path).unwrap();
        let loaded = ConvPolicy::<InferBackend>::load(&config, &path, &device).unwrap();

        let board = sample_board();
        let a = original.score(&board, Player::Red).unwrap();
        let b = loaded.score(&board, Player::Red).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_missing_weights_file() {
        let device = Default::default();
        let result = DensePolicy::<InferBackend>::load(
            &DenseNetworkConfig::new(ROWS, COLS),
            Path::new("no/such/weights"),
            &device,
        );
        assert!(matches!(result, Err(PolicyError::WeightsLoad { .. })));
    }

    #[test]
    fn test_failed_save_is_a_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"").unwrap();
        let device = Default::default();
        let policy = DensePolicy::<InferBackend>::new(
            &DenseNetworkConfig::new(ROWS, COLS).with_hidden_size(8),
            &device,
        );

        let result = policy.save(&blocker.join("dense"));
        assert!(matches!(result, Err(PolicyError::WeightsSave { .. })));
    }

    #[test]
    fn test_build_policy_without_weights() {
        let config = BotConfig {
            kind: BotKind::Dense,
            hidden_size: 16,
            ..BotConfig::default()
        };
        let policy = build_policy(&config, ROWS, COLS).unwrap();
        assert_eq!(policy.name(), "Dense network");
        let column = policy.propose(&Board::standard(), Player::Yellow).unwrap();
        assert!(column < COLS);
    }

    #[test]
    fn test_bot_kind_parsing() {
        assert_eq!("dense".parse::<BotKind>(), Ok(BotKind::Dense));
        assert_eq!("cnn".parse::<BotKind>(), Ok(BotKind::Convolutional));
        assert!("mcts".parse::<BotKind>().is_err());
        assert_eq!(BotKind::Dense.other(), BotKind::Convolutional);
        assert_eq!(BotKind::Convolutional.to_string(), "convolutional");
    }
}
