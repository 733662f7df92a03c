//! Automated opponents: the scoring-policy capability, board encodings and
//! the two burn networks that implement it.

pub mod networks;
mod neural;
mod policy;
pub mod state_encoding;

pub use networks::{ConvNetwork, ConvNetworkConfig, DenseNetwork, DenseNetworkConfig};
pub use neural::{build_policy, BotConfig, BotKind, ConvPolicy, DensePolicy, InferBackend};
pub use policy::{argmax, AutomatedPolicy, FixedScores, MoveProposer, ScoringPolicy};
