use crate::error::PolicyError;
use crate::game::{Board, Player};

/// Opaque move-scoring function: board + acting player to one score per column.
///
/// Implementations must not mutate anything observable; the same input is
/// expected to give the same scores.
pub trait ScoringPolicy {
    /// One score per column of `board`, higher is better.
    fn score(&self, board: &Board, player: Player) -> Result<Vec<f32>, PolicyError>;

    /// Display name for the policy.
    fn name(&self) -> &str;
}

/// Index of the highest score, ties going to the lowest index.
/// NaN scores never win. Returns `None` when no score is comparable.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Turns a [`ScoringPolicy`] into a column choice.
pub struct AutomatedPolicy {
    policy: Box<dyn ScoringPolicy>,
}

impl AutomatedPolicy {
    pub fn new(policy: impl ScoringPolicy + 'static) -> Self {
        AutomatedPolicy {
            policy: Box::new(policy),
        }
    }

    pub fn name(&self) -> &str {
        self.policy.name()
    }

    /// The column the policy likes best. May be a full column; legality is
    /// the controller's business.
    pub fn propose(&self, board: &Board, player: Player) -> Result<usize, PolicyError> {
        let scores = self.policy.score(board, player)?;
        if scores.len() != board.width() {
            return Err(PolicyError::ScoreCount {
                expected: board.width(),
                actual: scores.len(),
            });
        }
        argmax(&scores).ok_or(PolicyError::NoFiniteScore)
    }
}

impl std::fmt::Debug for AutomatedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomatedPolicy")
            .field("policy", &self.policy.name())
            .finish()
    }
}

/// Who picks the moves for one seat.
#[derive(Debug)]
pub enum MoveProposer {
    /// Columns arrive from outside, e.g. key presses.
    Human,
    Automated(AutomatedPolicy),
}

impl MoveProposer {
    pub fn automated(policy: impl ScoringPolicy + 'static) -> Self {
        MoveProposer::Automated(AutomatedPolicy::new(policy))
    }

    pub fn is_human(&self) -> bool {
        matches!(self, MoveProposer::Human)
    }

    pub fn label(&self) -> &str {
        match self {
            MoveProposer::Human => "Human",
            MoveProposer::Automated(policy) => policy.name(),
        }
    }
}

/// Policy returning the same scores for every position. Handy for tests and
/// demos.
#[derive(Debug, Clone)]
pub struct FixedScores {
    scores: Vec<f32>,
}

impl FixedScores {
    pub fn new(scores: Vec<f32>) -> Self {
        FixedScores { scores }
    }
}

impl ScoringPolicy for FixedScores {
    fn score(&self, _board: &Board, _player: Player) -> Result<Vec<f32>, PolicyError> {
        Ok(self.scores.clone())
    }

    fn name(&self) -> &str {
        "Fixed"
    }
}
