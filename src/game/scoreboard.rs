use super::engine::Outcome;
use super::player::Player;

/// Running tally of finished games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub played: u32,
    pub red_wins: u32,
    pub yellow_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    /// Count a finished game. In-progress outcomes are ignored.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::InProgress => return,
            Outcome::Win(Player::Red) => self.red_wins += 1,
            Outcome::Win(Player::Yellow) => self.yellow_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
        self.played += 1;
    }

    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::Red => self.red_wins,
            Player::Yellow => self.yellow_wins,
        }
    }
}
