//! Rock-Paper-Scissors rules.

use crate::crypto::{Commitment, CommitmentScheme, Salt};
use crate::error::RegistryError;
use crate::protocol::GameResult;
use rps_ledger::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rock-Paper-Scissors move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Wire code: Rock = 0, Paper = 1, Scissors = 2
    pub fn code(&self) -> u8 {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }

    /// Convert to bytes for commitment
    pub fn to_bytes(&self) -> [u8; 1] {
        [self.code()]
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Scissors, Move::Paper) | (Move::Paper, Move::Rock)
        )
    }

    /// Commitment `player` publishes for this move under `scheme`
    pub fn commit(&self, scheme: CommitmentScheme, salt: &Salt, player: &Address) -> Commitment {
        scheme.commit(&self.to_bytes(), salt, player)
    }
}

impl TryFrom<u8> for Move {
    type Error = RegistryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Move::Rock),
            1 => Ok(Move::Paper),
            2 => Ok(Move::Scissors),
            other => Err(RegistryError::InvalidMove(other)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "Rock"),
            Move::Paper => write!(f, "Paper"),
            Move::Scissors => write!(f, "Scissors"),
        }
    }
}

/// Decide a game from the host's and the guest's moves
pub fn judge(host: Move, guest: Move) -> GameResult {
    if host == guest {
        GameResult::Draw
    } else if host.beats(&guest) {
        GameResult::HostWins
    } else {
        GameResult::GuestWins
    }
}
