//! Protocol types.

use crate::crypto::Commitment;
use crate::games::Move;
use rps_ledger::{Address, Payout};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game identifier, assigned sequentially from zero and never reused
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Arena slot, if the id is addressable on this target
    pub(crate) fn index(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for GameId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a game. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Waiting for a second player
    Waiting,
    /// Both staked, waiting for reveals
    InProgress,
    /// Payout settled
    Complete,
}

impl GameStatus {
    pub fn as_u8(&self) -> u8 {
        match self {
            GameStatus::Waiting => 0,
            GameStatus::InProgress => 1,
            GameStatus::Complete => 2,
        }
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" | "0" => Ok(GameStatus::Waiting),
            "in_progress" | "1" => Ok(GameStatus::InProgress),
            "complete" | "2" => Ok(GameStatus::Complete),
            other => Err(format!("unknown game status: {}", other)),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Waiting => write!(f, "waiting"),
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Complete => write!(f, "complete"),
        }
    }
}

/// A player's result in a game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Pending,
    Winner,
    Loser,
    Draw,
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    HostWins,
    GuestWins,
    Draw,
}

impl GameResult {
    /// Winning slot, if any
    pub fn winner(&self) -> Option<Slot> {
        match self {
            GameResult::HostWins => Some(Slot::Host),
            GameResult::GuestWins => Some(Slot::Guest),
            GameResult::Draw => None,
        }
    }

    /// Outcome recorded for the given slot
    pub fn outcome_for(&self, slot: Slot) -> Outcome {
        match self.winner() {
            None => Outcome::Draw,
            Some(w) if w == slot => Outcome::Winner,
            Some(_) => Outcome::Loser,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::HostWins => write!(f, "host wins"),
            GameResult::GuestWins => write!(f, "guest wins"),
            GameResult::Draw => write!(f, "draw"),
        }
    }
}

/// Player position within a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Host,
    Guest,
}

impl Slot {
    /// Get the opponent
    pub fn other(&self) -> Slot {
        match self {
            Slot::Host => Slot::Guest,
            Slot::Guest => Slot::Host,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Host => write!(f, "host"),
            Slot::Guest => write!(f, "guest"),
        }
    }
}

/// One player's seat in a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub address: Address,
    pub commitment: Commitment,
    /// `None` until the move is revealed and verified
    #[serde(rename = "move")]
    pub revealed: Option<Move>,
    pub outcome: Outcome,
}

impl PlayerSlot {
    pub fn new(address: Address, commitment: Commitment) -> Self {
        Self {
            address,
            commitment,
            revealed: None,
            outcome: Outcome::Pending,
        }
    }

    pub fn has_revealed(&self) -> bool {
        self.revealed.is_some()
    }
}

/// How a game was closed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettlementKind {
    /// Both revealed, one side won the pot
    Win { winner: Slot },
    /// Both revealed the same move, stakes split back
    Draw,
    /// Reveal window elapsed, stakes returned
    Refund,
}

/// Receipt of a completed game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(flatten)]
    pub kind: SettlementKind,
    pub payouts: Vec<Payout>,
    pub settled_at: u64,
}

/// A single match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub host: PlayerSlot,
    pub guest: Option<PlayerSlot>,
    pub pot: u64,
    pub status: GameStatus,
    /// Unix seconds when the guest joined; 0 until then
    pub start_time: u64,
    pub created_at: u64,
    pub settlement: Option<Settlement>,
}

impl Game {
    pub fn player(&self, slot: Slot) -> Option<&PlayerSlot> {
        match slot {
            Slot::Host => Some(&self.host),
            Slot::Guest => self.guest.as_ref(),
        }
    }

    pub(crate) fn player_mut(&mut self, slot: Slot) -> Option<&mut PlayerSlot> {
        match slot {
            Slot::Host => Some(&mut self.host),
            Slot::Guest => self.guest.as_mut(),
        }
    }

    /// Slot held by `address`, if any
    pub fn slot_of(&self, address: &Address) -> Option<Slot> {
        if self.host.address == *address {
            Some(Slot::Host)
        } else if self.guest.as_ref().is_some_and(|g| g.address == *address) {
            Some(Slot::Guest)
        } else {
            None
        }
    }

    /// Both moves, once both players have revealed
    pub fn revealed_moves(&self) -> Option<(Move, Move)> {
        let host = self.host.revealed?;
        let guest = self.guest.as_ref()?.revealed?;
        Some((host, guest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Salt;

    fn slot(byte: u8) -> PlayerSlot {
        PlayerSlot::new(
            Address::from_bytes([byte; 20]),
            Commitment::new(&[0], &Salt::new("pass").unwrap()),
        )
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GameStatus::Waiting.as_u8(), 0);
        assert_eq!(GameStatus::InProgress.as_u8(), 1);
        assert_eq!(GameStatus::Complete.as_u8(), 2);
        assert_eq!("in_progress".parse::<GameStatus>(), Ok(GameStatus::InProgress));
        assert_eq!("2".parse::<GameStatus>(), Ok(GameStatus::Complete));
    }

    #[test]
    fn test_game_id_index_never_wraps() {
        assert_eq!(GameId::new(7).index(), Some(7));
        assert_ne!(GameId::new(1 << 32).index(), Some(0));
        assert_eq!(GameId::new(u64::MAX).index(), usize::try_from(u64::MAX).ok());
    }

    #[test]
    fn test_slot_other() {
        assert_eq!(Slot::Host.other(), Slot::Guest);
        assert_eq!(Slot::Guest.other(), Slot::Host);
    }

    #[test]
    fn test_result_outcomes() {
        assert_eq!(GameResult::HostWins.outcome_for(Slot::Host), Outcome::Winner);
        assert_eq!(GameResult::HostWins.outcome_for(Slot::Guest), Outcome::Loser);
        assert_eq!(GameResult::GuestWins.outcome_for(Slot::Guest), Outcome::Winner);
        assert_eq!(GameResult::Draw.outcome_for(Slot::Host), Outcome::Draw);
        assert_eq!(GameResult::Draw.winner(), None);
    }

    #[test]
    fn test_slot_of() {
        let game = Game {
            id: GameId::new(0),
            host: slot(1),
            guest: Some(slot(2)),
            pot: 2000,
            status: GameStatus::InProgress,
            start_time: 10,
            created_at: 5,
            settlement: None,
        };

        assert_eq!(game.slot_of(&Address::from_bytes([1; 20])), Some(Slot::Host));
        assert_eq!(game.slot_of(&Address::from_bytes([2; 20])), Some(Slot::Guest));
        assert_eq!(game.slot_of(&Address::from_bytes([3; 20])), None);
        assert_eq!(game.revealed_moves(), None);
    }

    #[test]
    fn test_game_serializes_move_field() {
        let mut host = slot(1);
        host.revealed = Some(Move::Rock);
        let json = serde_json::to_value(&host).unwrap();
        assert_eq!(json["move"], "rock");
        assert_eq!(json["outcome"], "pending");
    }
}
