//! Registry error taxonomy.

use crate::protocol::{GameId, GameStatus, Slot};
use rps_ledger::LedgerError;
use thiserror::Error;

/// Every way a registry operation can be rejected.
///
/// A rejected call never leaves partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Stake must equal the entry fee of {expected}, got {actual}")]
    StakeMismatch { expected: u64, actual: u64 },

    #[error("Cannot join your own game")]
    SelfJoin,

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Game {game_id} is {actual}, expected {expected}")]
    InvalidStatus {
        game_id: GameId,
        expected: GameStatus,
        actual: GameStatus,
    },

    #[error("Invalid move code: {0}")]
    InvalidMove(u8),

    #[error("Salt must not be empty")]
    EmptySalt,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Math overflow")]
    MathOverflow,

    #[error("Revealed move and salt do not match the commitment")]
    CommitmentMismatch,

    #[error("Caller is not the {0} of this game")]
    Unauthorized(Slot),

    #[error("The {0} has already revealed")]
    AlreadyRevealed(Slot),

    #[error("Refund available in {remaining_secs}s")]
    RefundTooEarly { remaining_secs: u64 },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Class of failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input or wrong game state; fix the call and retry
    Validation,
    /// Reveal does not reproduce the commitment
    Integrity,
    /// Caller is not allowed to act on the slot
    Authorization,
    /// Refund window still open
    Timing,
    /// Value transfer rejected by the ledger
    Ledger,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::StakeMismatch { .. }
            | RegistryError::SelfJoin
            | RegistryError::GameNotFound(_)
            | RegistryError::InvalidStatus { .. }
            | RegistryError::InvalidMove(_)
            | RegistryError::EmptySalt
            | RegistryError::InvalidConfig(_)
            | RegistryError::MathOverflow => ErrorKind::Validation,
            RegistryError::CommitmentMismatch => ErrorKind::Integrity,
            RegistryError::Unauthorized(_) | RegistryError::AlreadyRevealed(_) => {
                ErrorKind::Authorization
            }
            RegistryError::RefundTooEarly { .. } => ErrorKind::Timing,
            RegistryError::Ledger(_) => ErrorKind::Ledger,
        }
    }
}
