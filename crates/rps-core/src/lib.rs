//! RPS Core Library
//!
//! This crate provides the commit-reveal primitives, game rules, and the
//! registry state machine for stake-based Rock-Paper-Scissors.

pub mod config;
pub mod crypto;
pub mod error;
pub mod games;
pub mod protocol;
pub mod registry;

pub use config::RegistryConfig;
pub use crypto::{Commitment, CommitmentScheme, Salt};
pub use error::{ErrorKind, RegistryError};
pub use games::{judge, Move};
pub use protocol::{
    Game, GameId, GameResult, GameStatus, Outcome, PlayerSlot, RegistryEvent, Settlement,
    SettlementKind, Slot,
};
pub use registry::GameRegistry;

pub use rps_ledger::{
    Address, Clock, Ledger, LedgerError, ManualClock, MockLedger, Payout, SystemClock,
};
