//! Ledger trait definition.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from ledger operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient funds: {address} holds {available}, needs {required}")]
    InsufficientFunds {
        address: Address,
        available: u64,
        required: u64,
    },

    #[error("Insufficient custody: registry holds {available}, release needs {required}")]
    InsufficientCustody { available: u64, required: u64 },

    #[error("Balance overflow")]
    Overflow,
}

/// A single transfer out of registry custody
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub amount: u64,
}

impl Payout {
    pub fn new(to: Address, amount: u64) -> Self {
        Self { to, amount }
    }
}

/// Direction of a recorded transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// Player funds moved into registry custody
    Escrow,
    /// Custody paid out to a player
    Release,
}

/// Entry in a ledger's transfer history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub kind: TransferKind,
    pub address: Address,
    pub amount: u64,
}

/// Value-transfer primitive provided by the execution environment.
///
/// The registry only ever moves funds through these two calls. Both are
/// all-or-nothing: on error no balance has changed.
pub trait Ledger: Send + Sync {
    /// Spendable balance of an account
    fn balance(&self, address: &Address) -> u64;

    /// Move `amount` from `from` into registry custody
    fn escrow(&self, from: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Pay out of registry custody. The whole batch is applied or none of it.
    fn release(&self, payouts: &[Payout]) -> Result<(), LedgerError>;
}
