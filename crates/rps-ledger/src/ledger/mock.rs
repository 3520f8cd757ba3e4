//! In-memory ledger for tests and simulated deployments.

use super::traits::{Ledger, LedgerError, Payout, Transfer, TransferKind};
use crate::address::Address;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MockLedgerState {
    balances: HashMap<Address, u64>,
    /// Funds currently held on behalf of the registry
    custody: u64,
    history: Vec<Transfer>,
}

/// In-memory ledger; clones share state
#[derive(Clone, Debug, Default)]
pub struct MockLedger {
    state: Arc<Mutex<MockLedgerState>>,
}

impl MockLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with initial balances
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, u64)>) -> Self {
        let ledger = Self::new();
        for (address, amount) in balances {
            ledger.state().balances.insert(address, amount);
        }
        ledger
    }

    fn state(&self) -> MutexGuard<'_, MockLedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Credit an account from outside the system (faucet)
    pub fn fund(&self, address: &Address, amount: u64) -> Result<u64, LedgerError> {
        let mut state = self.state();
        let balance = state.balances.entry(*address).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(*balance)
    }

    /// Funds currently held in custody
    pub fn custody(&self) -> u64 {
        self.state().custody
    }

    /// All transfers so far, oldest first
    pub fn history(&self) -> Vec<Transfer> {
        self.state().history.clone()
    }
}

impl Ledger for MockLedger {
    fn balance(&self, address: &Address) -> u64 {
        self.state().balances.get(address).copied().unwrap_or(0)
    }

    fn escrow(&self, from: &Address, amount: u64) -> Result<(), LedgerError> {
        let mut state = self.state();
        let available = state.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                address: *from,
                available,
                required: amount,
            });
        }
        let custody = state
            .custody
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        state.balances.insert(*from, available - amount);
        state.custody = custody;
        state.history.push(Transfer {
            kind: TransferKind::Escrow,
            address: *from,
            amount,
        });
        Ok(())
    }

    fn release(&self, payouts: &[Payout]) -> Result<(), LedgerError> {
        let mut state = self.state();

        let required = payouts
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.amount))
            .ok_or(LedgerError::Overflow)?;
        if state.custody < required {
            return Err(LedgerError::InsufficientCustody {
                available: state.custody,
                required,
            });
        }

        // Compute every new balance before touching any of them
        let mut updated: HashMap<Address, u64> = HashMap::new();
        for payout in payouts {
            let current = match updated.get(&payout.to) {
                Some(b) => *b,
                None => state.balances.get(&payout.to).copied().unwrap_or(0),
            };
            let next = current
                .checked_add(payout.amount)
                .ok_or(LedgerError::Overflow)?;
            updated.insert(payout.to, next);
        }

        state.custody -= required;
        state.balances.extend(updated);
        state
            .history
            .extend(payouts.iter().map(|p| Transfer {
                kind: TransferKind::Release,
                address: p.to,
                amount: p.amount,
            }));
        tracing::debug!(payouts = payouts.len(), total = required, "released custody");
        Ok(())
    }
}
