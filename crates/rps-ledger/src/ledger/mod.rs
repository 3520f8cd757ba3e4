//! Value transfer abstraction.

mod mock;
mod traits;

pub use mock::MockLedger;
pub use traits::{Ledger, LedgerError, Payout, Transfer, TransferKind};
